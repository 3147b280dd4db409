use super::context::PipelineContext;
use super::error::GenerateError;
use super::plugins::PluginRegistry;
use super::renderer::{Platform, TemplateRenderer};
use super::selector::select_stages;
use super::settings::UserSettings;
use super::stage::Stage;
use crate::profile::TechProfile;
use std::path::Path;
use tracing::info;

/// A generated pipeline document and the stages it contains.
#[derive(Debug, Clone)]
pub struct GeneratedPipeline {
    pub platform: Platform,
    pub stages: Vec<Stage>,
    pub content: String,
}

pub struct PipelineGenerator {
    registry: PluginRegistry,
    renderer: TemplateRenderer,
    default_platform: String,
}

impl PipelineGenerator {
    pub fn new(renderer: TemplateRenderer, default_platform: impl Into<String>) -> Self {
        Self {
            registry: PluginRegistry::with_defaults(),
            renderer,
            default_platform: default_platform.into(),
        }
    }

    /// Generator over the built-in templates plus any found under `template_root`.
    pub fn with_template_root(template_root: Option<&Path>, default_platform: &str) -> Result<Self, GenerateError> {
        Ok(Self::new(TemplateRenderer::with_template_root(template_root)?, default_platform))
    }

    pub fn with_registry(mut self, registry: PluginRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Platform from the explicit argument, then the settings, then the default.
    pub fn resolve_platform(&self, explicit: Option<&str>, settings: &UserSettings) -> Result<Platform, GenerateError> {
        explicit
            .or(settings.platform.as_deref())
            .unwrap_or(&self.default_platform)
            .parse()
    }

    pub fn select_stages(&self, profile: &TechProfile, settings: &UserSettings) -> Vec<Stage> {
        select_stages(&self.registry, profile, settings)
    }

    pub fn generate(
        &self,
        profile: &TechProfile,
        settings: &UserSettings,
        platform: Option<&str>,
    ) -> Result<GeneratedPipeline, GenerateError> {
        let platform = self.resolve_platform(platform, settings)?;
        for stage in settings.template_overrides.keys() {
            stage
                .parse::<Stage>()
                .map_err(|_| GenerateError::UnknownStage(stage.clone()))?;
        }

        let stages = self.select_stages(profile, settings);
        let ctx = PipelineContext::new(profile, settings, &stages);
        let content = self
            .renderer
            .render(platform, &stages, &ctx, &settings.template_overrides)?;

        info!(
            platform = %platform,
            stages = stages.len(),
            bytes = content.len(),
            "Pipeline generated"
        );
        Ok(GeneratedPipeline {
            platform,
            stages,
            content,
        })
    }
}

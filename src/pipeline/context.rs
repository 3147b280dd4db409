//! Rendering context handed to the templates

use super::settings::{Triggers, UserSettings};
use super::stage::Stage;
use crate::profile::TechProfile;
use crate::stack::Language;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_PROJECT_NAME: &str = "myapp";
pub const DEFAULT_PYTHON_VERSION: &str = "3.11";
pub const DEFAULT_JAVA_VERSION: &str = "17";
pub const DEFAULT_GO_VERSION: &str = "1.21";
pub const DEFAULT_NODE_VERSION: &str = "18";
pub const DEFAULT_REGISTRY: &str = "$CI_REGISTRY";
pub const DEFAULT_TAG: &str = "$CI_COMMIT_SHORT_SHA";

const JAVA_BUILD_TOOLS: &[&str] = &["maven", "gradle", "ant"];

/// Everything a stage template may reference
#[derive(Debug, Clone, Serialize)]
pub struct PipelineContext {
    /// Primary language; also the template directory searched first
    pub language: Language,

    pub project_name: String,

    /// maven, gradle or ant for Java projects
    pub build_tool: Option<String>,

    pub python_version: String,
    pub java_version: String,
    pub go_version: String,
    pub node_version: String,

    /// Image used by the language build jobs
    pub build_image: Option<String>,

    pub registry: String,
    /// Image reference without tag: the configured image or `<registry>/<project>`
    pub image_name: String,
    pub tag: String,

    pub variables: BTreeMap<String, String>,
    pub triggers: Triggers,
    pub has_triggers: bool,

    pub docker_context: String,
    pub dockerfile_path: String,
    pub dockerfile_paths: Vec<String>,

    pub use_docker_compose: bool,

    /// Selected stages in execution order
    pub stages: Vec<String>,

    /// Detection result the context was derived from
    pub profile: TechProfile,
}

fn pick(setting: &Option<String>, fallback: impl FnOnce() -> String) -> String {
    setting
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(fallback)
}

impl PipelineContext {
    pub fn new(profile: &TechProfile, settings: &UserSettings, stages: &[Stage]) -> Self {
        let language = profile.languages.first().copied().unwrap_or(Language::Python);

        let java_version = pick(&settings.java_version, || {
            profile
                .java_version
                .map(|v| v.to_string())
                .unwrap_or_else(|| DEFAULT_JAVA_VERSION.to_string())
        });

        let build_tool = if language == Language::Java {
            let detected = profile
                .package_manager
                .as_deref()
                .map(str::to_ascii_lowercase)
                .filter(|pm| JAVA_BUILD_TOOLS.contains(&pm.as_str()));
            Some(detected.unwrap_or_else(|| pick(&settings.build_tool, || "maven".to_string())))
        } else {
            settings.build_tool.clone()
        };

        let build_image = settings.build_image.clone().or_else(|| {
            if language != Language::Java {
                return None;
            }
            match build_tool.as_deref() {
                Some("maven") => Some(format!("maven:3.9-eclipse-temurin-{}", java_version)),
                Some("gradle") => Some(format!("gradle:8.5-jdk{}", java_version)),
                _ => None,
            }
        });

        let dockerfile_paths = profile.dockerfile_paths();
        let docker_context = pick(&settings.docker_context, || {
            if profile.docker {
                profile.docker_context()
            } else {
                ".".to_string()
            }
        });
        let dockerfile_path = pick(&settings.dockerfile_path, || {
            profile
                .primary_dockerfile()
                .filter(|_| profile.docker)
                .unwrap_or_else(|| "Dockerfile".to_string())
        });

        let project_name = pick(&settings.project_name, || DEFAULT_PROJECT_NAME.to_string());
        let registry = pick(&settings.docker_registry, || DEFAULT_REGISTRY.to_string());
        let image_name = pick(&settings.docker_image, || format!("{}/{}", registry, project_name));

        Self {
            language,
            project_name,
            build_tool,
            python_version: pick(&settings.python_version, || DEFAULT_PYTHON_VERSION.to_string()),
            java_version,
            go_version: pick(&settings.go_version, || DEFAULT_GO_VERSION.to_string()),
            node_version: pick(&settings.node_version, || DEFAULT_NODE_VERSION.to_string()),
            build_image,
            registry,
            image_name,
            tag: pick(&settings.docker_tag, || DEFAULT_TAG.to_string()),
            variables: settings.variables.clone(),
            triggers: settings.triggers.clone(),
            has_triggers: !settings.triggers.is_empty(),
            docker_context,
            dockerfile_path,
            dockerfile_paths,
            use_docker_compose: settings.use_docker_compose,
            stages: stages.iter().map(|s| s.as_str().to_string()).collect(),
            profile: profile.clone(),
        }
    }

    /// Template directory for the primary language.
    pub fn language_dir(&self) -> &'static str {
        self.language.as_str()
    }
}

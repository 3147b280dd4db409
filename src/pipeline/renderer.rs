//! Handlebars rendering of pipeline documents.
//!
//! Built-in templates are compiled into the binary. Templates found under an optional
//! template root are registered on top, so a file such as
//! `<root>/gitlab/stages/go/build.hbs` replaces the built-in `gitlab/stages/go/build`
//! and new directories or stages can be added without rebuilding.

use super::context::PipelineContext;
use super::error::GenerateError;
use super::stage::Stage;
use handlebars::{handlebars_helper, no_escape, Handlebars};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Stage template directories in lookup order.
pub const STAGE_DIRS: &[&str] = &[
    "tests",
    "python",
    "java",
    "go",
    "typescript",
    "docker",
    "kubernetes",
    "shared",
];

const TEMPLATE_EXTENSION: &str = "hbs";

macro_rules! builtin_templates {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name, ".hbs")))),*]
    };
}

const BUILTIN_TEMPLATES: &[(&str, &str)] = builtin_templates![
    "gitlab/base_header",
    "gitlab/stages/shared/pre_checks",
    "gitlab/stages/shared/deploy",
    "gitlab/stages/python/lint",
    "gitlab/stages/python/type_check",
    "gitlab/stages/python/security",
    "gitlab/stages/python/build",
    "gitlab/stages/python/migration",
    "gitlab/stages/java/lint",
    "gitlab/stages/java/type_check",
    "gitlab/stages/java/security",
    "gitlab/stages/java/build",
    "gitlab/stages/java/migration",
    "gitlab/stages/go/lint",
    "gitlab/stages/go/type_check",
    "gitlab/stages/go/security",
    "gitlab/stages/go/build",
    "gitlab/stages/go/migration",
    "gitlab/stages/typescript/lint",
    "gitlab/stages/typescript/type_check",
    "gitlab/stages/typescript/security",
    "gitlab/stages/typescript/build",
    "gitlab/stages/typescript/migration",
    "gitlab/stages/tests/test",
    "gitlab/stages/docker/docker_build",
    "gitlab/stages/docker/docker_push",
    "gitlab/stages/docker/integration",
    "gitlab/stages/docker/cleanup",
    "gitlab/stages/kubernetes/deploy",
    "gitlab/stages/kubernetes/post_deploy",
    "jenkins/base_header",
    "jenkins/base_footer",
    "jenkins/stages/shared/pre_checks",
    "jenkins/stages/shared/deploy",
    "jenkins/stages/python/lint",
    "jenkins/stages/python/type_check",
    "jenkins/stages/python/security",
    "jenkins/stages/python/build",
    "jenkins/stages/python/migration",
    "jenkins/stages/java/lint",
    "jenkins/stages/java/type_check",
    "jenkins/stages/java/security",
    "jenkins/stages/java/build",
    "jenkins/stages/java/migration",
    "jenkins/stages/go/lint",
    "jenkins/stages/go/type_check",
    "jenkins/stages/go/security",
    "jenkins/stages/go/build",
    "jenkins/stages/go/migration",
    "jenkins/stages/typescript/lint",
    "jenkins/stages/typescript/type_check",
    "jenkins/stages/typescript/security",
    "jenkins/stages/typescript/build",
    "jenkins/stages/typescript/migration",
    "jenkins/stages/tests/test",
    "jenkins/stages/docker/docker_build",
    "jenkins/stages/docker/docker_push",
    "jenkins/stages/docker/integration",
    "jenkins/stages/docker/cleanup",
    "jenkins/stages/kubernetes/deploy",
    "jenkins/stages/kubernetes/post_deploy",
];

handlebars_helper!(contains: |list: array, value: str| {
    list.iter().any(|item| item.as_str() == Some(value))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Gitlab,
    Jenkins,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Gitlab => "gitlab",
            Platform::Jenkins => "jenkins",
        }
    }

    fn comment_prefix(&self) -> &'static str {
        match self {
            Platform::Gitlab => "#",
            Platform::Jenkins => "//",
        }
    }

    fn header(&self) -> String {
        format!("{}/base_header", self.as_str())
    }

    /// Declarative Jenkins pipelines need their `stages` block closed.
    fn footer(&self) -> Option<String> {
        match self {
            Platform::Gitlab => None,
            Platform::Jenkins => Some("jenkins/base_footer".to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gitlab" => Ok(Platform::Gitlab),
            "jenkins" => Ok(Platform::Jenkins),
            _ => Err(GenerateError::UnsupportedPlatform(s.to_string())),
        }
    }
}

pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Renderer with the built-in templates only.
    pub fn new() -> Result<Self, GenerateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.register_helper("contains", Box::new(contains));

        for (name, content) in BUILTIN_TEMPLATES {
            handlebars
                .register_template_string(name, content)
                .map_err(|e| GenerateError::Template {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
        }
        debug!(templates = BUILTIN_TEMPLATES.len(), "Registered built-in templates");
        Ok(Self { handlebars })
    }

    /// Built-in templates overlaid with every `.hbs` file under `root`.
    pub fn with_template_root(root: Option<&Path>) -> Result<Self, GenerateError> {
        let mut renderer = Self::new()?;
        if let Some(root) = root {
            renderer.register_dir(root)?;
        }
        Ok(renderer)
    }

    /// Registers every `.hbs` file below `root` under its relative path without the
    /// extension. Returns how many templates were registered.
    pub fn register_dir(&mut self, root: &Path) -> Result<usize, GenerateError> {
        if !root.is_dir() {
            return Err(GenerateError::Io {
                path: root.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let mut count = 0;
        for result in WalkBuilder::new(root).standard_filters(false).build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable template entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false)
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let name = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");
            let content = std::fs::read_to_string(path).map_err(|e| GenerateError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            self.handlebars
                .register_template_string(&name, content)
                .map_err(|e| GenerateError::Template {
                    name: name.clone(),
                    source: Box::new(e),
                })?;
            debug!(template = %name, "Registered template override");
            count += 1;
        }
        Ok(count)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.get_templates().contains_key(name)
    }

    fn stage_template(platform: Platform, dir: &str, stage: Stage) -> String {
        format!("{}/stages/{}/{}", platform.as_str(), dir, stage.as_str())
    }

    /// Finds the template for one stage, or `None` when no directory has one.
    pub fn resolve_stage(
        &self,
        platform: Platform,
        stage: Stage,
        ctx: &PipelineContext,
        overrides: &BTreeMap<String, String>,
    ) -> Option<String> {
        if let Some(name) = overrides.get(stage.as_str()) {
            let scoped = format!("{}/stages/{}", platform.as_str(), name);
            for candidate in [name.clone(), scoped] {
                if self.has_template(&candidate) {
                    return Some(candidate);
                }
            }
            warn!(stage = %stage, template = %name, "Template override not found");
        }

        if stage == Stage::Deploy && ctx.use_docker_compose {
            let candidate = Self::stage_template(platform, "shared", stage);
            if self.has_template(&candidate) {
                return Some(candidate);
            }
        }

        let language_dir = ctx.language_dir();
        let candidate = Self::stage_template(platform, language_dir, stage);
        if self.has_template(&candidate) {
            return Some(candidate);
        }

        search_order(stage)
            .into_iter()
            .filter(|dir| *dir != language_dir)
            .map(|dir| Self::stage_template(platform, dir, stage))
            .find(|candidate| self.has_template(candidate))
    }

    fn render_template(&self, name: &str, ctx: &PipelineContext) -> Result<String, GenerateError> {
        self.handlebars.render(name, ctx).map_err(|e| GenerateError::Render {
            name: name.to_string(),
            source: Box::new(e),
        })
    }

    /// Header, one fragment or placeholder per stage in the given order, then the
    /// platform footer if it has one.
    pub fn render(
        &self,
        platform: Platform,
        stages: &[Stage],
        ctx: &PipelineContext,
        overrides: &BTreeMap<String, String>,
    ) -> Result<String, GenerateError> {
        let mut parts = Vec::with_capacity(stages.len() + 2);
        parts.push(self.render_template(&platform.header(), ctx)?);

        for stage in stages {
            match self.resolve_stage(platform, *stage, ctx, overrides) {
                Some(name) => {
                    debug!(stage = %stage, template = %name, "Rendering stage");
                    parts.push(self.render_template(&name, ctx)?);
                }
                None => {
                    warn!(stage = %stage, platform = %platform, "No template for stage");
                    parts.push(format!(
                        "{} NOTE: no template for stage: {}\n",
                        platform.comment_prefix(),
                        stage
                    ));
                }
            }
        }

        if let Some(footer) = platform.footer() {
            if self.has_template(&footer) {
                parts.push(self.render_template(&footer, ctx)?);
            }
        }

        Ok(parts.join("\n"))
    }
}

/// Directory lookup order for `stage`. Deploys prefer the shared compose template
/// over the orchestration one.
fn search_order(stage: Stage) -> Vec<&'static str> {
    let mut dirs = STAGE_DIRS.to_vec();
    if stage == Stage::Deploy {
        if let (Some(shared), Some(k8s)) = (
            dirs.iter().position(|d| *d == "shared"),
            dirs.iter().position(|d| *d == "kubernetes"),
        ) {
            if shared > k8s {
                let dir = dirs.remove(shared);
                dirs.insert(k8s, dir);
            }
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::settings::UserSettings;
    use crate::profile::TechProfile;
    use crate::stack::Language;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;
    use yare::parameterized;

    fn context(language: Language, use_docker_compose: bool) -> PipelineContext {
        let mut profile = TechProfile::new();
        profile.add_language(language);
        let settings = UserSettings {
            use_docker_compose,
            ..UserSettings::default()
        };
        PipelineContext::new(&profile, &settings, &[])
    }

    #[parameterized(
        gitlab = { "gitlab", Platform::Gitlab },
        jenkins_upper = { "JENKINS", Platform::Jenkins },
    )]
    fn test_platform_parse(input: &str, expected: Platform) {
        self::assert_eq!(input.parse::<Platform>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_platform() {
        assert!(matches!(
            "circleci".parse::<Platform>(),
            Err(GenerateError::UnsupportedPlatform(p)) if p == "circleci"
        ));
    }

    #[test]
    fn test_deploy_search_moves_shared_before_kubernetes() {
        assert_eq!(
            search_order(Stage::Deploy),
            vec!["tests", "python", "java", "go", "typescript", "docker", "shared", "kubernetes"]
        );
        assert_eq!(search_order(Stage::Lint), STAGE_DIRS.to_vec());
    }

    #[test]
    fn test_language_dir_first() {
        let renderer = TemplateRenderer::new().unwrap();
        let ctx = context(Language::Go, false);
        assert_eq!(
            renderer.resolve_stage(Platform::Gitlab, Stage::Lint, &ctx, &BTreeMap::new()),
            Some("gitlab/stages/go/lint".to_string())
        );
        assert_eq!(
            renderer.resolve_stage(Platform::Gitlab, Stage::Test, &ctx, &BTreeMap::new()),
            Some("gitlab/stages/tests/test".to_string())
        );
    }

    #[test]
    fn test_deploy_prefers_shared() {
        let renderer = TemplateRenderer::new().unwrap();
        let ctx = context(Language::Go, false);
        assert_eq!(
            renderer.resolve_stage(Platform::Gitlab, Stage::Deploy, &ctx, &BTreeMap::new()),
            Some("gitlab/stages/shared/deploy".to_string())
        );
    }

    #[test]
    fn test_override_wins() {
        let renderer = TemplateRenderer::new().unwrap();
        let ctx = context(Language::Go, false);
        let overrides = BTreeMap::from([("deploy".to_string(), "kubernetes/deploy".to_string())]);
        assert_eq!(
            renderer.resolve_stage(Platform::Gitlab, Stage::Deploy, &ctx, &overrides),
            Some("gitlab/stages/kubernetes/deploy".to_string())
        );
    }

    #[test]
    fn test_unknown_override_falls_back() {
        let renderer = TemplateRenderer::new().unwrap();
        let ctx = context(Language::Python, false);
        let overrides = BTreeMap::from([("lint".to_string(), "nowhere/lint".to_string())]);

        let out = renderer
            .render(Platform::Gitlab, &[Stage::PreChecks, Stage::Lint], &ctx, &overrides)
            .unwrap();
        assert!(out.contains("pre_checks:"));
        assert!(out.contains("ruff check ."));
    }

    #[test]
    fn test_missing_template_renders_placeholder() {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("jenkins/base_header", "pipeline {\n").unwrap();
        handlebars.register_template_string("jenkins/base_footer", "}\n").unwrap();
        let renderer = TemplateRenderer { handlebars };
        let ctx = context(Language::Go, false);

        let out = renderer
            .render(Platform::Jenkins, &[Stage::Lint, Stage::Deploy], &ctx, &BTreeMap::new())
            .unwrap();
        assert_eq!(
            out,
            "pipeline {\n\n// NOTE: no template for stage: lint\n\n// NOTE: no template for stage: deploy\n\n}\n"
        );
    }

    #[test]
    fn test_every_builtin_stage_resolves() {
        let renderer = TemplateRenderer::new().unwrap();
        for language in Language::all() {
            let ctx = context(*language, false);
            for platform in [Platform::Gitlab, Platform::Jenkins] {
                let out = renderer.render(platform, &Stage::ALL, &ctx, &BTreeMap::new()).unwrap();
                assert!(!out.contains("NOTE: no template"), "{platform} {language}");
            }
        }
    }

    #[test]
    fn test_template_root_override_and_extension() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("gitlab/stages/go")).unwrap();
        fs::create_dir_all(dir.path().join("gitlab/stages/shared")).unwrap();
        fs::write(dir.path().join("gitlab/stages/go/lint.hbs"), "custom_lint: {{project_name}}\n").unwrap();
        fs::write(dir.path().join("gitlab/stages/shared/post_deploy.hbs"), "smoke: true\n").unwrap();
        fs::write(dir.path().join("gitlab/stages/shared/README.md"), "ignored").unwrap();

        let renderer = TemplateRenderer::with_template_root(Some(dir.path())).unwrap();
        let ctx = context(Language::Go, false);
        let out = renderer
            .render(Platform::Gitlab, &[Stage::Lint, Stage::PostDeploy], &ctx, &BTreeMap::new())
            .unwrap();

        assert!(out.contains("custom_lint: myapp"));
        assert!(!out.contains("golangci-lint"));
        assert!(out.contains("smoke: true"));
    }

    #[test]
    fn test_invalid_template_file_is_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("jenkins/stages/docker")).unwrap();
        fs::write(dir.path().join("jenkins/stages/docker/docker_build.hbs"), "{{#if}}").unwrap();
        assert!(matches!(
            TemplateRenderer::with_template_root(Some(dir.path())),
            Err(GenerateError::Template { .. })
        ));
    }
}

//! User-supplied generation settings.
//!
//! Every field is optional. A settings file may be JSON or YAML; the format is taken
//! from the extension, with `.json` parsed as JSON and anything else as YAML (which
//! also accepts JSON documents).

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Triggers {
    /// Branches that run the pipeline on push. Empty means every branch.
    pub branches: Vec<String>,
    pub tags: bool,
    pub merge_requests: bool,
    /// Cron expression for scheduled runs.
    pub schedule: Option<String>,
}

impl Triggers {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && !self.tags && !self.merge_requests && self.schedule.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbCredentials {
    pub user: Option<String>,
    pub password: Option<String>,
    pub db_name: Option<String>,
    pub root_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub platform: Option<String>,
    /// Stage whitelist. Empty keeps every selected stage.
    pub stages: Vec<String>,
    pub project_name: Option<String>,
    pub build_tool: Option<String>,
    pub python_version: Option<String>,
    pub java_version: Option<String>,
    pub go_version: Option<String>,
    pub node_version: Option<String>,
    pub build_image: Option<String>,
    pub docker_registry: Option<String>,
    pub docker_image: Option<String>,
    pub docker_tag: Option<String>,
    pub docker_context: Option<String>,
    pub dockerfile_path: Option<String>,
    pub use_docker_compose: bool,
    pub variables: BTreeMap<String, String>,
    pub triggers: Triggers,
    /// Stage name to template name, checked before normal resolution.
    pub template_overrides: BTreeMap<String, String>,
    pub db_credentials: BTreeMap<String, DbCredentials>,
    pub db_versions: BTreeMap<String, String>,
    /// Extra environment per compose service (`app` for application services).
    pub environment: BTreeMap<String, BTreeMap<String, String>>,
}

impl UserSettings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            field: path.display().to_string(),
            error: e.to_string(),
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            field: "settings".to_string(),
            error: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            field: "settings".to_string(),
            error: e.to_string(),
        })
    }

    /// Registry or image destination configured for pushes.
    pub fn has_push_target(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false);
        set(&self.docker_registry) || set(&self.docker_image)
    }
}

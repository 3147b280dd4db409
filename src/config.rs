//! Configuration management for stackpipe
//!
//! Settings are loaded from environment variables with fallback defaults. They cover
//! the scan size caps, the git invocation used for cloning, template overrides and
//! the default pipeline platform.
//!
//! # Environment Variables
//!
//! - `STACKPIPE_LOG_LEVEL`: Logging level - default: "info"
//! - `STACKPIPE_MAX_FILE_SIZE`: General candidate size cap in bytes - default: 1 MiB
//! - `STACKPIPE_CONTENT_SCAN_MAX_BYTES`: Cap for content-pattern scans - default: 200 KiB
//! - `STACKPIPE_LANGUAGE_SCAN_MAX_BYTES`: Cap for extension tagging - default: 512 KiB
//! - `STACKPIPE_MAX_CONTENT_FILES`: Files read per content pass, 0 for no cap - default: 0
//! - `STACKPIPE_TEMPLATE_ROOT`: Directory of `.hbs` templates overriding the built-in ones
//! - `STACKPIPE_GIT_BINARY`: Git executable - default: "git"
//! - `STACKPIPE_CLONE_DEPTH`: History depth for clones - default: 1
//! - `STACKPIPE_PLATFORM`: Default pipeline platform (gitlab|jenkins) - default: "gitlab"
//!
//! # Example
//!
//! ```no_run
//! use stackpipe::StackpipeConfig;
//!
//! let config = StackpipeConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::detector::DetectorConfig;
use crate::scan::{
    ScanLimits, DEFAULT_CONTENT_SCAN_MAX_BYTES, DEFAULT_LANGUAGE_SCAN_MAX_BYTES, DEFAULT_MAX_FILE_SIZE,
};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_GIT_BINARY: &str = "git";
const DEFAULT_CLONE_DEPTH: u32 = 1;
const DEFAULT_PLATFORM: &str = "gitlab";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Main configuration structure for stackpipe
///
/// Built with `Default::default()`, which reads `STACKPIPE_*` variables and falls
/// back to the constants above for anything unset or unparseable.
#[derive(Debug, Clone, PartialEq)]
pub struct StackpipeConfig {
    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub max_file_size: u64,

    pub content_scan_max_bytes: u64,

    pub language_scan_max_bytes: u64,

    /// Files read per content pass. `None` reads every candidate.
    pub max_content_files: Option<usize>,

    /// Directory whose `.hbs` files override built-in templates of the same name
    pub template_root: Option<PathBuf>,

    pub git_binary: String,

    pub clone_depth: u32,

    /// Pipeline platform used when neither the caller nor the settings name one
    pub platform: String,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Default for StackpipeConfig {
    fn default() -> Self {
        let log_level = env::var("STACKPIPE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let template_root = env::var("STACKPIPE_TEMPLATE_ROOT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            max_file_size: env_or("STACKPIPE_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
            content_scan_max_bytes: env_or("STACKPIPE_CONTENT_SCAN_MAX_BYTES", DEFAULT_CONTENT_SCAN_MAX_BYTES),
            language_scan_max_bytes: env_or("STACKPIPE_LANGUAGE_SCAN_MAX_BYTES", DEFAULT_LANGUAGE_SCAN_MAX_BYTES),
            max_content_files: Some(env_or("STACKPIPE_MAX_CONTENT_FILES", 0usize)).filter(|&n| n > 0),
            template_root,
            git_binary: env::var("STACKPIPE_GIT_BINARY").unwrap_or_else(|_| DEFAULT_GIT_BINARY.to_string()),
            clone_depth: env_or("STACKPIPE_CLONE_DEPTH", DEFAULT_CLONE_DEPTH),
            platform: env::var("STACKPIPE_PLATFORM")
                .unwrap_or_else(|_| DEFAULT_PLATFORM.to_string())
                .to_lowercase(),
        }
    }
}

impl StackpipeConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for a zero size cap, a content cap
    /// above the general cap, a zero clone depth or an unknown log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 || self.content_scan_max_bytes == 0 || self.language_scan_max_bytes == 0 {
            return Err(ConfigError::ValidationFailed(
                "Size caps must be greater than zero".to_string(),
            ));
        }
        if self.content_scan_max_bytes > self.max_file_size {
            return Err(ConfigError::ValidationFailed(format!(
                "Content scan cap ({}) cannot exceed the general file size cap ({})",
                self.content_scan_max_bytes, self.max_file_size
            )));
        }
        if self.clone_depth == 0 {
            return Err(ConfigError::ValidationFailed(
                "Clone depth must be at least 1".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn scan_limits(&self) -> ScanLimits {
        ScanLimits {
            max_file_size: self.max_file_size,
            content_max_bytes: self.content_scan_max_bytes,
            language_max_bytes: self.language_scan_max_bytes,
            max_content_files: self.max_content_files,
        }
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            limits: self.scan_limits(),
            git_binary: self.git_binary.clone(),
            clone_depth: self.clone_depth,
        }
    }
}

impl fmt::Display for StackpipeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stackpipe Configuration:")?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Max File Size: {} bytes", self.max_file_size)?;
        writeln!(f, "  Content Scan Cap: {} bytes", self.content_scan_max_bytes)?;
        writeln!(f, "  Language Scan Cap: {} bytes", self.language_scan_max_bytes)?;
        if let Some(max) = self.max_content_files {
            writeln!(f, "  Content Files Cap: {}", max)?;
        }
        if let Some(ref root) = self.template_root {
            writeln!(f, "  Template Root: {}", root.display())?;
        }
        writeln!(f, "  Git Binary: {}", self.git_binary)?;
        writeln!(f, "  Clone Depth: {}", self.clone_depth)?;
        writeln!(f, "  Platform: {}", self.platform)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    const KEYS: &[&str] = &[
        "STACKPIPE_LOG_LEVEL",
        "STACKPIPE_MAX_FILE_SIZE",
        "STACKPIPE_CONTENT_SCAN_MAX_BYTES",
        "STACKPIPE_LANGUAGE_SCAN_MAX_BYTES",
        "STACKPIPE_MAX_CONTENT_FILES",
        "STACKPIPE_TEMPLATE_ROOT",
        "STACKPIPE_GIT_BINARY",
        "STACKPIPE_CLONE_DEPTH",
        "STACKPIPE_PLATFORM",
    ];

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards: Vec<EnvGuard> = KEYS.iter().map(|k| EnvGuard::unset(k)).collect();

        let config = StackpipeConfig::default();

        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.content_scan_max_bytes, DEFAULT_CONTENT_SCAN_MAX_BYTES);
        assert_eq!(config.language_scan_max_bytes, DEFAULT_LANGUAGE_SCAN_MAX_BYTES);
        assert_eq!(config.max_content_files, None);
        assert_eq!(config.template_root, None);
        assert_eq!(config.git_binary, "git");
        assert_eq!(config.clone_depth, 1);
        assert_eq!(config.platform, "gitlab");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("STACKPIPE_LOG_LEVEL", "DEBUG"),
            EnvGuard::set("STACKPIPE_MAX_FILE_SIZE", "2048"),
            EnvGuard::set("STACKPIPE_CONTENT_SCAN_MAX_BYTES", "1024"),
            EnvGuard::set("STACKPIPE_TEMPLATE_ROOT", "/etc/stackpipe/templates"),
            EnvGuard::set("STACKPIPE_CLONE_DEPTH", "5"),
            EnvGuard::set("STACKPIPE_PLATFORM", "Jenkins"),
            EnvGuard::set("STACKPIPE_MAX_CONTENT_FILES", "500"),
        ];

        let config = StackpipeConfig::default();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.content_scan_max_bytes, 1024);
        assert_eq!(config.template_root, Some(PathBuf::from("/etc/stackpipe/templates")));
        assert_eq!(config.clone_depth, 5);
        assert_eq!(config.platform, "jenkins");
        assert_eq!(config.max_content_files, Some(500));
    }

    #[test]
    #[serial]
    fn test_unparseable_values_fall_back() {
        let _guards = vec![
            EnvGuard::set("STACKPIPE_MAX_FILE_SIZE", "lots"),
            EnvGuard::set("STACKPIPE_CLONE_DEPTH", "-3"),
        ];

        let config = StackpipeConfig::default();
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.clone_depth, DEFAULT_CLONE_DEPTH);
    }

    #[test]
    #[serial]
    fn test_configuration_validation_failures() {
        let mut config = StackpipeConfig::default();
        config.clone_depth = 0;
        assert!(config.validate().is_err());

        let mut config = StackpipeConfig::default();
        config.max_file_size = 0;
        assert!(config.validate().is_err());

        let mut config = StackpipeConfig::default();
        config.content_scan_max_bytes = config.max_file_size + 1;
        assert!(config.validate().is_err());

        let mut config = StackpipeConfig::default();
        config.log_level = "invalid".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    #[serial]
    fn test_detector_config_carries_limits() {
        let mut config = StackpipeConfig::default();
        config.content_scan_max_bytes = 4096;
        config.max_content_files = Some(10);
        config.clone_depth = 3;

        let detector = config.detector_config();
        assert_eq!(detector.limits.content_max_bytes, 4096);
        assert_eq!(detector.limits.max_content_files, Some(10));
        assert_eq!(detector.clone_depth, 3);
    }

    #[test]
    #[serial]
    fn test_config_display() {
        let config = StackpipeConfig::default();
        let display = format!("{}", config);
        assert!(display.contains("Stackpipe Configuration:"));
        assert!(display.contains("Clone Depth:"));
    }
}

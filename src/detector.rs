//! Stack detection driver.
//!
//! One [`Detector::detect`] call owns one temporary checkout: it clones, indexes the
//! tree, runs the analyzers, derives the Java release and removes the checkout again.
//! Clone failures never propagate. They end up as a hint on a mostly empty profile.

use crate::analyzers::{default_analyzers, run_analyzers, Analyzer};
use crate::catalog::languages::JAVA_VERSION_TAGS;
use crate::catalog::{CatalogError, PatternCatalog};
use crate::profile::TechProfile;
use crate::scan::{find_all, FileIndex, ScanLimits};
use roxmltree::Document;
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git clone exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    pub limits: ScanLimits,
    pub git_binary: String,
    pub clone_depth: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            limits: ScanLimits::default(),
            git_binary: "git".to_string(),
            clone_depth: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    Idle,
    Cloning,
    Analyzing,
    Cleanup,
    Done,
    Failed,
}

impl fmt::Display for DetectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectionPhase::Idle => "idle",
            DetectionPhase::Cloning => "cloning",
            DetectionPhase::Analyzing => "analyzing",
            DetectionPhase::Cleanup => "cleanup",
            DetectionPhase::Done => "done",
            DetectionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Injects a token into an HTTP(S) clone URL.
///
/// GitLab hosts expect the `oauth2` user. URLs that already carry credentials or
/// have no scheme are returned unchanged.
pub fn authenticated_url(url: &str, token: Option<&str>) -> String {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return url.to_string();
    };
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let host = rest.split('/').next().unwrap_or(rest);
    if host.contains('@') {
        return url.to_string();
    }
    if host.contains("gitlab") {
        format!("{scheme}://oauth2:{token}@{rest}")
    } else {
        format!("{scheme}://{token}@{rest}")
    }
}

/// Removes any credentials from a URL before it is logged.
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority = rest.split('/').next().unwrap_or(rest);
    match authority.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}{}", &rest[authority.len()..]),
        None => url.to_string(),
    }
}

/// Masks every occurrence of `token` in a message that may echo the clone URL.
fn redact_token(message: &str, token: Option<&str>) -> String {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => message.replace(token, "***"),
        None => message.to_string(),
    }
}

/// Shallow single-branch clone of `url` into `dest`.
pub fn clone_repository(git_binary: &str, url: &str, depth: u32, dest: &Path) -> Result<(), CloneError> {
    let output = Command::new(git_binary)
        .arg("clone")
        .arg("--depth")
        .arg(depth.to_string())
        .arg("--single-branch")
        .arg("--quiet")
        .arg(url)
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| CloneError::Spawn {
            binary: git_binary.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(CloneError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn normalize_java_version(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("1.").unwrap_or(raw);
    raw.split(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|digits| digits.parse::<u32>().ok())
}

/// Java release declared by one Maven descriptor.
pub fn parse_java_version(pom: &str) -> Option<u32> {
    let doc = Document::parse(pom).ok()?;
    JAVA_VERSION_TAGS.iter().find_map(|tag| {
        doc.descendants()
            .find(|node| node.has_tag_name(*tag))
            .and_then(|node| node.text())
            .and_then(normalize_java_version)
    })
}

/// Highest Java release declared by any `pom.xml` below `root`.
pub fn detect_java_version(root: &Path) -> Option<u32> {
    find_all(root, |name| name == "pom.xml")
        .iter()
        .filter_map(|path| {
            let content = fs::read_to_string(path).ok()?;
            let version = parse_java_version(&content);
            debug!(path = %path.display(), version = ?version, "Parsed Maven descriptor");
            version
        })
        .max()
}

/// Prefix of the hint recorded when a run could not analyse anything.
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// The failure hint of a run that did not get to analyse the repository.
pub fn failure_hint(profile: &TechProfile) -> Option<&str> {
    profile
        .hints
        .iter()
        .map(String::as_str)
        .find(|h| h.starts_with(ANALYSIS_FAILED))
}

pub struct Detector {
    config: DetectorConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self, CatalogError> {
        let catalog = Arc::new(PatternCatalog::builtin()?);
        let analyzers = default_analyzers(catalog, config.limits);
        Ok(Self { config, analyzers })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Clones `url` and analyses the checkout. Never fails: clone errors are
    /// reported through `hints`.
    pub fn detect(&self, url: &str, token: Option<&str>) -> TechProfile {
        let mut profile = TechProfile::new();
        let mut phase = DetectionPhase::Idle;
        info!(phase = %phase, repo = %redact_url(url), "Phase: {}", phase);

        phase = DetectionPhase::Cloning;
        info!(phase = %phase, depth = self.config.clone_depth, "Phase: {}", phase);

        let result = tempfile::Builder::new()
            .prefix("stackpipe-")
            .tempdir()
            .map_err(|e| format!("cannot create checkout directory: {e}"))
            .and_then(|checkout| {
                let auth_url = authenticated_url(url, token);
                clone_repository(&self.config.git_binary, &auth_url, self.config.clone_depth, checkout.path())
                    .map(|_| checkout)
                    .map_err(|e| redact_token(&e.to_string(), token))
            });

        let outcome = match result {
            Ok(checkout) => {
                phase = DetectionPhase::Analyzing;
                info!(phase = %phase, "Phase: {}", phase);
                self.analyze_into(checkout.path(), &mut profile);

                phase = DetectionPhase::Cleanup;
                info!(phase = %phase, "Phase: {}", phase);
                if let Err(e) = checkout.close() {
                    warn!(error = %e, "Failed to remove checkout");
                }
                DetectionPhase::Done
            }
            Err(message) => {
                warn!(error = %message, "Clone failed");
                profile.add_hint(format!("{}: {}", ANALYSIS_FAILED, message));
                phase = DetectionPhase::Cleanup;
                info!(phase = %phase, "Phase: {}", phase);
                DetectionPhase::Failed
            }
        };

        info!(phase = %outcome, "Phase: {}", outcome);
        profile
    }

    /// Analyses an existing checkout in place. The directory is never modified.
    pub fn analyze_path(&self, root: &Path) -> TechProfile {
        let mut profile = TechProfile::new();
        info!(phase = %DetectionPhase::Analyzing, repo = %root.display(), "Phase: {}", DetectionPhase::Analyzing);
        if !root.is_dir() {
            profile.add_hint(format!("{}: {} is not a directory", ANALYSIS_FAILED, root.display()));
            info!(phase = %DetectionPhase::Failed, "Phase: {}", DetectionPhase::Failed);
            return profile;
        }
        self.analyze_into(root, &mut profile);
        info!(phase = %DetectionPhase::Done, "Phase: {}", DetectionPhase::Done);
        profile
    }

    fn analyze_into(&self, root: &Path, profile: &mut TechProfile) {
        let index = FileIndex::build(root, self.config.limits.max_file_size);
        run_analyzers(&self.analyzers, &index, profile);

        if let Some(version) = detect_java_version(root) {
            debug!(java_version = version, "Java release resolved");
            profile.java_version = Some(version);
            profile.set_files("java_version", vec![version.to_string()]);
        }

        info!(
            languages = ?profile.languages.as_slice(),
            frameworks = profile.frameworks.len(),
            package_manager = ?profile.package_manager,
            docker = profile.docker,
            "Detection complete"
        );
    }
}

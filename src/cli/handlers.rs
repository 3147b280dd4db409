//! Command handlers. Each one resolves a technology profile, runs the requested
//! generator and writes the result.

use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::commands::{ComposeArgs, DetectArgs, GenerateArgs, ProfileSource, StagesArgs};
use super::output::{format_stages, write_output, OutputFormatter};
use crate::compose::ComposeGenerator;
use crate::config::StackpipeConfig;
use crate::detector::{failure_hint, Detector};
use crate::pipeline::{PipelineGenerator, UserSettings};
use crate::profile::TechProfile;

fn looks_like_remote(repo: &str) -> bool {
    repo.contains("://") || repo.starts_with("git@")
}

/// Clones a remote repository or analyses a local directory.
pub fn detect_repository(config: &StackpipeConfig, repo: &str, token: Option<&str>) -> Result<TechProfile> {
    let detector = Detector::new(config.detector_config()).context("Failed to compile pattern catalog")?;

    let profile = if Path::new(repo).is_dir() {
        detector.analyze_path(Path::new(repo))
    } else if looks_like_remote(repo) {
        detector.detect(repo, token)
    } else {
        bail!("{} is neither a directory nor a repository URL", repo);
    };

    if let Some(hint) = failure_hint(&profile) {
        return Err(anyhow!("{}", hint));
    }
    Ok(profile)
}

/// Reads a profile saved by `detect`. `.json` files are JSON, anything else YAML.
pub fn load_profile(path: &Path) -> Result<TechProfile> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read profile {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let profile = if is_json {
        serde_json::from_str(&content).with_context(|| format!("Invalid profile {}", path.display()))?
    } else {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid profile {}", path.display()))?
    };
    Ok(profile)
}

fn resolve_profile(config: &StackpipeConfig, source: &ProfileSource, token: Option<&str>) -> Result<TechProfile> {
    match (&source.repo, &source.profile) {
        (_, Some(path)) => load_profile(path),
        (Some(repo), None) => detect_repository(config, repo, token),
        (None, None) => bail!("Either a repository or --profile is required"),
    }
}

fn load_settings(path: Option<&Path>) -> Result<UserSettings> {
    match path {
        Some(path) => UserSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(UserSettings::default()),
    }
}

fn pipeline_generator(config: &StackpipeConfig) -> Result<PipelineGenerator> {
    PipelineGenerator::with_template_root(config.template_root.as_deref(), &config.platform)
        .context("Failed to load pipeline templates")
}

pub fn handle_detect(args: &DetectArgs, config: &StackpipeConfig) -> Result<()> {
    let profile = detect_repository(config, &args.repo, args.token.as_deref())?;
    let content = OutputFormatter::new(args.format.into()).format(&profile)?;
    write_output(&content, args.output.as_deref())
}

pub fn handle_generate(args: &GenerateArgs, config: &StackpipeConfig) -> Result<()> {
    let profile = resolve_profile(config, &args.source, args.token.as_deref())?;
    let mut settings = load_settings(args.settings.as_deref())?;
    if !args.stages.is_empty() {
        debug!(stages = ?args.stages, "Stage whitelist from command line");
        settings.stages = args.stages.clone();
    }

    let pipeline = pipeline_generator(config)?
        .generate(&profile, &settings, args.platform.as_deref())
        .context("Pipeline generation failed")?;
    info!(platform = %pipeline.platform, stages = pipeline.stages.len(), "Generated pipeline");
    write_output(&pipeline.content, args.output.as_deref())
}

pub fn handle_compose(args: &ComposeArgs, config: &StackpipeConfig) -> Result<()> {
    let profile = resolve_profile(config, &args.source, args.token.as_deref())?;
    let settings = load_settings(args.settings.as_deref())?;
    let content = ComposeGenerator::generate(&profile, &settings).context("Compose generation failed")?;
    write_output(&content, args.output.as_deref())
}

pub fn handle_stages(args: &StagesArgs, config: &StackpipeConfig) -> Result<()> {
    let profile = resolve_profile(config, &args.source, args.token.as_deref())?;
    let settings = load_settings(args.settings.as_deref())?;
    let stages = pipeline_generator(config)?.select_stages(&profile, &settings);
    write_output(&format_stages(&stages), None)
}

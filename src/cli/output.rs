//! Output formatting for detection results and generated documents
//!
//! Profiles can be rendered as JSON, YAML or the markdown stack report. Every
//! document ends up either on stdout or in the file given with `-o`.
//!
//! # Example
//!
//! ```no_run
//! use stackpipe::cli::output::{OutputFormat, OutputFormatter};
//! use stackpipe::TechProfile;
//!
//! let formatter = OutputFormatter::new(OutputFormat::Markdown);
//! let report = formatter.format(&TechProfile::new()).unwrap();
//! println!("{}", report);
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::pipeline::Stage;
use crate::profile::TechProfile;
use crate::report;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Markdown stack report
    Markdown,
}

/// Output formatter for technology profiles
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, profile: &TechProfile) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(profile).context("Failed to serialize profile to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(profile).context("Failed to serialize profile to YAML")
            }
            OutputFormat::Markdown => Ok(report::to_markdown(profile)),
        }
    }
}

/// One stage name per line, in pipeline order.
pub fn format_stages(stages: &[Stage]) -> String {
    stages.iter().map(|s| format!("{}\n", s)).collect()
}

/// Writes `content` to `path`, or to stdout when no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Output written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n").context("Failed to write to stdout")?;
            }
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

//! stackpipe - technology stack detection and CI pipeline generation
//!
//! The library scans a repository with static heuristics and produces a
//! [`TechProfile`]: languages, frameworks, package manager, container and
//! infrastructure markers, databases, cloud platforms, test runners and entry
//! points. A profile then drives the generators: a GitLab CI or Jenkins pipeline
//! through [`PipelineGenerator`], a docker-compose file through
//! [`ComposeGenerator`] and a markdown summary through [`report::to_markdown`].
//!
//! # Example Usage
//!
//! ```no_run
//! use stackpipe::{Detector, PipelineGenerator, StackpipeConfig, UserSettings};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = StackpipeConfig::default();
//!     let detector = Detector::new(config.detector_config())?;
//!     let profile = detector.analyze_path(Path::new("."));
//!
//!     let generator = PipelineGenerator::with_template_root(None, "gitlab")?;
//!     let pipeline = generator.generate(&profile, &UserSettings::default(), None)?;
//!     println!("{}", pipeline.content);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`scan`]: candidate listing, ignore rules and bounded reads
//! - [`catalog`]: compiled detection pattern tables
//! - [`analyzers`]: the per-concern analyzers filling a profile
//! - [`detector`]: clone, analyse, clean up
//! - [`pipeline`]: stage selection and template rendering
//! - [`compose`]: docker-compose generation

pub mod analyzers;
pub mod catalog;
pub mod cli;
pub mod compose;
pub mod config;
pub mod detector;
pub mod pipeline;
pub mod profile;
pub mod report;
pub mod scan;
pub mod stack;
pub mod util;

pub use catalog::{CatalogError, PatternCatalog};
pub use compose::{ComposeError, ComposeGenerator};
pub use config::{ConfigError, StackpipeConfig};
pub use detector::{CloneError, DetectionPhase, Detector, DetectorConfig};
pub use pipeline::{GenerateError, GeneratedPipeline, PipelineGenerator, Platform, Stage, UserSettings};
pub use profile::{EntryPoint, EntryPointKind, TechProfile};
pub use scan::ScanLimits;
pub use stack::{FrameworkId, Language};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! CI pipeline generation: stage selection through plugins, then handlebars
//! rendering for the target platform.

pub mod context;
pub mod error;
pub mod generator;
pub mod plugins;
pub mod renderer;
pub mod selector;
pub mod settings;
pub mod stage;

pub use context::PipelineContext;
pub use error::GenerateError;
pub use generator::{GeneratedPipeline, PipelineGenerator};
pub use plugins::{Plugin, PluginRegistry};
pub use renderer::{Platform, TemplateRenderer};
pub use selector::select_stages;
pub use settings::{DbCredentials, Triggers, UserSettings};
pub use stage::Stage;

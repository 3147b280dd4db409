pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ComposeArgs, DetectArgs, GenerateArgs, ProfileSource, StagesArgs};
pub use output::{OutputFormat, OutputFormatter};

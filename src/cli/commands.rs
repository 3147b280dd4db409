use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Technology stack detection and CI pipeline generation
#[derive(Parser, Debug)]
#[command(
    name = "stackpipe",
    about = "Detect a repository's technology stack and generate CI pipelines for it",
    version,
    author,
    long_about = "stackpipe scans a repository with static heuristics to build a technology \
                  profile (languages, frameworks, package manager, containers, databases, \
                  entry points) and turns that profile into a GitLab CI or Jenkins pipeline \
                  or a docker-compose file."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only errors are logged"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Detect the technology stack of a repository",
        long_about = "Clones a repository URL (or reads a local directory) and prints its \
                      technology profile.\n\n\
                      Examples:\n  \
                      stackpipe detect https://gitlab.com/acme/shop.git --token $TOKEN\n  \
                      stackpipe detect ./shop --format markdown\n  \
                      stackpipe detect ./shop --format yaml -o profile.yaml"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Generate a CI pipeline document",
        long_about = "Selects pipeline stages from a technology profile and renders them for \
                      the target platform.\n\n\
                      Examples:\n  \
                      stackpipe generate ./shop\n  \
                      stackpipe generate --profile profile.json --platform jenkins\n  \
                      stackpipe generate ./shop --stages lint,test,build --settings ci.yaml"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Generate a docker-compose file",
        long_about = "Builds a compose document with one service per Dockerfile and one per \
                      detected database.\n\n\
                      Examples:\n  \
                      stackpipe compose ./shop\n  \
                      stackpipe compose --profile profile.yaml --settings ci.yaml -o docker-compose.yml"
    )]
    Compose(ComposeArgs),

    #[command(about = "Print the pipeline stages that would be generated")]
    Stages(StagesArgs),
}

/// Where the technology profile comes from: a repository or a saved profile.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ProfileSource {
    #[arg(value_name = "REPO", help = "Repository URL or local directory")]
    pub repo: Option<String>,

    #[arg(long, value_name = "FILE", help = "Previously saved profile (JSON or YAML)")]
    pub profile: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "REPO", help = "Repository URL or local directory")]
    pub repo: String,

    #[arg(long, env = "STACKPIPE_TOKEN", hide_env_values = true, help = "Access token for private repositories")]
    pub token: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(short = 'o', long, value_name = "FILE", help = "Write to FILE instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: ProfileSource,

    #[arg(long, env = "STACKPIPE_TOKEN", hide_env_values = true, help = "Access token for private repositories")]
    pub token: Option<String>,

    #[arg(short = 'p', long, help = "Target platform (gitlab, jenkins)")]
    pub platform: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        value_name = "STAGES",
        help = "Comma-separated stage whitelist"
    )]
    pub stages: Vec<String>,

    #[arg(short = 's', long, value_name = "FILE", help = "Generation settings (JSON or YAML)")]
    pub settings: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "FILE", help = "Write to FILE instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub source: ProfileSource,

    #[arg(long, env = "STACKPIPE_TOKEN", hide_env_values = true, help = "Access token for private repositories")]
    pub token: Option<String>,

    #[arg(short = 's', long, value_name = "FILE", help = "Generation settings (JSON or YAML)")]
    pub settings: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "FILE", help = "Write to FILE instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StagesArgs {
    #[command(flatten)]
    pub source: ProfileSource,

    #[arg(long, env = "STACKPIPE_TOKEN", hide_env_values = true, help = "Access token for private repositories")]
    pub token: Option<String>,

    #[arg(short = 's', long, value_name = "FILE", help = "Generation settings (JSON or YAML)")]
    pub settings: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Markdown,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Markdown => super::output::OutputFormat::Markdown,
        }
    }
}

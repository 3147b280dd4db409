use stackpipe::cli::commands::{CliArgs, Commands};
use stackpipe::cli::handlers::{handle_compose, handle_detect, handle_generate, handle_stages};
use stackpipe::util::logging::{self, LoggingConfig};
use stackpipe::{StackpipeConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    let config = StackpipeConfig::default();
    init_logging_from_args(&args, &config);

    debug!("stackpipe v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let result = config.validate().map_err(anyhow::Error::from).and_then(|_| match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, &config),
        Commands::Generate(generate_args) => handle_generate(generate_args, &config),
        Commands::Compose(compose_args) => handle_compose(compose_args, &config),
        Commands::Stages(stages_args) => handle_stages(stages_args, &config),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging_from_args(args: &CliArgs, config: &StackpipeConfig) {
    let base = args.log_level.as_deref().unwrap_or(&config.log_level);
    let level = logging::level_from_flags(base, args.verbose, args.quiet);
    let use_json = std::env::var(logging::LOG_JSON_ENV)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    logging::init_logging(LoggingConfig {
        use_json,
        ..LoggingConfig::with_level(level)
    });
}

//! tracing subscriber setup for stackpipe.
//!
//! Logs always go to stderr so that generated documents written to stdout can be
//! piped straight into files. `RUST_LOG` directives are honoured on top of the
//! configured level, and the subscriber can only be installed once per process.
//!
//! ```no_run
//! use stackpipe::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(repo = "acme/shop", "Detecting stack");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "STACKPIPE_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "STACKPIPE_LOG_JSON";

/// Crates whose debug output drowns ours unless asked for explicitly.
const QUIET_DEPENDENCIES: &[&str] = &["handlebars=warn", "ignore=warn", "globset=warn"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for stackpipe's own events
    pub level: Level,

    /// One JSON object per event instead of human-readable lines
    pub use_json: bool,

    /// Include the module path (e.g. `stackpipe::detector`)
    pub include_target: bool,

    /// Include file and line number
    pub include_location: bool,

    /// Include thread id and name
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with full metadata, for log shippers.
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
        }
    }

    fn filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();

        if let Ok(directive) = format!("stackpipe={}", self.level).parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
        if env::var("RUST_LOG").is_err() {
            for quiet in QUIET_DEPENDENCIES {
                if let Ok(directive) = quiet.parse::<Directive>() {
                    filter = filter.add_directive(directive);
                }
            }
        }
        filter
    }
}

/// Parses a level name case-insensitively. Anything unrecognised becomes INFO.
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level from command line flags: `-q` wins, each `-v` raises the level one step
/// above `base`.
pub fn level_from_flags(base: &str, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    const LADDER: [Level; 5] = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
    let base = parse_level(base);
    let start = LADDER.iter().position(|l| *l == base).unwrap_or(2);
    LADDER[(start + verbose as usize).min(LADDER.len() - 1)]
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.filter();
        let layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        // Another subscriber may already be installed by the embedding process.
        let result = if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.json())
                .try_init()
        } else {
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        };
        if let Err(e) = result {
            eprintln!("stackpipe: logging already initialised: {}", e);
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Reads `STACKPIPE_LOG_LEVEL` and `STACKPIPE_LOG_JSON`.
pub fn init_from_env() {
    init_logging(config_from_env());
}

fn config_from_env() -> LoggingConfig {
    let level = env::var(LOG_LEVEL_ENV)
        .map(|v| parse_level(&v))
        .unwrap_or(Level::INFO);
    let use_json = env::var(LOG_JSON_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<bool>().ok())
        .unwrap_or(false);

    LoggingConfig {
        level,
        use_json,
        ..Default::default()
    }
}

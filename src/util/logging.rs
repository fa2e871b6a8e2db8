//! Structured logging setup for dockerizer
//!
//! Logs go to stderr through a `tracing-subscriber` registry, so generated output on
//! stdout (JSON/YAML analysis) stays machine-readable. The subscriber can only be
//! installed once per process.
//!
//! # Example
//!
//! ```no_run
//! use dockerizer::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!("Analyzing project");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

pub const LOG_LEVEL_ENV: &str = "DOCKERIZER_LOG_LEVEL";
pub const LOG_JSON_ENV: &str = "DOCKERIZER_LOG_JSON";

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for dockerizer's own events
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    /// Include the module target (e.g. dockerizer::detection) in logs
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: false,
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

    /// Level from CLI verbosity flags, falling back to `configured` when neither is set
    ///
    /// `--quiet` wins over `--verbose`; one `-v` means debug, two or more mean trace.
    pub fn from_flags(configured: Option<&str>, verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            Level::ERROR
        } else {
            match verbose {
                0 => configured.map(parse_level).unwrap_or(Level::WARN),
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        };

        Self {
            level,
            use_json: json_from_env(),
            include_target: verbose > 1,
        }
    }
}

/// Parses a log level, case-insensitive; unknown values become WARN
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}

fn json_from_env() -> bool {
    env::var(LOG_JSON_ENV)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

fn build_filter(level: Level) -> EnvFilter {
    let directive = format!("dockerizer={}", level);
    let filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(d) => filter.add_directive(d),
        Err(_) => filter,
    }
}

/// Installs the global subscriber; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        }
    });
}

/// Initializes logging from `DOCKERIZER_LOG_LEVEL` and `DOCKERIZER_LOG_JSON`
pub fn init_from_env() {
    let level = env::var(LOG_LEVEL_ENV)
        .map(|s| parse_level(&s))
        .unwrap_or(Level::WARN);

    init_logging(LoggingConfig {
        level,
        use_json: json_from_env(),
        ..Default::default()
    });
}

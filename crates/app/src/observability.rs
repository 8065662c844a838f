//! Logging
//!
//! Service operations emit `tracing` spans and events; the CLI installs a
//! subscriber writing compact or JSON lines to stderr so stdout stays free for
//! command output.

use clap::Args;
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] TryInitError),
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

// `log_level` already reads `RUST_LOG`, so the environment is not consulted again.
fn filter_directives(config: &LoggingConfig) -> String {
    format!("{},sqlx=warn", config.log_level)
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::new(filter_directives(config))
}

fn init_with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}

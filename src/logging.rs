//! Log output setup
//!
//! Logs go to stderr so the summary printed on stdout stays clean. `RUST_LOG`
//! takes precedence over the verbosity flag.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Compact,
    /// Multi-line output with all fields
    Pretty,
    /// One JSON object per event
    Json,
}

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "modnote_importer=debug,info"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global tracing subscriber
pub fn init(verbose: bool, format: LogFormat) -> Result<(), TryInitError> {
    let filter = env_filter(verbose);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

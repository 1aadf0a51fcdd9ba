//! Logging initialisation.
//!
//! Installs a global `tracing` subscriber built from [`LoggingConfig`].
//! `RUST_LOG`, when set, takes precedence over the configured level.
//!
//! Two output formats are supported:
//!
//! - [`LogFormat::Text`]: human-readable, one line per event
//! - [`LogFormat::Json`]: one JSON object per event

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::{Error, Result};

/// Build the filter for `config`, honouring `RUST_LOG` when present.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// Initialize the global logging subscriber.
///
/// Call once at process start. A second call fails because a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config);

    match config.format {
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| Error::Logging(e.to_string()))
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .map_err(|e| Error::Logging(e.to_string()))
        }
    }
}

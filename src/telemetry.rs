//! Tracing subscriber setup for hosts embedding the navigator.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{AppError, AppResult};

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr. Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| AppError::Internal {
        message: format!("Failed to install tracing subscriber: {}", e),
    })
}

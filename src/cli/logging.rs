//! Log subscriber setup
//!
//! `RUST_LOG` wins over the configured level. Logs go to stderr so they
//! never mix with results written to stdout.

use super::config::LoggingConfig;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("Failed to open log file '{path}': {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Install the global tracing subscriber.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::InvalidLevel {
            level: config.level.clone(),
            reason: e.to_string(),
        })?;

    match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::File {
                    path: path.clone(),
                    source,
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string())),
    }
}

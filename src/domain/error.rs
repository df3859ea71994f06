use std::path::PathBuf;

use thiserror::Error;

use super::models::level::Level;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error, fatal, panic")]
    InvalidLevel(String),

    #[error("Output is 'file' but no path was configured")]
    MissingPath,

    #[error("Log file path cannot be empty")]
    EmptyPath,

    #[error("Failed to extract configuration: {0}")]
    Extract(String),
}

/// Errors surfaced by logger construction and reconfiguration.
///
/// Emission itself never fails; only building or retuning a logger can.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("invalid log level: {0}")]
    InvalidLevel(Level),

    #[error("failed to open log sink {}: {source}", path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type LogResult<T> = Result<T, LogError>;

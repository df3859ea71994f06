use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::level::Level;

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LogConfig {
    /// Minimum severity written (trace, debug, info, warn, error, fatal, panic)
    #[serde(default = "default_log_level")]
    pub level: Level,

    /// Destination for entries
    #[serde(default)]
    pub output: Output,

    /// File to append to when `output` is `file`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Add a `time` key to every entry
    #[serde(default)]
    pub timestamp: bool,

    /// Encoding for time values
    #[serde(default)]
    pub time_format: TimeFormat,

    /// Encoding for captured stacks
    #[serde(default)]
    pub stack: StackFormat,
}

/// Where entries are written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// How time values (fields and the `time` key) are encoded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `2006-01-02T15:04:05Z07:00`
    #[default]
    Rfc3339,
    /// Integer seconds since the epoch
    Unix,
    /// Integer milliseconds since the epoch
    UnixMs,
}

/// How a captured call stack is encoded under the `stack` key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StackFormat {
    /// Array of `{"func","line","source"}` objects
    #[default]
    Frames,
    /// Array of raw backtrace lines
    Text,
}

const fn default_log_level() -> Level {
    Level::INFO
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: Output::default(),
            path: None,
            timestamp: false,
            time_format: TimeFormat::default(),
            stack: StackFormat::default(),
        }
    }
}

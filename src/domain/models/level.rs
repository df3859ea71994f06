//! Severity levels
//!
//! A level is a signed byte so that out-of-range values can be represented
//! (and rejected) rather than being unconstructible. The valid range is
//! `TRACE..=PANIC`; everything else is refused when a logger is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Severity of a log entry, ordered from most verbose to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i8);

impl Level {
    /// Very fine-grained diagnostics.
    pub const TRACE: Level = Level(-1);
    /// Debugging information.
    pub const DEBUG: Level = Level(0);
    /// Normal operational messages.
    pub const INFO: Level = Level(1);
    /// Something unexpected that the program recovered from.
    pub const WARN: Level = Level(2);
    /// A failed operation.
    pub const ERROR: Level = Level(3);
    /// A failure after which the process exits.
    pub const FATAL: Level = Level(4);
    /// A failure after which the calling stack unwinds.
    pub const PANIC: Level = Level(5);

    /// Every valid level, most verbose first.
    pub const ALL: [Level; 7] = [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
        Level::FATAL,
        Level::PANIC,
    ];

    /// Raw numeric value.
    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// Whether the level lies within `TRACE..=PANIC`.
    pub const fn is_valid(self) -> bool {
        self.0 >= Level::TRACE.0 && self.0 <= Level::PANIC.0
    }

    /// Lowercase wire name, or `None` for an out-of-range level.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            -1 => Some("trace"),
            0 => Some("debug"),
            1 => Some("info"),
            2 => Some("warn"),
            3 => Some("error"),
            4 => Some("fatal"),
            5 => Some("panic"),
            _ => None,
        }
    }

    /// Levels that attach a wrapped error and a stack to the entry.
    pub const fn carries_error(self) -> bool {
        self.0 >= Level::ERROR.0
    }
}

/// Returns true iff `level` lies within `TRACE..=PANIC`.
pub fn is_valid_log_level(level: Level) -> bool {
    level.is_valid()
}

impl From<i8> for Level {
    fn from(raw: i8) -> Self {
        Level(raw)
    }
}

impl From<Level> for i8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Error returned when a string does not name a level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0}. Must be one of: trace, debug, info, warn, error, fatal, panic")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            "fatal" => Ok(Level::FATAL),
            "panic" => Ok(Level::PANIC),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::TRACE,
            tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => Level::INFO,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::ERROR => Level::ERROR,
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_i8(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Number(i8),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
            Raw::Number(raw) => Ok(Level(raw)),
        }
    }
}

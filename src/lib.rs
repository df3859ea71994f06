//! fieldlog - Structured logging facade
//!
//! Leveled logging with typed key/value fields. Every entry is one JSON
//! object on its own line, written synchronously to any `Write` sink.
//! Error-level entries carry the wrapped error and a captured call stack.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): levels, fields, configuration models, errors
//! - **Infrastructure Layer** (`infrastructure`): the encoder, sinks, stack
//!   capture, the `tracing` bridge and configuration loading
//! - **CLI Layer** (`cli`): the `fieldlog` command
//!
//! # Example
//!
//! ```no_run
//! use fieldlog::{field, Level, Logger};
//!
//! let logger = Logger::new(Level::INFO, std::io::stdout())?;
//! logger.info("order placed", &[field("order_id", 42u64), field("region", "eu")]);
//!
//! let err = std::io::Error::other("connection reset");
//! logger.error(err, "payment failed", &[field("order_id", 42u64)]);
//! # Ok::<(), fieldlog::LogError>(())
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{
    field, is_valid_log_level, Field, FieldValue, Level, LogConfig, Output, ParseLevelError,
    StackFormat, TimeFormat,
};
pub use domain::{ConfigError, LogError, LogResult};
pub use infrastructure::config::ConfigLoader;
pub use infrastructure::logging::{
    wrap_err, EncoderOptions, FacadeLayer, Frame, Logger, MemorySink, Stack, Terminal, Threshold,
    ERR_CONTEXT,
};

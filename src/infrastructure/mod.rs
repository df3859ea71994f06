//! Infrastructure layer module
//!
//! Adapters with side effects:
//! - Configuration management
//! - Logging engine, sinks and the tracing bridge

pub mod config;
pub mod logging;

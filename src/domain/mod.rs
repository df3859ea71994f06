//! Domain layer for the fieldlog facade
//!
//! Severity levels, typed fields, configuration models and error types.
//! Nothing in here touches I/O.

pub mod error;
pub mod models;

// Re-export error types for convenient access
pub use error::{ConfigError, LogError, LogResult};

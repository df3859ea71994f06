//! Common test utilities for integration tests
//!
//! Provides shared fixtures, helpers, and test utilities used across
//! multiple integration test files.

use fieldlog::{Level, Logger, MemorySink};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create a temporary log file path
///
/// Returns the path to a log file inside a (not yet created) subdirectory.
#[allow(dead_code)]
pub fn temp_log_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let log_path = dir.path().join("logs").join("app.log");
    (dir, log_path)
}

/// Logger writing into a fresh in-memory sink
#[allow(dead_code)]
pub fn memory_logger(level: Level) -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::new(level, sink.clone()).expect("valid level");
    (logger, sink)
}

/// Error type with fixed text for error-path tests
#[derive(Debug)]
#[allow(dead_code)]
pub struct TestError(pub &'static str);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for TestError {}

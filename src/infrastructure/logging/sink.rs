//! Output sinks
//!
//! A logger writes to any `Write + Send` value. This module opens the
//! configured destinations and provides an in-memory buffer for capturing
//! output in tests and tooling.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::error::{LogError, LogResult};
use crate::domain::models::{LogConfig, Output};

/// Open the destination named by `config`.
///
/// Files are opened in append mode; missing parent directories are created.
pub fn open(config: &LogConfig) -> LogResult<Box<dyn Write + Send>> {
    match config.output {
        Output::Stdout => Ok(Box::new(io::stdout())),
        Output::Stderr => Ok(Box::new(io::stderr())),
        Output::File => {
            let path = config
                .path
                .as_ref()
                .ok_or(crate::domain::error::ConfigError::MissingPath)?;

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| LogError::Sink {
                    path: path.clone(),
                    source,
                })?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LogError::Sink {
                    path: path.clone(),
                    source,
                })?;
            Ok(Box::new(file))
        }
    }
}

/// Shared in-memory sink. Clones write into the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written entries, one per line.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Written entries parsed as JSON; lines that fail to parse are skipped.
    pub fn entries(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn clear(&self) {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

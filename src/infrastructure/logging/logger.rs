use std::io::Write;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::event::{EncoderOptions, Event};
use super::sink;
use super::stack::Stack;
use crate::domain::error::{LogError, LogResult};
use crate::domain::models::{Field, Level, LogConfig};

/// Context text prepended to every error passed to the error-level methods.
pub const ERR_CONTEXT: &str = "err context";

/// Target used for the crate's own diagnostics.
pub(crate) const DIAGNOSTIC_TARGET: &str = "fieldlog";

/// Wrap `err` with [`ERR_CONTEXT`].
///
/// The wrapped error renders (with `{:#}`) as `err context: <original>` and
/// still downcasts to the original type.
pub fn wrap_err(err: impl Into<anyhow::Error>) -> anyhow::Error {
    err.into().context(ERR_CONTEXT)
}

/// Minimum severity shared by every logger built from the same value.
///
/// Loggers built through [`Logger::new`] each get their own threshold. Pass
/// one `Threshold` to several loggers to retune them together.
#[derive(Debug, Clone)]
pub struct Threshold(Arc<AtomicI8>);

impl Threshold {
    /// # Errors
    /// Returns `LogError::InvalidLevel` if `level` is outside `TRACE..=PANIC`.
    pub fn new(level: Level) -> LogResult<Self> {
        if !level.is_valid() {
            return Err(LogError::InvalidLevel(level));
        }
        Ok(Self(Arc::new(AtomicI8::new(level.as_i8()))))
    }

    pub fn get(&self) -> Level {
        Level::from(self.0.load(Ordering::Relaxed))
    }

    /// # Errors
    /// Returns `LogError::InvalidLevel` and leaves the threshold unchanged if
    /// `level` is outside `TRACE..=PANIC`.
    pub fn set(&self, level: Level) -> LogResult<()> {
        if !level.is_valid() {
            return Err(LogError::InvalidLevel(level));
        }
        self.0.store(level.as_i8(), Ordering::Relaxed);
        Ok(())
    }

    pub fn allows(&self, level: Level) -> bool {
        level >= self.get()
    }
}

/// Structured logger writing one JSON line per entry.
///
/// Clones share the sink and the threshold.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<Mutex<dyn Write + Send>>,
    threshold: Threshold,
    options: EncoderOptions,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.threshold.get())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a logger writing to `sink` with the default encoding.
    ///
    /// # Arguments
    /// * `level` - Minimum severity written
    /// * `sink` - Destination for entries
    ///
    /// # Errors
    /// Returns `LogError::InvalidLevel` if `level` is outside `TRACE..=PANIC`.
    pub fn new<W>(level: Level, sink: W) -> LogResult<Self>
    where
        W: Write + Send + 'static,
    {
        Self::with_options(level, sink, EncoderOptions::default())
    }

    /// Create a logger with explicit encoding options.
    ///
    /// # Errors
    /// Returns `LogError::InvalidLevel` if `level` is outside `TRACE..=PANIC`.
    pub fn with_options<W>(level: Level, sink: W, options: EncoderOptions) -> LogResult<Self>
    where
        W: Write + Send + 'static,
    {
        Ok(Self::with_threshold(Threshold::new(level)?, sink, options))
    }

    /// Create a logger sharing `threshold` with other loggers.
    pub fn with_threshold<W>(threshold: Threshold, sink: W, options: EncoderOptions) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            threshold,
            options,
        }
    }

    /// Create a logger from configuration, opening the configured output.
    ///
    /// # Errors
    /// Returns an error if the level is invalid or the output cannot be opened.
    pub fn from_config(config: &LogConfig) -> LogResult<Self> {
        let threshold = Threshold::new(config.level)?;
        let out = sink::open(config)?;

        tracing::debug!(
            target: DIAGNOSTIC_TARGET,
            level = %config.level,
            output = ?config.output,
            timestamp = config.timestamp,
            "logger initialized"
        );

        Ok(Self::with_threshold(threshold, out, EncoderOptions::from(config)))
    }

    pub fn level(&self) -> Level {
        self.threshold.get()
    }

    /// # Errors
    /// Returns `LogError::InvalidLevel` if `level` is outside `TRACE..=PANIC`.
    pub fn set_level(&self, level: Level) -> LogResult<()> {
        self.threshold.set(level)
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Whether an entry at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        self.threshold.allows(level)
    }

    /// Log a trace entry.
    pub fn trace(&self, msg: &str, fields: &[Field]) {
        self.log(Level::TRACE, None, msg, fields);
    }

    /// Log a debug entry.
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::DEBUG, None, msg, fields);
    }

    /// Log an info entry.
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::INFO, None, msg, fields);
    }

    /// Log a warn entry.
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::WARN, None, msg, fields);
    }

    /// Log an error entry with the wrapped error and the current stack.
    pub fn error(&self, err: impl Into<anyhow::Error>, msg: &str, fields: &[Field]) {
        self.log_err(Level::ERROR, err, msg, fields);
    }

    /// Log a fatal entry.
    ///
    /// The process keeps running until the returned [`Terminal`] is
    /// terminated, which exits with status 1.
    pub fn fatal(&self, err: impl Into<anyhow::Error>, msg: &str, fields: &[Field]) -> Terminal {
        self.log_err(Level::FATAL, err, msg, fields);
        Terminal::Exit {
            code: FATAL_EXIT_CODE,
            message: msg.to_string(),
        }
    }

    /// Log a panic entry.
    ///
    /// Terminating the returned [`Terminal`] panics with `msg`.
    pub fn panic(&self, err: impl Into<anyhow::Error>, msg: &str, fields: &[Field]) -> Terminal {
        self.log_err(Level::PANIC, err, msg, fields);
        Terminal::Unwind {
            message: msg.to_string(),
        }
    }

    fn log_err(&self, level: Level, err: impl Into<anyhow::Error>, msg: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        let wrapped = wrap_err(err);
        self.log(level, Some(&format!("{wrapped:#}")), msg, fields);
    }

    /// Encode and write one entry.
    ///
    /// Levels from `ERROR` up carry a captured stack; `error` adds the
    /// `error` key when present.
    pub(crate) fn log(&self, level: Level, error: Option<&str>, msg: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }

        let mut event = Event::new(level, &self.options);
        event.fields(fields);
        if level.carries_error() {
            event.stack(&Stack::capture());
        }
        if let Some(text) = error {
            event.err(text);
        }
        self.write(&event.finish(msg));
    }

    fn write(&self, line: &[u8]) {
        let result = {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            sink.write_all(line).and_then(|()| sink.flush())
        };

        if let Err(e) = result {
            tracing::warn!(target: DIAGNOSTIC_TARGET, error = %e, bytes = line.len(), "failed to write log entry");
        }
    }
}

const FATAL_EXIT_CODE: i32 = 1;

/// Outcome of a fatal or panic entry.
///
/// The entry is already written when this is returned; the caller decides
/// when to end the process or unwind.
#[must_use = "fatal and panic entries only take effect once `terminate` is called"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Exit the process with `code`.
    Exit { code: i32, message: String },
    /// Panic with `message`.
    Unwind { message: String },
}

impl Terminal {
    pub fn level(&self) -> Level {
        match self {
            Terminal::Exit { .. } => Level::FATAL,
            Terminal::Unwind { .. } => Level::PANIC,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Terminal::Exit { message, .. } | Terminal::Unwind { message } => message,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Terminal::Exit { code, .. } => Some(*code),
            Terminal::Unwind { .. } => None,
        }
    }

    /// Exit the process or panic. Never returns.
    pub fn terminate(self) -> ! {
        match self {
            Terminal::Exit { code, .. } => std::process::exit(code),
            Terminal::Unwind { message } => panic!("{message}"),
        }
    }
}

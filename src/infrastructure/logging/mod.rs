//! Logging infrastructure
//!
//! The structured-log engine behind the facade:
//! - JSON line encoding with insertion-ordered keys
//! - Call-stack capture for error entries
//! - Output sinks (stdout, stderr, append-mode files, memory)
//! - A `tracing` layer that forwards events into a logger

pub mod event;
pub mod layer;
pub mod logger;
pub mod sink;
pub mod stack;

pub use event::EncoderOptions;
pub use layer::FacadeLayer;
pub use logger::{wrap_err, Logger, Terminal, Threshold, ERR_CONTEXT};
pub use sink::MemorySink;
pub use stack::{Frame, Stack};

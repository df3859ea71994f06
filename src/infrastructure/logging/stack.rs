//! Call-stack capture for error entries
//!
//! Frames are taken from `std::backtrace` and flattened into the
//! `{"func","line","source"}` shape. The rendering of a backtrace is not a
//! stable format, so parsing is tolerant: anything unrecognised is kept as a
//! bare function name.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::path::Path;

use serde::Serialize;

/// Frames from the capture machinery itself, skipped at the top of a stack.
const INTERNAL_PREFIXES: &[&str] = &[
    "std::backtrace",
    "<std::backtrace",
    "fieldlog::infrastructure::logging::stack::",
    "fieldlog::infrastructure::logging::logger::Logger",
    "<fieldlog::infrastructure::logging::layer::FacadeLayer",
    "tracing_core::",
    "<tracing_core::",
    "tracing_subscriber::",
    "<tracing_subscriber::",
    "tracing::",
];

/// Placeholder symbol std renders for frames it cannot resolve.
const UNKNOWN_SYMBOL: &str = "<unknown>";

/// One frame of a captured stack.
///
/// Field order is the serialized key order: `func`, `line`, `source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub func: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Frame {
    /// An unresolved frame with no location, such as a thread-start trampoline.
    fn is_unresolved(&self) -> bool {
        self.func == UNKNOWN_SYMBOL && self.source.is_none() && self.line.is_none()
    }
}

/// A captured call stack.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<Frame>,
    lines: Vec<String>,
}

impl Stack {
    /// Capture the current call stack regardless of `RUST_BACKTRACE`.
    pub fn capture() -> Self {
        let backtrace = Backtrace::force_capture();
        match backtrace.status() {
            BacktraceStatus::Captured => Self::parse(&backtrace.to_string()),
            _ => Self {
                frames: Vec::new(),
                lines: vec![backtrace.to_string()],
            },
        }
    }

    /// Build a stack from a rendered backtrace.
    pub fn parse(rendered: &str) -> Self {
        let lines: Vec<String> = rendered
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();

        let mut frames: Vec<Frame> = Vec::new();
        for line in &lines {
            let trimmed = line.trim_start();
            if let Some(location) = trimmed.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut() {
                    if frame.source.is_none() {
                        let (source, line) = split_location(location);
                        frame.source = Some(source);
                        frame.line = line;
                    }
                }
            } else if let Some(func) = frame_symbol(trimmed) {
                frames.push(Frame {
                    func: func.to_string(),
                    line: None,
                    source: None,
                });
            }
        }

        let skip = frames
            .iter()
            .take_while(|f| INTERNAL_PREFIXES.iter().any(|p| f.func.starts_with(p)))
            .count();
        frames.drain(..skip);
        while frames.last().is_some_and(Frame::is_unresolved) {
            frames.pop();
        }

        Self { frames, lines }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.lines.is_empty()
    }
}

/// `"12: path::to::func"` -> `"path::to::func"`
fn frame_symbol(line: &str) -> Option<&str> {
    let (index, rest) = line.split_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let symbol = rest.trim();
    (!symbol.is_empty()).then_some(symbol)
}

/// `"./src/main.rs:10:5"` -> `("main.rs", Some("10"))`
fn split_location(location: &str) -> (String, Option<String>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next().unwrap_or_default();
    let middle = parts.next();
    let rest = parts.next();

    let (path, line) = match (rest, middle) {
        (Some(path), Some(line)) if is_number(line) && is_number(last) => (path, Some(line)),
        _ => match middle {
            Some(path) if is_number(last) => (path, Some(last)),
            _ => (location, None),
        },
    };

    let source = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
    (source, line.map(str::to_string))
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:13
   1: fieldlog::infrastructure::logging::stack::Stack::capture
             at ./src/infrastructure/logging/stack.rs:40:25
   2: app::handlers::create_order
             at ./src/handlers.rs:88:9
   3: app::main
             at ./src/main.rs:12:5
   4: core::ops::function::FnOnce::call_once
";

    #[test]
    fn test_parse_frames_skips_capture_machinery() {
        let stack = Stack::parse(RENDERED);
        let frames = stack.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames[0],
            Frame {
                func: "app::handlers::create_order".to_string(),
                line: Some("88".to_string()),
                source: Some("handlers.rs".to_string()),
            }
        );
        assert_eq!(frames[1].source.as_deref(), Some("main.rs"));
        assert_eq!(frames[1].line.as_deref(), Some("12"));
        assert_eq!(frames[2].source, None);
    }

    #[test]
    fn test_raw_lines_are_kept() {
        let stack = Stack::parse(RENDERED);
        assert_eq!(stack.lines().len(), 9);
        assert!(stack.lines()[0].contains("force_capture"));
    }

    #[test]
    fn test_split_location_variants() {
        assert_eq!(
            split_location("/a/b/c.rs:10:5"),
            ("c.rs".to_string(), Some("10".to_string()))
        );
        assert_eq!(
            split_location("c.rs:7"),
            ("c.rs".to_string(), Some("7".to_string()))
        );
        assert_eq!(split_location("unknown"), ("unknown".to_string(), None));
    }

    #[test]
    fn test_frame_serialization_omits_missing_location() {
        let frame = Frame {
            func: "f".to_string(),
            line: None,
            source: None,
        };
        assert_eq!(serde_json::to_string(&frame).unwrap(), r#"{"func":"f"}"#);
    }

    #[test]
    fn test_frame_keys_are_sorted() {
        let frame = Frame {
            func: "app::run".to_string(),
            line: Some("42".to_string()),
            source: Some("run.rs".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"func":"app::run","line":"42","source":"run.rs"}"#
        );
    }

    #[test]
    fn test_trailing_unknown_frames_are_dropped() {
        let rendered = format!(
            "{RENDERED}   5: <unknown>
   6: __clone3
             at ./misc/clone3.S:78
   7: <unknown>
   8: <unknown>
"
        );
        let stack = Stack::parse(&rendered);
        let funcs: Vec<&str> = stack.frames().iter().map(|f| f.func.as_str()).collect();
        assert_eq!(
            funcs,
            [
                "app::handlers::create_order",
                "app::main",
                "core::ops::function::FnOnce::call_once",
                "<unknown>",
                "__clone3",
            ]
        );
        assert_eq!(stack.frames()[4].source.as_deref(), Some("clone3.S"));
    }

    #[test]
    fn test_capture_is_not_empty() {
        assert!(!Stack::capture().is_empty());
    }
}

//! Line encoder for a single entry
//!
//! Entries are appended into a private byte buffer in insertion order and
//! handed to the sink in one piece. Keys are not de-duplicated: a field set
//! with repeated keys is written as given.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;

use super::stack::Stack;
use crate::domain::models::{Field, FieldValue, Level, LogConfig, StackFormat, TimeFormat};

pub(crate) const LEVEL_KEY: &str = "level";
pub(crate) const TIME_KEY: &str = "time";
pub(crate) const STACK_KEY: &str = "stack";
pub(crate) const ERROR_KEY: &str = "error";
pub(crate) const MESSAGE_KEY: &str = "message";

/// Encoding choices fixed when a logger is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderOptions {
    /// Prepend a `time` key (current wall clock) after `level`.
    pub timestamp: bool,
    pub time_format: TimeFormat,
    pub stack: StackFormat,
}

impl From<&LogConfig> for EncoderOptions {
    fn from(config: &LogConfig) -> Self {
        Self {
            timestamp: config.timestamp,
            time_format: config.time_format,
            stack: config.stack,
        }
    }
}

/// An entry being encoded.
pub(crate) struct Event<'a> {
    buf: Vec<u8>,
    options: &'a EncoderOptions,
}

impl<'a> Event<'a> {
    pub(crate) fn new(level: Level, options: &'a EncoderOptions) -> Self {
        let mut event = Self {
            buf: Vec::with_capacity(256),
            options,
        };
        event.buf.push(b'{');
        event.key(LEVEL_KEY);
        match level.name() {
            Some(name) => event.json(name),
            None => event.json(&level.as_i8()),
        }
        if options.timestamp {
            event.key(TIME_KEY);
            event.time(&Utc::now().fixed_offset());
        }
        event
    }

    pub(crate) fn fields(&mut self, fields: &[Field]) -> &mut Self {
        for f in fields {
            self.field(&f.key, &f.value);
        }
        self
    }

    pub(crate) fn field(&mut self, key: &str, value: &FieldValue) -> &mut Self {
        self.key(key);
        match value {
            FieldValue::Str(v) => self.json(v),
            FieldValue::I8(v) => self.json(v),
            FieldValue::I16(v) => self.json(v),
            FieldValue::I32(v) => self.json(v),
            FieldValue::I64(v) => self.json(v),
            FieldValue::Isize(v) => self.json(v),
            FieldValue::U8(v) => self.json(v),
            FieldValue::U16(v) => self.json(v),
            FieldValue::U32(v) => self.json(v),
            FieldValue::U64(v) => self.json(v),
            FieldValue::Usize(v) => self.json(v),
            FieldValue::F32(v) => self.float(f64::from(*v), |b, v| write_json(b, &(v as f32))),
            FieldValue::F64(v) => self.float(*v, |b, v| write_json(b, &v)),
            FieldValue::Bool(v) => self.json(v),
            FieldValue::Time(v) => self.time(v),
            FieldValue::Any(v) => self.json(v),
        }
        self
    }

    pub(crate) fn stack(&mut self, stack: &Stack) -> &mut Self {
        self.key(STACK_KEY);
        match self.options.stack {
            StackFormat::Frames => self.json(stack.frames()),
            StackFormat::Text => self.json(stack.lines()),
        }
        self
    }

    pub(crate) fn err(&mut self, text: &str) -> &mut Self {
        self.key(ERROR_KEY);
        self.json(text);
        self
    }

    /// Close the entry. An empty message leaves the `message` key out.
    pub(crate) fn finish(mut self, msg: &str) -> Vec<u8> {
        if !msg.is_empty() {
            self.key(MESSAGE_KEY);
            self.json(msg);
        }
        self.buf.extend_from_slice(b"}\n");
        self.buf
    }

    fn key(&mut self, key: &str) {
        if self.buf.len() > 1 {
            self.buf.push(b',');
        }
        write_json(&mut self.buf, key);
        self.buf.push(b':');
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) {
        write_json(&mut self.buf, value);
    }

    fn float(&mut self, v: f64, finite: impl FnOnce(&mut Vec<u8>, f64)) {
        if v.is_nan() {
            self.json("NaN");
        } else if v.is_infinite() {
            self.json(if v > 0.0 { "+Inf" } else { "-Inf" });
        } else {
            finite(&mut self.buf, v);
        }
    }

    fn time(&mut self, t: &DateTime<FixedOffset>) {
        match self.options.time_format {
            TimeFormat::Rfc3339 => self.json(&t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            TimeFormat::Unix => self.json(&t.timestamp()),
            TimeFormat::UnixMs => self.json(&t.timestamp_millis()),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(buf: &mut Vec<u8>, value: &T) {
    let mark = buf.len();
    if let Err(e) = serde_json::to_writer(&mut *buf, value) {
        buf.truncate(mark);
        // Writing into a Vec cannot fail on I/O; only odd Serialize impls get here.
        let _ = serde_json::to_writer(&mut *buf, &format!("marshaling error: {e}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::field;

    fn encode(level: Level, fields: &[Field], msg: &str) -> String {
        let options = EncoderOptions::default();
        let mut event = Event::new(level, &options);
        event.fields(fields);
        String::from_utf8(event.finish(msg)).unwrap()
    }

    #[test]
    fn test_empty_message_is_omitted() {
        assert_eq!(encode(Level::TRACE, &[], ""), "{\"level\":\"trace\"}\n");
    }

    #[test]
    fn test_fields_in_call_order() {
        let line = encode(
            Level::INFO,
            &[field("key1", "str"), field("key2", 2)],
            "message",
        );
        assert_eq!(
            line,
            "{\"level\":\"info\",\"key1\":\"str\",\"key2\":2,\"message\":\"message\"}\n"
        );
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let line = encode(Level::WARN, &[field("k", 1), field("k", 2)], "");
        assert_eq!(line, "{\"level\":\"warn\",\"k\":1,\"k\":2}\n");
    }

    #[test]
    fn test_non_finite_floats_are_strings() {
        let line = encode(
            Level::DEBUG,
            &[
                field("nan", f64::NAN),
                field("pos", f32::INFINITY),
                field("neg", f64::NEG_INFINITY),
                field("ok", 0.25f64),
            ],
            "",
        );
        assert_eq!(
            line,
            "{\"level\":\"debug\",\"nan\":\"NaN\",\"pos\":\"+Inf\",\"neg\":\"-Inf\",\"ok\":0.25}\n"
        );
    }

    #[test]
    fn test_escaping() {
        let line = encode(Level::INFO, &[field("quote\"key", "line\nbreak")], "say \"hi\"");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["quote\"key"], "line\nbreak");
        assert_eq!(parsed["message"], "say \"hi\"");
    }

    #[test]
    fn test_time_formats() {
        let t: DateTime<Utc> = "2024-03-01T12:00:00Z".parse().unwrap();
        let fields = [field("at", t)];

        let rfc = encode(Level::INFO, &fields, "");
        assert!(rfc.contains("\"at\":\"2024-03-01T12:00:00Z\""), "{rfc}");

        let options = EncoderOptions {
            time_format: TimeFormat::Unix,
            ..EncoderOptions::default()
        };
        let mut event = Event::new(Level::INFO, &options);
        event.fields(&fields);
        let unix = String::from_utf8(event.finish("")).unwrap();
        assert!(unix.contains(&format!("\"at\":{}", t.timestamp())), "{unix}");

        let options = EncoderOptions {
            time_format: TimeFormat::UnixMs,
            ..EncoderOptions::default()
        };
        let mut event = Event::new(Level::INFO, &options);
        event.fields(&fields);
        let ms = String::from_utf8(event.finish("")).unwrap();
        assert!(ms.contains(&format!("\"at\":{}", t.timestamp_millis())), "{ms}");
    }

    #[test]
    fn test_timestamp_follows_level() {
        let options = EncoderOptions {
            timestamp: true,
            ..EncoderOptions::default()
        };
        let line = String::from_utf8(Event::new(Level::INFO, &options).finish("m")).unwrap();
        assert!(line.starts_with("{\"level\":\"info\",\"time\":\""), "{line}");
        assert!(line.ends_with("\"message\":\"m\"}\n"), "{line}");
    }

    #[test]
    fn test_invalid_level_is_numeric() {
        let line = encode(Level::from(9), &[], "");
        assert_eq!(line, "{\"level\":9}\n");
    }

    #[test]
    fn test_error_then_message() {
        let options = EncoderOptions::default();
        let mut event = Event::new(Level::ERROR, &options);
        event.stack(&Stack::capture()).err("err context: boom");
        let line = String::from_utf8(event.finish("failed")).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(parsed["stack"].is_array());
        assert_eq!(parsed["error"], "err context: boom");

        // Match key tokens; "error" also appears as the level value.
        let stack_at = line.find(",\"stack\":").unwrap();
        let error_at = line.find(",\"error\":").unwrap();
        let message_at = line.find(",\"message\":").unwrap();
        assert!(stack_at < error_at && error_at < message_at);
    }
}

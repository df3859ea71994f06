//! Implementation of the `fieldlog emit` command.

use anyhow::Result;
use chrono::DateTime;
use clap::Args;
use std::path::PathBuf;

use crate::domain::models::{Field, FieldValue, Level};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::Logger;

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Severity of the entry (trace, debug, info, warn, error, fatal, panic)
    pub level: Level,

    /// Entry message (may be empty)
    pub message: String,

    /// Fields as KEY=VALUE; values are typed as integer, float, bool, RFC3339 time or text
    #[arg(value_parser = parse_field)]
    pub fields: Vec<Field>,

    /// Error text for error, fatal and panic entries (defaults to the message)
    #[arg(long)]
    pub error: Option<String>,

    /// Configuration file (defaults to fieldlog.yaml plus FIELDLOG_* variables)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum level written, overriding the configuration
    #[arg(long)]
    pub min_level: Option<Level>,

    /// Add a time key to the entry
    #[arg(long)]
    pub timestamp: bool,
}

/// Parse `KEY=VALUE` into a typed field.
pub fn parse_field(raw: &str) -> Result<Field, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok(Field::new(key, infer_value(value)))
}

fn infer_value(value: &str) -> FieldValue {
    if let Ok(v) = value.parse::<i64>() {
        return FieldValue::I64(v);
    }
    if let Ok(v) = value.parse::<u64>() {
        return FieldValue::U64(v);
    }
    if value.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(v) = value.parse::<f64>() {
            if v.is_finite() {
                return FieldValue::F64(v);
            }
        }
    }
    match value {
        "true" => return FieldValue::Bool(true),
        "false" => return FieldValue::Bool(false),
        _ => {}
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return FieldValue::Time(t);
    }
    FieldValue::Str(value.to_string())
}

pub fn execute(args: EmitArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = args.min_level {
        config.level = level;
    }
    if args.timestamp {
        config.timestamp = true;
    }

    let logger = Logger::from_config(&config)?;
    let fields = args.fields;
    let err = anyhow::Error::msg(args.error.unwrap_or_else(|| args.message.clone()));

    match args.level {
        Level::TRACE => logger.trace(&args.message, &fields),
        Level::DEBUG => logger.debug(&args.message, &fields),
        Level::INFO => logger.info(&args.message, &fields),
        Level::WARN => logger.warn(&args.message, &fields),
        Level::ERROR => logger.error(err, &args.message, &fields),
        Level::FATAL => logger.fatal(err, &args.message, &fields).terminate(),
        Level::PANIC => logger.panic(err, &args.message, &fields).terminate(),
        other => anyhow::bail!("invalid log level: {other}"),
    }

    Ok(())
}

use std::fmt;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::logger::{Logger, DIAGNOSTIC_TARGET};
use crate::domain::models::{Field, FieldValue, Level};

/// Layer that forwards `tracing` events into a [`Logger`].
///
/// Event fields keep the order tracing visits them in. The `message` field
/// becomes the entry message and a recorded error becomes the `error` key.
/// The logger's threshold applies on top of any subscriber filtering.
#[derive(Debug, Clone)]
pub struct FacadeLayer {
    logger: Logger,
}

impl FacadeLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl<S: Subscriber> Layer<S> for FacadeLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Our own diagnostics would feed back into the sink that produced them.
        if metadata.target() == DIAGNOSTIC_TARGET {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.logger
            .log(level, visitor.error.as_deref(), &visitor.message, &visitor.fields);
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    error: Option<String>,
    fields: Vec<Field>,
}

impl FieldVisitor {
    fn push(&mut self, field: &TracingField, value: FieldValue) {
        self.fields.push(Field::new(field.name(), value));
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push(field, FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, FieldValue::I64(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, FieldValue::U64(value));
    }

    fn record_i128(&mut self, field: &TracingField, value: i128) {
        let value = i64::try_from(value).map_or_else(|_| FieldValue::Str(value.to_string()), FieldValue::I64);
        self.push(field, value);
    }

    fn record_u128(&mut self, field: &TracingField, value: u128) {
        let value = u64::try_from(value).map_or_else(|_| FieldValue::Str(value.to_string()), FieldValue::U64);
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, FieldValue::F64(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, FieldValue::Bool(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        let mut text = value.to_string();
        let mut source = value.source();
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }

        if field.name() == "error" || self.error.is_none() {
            self.error = Some(text);
        } else {
            self.push(field, FieldValue::Str(text));
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push(field, FieldValue::Str(format!("{value:?}")));
        }
    }
}

//! Typed key/value attributes attached to a log entry

use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Serialize;

/// Value half of a [`Field`].
///
/// The variant is chosen when the field is built, so the encoder never has
/// to inspect types at emission time. `Any` is the fallback for everything
/// that is not one of the scalar kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    Time(DateTime<FixedOffset>),
    Any(serde_json::Value),
}

/// A single structured attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    /// Build a field from anything with a typed encoding.
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a field from any serializable value.
    ///
    /// Serialization failures do not propagate: the field carries the text of
    /// the marshaling error instead.
    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => serde_json::Value::String(format!("marshaling error: {e}")),
        };
        Self {
            key: key.into(),
            value: FieldValue::Any(value),
        }
    }
}

/// Shorthand for [`Field::new`].
pub fn field(key: impl Into<String>, value: impl Into<FieldValue>) -> Field {
    Field::new(key, value)
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Str,
    DateTime<FixedOffset> => Time,
    serde_json::Value => Any,
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Str(v.clone())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::Time(v.fixed_offset())
    }
}

impl From<DateTime<Local>> for FieldValue {
    fn from(v: DateTime<Local>) -> Self {
        FieldValue::Time(v.fixed_offset())
    }
}

impl From<SystemTime> for FieldValue {
    fn from(v: SystemTime) -> Self {
        FieldValue::Time(DateTime::<Utc>::from(v).fixed_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};

    #[test]
    fn test_scalar_variants() {
        assert_eq!(field("a", "x").value, FieldValue::Str("x".into()));
        assert_eq!(field("a", 2).value, FieldValue::I32(2));
        assert_eq!(field("a", 2u8).value, FieldValue::U8(2));
        assert_eq!(field("a", -7i64).value, FieldValue::I64(-7));
        assert_eq!(field("a", 3usize).value, FieldValue::Usize(3));
        assert_eq!(field("a", 1.5f32).value, FieldValue::F32(1.5));
        assert_eq!(field("a", true).value, FieldValue::Bool(true));
    }

    #[test]
    fn test_time_variants_keep_instant() {
        let utc: DateTime<Utc> = "2024-03-01T12:00:00Z".parse().unwrap();
        match field("t", utc).value {
            FieldValue::Time(t) => assert_eq!(t.timestamp(), utc.timestamp()),
            other => panic!("expected time, got {other:?}"),
        }

        let system: SystemTime = utc.into();
        match field("t", system).value {
            FieldValue::Time(t) => assert_eq!(t.timestamp(), utc.timestamp()),
            other => panic!("expected time, got {other:?}"),
        }
    }

    #[test]
    fn test_any_serializes_structs() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let f = Field::any("p", &Point { x: 1, y: 2 });
        assert_eq!(f.value, FieldValue::Any(serde_json::json!({"x": 1, "y": 2})));
    }

    #[test]
    fn test_any_falls_back_on_marshal_failure() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("cannot encode"))
            }
        }

        let f = Field::any("b", &Broken);
        match f.value {
            FieldValue::Any(serde_json::Value::String(text)) => {
                assert!(text.contains("cannot encode"));
            }
            other => panic!("expected fallback string, got {other:?}"),
        }
    }
}

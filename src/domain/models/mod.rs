pub mod config;
pub mod field;
pub mod level;

pub use config::{LogConfig, Output, StackFormat, TimeFormat};
pub use field::{field, Field, FieldValue};
pub use level::{is_valid_log_level, Level, ParseLevelError};

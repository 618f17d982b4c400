//! Driver-neutral values for statement parameters and result columns.

use crate::error::{OrmError, OrmResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// A single column value, shared across dialects.
///
/// Records hand their fields to the engine as `Value`s (in descriptor order) and
/// receive generated keys and scanned rows back the same way.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer column (narrowed on conversion)
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Timestamp without time zone
    Timestamp(NaiveDateTime),
    /// JSON document
    Json(serde_json::Value),
    /// UUID
    Uuid(uuid::Uuid),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short type name used in decode errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Json(_) => "json",
            Self::Uuid(_) => "uuid",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

fn mismatch<T>(expected: &str, got: &Value) -> OrmResult<T> {
    Err(OrmError::decode(
        "",
        format!("expected {expected}, got {}", got.kind()),
    ))
}

/// Convert a Rust field into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Convert a [`Value`] back into a Rust field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> OrmResult<Self>;
}

/// Reports whether a primary-key field still holds its "unset" value.
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

impl<T: Into<Value> + Clone> ToValue for T {
    fn to_value(&self) -> Value {
        self.clone().into()
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> OrmResult<Self> {
                match value {
                    Value::Int(v) => <$t>::try_from(v).map_err(|_| {
                        OrmError::decode("", format!("{v} out of range for {}", stringify!($t)))
                    }),
                    other => mismatch("int", &other),
                }
            }
        }

        impl IsZero for $t {
            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

int_value!(i16, i32, i64, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            // SQLite and MySQL store booleans as integers.
            Value::Int(v) => Ok(v != 0),
            other => mismatch("bool", &other),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => mismatch("float", &other),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> OrmResult<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Text(v) => Ok(v),
            other => mismatch("text", &other),
        }
    }
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => mismatch("bytes", &other),
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Timestamp(v) => Ok(v),
            // SQLite has no timestamp type; rows come back as text.
            Value::Text(s) => TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
                .ok_or_else(|| OrmError::decode("", format!("invalid timestamp '{s}'"))),
            other => mismatch("timestamp", &other),
        }
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.naive_utc())
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> OrmResult<Self> {
        NaiveDateTime::from_value(value).map(|v| v.and_utc())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Json(v) => Ok(v),
            Value::Text(s) => serde_json::from_str(&s)
                .map_err(|e| OrmError::decode("", format!("invalid json: {e}"))),
            other => mismatch("json", &other),
        }
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            Value::Text(s) => uuid::Uuid::parse_str(&s)
                .map_err(|e| OrmError::decode("", format!("invalid uuid: {e}"))),
            Value::Bytes(b) => uuid::Uuid::from_slice(&b)
                .map_err(|e| OrmError::decode("", format!("invalid uuid: {e}"))),
            other => mismatch("uuid", &other),
        }
    }
}

impl IsZero for uuid::Uuid {
    fn is_zero(&self) -> bool {
        self.is_nil()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        Ok(value)
    }
}

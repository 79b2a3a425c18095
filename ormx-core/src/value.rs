use std::str;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::{BoxDynError, Error};

/// A native value, as seen by application code.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Decimal(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    /// A GeoJSON geometry object.
    Geometry(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A short name for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
            Value::Geometry(_) => "geometry",
        }
    }

    /// Converts the value into a JSON document.
    ///
    /// Binary data has no JSON form and is rejected.
    pub fn to_json(&self) -> Result<serde_json::Value, BoxDynError> {
        use serde_json::Value as Json;

        Ok(match self {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(*v),
            Value::Int(v) => Json::from(*v),
            Value::UInt(v) => Json::from(*v),
            Value::Double(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .ok_or_else(|| format!("{v} cannot be represented in JSON"))?,
            Value::Decimal(v) => Json::String(v.to_string()),
            Value::Text(v) => Json::String(v.clone()),
            Value::DateTime(v) => Json::String(v.to_rfc3339()),
            Value::Date(v) => Json::String(v.to_string()),
            Value::Time(v) => Json::String(v.to_string()),
            Value::Uuid(v) => Json::String(v.hyphenated().to_string()),
            Value::Json(v) | Value::Geometry(v) => v.clone(),
            Value::Bytes(_) => return Err("binary data cannot be converted to JSON".into()),
        })
    }
}

/// A value ready to be bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl WireValue {
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// The text form of the value, as it would travel over a text protocol.
    ///
    /// Returns `None` for `NULL` and for binary data.
    pub fn to_text(&self) -> Option<String> {
        match self {
            WireValue::Null | WireValue::Bytes(_) => None,
            WireValue::Bool(v) => Some(if *v { "1" } else { "0" }.to_owned()),
            WireValue::Int(v) => Some(v.to_string()),
            WireValue::UInt(v) => Some(v.to_string()),
            WireValue::Double(v) => Some(v.to_string()),
            WireValue::Text(v) => Some(v.clone()),
        }
    }
}

/// How the bytes of a [`RawValueRef`] are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Text protocol: every value is its string representation.
    Text,
    /// Binary protocol: numbers are little-endian, blobs and geometry are raw bytes.
    Binary,
}

/// A value as delivered by the database driver, keyed by its raw type tag.
#[derive(Debug, Clone, Copy)]
pub struct RawValueRef<'r> {
    type_tag: &'r str,
    format: ValueFormat,
    data: Option<&'r [u8]>,
}

impl<'r> RawValueRef<'r> {
    pub fn new(type_tag: &'r str, format: ValueFormat, data: Option<&'r [u8]>) -> Self {
        Self {
            type_tag,
            format,
            data,
        }
    }

    /// A text-protocol value.
    pub fn text(type_tag: &'r str, text: &'r str) -> Self {
        Self::new(type_tag, ValueFormat::Text, Some(text.as_bytes()))
    }

    /// A binary-protocol value.
    pub fn binary(type_tag: &'r str, bytes: &'r [u8]) -> Self {
        Self::new(type_tag, ValueFormat::Binary, Some(bytes))
    }

    /// SQL `NULL`.
    pub fn null(type_tag: &'r str) -> Self {
        Self::new(type_tag, ValueFormat::Text, None)
    }

    pub fn type_tag(&self) -> &'r str {
        self.type_tag
    }

    pub fn format(&self) -> ValueFormat {
        self.format
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// The payload decoded as UTF-8, whatever the declared format.
    pub fn as_str(&self) -> Result<&'r str, Error> {
        str::from_utf8(self.as_bytes()?).map_err(|e| Error::parse(self.type_tag, e))
    }

    pub fn as_bytes(&self) -> Result<&'r [u8], Error> {
        self.data
            .ok_or_else(|| Error::parse(self.type_tag, "unexpected NULL"))
    }
}

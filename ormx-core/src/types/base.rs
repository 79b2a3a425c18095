//! Base behaviour of every logical type.
//!
//! Dialects start from these and override what their database does differently
//! (see [`TypeBinding::with_declare`](crate::TypeBinding::with_declare) and friends).

use std::str::FromStr;

use bigdecimal::BigDecimal;
use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::error::{BoxDynError, Error};
use crate::escape::Escape;
use crate::geo::wkb;
use crate::options::{ParseOptions, SerializeOptions};
use crate::timezone::{self, Timezone};
use crate::types::{DataType, NumberOptions, TypeKey};
use crate::value::{RawValueRef, Value, ValueFormat, WireValue};

/// Renders the column type the way the abstract types do.
pub fn declare(data_type: &DataType, _escape: &dyn Escape) -> String {
    match data_type {
        DataType::String { length, binary } => {
            with_binary(format!("VARCHAR({})", length.unwrap_or(255)), *binary)
        }
        DataType::Char { length, binary } => {
            with_binary(format!("CHAR({})", length.unwrap_or(255)), *binary)
        }
        DataType::Text(size) => match size {
            Some(size) => format!("{}TEXT", size.prefix()),
            None => "TEXT".to_owned(),
        },
        DataType::TinyInt(options)
        | DataType::SmallInt(options)
        | DataType::MediumInt(options)
        | DataType::Integer(options)
        | DataType::BigInt(options)
        | DataType::Float(options)
        | DataType::Real(options)
        | DataType::Double(options) => declare_number(data_type.key().as_str(), options),
        DataType::Decimal(options) => match (options.precision, options.scale) {
            (Some(precision), Some(scale)) => format!("DECIMAL({precision},{scale})"),
            (Some(precision), None) => format!("DECIMAL({precision})"),
            (None, Some(scale)) => format!("DECIMAL({scale})"),
            (None, None) => "DECIMAL".to_owned(),
        },
        DataType::Boolean => "TINYINT(1)".to_owned(),
        DataType::Time => "TIME".to_owned(),
        DataType::Date { .. } => "DATETIME".to_owned(),
        DataType::DateOnly => "DATE".to_owned(),
        DataType::Uuid => "UUID".to_owned(),
        DataType::Enum { .. } => "ENUM".to_owned(),
        DataType::Blob(size) => match size {
            Some(size) => format!("{}BLOB", size.prefix()),
            None => "BLOB".to_owned(),
        },
        DataType::Geometry(_) => "GEOMETRY".to_owned(),
        DataType::Json => "JSON".to_owned(),
    }
}

fn with_binary(mut definition: String, binary: bool) -> String {
    if binary {
        definition.push_str(" BINARY");
    }
    definition
}

fn declare_number(name: &str, options: &NumberOptions) -> String {
    let mut definition = name.to_owned();

    if let Some(length) = options.length {
        definition.push_str(&format!("({length}"));
        if let Some(decimals) = options.decimals {
            definition.push_str(&format!(",{decimals}"));
        }
        definition.push(')');
    }
    if options.unsigned {
        definition.push_str(" UNSIGNED");
    }
    if options.zerofill {
        definition.push_str(" ZEROFILL");
    }

    definition
}

/// Serializes `value` as a `data_type` parameter.
///
/// `Value::Null` is handled by the registry before this is reached.
pub fn serialize(
    data_type: &DataType,
    value: &Value,
    options: &SerializeOptions,
) -> Result<WireValue, Error> {
    let key = data_type.key();
    serialize_value(key, value, options).map_err(|source| Error::encode(key, source))
}

fn serialize_value(
    key: TypeKey,
    value: &Value,
    options: &SerializeOptions,
) -> Result<WireValue, BoxDynError> {
    Ok(match (key, value) {
        (TypeKey::String | TypeKey::Char | TypeKey::Text | TypeKey::Enum, value) => {
            WireValue::Text(text_of(value)?)
        }

        (key, Value::Int(v)) if key.is_integer() => WireValue::Int(*v),
        (key, Value::UInt(v)) if key.is_integer() => WireValue::UInt(*v),
        (key, Value::Bool(v)) if key.is_integer() => WireValue::Int(i64::from(*v)),
        (key, Value::Text(v)) if key.is_integer() => match v.trim().parse::<i64>() {
            Ok(v) => WireValue::Int(v),
            Err(_) => WireValue::UInt(v.trim().parse::<u64>()?),
        },

        (key, Value::Double(v)) if key.is_floating() => WireValue::Double(*v),
        (key, Value::Int(v)) if key.is_floating() => WireValue::Text(v.to_string()),
        (key, Value::Text(v)) if key.is_floating() => WireValue::Double(v.trim().parse()?),

        (TypeKey::Decimal, Value::Decimal(v)) => WireValue::Text(v.to_string()),
        (TypeKey::Decimal, Value::Int(v)) => WireValue::Text(v.to_string()),
        (TypeKey::Decimal, Value::UInt(v)) => WireValue::Text(v.to_string()),
        (TypeKey::Decimal, Value::Double(v)) => WireValue::Text(v.to_string()),
        (TypeKey::Decimal, Value::Text(v)) => {
            WireValue::Text(BigDecimal::from_str(v.trim())?.to_string())
        }

        (TypeKey::Boolean, Value::Bool(v)) => WireValue::Bool(*v),
        (TypeKey::Boolean, Value::Int(v @ (0 | 1))) => WireValue::Bool(*v == 1),

        (TypeKey::Time, Value::Time(v)) => WireValue::Text(v.to_string()),
        (TypeKey::Time, Value::Text(v)) => WireValue::Text(parse_time(v)?.to_string()),

        (TypeKey::Date, value) => {
            let instant = instant_of(value)?;
            let timezone = Timezone::resolve(&options.timezone)?;
            WireValue::Text(format!(
                "{} {}",
                timezone.localize(&instant).format("%Y-%m-%d %H:%M:%S%.3f"),
                timezone.offset_at(&instant)
            ))
        }

        (TypeKey::DateOnly, Value::Date(v)) => WireValue::Text(v.format("%Y-%m-%d").to_string()),
        (TypeKey::DateOnly, Value::DateTime(v)) => {
            WireValue::Text(v.date_naive().format("%Y-%m-%d").to_string())
        }
        (TypeKey::DateOnly, Value::Text(v)) => {
            WireValue::Text(parse_date(v)?.format("%Y-%m-%d").to_string())
        }

        (TypeKey::Uuid, Value::Uuid(v)) => WireValue::Text(v.hyphenated().to_string()),
        (TypeKey::Uuid, Value::Text(v)) => {
            WireValue::Text(Uuid::parse_str(v)?.hyphenated().to_string())
        }

        (TypeKey::Blob, Value::Bytes(v)) => WireValue::Bytes(v.clone()),
        (TypeKey::Blob, Value::Text(v)) => WireValue::Bytes(v.as_bytes().to_vec()),

        (TypeKey::Geometry, Value::Geometry(v) | Value::Json(v)) => WireValue::Bytes(wkb::encode(v)?),

        (TypeKey::Json, value) => WireValue::Text(serde_json::to_string(&value.to_json()?)?),

        (key, value) => {
            return Err(format!("cannot serialize a {} value as {key}", value.kind()).into())
        }
    })
}

fn text_of(value: &Value) -> Result<String, BoxDynError> {
    Ok(match value {
        Value::Text(v) => v.clone(),
        Value::Int(v) => v.to_string(),
        Value::UInt(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Uuid(v) => v.hyphenated().to_string(),
        other => return Err(format!("cannot use a {} value as text", other.kind()).into()),
    })
}

/// The instant a date/time value stands for. Text must be RFC 3339.
pub fn instant_of(value: &Value) -> Result<DateTime<Utc>, BoxDynError> {
    match value {
        Value::DateTime(v) => Ok(*v),
        Value::Date(v) => Ok(v.and_time(NaiveTime::MIN).and_utc()),
        Value::Text(v) => Ok(DateTime::parse_from_rfc3339(v.trim())?.with_timezone(&Utc)),
        other => Err(format!("cannot use a {} value as a date", other.kind()).into()),
    }
}

/// Parses a non-NULL raw value the way the abstract types do.
pub fn parse(key: TypeKey, raw: &RawValueRef<'_>, options: &ParseOptions) -> Result<Value, Error> {
    parse_value(key, raw, options).map_err(|source| Error::parse(raw.type_tag(), source))
}

fn parse_value(
    key: TypeKey,
    raw: &RawValueRef<'_>,
    options: &ParseOptions,
) -> Result<Value, BoxDynError> {
    let binary = raw.format() == ValueFormat::Binary;

    Ok(match key {
        TypeKey::String | TypeKey::Char | TypeKey::Text | TypeKey::Enum | TypeKey::Uuid => {
            Value::Text(raw.as_str()?.to_owned())
        }

        key if key.is_integer() && binary => Value::Int(le_integer(raw.as_bytes()?)?),
        key if key.is_integer() => {
            let text = raw.as_str()?.trim();
            match text.parse::<i64>() {
                Ok(v) => Value::Int(v),
                Err(_) => Value::UInt(text.parse::<u64>()?),
            }
        }

        key if key.is_floating() && binary => {
            let bytes = raw.as_bytes()?;
            match bytes.len() {
                4 => Value::Double(f64::from(LittleEndian::read_f32(bytes))),
                8 => Value::Double(LittleEndian::read_f64(bytes)),
                len => return Err(format!("{len} bytes cannot hold a binary float").into()),
            }
        }
        key if key.is_floating() => Value::Double(raw.as_str()?.trim().parse()?),

        TypeKey::Decimal => Value::Decimal(BigDecimal::from_str(raw.as_str()?.trim())?),

        TypeKey::Boolean if binary => Value::Bool(raw.as_bytes()?.iter().any(|b| *b != 0)),
        TypeKey::Boolean => match raw.as_str()?.trim() {
            "1" | "true" | "TRUE" => Value::Bool(true),
            "0" | "false" | "FALSE" => Value::Bool(false),
            other => return Err(format!("{other:?} is not a boolean").into()),
        },

        TypeKey::Time => Value::Time(parse_time(raw.as_str()?)?),

        TypeKey::Date => {
            let text = raw.as_str()?.trim();
            match DateTime::parse_from_rfc3339(text) {
                Ok(v) => Value::DateTime(v.with_timezone(&Utc)),
                Err(_) => Value::DateTime(timezone::parse_in_timezone(text, &options.timezone)?),
            }
        }

        TypeKey::DateOnly => Value::Date(parse_date(raw.as_str()?)?),

        TypeKey::Blob => Value::Bytes(raw.as_bytes()?.to_vec()),

        TypeKey::Geometry => {
            let bytes = raw.as_bytes()?;
            if bytes.is_empty() {
                Value::Null
            } else {
                Value::Geometry(wkb::decode(bytes)?)
            }
        }

        TypeKey::Json => Value::Json(serde_json::from_slice(raw.as_bytes()?)?),

        // the integer and floating kinds are matched by the guards above
        _ => return Err(format!("no base parser for {key}").into()),
    })
}

/// Reads a little-endian signed integer of 1, 2, 3, 4 or 8 bytes.
fn le_integer(bytes: &[u8]) -> Result<i64, BoxDynError> {
    match bytes.len() {
        1 => Ok(i64::from(i8::from_le_bytes([bytes[0]]))),
        n @ (2 | 3 | 4 | 8) => Ok(LittleEndian::read_int(bytes, n)),
        len => Err(format!("{len} bytes cannot hold a binary integer").into()),
    }
}

pub fn parse_time(text: &str) -> Result<NaiveTime, BoxDynError> {
    Ok(NaiveTime::parse_from_str(text.trim(), "%H:%M:%S%.f")?)
}

pub fn parse_date(text: &str) -> Result<NaiveDate, BoxDynError> {
    Ok(NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")?)
}

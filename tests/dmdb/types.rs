#[macro_use]
mod common;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use ormx::dmdb::DmdbTypeInfo;
use ormx::types::{DecimalOptions, GeometryOptions, NumberOptions, SizeVariant};
use ormx::{DataType, Error, Operation, RawValueRef, TypeKey, Value, WireValue};
use serde_json::json;

test_declare!(declare_decimal(
    DataType::decimal(DecimalOptions::new()) => "DECIMAL",
    DataType::decimal(DecimalOptions::new().unsigned().zerofill()) => "DECIMAL UNSIGNED ZEROFILL",
    DataType::decimal(DecimalOptions::new().precision(10).scale(2).zerofill()) => "DECIMAL(10,2) ZEROFILL",
));

test_declare!(declare_date(
    DataType::date() => "DATETIME",
    DataType::Date { precision: Some(6) } => "DATETIME(6)",
    DataType::DateOnly => "DATE",
    DataType::Time => "TIME",
));

test_declare!(declare_uuid(
    DataType::Uuid => "CHAR(36) BINARY",
));

test_declare!(declare_enum(
    DataType::enumeration(["small", "medium", "large"]) => "ENUM('small', 'medium', 'large')",
    DataType::enumeration(["o'clock"]) => "ENUM('o\\'clock')",
));

test_declare!(declare_geometry(
    DataType::geometry(GeometryOptions::new()) => "GEOMETRY",
    DataType::geometry(GeometryOptions::new().subtype("POINT")) => "POINT",
    DataType::geometry(GeometryOptions::new().subtype("LINESTRING").srid(4326)) => "LINESTRING",
    DataType::geometry(GeometryOptions::new().subtype("POLYGON")) => "POLYGON",
));

test_declare!(declare_base_types(
    DataType::string() => "VARCHAR(255)",
    DataType::Char { length: Some(2), binary: false } => "CHAR(2)",
    DataType::Text(Some(SizeVariant::Long)) => "LONGTEXT",
    DataType::integer() => "INTEGER",
    DataType::BigInt(NumberOptions::new().length(20).unsigned()) => "BIGINT(20) UNSIGNED",
    DataType::Boolean => "TINYINT(1)",
    DataType::Blob(Some(SizeVariant::Tiny)) => "TINYBLOB",
    DataType::Json => "JSON",
));

test_parse!(parse_integers("LONG",
    "42" == Value::Int(42),
    "-2147483648" == Value::Int(i64::from(i32::MIN)),
));

test_parse!(parse_shared_tiny("TINY",
    "1" == Value::Int(1),
    "127" == Value::Int(127),
));

test_parse!(parse_newdecimal("NEWDECIMAL",
    "12345.6789" == Value::Decimal(BigDecimal::from_str("12345.6789").unwrap()),
));

test_parse!(parse_strings("VAR_STRING",
    "hello" == Value::Text("hello".into()),
    "" == Value::Text(String::new()),
));

test_parse!(parse_time("TIME",
    "13:45:10" == Value::Time(NaiveTime::from_hms_opt(13, 45, 10).unwrap()),
));

test_parse!(parse_date_only("DATE",
    "2024-02-29" == Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
));

test_parse!(parse_json("JSON",
    r#"{"tags":["a","b"]}"# == Value::Json(json!({ "tags": ["a", "b"] })),
));

#[test]
fn it_parses_datetime_in_utc() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("UTC");

    let value = dialect.parse(&RawValueRef::text("DATETIME", "2024-03-01 12:00:00"))?;
    assert_eq!(
        value,
        Value::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    );

    Ok(())
}

#[test]
fn it_parses_datetime_in_a_named_zone() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("Asia/Shanghai");

    let value = dialect.parse(&RawValueRef::text("DATETIME", "2024-03-01 12:00:00"))?;
    assert_eq!(
        value,
        Value::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 4, 0, 0).unwrap())
    );

    Ok(())
}

#[test]
fn it_treats_unknown_zones_as_offset_suffixes() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+05:30");

    let value = dialect.parse(&RawValueRef::text("DATETIME", "2024-03-01 12:00:00"))?;
    assert_eq!(
        value,
        Value::DateTime(Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap())
    );

    Ok(())
}

#[test]
fn it_round_trips_datetimes_through_the_session_timezone() -> anyhow::Result<()> {
    for timezone in ["UTC", "+08:00", "Europe/Berlin", "Z", "+09", "utc"] {
        let (_session, dialect) = common::dialect(timezone);
        let instant = Value::DateTime(Utc.with_ymd_and_hms(2023, 7, 14, 9, 30, 15).unwrap());

        let WireValue::Text(text) = dialect.serialize(&DataType::date(), &instant, Operation::Insert)?
        else {
            anyhow::bail!("expected text");
        };

        assert_eq!(dialect.parse(&RawValueRef::text("DATETIME", &text))?, instant);
    }

    Ok(())
}

#[test]
fn it_round_trips_scalars() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let cases = [
        (DataType::integer(), "LONG", Value::Int(-17)),
        (DataType::BigInt(NumberOptions::new()), "LONGLONG", Value::Int(i64::MAX)),
        (DataType::Double(NumberOptions::new()), "DOUBLE", Value::Double(2.5)),
        (DataType::string(), "VAR_STRING", Value::Text("ormx".into())),
        (
            DataType::decimal(DecimalOptions::new()),
            "NEWDECIMAL",
            Value::Decimal(BigDecimal::from_str("-0.125")?),
        ),
        (DataType::Json, "JSON", Value::Json(json!({ "k": [1, null, true] }))),
    ];

    for (data_type, tag, value) in cases {
        let wire = dialect.serialize(&data_type, &value, Operation::Insert)?;
        let text = wire.to_text().expect("text wire value");

        assert_eq!(
            dialect.parse_as(data_type.key(), &RawValueRef::text(tag, &text))?,
            value,
            "{data_type:?}"
        );
    }

    Ok(())
}

#[test]
fn it_parses_shared_tags_as_the_known_type() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    assert_eq!(
        dialect.parse_as(TypeKey::Boolean, &RawValueRef::text("TINY", "1"))?,
        Value::Bool(true)
    );
    assert_eq!(
        dialect.parse_as(TypeKey::Blob, &RawValueRef::binary("BLOB", &[0xde, 0xad]))?,
        Value::Bytes(vec![0xde, 0xad])
    );
    assert_eq!(
        dialect.parse(&RawValueRef::binary("LONGBLOB", &[1, 2, 3]))?,
        Value::Bytes(vec![1, 2, 3])
    );

    Ok(())
}

#[test]
fn it_parses_binary_protocol_values_by_type_code() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let long = DmdbTypeInfo::new(0x03);
    assert_eq!(
        dialect.parse(&long.raw_binary(&(-5i32).to_le_bytes()))?,
        Value::Int(-5)
    );

    let double = DmdbTypeInfo::new(0x05);
    assert_eq!(
        dialect.parse(&double.raw_binary(&1.5f64.to_le_bytes()))?,
        Value::Double(1.5)
    );

    assert_eq!(dialect.parse(&DmdbTypeInfo::new(0xf6).raw_null())?, Value::Null);

    Ok(())
}

#[test]
fn it_fails_closed_on_unknown_tags() {
    let (_session, dialect) = common::dialect("+00:00");

    let err = dialect
        .parse(&DmdbTypeInfo::new(0x42).raw_text("1"))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { ref type_tag, .. } if type_tag == "UNKNOWN"));

    // YEAR is a real type code, but no logical type reads it
    let err = dialect.parse(&RawValueRef::text("YEAR", "2024")).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn it_refuses_to_parse_unsupported_types() {
    let (_session, dialect) = common::dialect("+00:00");

    for key in [TypeKey::Uuid, TypeKey::Enum] {
        let err = dialect
            .parse_as(key, &RawValueRef::text("STRING", "x"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { dialect: "dmdb", .. }));
    }
}

#[test]
fn it_serializes_json_by_operation() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");
    let raw = Value::Text(r#"{"a":1}"#.into());

    assert_eq!(
        dialect.serialize(&DataType::Json, &raw, Operation::Where)?,
        WireValue::Text(r#"{"a":1}"#.into())
    );
    assert_eq!(
        dialect.serialize(&DataType::Json, &raw, Operation::Insert)?,
        WireValue::Text(r#""{\"a\":1}""#.into())
    );
    assert_eq!(
        dialect.serialize(&DataType::Json, &Value::Json(json!([1, 2])), Operation::Update)?,
        WireValue::Text("[1,2]".into())
    );

    Ok(())
}

#[test]
fn it_serializes_enums_only_from_their_values() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");
    let size = DataType::enumeration(["small", "large"]);

    assert_eq!(
        dialect.serialize(&size, &Value::Text("large".into()), Operation::Insert)?,
        WireValue::Text("large".into())
    );
    assert!(matches!(
        dialect.serialize(&size, &Value::Text("huge".into()), Operation::Insert),
        Err(Error::Encode { key: TypeKey::Enum, .. })
    ));

    Ok(())
}

#[test]
fn it_serializes_null_for_every_type() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    for key in TypeKey::ALL {
        assert_eq!(
            dialect.serialize(&DataType::from(key), &Value::Null, Operation::Insert)?,
            WireValue::Null,
            "{key}"
        );
    }

    Ok(())
}

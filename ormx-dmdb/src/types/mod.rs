//! Conversions between native values and **DMDB** types.
//!
//! # Types
//!
//! | Logical type | DMDB raw type tag(s)              | DDL                                   |
//! |--------------|-----------------------------------|---------------------------------------|
//! | `DATE`       | DATETIME                          | `DATETIME`, `DATETIME(n)`             |
//! | `STRING`     | VAR_STRING                        | `VARCHAR(n)`                          |
//! | `CHAR`       | STRING                            | `CHAR(n)`                             |
//! | `TEXT`       | BLOB                              | `TEXT`, `TINYTEXT`, ...               |
//! | `TINYINT`    | TINY                              | `TINYINT`                             |
//! | `SMALLINT`   | SHORT                             | `SMALLINT`                            |
//! | `MEDIUMINT`  | INT24                             | `MEDIUMINT`                           |
//! | `INTEGER`    | LONG                              | `INTEGER`                             |
//! | `BIGINT`     | LONGLONG                          | `BIGINT`                              |
//! | `FLOAT`      | FLOAT                             | `FLOAT`                               |
//! | `TIME`       | TIME                              | `TIME`                                |
//! | `DATEONLY`   | DATE                              | `DATE`                                |
//! | `BOOLEAN`    | TINY                              | `TINYINT(1)`                          |
//! | `BLOB`       | TINYBLOB, BLOB, LONGBLOB          | `BLOB`, `TINYBLOB`, ...               |
//! | `DECIMAL`    | NEWDECIMAL                        | `DECIMAL(p,s) UNSIGNED ZEROFILL`      |
//! | `UUID`       | (unsupported)                     | `CHAR(36) BINARY`                     |
//! | `ENUM`       | (unsupported)                     | `ENUM('a', 'b')`                      |
//! | `REAL`       | DOUBLE                            | `REAL`                                |
//! | `DOUBLE`     | DOUBLE                            | `DOUBLE PRECISION`                    |
//! | `GEOMETRY`   | GEOMETRY                          | `POINT`, `LINESTRING`, `POLYGON`, `GEOMETRY` |
//! | `JSON`       | JSON                              | `JSON`                                |
//!
//! # Shared tags
//!
//! `TINY` is listed by both `TINYINT` and `BOOLEAN`, `DOUBLE` by both `REAL` and
//! `DOUBLE`. Parsing by tag alone resolves to the first of each pair; use
//! [`TypeRegistry::parse_as`] when the column's logical type is known.
//!
//! `BLOB` is listed by both `TEXT` and `BLOB` and resolves to `TEXT`.
//!
//! # Nullable
//!
//! A raw value without data always parses to [`Value::Null`](ormx_core::Value::Null),
//! and [`Value::Null`](ormx_core::Value::Null) always serializes to
//! [`WireValue::Null`](ormx_core::WireValue::Null).

use ormx_core::{RawTypes, TypeBinding, TypeKey, TypeRegistry};

use crate::dialect::NAME;

mod date;
mod decimal;
mod enums;
mod geometry;
mod json;
mod uuid;

/// Builds the DMDB type registry.
///
/// Bindings are registered in a fixed order, which decides how shared tags
/// resolve.
pub fn registry() -> TypeRegistry {
    TypeRegistry::builder(NAME)
        .bind(date::binding())
        .bind(supported(TypeKey::String, &["VAR_STRING"]))
        .bind(supported(TypeKey::Char, &["STRING"]))
        .bind(supported(TypeKey::Text, &["BLOB"]))
        .bind(supported(TypeKey::TinyInt, &["TINY"]))
        .bind(supported(TypeKey::SmallInt, &["SHORT"]))
        .bind(supported(TypeKey::MediumInt, &["INT24"]))
        .bind(supported(TypeKey::Integer, &["LONG"]))
        .bind(supported(TypeKey::BigInt, &["LONGLONG"]))
        .bind(supported(TypeKey::Float, &["FLOAT"]))
        .bind(supported(TypeKey::Time, &["TIME"]))
        .bind(date::date_only_binding())
        .bind(supported(TypeKey::Boolean, &["TINY"]))
        .bind(supported(TypeKey::Blob, &["TINYBLOB", "BLOB", "LONGBLOB"]))
        .bind(decimal::binding())
        .bind(uuid::binding())
        .bind(enums::binding())
        .bind(supported(TypeKey::Real, &["DOUBLE"]))
        .bind(supported(TypeKey::Double, &["DOUBLE"]))
        .bind(geometry::binding())
        .bind(json::binding())
        .build()
}

const fn supported(key: TypeKey, tags: &'static [&'static str]) -> TypeBinding {
    TypeBinding::new(key, RawTypes::Supported(tags))
}

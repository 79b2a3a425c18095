use std::fmt::{self, Display, Formatter};

use ormx_core::RawValueRef;

/// Type information for a DMDB column, as reported by the driver.
///
/// The driver identifies a column's physical encoding with a one-byte type code
/// (the MySQL C API buffer types). The registry works with the code's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmdbTypeInfo {
    pub(crate) code: u8,
}

impl DmdbTypeInfo {
    pub const fn new(code: u8) -> Self {
        Self { code }
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    /// The raw type tag for this column, such as `"NEWDECIMAL"`.
    pub fn name(&self) -> &'static str {
        type_name_for_code(self.code)
    }

    pub fn is_unknown(&self) -> bool {
        self.name() == "UNKNOWN"
    }

    /// Wraps a text protocol value of this type.
    pub fn raw_text<'r>(&self, text: &'r str) -> RawValueRef<'r> {
        RawValueRef::text(self.name(), text)
    }

    /// Wraps a binary protocol value of this type.
    pub fn raw_binary<'r>(&self, bytes: &'r [u8]) -> RawValueRef<'r> {
        RawValueRef::binary(self.name(), bytes)
    }

    pub fn raw_null(&self) -> RawValueRef<'static> {
        RawValueRef::null(self.name())
    }
}

impl Display for DmdbTypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Map a driver type code to its raw type tag.
pub fn type_name_for_code(code: u8) -> &'static str {
    match code {
        0x00 => "DECIMAL",
        0x01 => "TINY",
        0x02 => "SHORT",
        0x03 => "LONG",
        0x04 => "FLOAT",
        0x05 => "DOUBLE",
        0x06 => "NULL",
        0x07 => "TIMESTAMP",
        0x08 => "LONGLONG",
        0x09 => "INT24",
        0x0a => "DATE",
        0x0b => "TIME",
        0x0c => "DATETIME",
        0x0d => "YEAR",
        0x0e => "NEWDATE",
        0x0f => "VARCHAR",
        0x10 => "BIT",
        0xf5 => "JSON",
        0xf6 => "NEWDECIMAL",
        0xf7 => "ENUM",
        0xf8 => "SET",
        0xf9 => "TINYBLOB",
        0xfa => "MEDIUMBLOB",
        0xfb => "LONGBLOB",
        0xfc => "BLOB",
        0xfd => "VAR_STRING",
        0xfe => "STRING",
        0xff => "GEOMETRY",
        _ => "UNKNOWN",
    }
}

#[test]
fn it_names_type_codes() {
    assert_eq!(type_name_for_code(0xf6), "NEWDECIMAL");
    assert_eq!(type_name_for_code(0xff), "GEOMETRY");
    assert_eq!(type_name_for_code(0x01), "TINY");
    assert_eq!(type_name_for_code(0x42), "UNKNOWN");
    assert!(DmdbTypeInfo::new(0x42).is_unknown());
}

#[test]
fn it_builds_raw_values_with_the_tag() {
    let info = DmdbTypeInfo::new(0x0c);
    let raw = info.raw_text("2024-03-01 12:00:00");

    assert_eq!(raw.type_tag(), "DATETIME");
    assert!(!raw.is_null());
    assert!(info.raw_null().is_null());
    assert_eq!(info.to_string(), "DATETIME");
}

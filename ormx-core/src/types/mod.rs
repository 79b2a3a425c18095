//! Logical column types known to the ORM core.
//!
//! # Types
//!
//! | Logical type  | Modifiers                                   | Native [`Value`](crate::Value)   |
//! |---------------|---------------------------------------------|----------------------------------|
//! | `STRING`      | length, binary                              | `Text`                           |
//! | `CHAR`        | length, binary                              | `Text`                           |
//! | `TEXT`        | tiny / medium / long                        | `Text`                           |
//! | `TINYINT` ... `BIGINT` | length, unsigned, zerofill         | `Int`, `UInt`                    |
//! | `FLOAT`, `REAL`, `DOUBLE` | length, decimals, unsigned, zerofill | `Double`                  |
//! | `DECIMAL`     | precision, scale, unsigned, zerofill        | `Decimal`                        |
//! | `BOOLEAN`     |                                             | `Bool`                           |
//! | `TIME`        |                                             | `Time`                           |
//! | `DATE`        | fractional precision                        | `DateTime`                       |
//! | `DATEONLY`    |                                             | `Date`                           |
//! | `UUID`        |                                             | `Uuid`                           |
//! | `ENUM`        | values                                      | `Text`                           |
//! | `BLOB`        | tiny / medium / long                        | `Bytes`                          |
//! | `GEOMETRY`    | subtype, srid                               | `Geometry` (GeoJSON)             |
//! | `JSON`        |                                             | `Json`                           |

use std::fmt::{self, Display, Formatter};

pub mod base;

/// Identifies a logical column kind, independent of any database's wire format.
///
/// This is the tag a [`TypeRegistry`](crate::TypeRegistry) is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKey {
    String,
    Char,
    Text,
    TinyInt,
    SmallInt,
    MediumInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Decimal,
    Boolean,
    Time,
    Date,
    DateOnly,
    Uuid,
    Enum,
    Blob,
    Geometry,
    Json,
}

impl TypeKey {
    pub const ALL: [TypeKey; 21] = [
        TypeKey::String,
        TypeKey::Char,
        TypeKey::Text,
        TypeKey::TinyInt,
        TypeKey::SmallInt,
        TypeKey::MediumInt,
        TypeKey::Integer,
        TypeKey::BigInt,
        TypeKey::Float,
        TypeKey::Real,
        TypeKey::Double,
        TypeKey::Decimal,
        TypeKey::Boolean,
        TypeKey::Time,
        TypeKey::Date,
        TypeKey::DateOnly,
        TypeKey::Uuid,
        TypeKey::Enum,
        TypeKey::Blob,
        TypeKey::Geometry,
        TypeKey::Json,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TypeKey::String => "STRING",
            TypeKey::Char => "CHAR",
            TypeKey::Text => "TEXT",
            TypeKey::TinyInt => "TINYINT",
            TypeKey::SmallInt => "SMALLINT",
            TypeKey::MediumInt => "MEDIUMINT",
            TypeKey::Integer => "INTEGER",
            TypeKey::BigInt => "BIGINT",
            TypeKey::Float => "FLOAT",
            TypeKey::Real => "REAL",
            TypeKey::Double => "DOUBLE PRECISION",
            TypeKey::Decimal => "DECIMAL",
            TypeKey::Boolean => "BOOLEAN",
            TypeKey::Time => "TIME",
            TypeKey::Date => "DATE",
            TypeKey::DateOnly => "DATEONLY",
            TypeKey::Uuid => "UUID",
            TypeKey::Enum => "ENUM",
            TypeKey::Blob => "BLOB",
            TypeKey::Geometry => "GEOMETRY",
            TypeKey::Json => "JSON",
        }
    }

    /// Integer kinds, whose values travel as [`Value::Int`](crate::Value::Int).
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            TypeKey::TinyInt
                | TypeKey::SmallInt
                | TypeKey::MediumInt
                | TypeKey::Integer
                | TypeKey::BigInt
        )
    }

    pub const fn is_floating(&self) -> bool {
        matches!(self, TypeKey::Float | TypeKey::Real | TypeKey::Double)
    }

    pub const fn is_textual(&self) -> bool {
        matches!(self, TypeKey::String | TypeKey::Char | TypeKey::Text)
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Modifiers shared by the integer and floating point kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NumberOptions {
    pub length: Option<u32>,
    pub decimals: Option<u32>,
    pub unsigned: bool,
    pub zerofill: bool,
}

impl NumberOptions {
    pub const fn new() -> Self {
        Self {
            length: None,
            decimals: None,
            unsigned: false,
            zerofill: false,
        }
    }

    /// Sets the display width.
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the number of digits after the decimal point. Only rendered when a
    /// length is also set.
    pub const fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub const fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }
}

/// Modifiers for `DECIMAL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DecimalOptions {
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub unsigned: bool,
    pub zerofill: bool,
}

impl DecimalOptions {
    pub const fn new() -> Self {
        Self {
            precision: None,
            scale: None,
            unsigned: false,
            zerofill: false,
        }
    }

    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub const fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub const fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub const fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }
}

/// Size variants of `TEXT` and `BLOB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeVariant {
    Tiny,
    Medium,
    Long,
}

impl SizeVariant {
    pub(crate) const fn prefix(&self) -> &'static str {
        match self {
            SizeVariant::Tiny => "TINY",
            SizeVariant::Medium => "MEDIUM",
            SizeVariant::Long => "LONG",
        }
    }
}

/// Modifiers for `GEOMETRY`.
///
/// Whether a given `subtype` is acceptable is decided by the dialect when the
/// type is constructed (see [`TypeRegistry::construct`](crate::TypeRegistry::construct)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GeometryOptions {
    pub subtype: Option<String>,
    pub srid: Option<u32>,
}

impl GeometryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }
}

/// A logical column type together with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    String { length: Option<u32>, binary: bool },
    Char { length: Option<u32>, binary: bool },
    Text(Option<SizeVariant>),
    TinyInt(NumberOptions),
    SmallInt(NumberOptions),
    MediumInt(NumberOptions),
    Integer(NumberOptions),
    BigInt(NumberOptions),
    Float(NumberOptions),
    Real(NumberOptions),
    Double(NumberOptions),
    Decimal(DecimalOptions),
    Boolean,
    Time,
    /// Date and time, with optional fractional second precision.
    Date { precision: Option<u32> },
    /// Date without time.
    DateOnly,
    Uuid,
    Enum { values: Vec<String> },
    Blob(Option<SizeVariant>),
    Geometry(GeometryOptions),
    Json,
}

impl DataType {
    /// `VARCHAR(255)`.
    pub const fn string() -> Self {
        DataType::String {
            length: None,
            binary: false,
        }
    }

    pub const fn integer() -> Self {
        DataType::Integer(NumberOptions::new())
    }

    pub const fn decimal(options: DecimalOptions) -> Self {
        DataType::Decimal(options)
    }

    pub const fn date() -> Self {
        DataType::Date { precision: None }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataType::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn geometry(options: GeometryOptions) -> Self {
        DataType::Geometry(options)
    }

    /// Returns the tag this type is dispatched on.
    pub const fn key(&self) -> TypeKey {
        match self {
            DataType::String { .. } => TypeKey::String,
            DataType::Char { .. } => TypeKey::Char,
            DataType::Text(_) => TypeKey::Text,
            DataType::TinyInt(_) => TypeKey::TinyInt,
            DataType::SmallInt(_) => TypeKey::SmallInt,
            DataType::MediumInt(_) => TypeKey::MediumInt,
            DataType::Integer(_) => TypeKey::Integer,
            DataType::BigInt(_) => TypeKey::BigInt,
            DataType::Float(_) => TypeKey::Float,
            DataType::Real(_) => TypeKey::Real,
            DataType::Double(_) => TypeKey::Double,
            DataType::Decimal(_) => TypeKey::Decimal,
            DataType::Boolean => TypeKey::Boolean,
            DataType::Time => TypeKey::Time,
            DataType::Date { .. } => TypeKey::Date,
            DataType::DateOnly => TypeKey::DateOnly,
            DataType::Uuid => TypeKey::Uuid,
            DataType::Enum { .. } => TypeKey::Enum,
            DataType::Blob(_) => TypeKey::Blob,
            DataType::Geometry(_) => TypeKey::Geometry,
            DataType::Json => TypeKey::Json,
        }
    }
}

impl From<TypeKey> for DataType {
    /// The type with no modifiers set.
    fn from(key: TypeKey) -> Self {
        match key {
            TypeKey::String => DataType::string(),
            TypeKey::Char => DataType::Char {
                length: None,
                binary: false,
            },
            TypeKey::Text => DataType::Text(None),
            TypeKey::TinyInt => DataType::TinyInt(NumberOptions::new()),
            TypeKey::SmallInt => DataType::SmallInt(NumberOptions::new()),
            TypeKey::MediumInt => DataType::MediumInt(NumberOptions::new()),
            TypeKey::Integer => DataType::integer(),
            TypeKey::BigInt => DataType::BigInt(NumberOptions::new()),
            TypeKey::Float => DataType::Float(NumberOptions::new()),
            TypeKey::Real => DataType::Real(NumberOptions::new()),
            TypeKey::Double => DataType::Double(NumberOptions::new()),
            TypeKey::Decimal => DataType::decimal(DecimalOptions::new()),
            TypeKey::Boolean => DataType::Boolean,
            TypeKey::Time => DataType::Time,
            TypeKey::Date => DataType::date(),
            TypeKey::DateOnly => DataType::DateOnly,
            TypeKey::Uuid => DataType::Uuid,
            TypeKey::Enum => DataType::Enum { values: Vec::new() },
            TypeKey::Blob => DataType::Blob(None),
            TypeKey::Geometry => DataType::geometry(GeometryOptions::new()),
            TypeKey::Json => DataType::Json,
        }
    }
}

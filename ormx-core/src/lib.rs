//! Core of ormx, the dialect plugin layer.
//!
//! This crate holds everything a dialect needs that is not specific to any one
//! database: the closed set of logical types, the per-dialect [`TypeRegistry`],
//! the native/wire/raw value model, the capability table and the traits the ORM
//! core implements for its collaborators.
//!
//! Dialect crates (for example `ormx-dmdb`) build a registry out of
//! [`TypeBinding`]s and expose a [`Dialect`] descriptor.
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]

pub mod dialect;
pub mod error;
pub mod escape;
pub mod geo;
pub mod options;
pub mod registry;
pub mod supports;
pub mod timezone;
pub mod types;
pub mod value;

pub use dialect::{
    ConnectionManager, Dialect, DialectContext, QueryGenerator, QueryInterface, Session,
};
pub use error::{BoxDynError, Error, Result};
pub use escape::{escape_string, Escape};
pub use options::{Operation, ParseOptions, SerializeOptions, SessionOptions};
pub use registry::{ColumnType, RawTypes, TypeBinding, TypeRegistry, TypeRegistryBuilder};
pub use supports::{
    AutoIncrementSupports, Capability, ConstraintSupports, DialectSupports, IndexSupports,
    IndexUsing, InsertSupports,
};
pub use timezone::Timezone;
pub use types::{
    DataType, DecimalOptions, GeometryOptions, NumberOptions, SizeVariant, TypeKey,
};
pub use value::{RawValueRef, Value, ValueFormat, WireValue};

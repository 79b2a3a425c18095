#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub use ormx_core::dialect::{
    ConnectionManager, Dialect, DialectContext, QueryGenerator, QueryInterface, Session,
};
pub use ormx_core::error::{self, BoxDynError, Error, Result};
pub use ormx_core::escape::{escape_string, Escape};
pub use ormx_core::options::{Operation, ParseOptions, SerializeOptions, SessionOptions};
pub use ormx_core::registry::{
    ColumnType, RawTypes, TypeBinding, TypeRegistry, TypeRegistryBuilder,
};
pub use ormx_core::supports::{Capability, DialectSupports};
pub use ormx_core::timezone::Timezone;
pub use ormx_core::types::{DataType, TypeKey};
pub use ormx_core::value::{RawValueRef, Value, ValueFormat, WireValue};
pub use ormx_core::{geo, supports, types};

#[cfg(feature = "dmdb")]
#[cfg_attr(docsrs, doc(cfg(feature = "dmdb")))]
#[doc(inline)]
pub use ormx_dmdb as dmdb;

/// Convenience re-export of common traits.
pub mod prelude {
    pub use super::Dialect;
    pub use super::Escape;
    pub use super::QueryGenerator;
    pub use super::Session;
}

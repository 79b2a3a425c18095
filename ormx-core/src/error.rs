//! Types for working with errors produced by ormx.

use std::error::Error as StdError;
use std::result::Result as StdResult;

use crate::types::TypeKey;

/// A specialized `Result` type for ormx.
pub type Result<T, E = Error> = StdResult<T, E>;

/// A type-erased error, used to carry the underlying cause of an [`Error`].
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// Represents all the ways a dialect operation can fail.
///
/// Every operation in this crate is a pure function of its inputs, so none of
/// these errors are transient. Retrying with the same input yields the same error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid static configuration, such as a geometry subtype outside the
    /// dialect's allow-list or a timezone that is neither a zone name nor an offset.
    #[error("error with configuration: {0}")]
    Configuration(#[source] BoxDynError),

    /// The logical type has no representation in this dialect.
    #[error("type {key} is not supported by the {dialect} dialect")]
    UnsupportedType { key: TypeKey, dialect: &'static str },

    /// Raw driver bytes did not match the encoding expected for their type tag.
    #[error("error parsing value of type {type_tag}: {source}")]
    Parse {
        type_tag: String,
        #[source]
        source: BoxDynError,
    },

    /// A native value could not be serialized for the logical type.
    #[error("error encoding value for {key}: {source}")]
    Encode {
        key: TypeKey,
        #[source]
        source: BoxDynError,
    },
}

impl Error {
    #[doc(hidden)]
    #[inline]
    pub fn config(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Configuration(err.into())
    }

    #[doc(hidden)]
    #[inline]
    pub fn parse(type_tag: impl Into<String>, source: impl Into<BoxDynError>) -> Self {
        Error::Parse {
            type_tag: type_tag.into(),
            source: source.into(),
        }
    }

    #[doc(hidden)]
    #[inline]
    pub fn encode(key: TypeKey, source: impl Into<BoxDynError>) -> Self {
        Error::Encode {
            key,
            source: source.into(),
        }
    }

    /// Returns `true` if this is a [`Configuration`](Error::Configuration) error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

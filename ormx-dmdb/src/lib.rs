//! **DMDB** dialect.
//!
//! DMDB reports column types with the MySQL C API type codes, so raw type tags
//! here are the names of those codes (`NEWDECIMAL`, `VAR_STRING`, `GEOMETRY`...).
//! See [`types`] for how each logical type maps onto them.
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]

mod dialect;
mod error;
mod type_info;
pub mod types;

pub use dialect::{supports, DmdbDialect, DEFAULT_VERSION, NAME, TICK_CHAR};
pub use error::{UnsupportedGeometrySubtype, SUPPORTED_GEOMETRY_TYPES};
pub use type_info::{type_name_for_code, DmdbTypeInfo};
pub use types::registry;

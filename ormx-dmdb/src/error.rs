pub(crate) use ormx_core::error::*;

/// The geometry subtypes DMDB columns can be declared with.
pub const SUPPORTED_GEOMETRY_TYPES: [&str; 3] = ["POINT", "LINESTRING", "POLYGON"];

/// A `GEOMETRY` column was declared with a subtype DMDB does not support.
///
/// Surfaces as [`Error::Configuration`] from type construction.
#[derive(Debug, thiserror::Error)]
#[error("unsupported geometry type {subtype:?}; supported geometry types are: POINT, LINESTRING, POLYGON")]
pub struct UnsupportedGeometrySubtype {
    pub subtype: String,
}

use byteorder::{ByteOrder, LittleEndian};
use ormx_core::geo::{self, wkb};
use ormx_core::{
    DataType, Escape, ParseOptions, RawTypes, RawValueRef, SerializeOptions, TypeBinding, TypeKey,
    Value, WireValue,
};

use crate::error::{BoxDynError, Error, UnsupportedGeometrySubtype, SUPPORTED_GEOMETRY_TYPES};

/// Length of the SRID the server stores in front of the WKB payload.
const SRID_LEN: usize = 4;

pub(super) const fn binding() -> TypeBinding {
    TypeBinding::new(TypeKey::Geometry, RawTypes::Supported(&["GEOMETRY"]))
        .with_validate(validate)
        .with_declare(declare)
        .with_serialize(serialize)
        .with_parse(parse)
}

fn subtype(data_type: &DataType) -> Option<&str> {
    match data_type {
        DataType::Geometry(options) => options.subtype.as_deref().filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn validate(data_type: &DataType) -> Result<(), Error> {
    match subtype(data_type) {
        Some(subtype)
            if !SUPPORTED_GEOMETRY_TYPES
                .iter()
                .any(|t| t.eq_ignore_ascii_case(subtype)) =>
        {
            Err(Error::config(UnsupportedGeometrySubtype {
                subtype: subtype.to_owned(),
            }))
        }
        _ => Ok(()),
    }
}

fn declare(data_type: &DataType, _: &dyn Escape) -> String {
    subtype(data_type).map_or_else(|| "GEOMETRY".to_owned(), str::to_ascii_uppercase)
}

/// Writes the SRID prefix followed by little-endian WKB.
///
/// The SRID comes from the column type, then from the GeoJSON `crs` member, and
/// is `0` otherwise.
fn serialize(
    data_type: &DataType,
    value: &Value,
    _: &SerializeOptions,
) -> Result<WireValue, Error> {
    let encode_err = |source: BoxDynError| Error::encode(TypeKey::Geometry, source);

    let parsed;
    let geojson = match value {
        Value::Geometry(v) | Value::Json(v) => v,
        Value::Text(text) => {
            parsed = serde_json::from_str(text).map_err(|e| encode_err(e.into()))?;
            &parsed
        }
        other => {
            return Err(encode_err(
                format!("cannot use a {} value as a geometry", other.kind()).into(),
            ))
        }
    };

    let srid = match data_type {
        DataType::Geometry(options) => options.srid,
        _ => None,
    }
    .or_else(|| geo::srid_of(geojson))
    .unwrap_or(0);

    let body = wkb::encode(geojson).map_err(encode_err)?;

    let mut buf = vec![0; SRID_LEN];
    LittleEndian::write_u32(&mut buf, srid);
    buf.extend_from_slice(&body);

    Ok(WireValue::Bytes(buf))
}

/// An empty payload is `NULL`: the server cannot store an empty geometry.
fn parse(_: TypeKey, raw: &RawValueRef<'_>, _: &ParseOptions) -> Result<Value, Error> {
    let bytes = raw.as_bytes()?;

    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    let body = bytes.get(SRID_LEN..).ok_or_else(|| {
        Error::parse(
            raw.type_tag(),
            format!("geometry payload of {} bytes has no SRID prefix", bytes.len()),
        )
    })?;

    wkb::decode(body)
        .map(Value::Geometry)
        .map_err(|source| Error::parse(raw.type_tag(), source))
}

#[macro_use]
mod common;

use ormx::geo::{self, wkb};
use ormx::types::GeometryOptions;
use ormx::{DataType, Error, Operation, RawValueRef, Value, WireValue};
use serde_json::json;

/// Prefixes `wkb` with the 4-byte SRID header the server stores.
fn stored(srid: u32, wkb: &[u8]) -> Vec<u8> {
    let mut bytes = srid.to_le_bytes().to_vec();
    bytes.extend_from_slice(wkb);
    bytes
}

#[test]
fn it_accepts_supported_subtypes() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    for subtype in ["POINT", "LINESTRING", "POLYGON"] {
        let column = DataType::geometry(GeometryOptions::new().subtype(subtype));
        assert_eq!(dialect.construct(&column)?.to_sql(&ormx::escape_string), subtype);
    }

    // no subtype is plain GEOMETRY
    let column = DataType::geometry(GeometryOptions::new().subtype(""));
    assert_eq!(dialect.declare(&column)?, "GEOMETRY");

    Ok(())
}

#[test]
fn it_rejects_other_subtypes_at_construction() {
    let (_session, dialect) = common::dialect("+00:00");

    for subtype in ["MULTIPOINT", "GEOMETRYCOLLECTION", "CIRCLE"] {
        let column = DataType::geometry(GeometryOptions::new().subtype(subtype));

        let err = dialect.construct(&column).unwrap_err();
        assert!(err.is_configuration(), "{subtype}: {err}");
        assert!(err.to_string().contains("POINT, LINESTRING, POLYGON"));

        assert!(dialect.declare(&column).is_err());
    }
}

#[test]
fn it_parses_empty_payloads_as_null() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    assert_eq!(dialect.parse(&RawValueRef::binary("GEOMETRY", &[]))?, Value::Null);
    assert_eq!(dialect.parse(&RawValueRef::null("GEOMETRY"))?, Value::Null);

    Ok(())
}

#[test]
fn it_discards_the_srid_header() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let point = json!({ "type": "Point", "coordinates": [30.5, -10.25] });
    let bytes = stored(4326, &wkb::encode(&point).map_err(anyhow::Error::msg)?);

    assert_eq!(
        dialect.parse(&RawValueRef::binary("GEOMETRY", &bytes))?,
        Value::Geometry(point)
    );

    Ok(())
}

#[test]
fn it_parses_polygons() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let polygon = json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]],
    });
    let bytes = stored(0, &wkb::encode(&polygon).map_err(anyhow::Error::msg)?);

    assert_eq!(
        dialect.parse(&RawValueRef::binary("GEOMETRY", &bytes))?,
        Value::Geometry(polygon)
    );

    Ok(())
}

#[test]
fn it_reports_malformed_payloads() {
    let (_session, dialect) = common::dialect("+00:00");

    // header, then a little-endian point cut off after the type code
    let bytes = stored(0, &[0x01, 0x01, 0x00, 0x00, 0x00, 0x00]);

    let err = dialect
        .parse(&RawValueRef::binary("GEOMETRY", &bytes))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { ref type_tag, .. } if type_tag == "GEOMETRY"));
}

#[test]
fn it_reports_deeply_nested_collections_as_parse_errors() {
    let (_session, dialect) = common::dialect("+00:00");

    let mut payload = Vec::new();
    for _ in 0..100_000 {
        payload.push(0x01);
        payload.extend_from_slice(&7u32.to_le_bytes());
        payload.extend_from_slice(&1u32.to_le_bytes());
    }
    let bytes = stored(0, &payload);

    let err = dialect
        .parse(&RawValueRef::binary("GEOMETRY", &bytes))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { ref type_tag, .. } if type_tag == "GEOMETRY"));
}

#[test]
fn it_reports_trailing_bytes_as_parse_errors() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let point = json!({ "type": "Point", "coordinates": [1.0, 2.0] });
    let mut bytes = stored(0, &wkb::encode(&point).map_err(anyhow::Error::msg)?);
    bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let err = dialect
        .parse(&RawValueRef::binary("GEOMETRY", &bytes))
        .unwrap_err();
    assert!(matches!(err, Error::Parse { ref type_tag, .. } if type_tag == "GEOMETRY"));

    Ok(())
}

#[test]
fn it_serializes_with_the_header_but_does_not_round_trip_the_crs() -> anyhow::Result<()> {
    let (_session, dialect) = common::dialect("+00:00");

    let line = json!({
        "type": "LineString",
        "coordinates": [[1.0, 1.0], [2.0, 3.0]],
        "crs": geo::short_crs(4326),
    });
    let column = DataType::geometry(GeometryOptions::new().subtype("LINESTRING"));

    let WireValue::Bytes(bytes) =
        dialect.serialize(&column, &Value::Geometry(line.clone()), Operation::Insert)?
    else {
        anyhow::bail!("expected bytes");
    };
    assert_eq!(&bytes[..4], &4326u32.to_le_bytes());

    // the header is discarded on the way back, and with it the SRID
    let Value::Geometry(parsed) = dialect.parse(&RawValueRef::binary("GEOMETRY", &bytes))? else {
        anyhow::bail!("expected a geometry");
    };
    assert_eq!(parsed["coordinates"], line["coordinates"]);
    assert_eq!(parsed.get("crs"), None);

    Ok(())
}

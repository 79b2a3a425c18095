//! Geometry encodings.
//!
//! Geometries are exchanged with application code as GeoJSON objects
//! ([`serde_json::Value`]) and with the database as well-known binary (WKB).

pub mod wkb;

/// Builds the short-form GeoJSON `crs` member for an SRID (`EPSG:<srid>`).
pub fn short_crs(srid: u32) -> serde_json::Value {
    serde_json::json!({
        "type": "name",
        "properties": { "name": format!("EPSG:{srid}") }
    })
}

/// Reads the SRID out of a GeoJSON `crs` member in the `EPSG:<srid>` form, if any.
///
/// Both the short (`EPSG:4326`) and URN (`urn:ogc:def:crs:EPSG::4326`) names are
/// understood.
pub fn srid_of(geojson: &serde_json::Value) -> Option<u32> {
    let name = geojson
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;

    let (_, code) = name.rsplit_once(':')?;
    code.parse().ok()
}

#[test]
fn it_reads_back_short_crs() {
    let geojson = serde_json::json!({
        "type": "Point",
        "coordinates": [1.0, 2.0],
        "crs": short_crs(4326),
    });
    assert_eq!(srid_of(&geojson), Some(4326));
}

#[test]
fn it_reads_urn_crs() {
    let geojson = serde_json::json!({
        "type": "Point",
        "coordinates": [1.0, 2.0],
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } },
    });
    assert_eq!(srid_of(&geojson), Some(3857));
}

//! Well-known binary (WKB) to GeoJSON and back.
//!
//! Decoding accepts both byte orders, ISO dimension codes (`1001` for `POINT Z`)
//! and the EWKB flag bits, including an embedded SRID. Encoding always produces
//! little-endian ISO WKB without an SRID.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use serde_json::{json, Value as Json};

use crate::error::BoxDynError;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

const POINT: u32 = 1;
const LINE_STRING: u32 = 2;
const POLYGON: u32 = 3;
const MULTI_POINT: u32 = 4;
const MULTI_LINE_STRING: u32 = 5;
const MULTI_POLYGON: u32 = 6;
const GEOMETRY_COLLECTION: u32 = 7;

/// Deepest nesting of collections accepted when decoding or encoding.
const MAX_DEPTH: usize = 64;

/// Decodes a WKB geometry into a GeoJSON object.
///
/// An EWKB SRID is kept as a short `crs` member (`EPSG:<srid>`).
pub fn decode(bytes: &[u8]) -> Result<Json, BoxDynError> {
    let mut reader = Reader {
        cursor: Cursor::new(bytes),
        order: ByteOrder::Little,
    };

    let (mut geometry, srid) = reader.read_geometry(0)?;

    let position = usize::try_from(reader.cursor.position())?;
    if position != bytes.len() {
        return Err(format!(
            "{} trailing bytes after WKB geometry",
            bytes.len().saturating_sub(position)
        )
        .into());
    }

    if let Some(srid) = srid {
        geometry["crs"] = super::short_crs(srid);
    }

    Ok(geometry)
}

/// Encodes a GeoJSON geometry object as little-endian WKB.
pub fn encode(geojson: &Json) -> Result<Vec<u8>, BoxDynError> {
    let mut buf = Vec::new();
    write_geometry(&mut buf, geojson, 0)?;
    Ok(buf)
}

#[derive(Debug, Clone, Copy)]
enum ByteOrder {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    kind: u32,
    has_z: bool,
    has_m: bool,
    srid: Option<u32>,
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    order: ByteOrder,
}

impl Reader<'_> {
    fn read_u32(&mut self) -> Result<u32, BoxDynError> {
        Ok(match self.order {
            ByteOrder::Big => self.cursor.read_u32::<BigEndian>()?,
            ByteOrder::Little => self.cursor.read_u32::<LittleEndian>()?,
        })
    }

    fn read_f64(&mut self) -> Result<f64, BoxDynError> {
        Ok(match self.order {
            ByteOrder::Big => self.cursor.read_f64::<BigEndian>()?,
            ByteOrder::Little => self.cursor.read_f64::<LittleEndian>()?,
        })
    }

    /// Reads an element count, refusing counts the remaining input cannot hold.
    fn read_count(&mut self, min_element_size: usize) -> Result<usize, BoxDynError> {
        let count = usize::try_from(self.read_u32()?)?;
        let position = usize::try_from(self.cursor.position())?;
        let remaining = self.cursor.get_ref().len().saturating_sub(position);

        if count.saturating_mul(min_element_size) > remaining {
            return Err(format!("WKB declares {count} elements but only {remaining} bytes remain").into());
        }

        Ok(count)
    }

    fn read_header(&mut self) -> Result<Header, BoxDynError> {
        self.order = match self.cursor.read_u8()? {
            0 => ByteOrder::Big,
            1 => ByteOrder::Little,
            other => return Err(format!("invalid WKB byte order marker {other}").into()),
        };

        let code = self.read_u32()?;
        let flags = code & (EWKB_Z | EWKB_M | EWKB_SRID);
        let iso = code & !(EWKB_Z | EWKB_M | EWKB_SRID);
        let (kind, iso_dims) = (iso % 1000, iso / 1000);

        let srid = if flags & EWKB_SRID != 0 {
            Some(self.read_u32()?)
        } else {
            None
        };

        Ok(Header {
            kind,
            has_z: flags & EWKB_Z != 0 || iso_dims == 1 || iso_dims == 3,
            has_m: flags & EWKB_M != 0 || iso_dims == 2 || iso_dims == 3,
            srid,
        })
    }

    fn read_geometry(&mut self, depth: usize) -> Result<(Json, Option<u32>), BoxDynError> {
        if depth > MAX_DEPTH {
            return Err(format!("WKB geometry nested deeper than {MAX_DEPTH} levels").into());
        }

        let header = self.read_header()?;
        let coordinate_size = 8 * (2 + usize::from(header.has_z) + usize::from(header.has_m));

        let geometry = match header.kind {
            POINT => {
                let position = self.read_position(header)?;
                json!({ "type": "Point", "coordinates": position })
            }
            LINE_STRING => {
                let positions = self.read_positions(header, coordinate_size)?;
                json!({ "type": "LineString", "coordinates": positions })
            }
            POLYGON => {
                let rings = self.read_rings(header, coordinate_size)?;
                json!({ "type": "Polygon", "coordinates": rings })
            }
            MULTI_POINT => {
                let points = self.read_members(POINT, depth)?;
                json!({ "type": "MultiPoint", "coordinates": points })
            }
            MULTI_LINE_STRING => {
                let lines = self.read_members(LINE_STRING, depth)?;
                json!({ "type": "MultiLineString", "coordinates": lines })
            }
            MULTI_POLYGON => {
                let polygons = self.read_members(POLYGON, depth)?;
                json!({ "type": "MultiPolygon", "coordinates": polygons })
            }
            GEOMETRY_COLLECTION => {
                let count = self.read_count(5)?;
                let mut geometries = Vec::with_capacity(count);
                for _ in 0..count {
                    let order = self.order;
                    let (geometry, _) = self.read_geometry(depth + 1)?;
                    self.order = order;
                    geometries.push(geometry);
                }
                json!({ "type": "GeometryCollection", "geometries": geometries })
            }
            other => return Err(format!("unsupported WKB geometry type {other}").into()),
        };

        Ok((geometry, header.srid))
    }

    /// Reads one position. M values are dropped and an all-NaN point is empty.
    fn read_position(&mut self, header: Header) -> Result<Vec<f64>, BoxDynError> {
        let x = self.read_f64()?;
        let y = self.read_f64()?;
        let z = if header.has_z {
            Some(self.read_f64()?)
        } else {
            None
        };
        if header.has_m {
            self.read_f64()?;
        }

        if x.is_nan() && y.is_nan() {
            return Ok(Vec::new());
        }

        let mut position = vec![x, y];
        position.extend(z);
        Ok(position)
    }

    fn read_positions(
        &mut self,
        header: Header,
        coordinate_size: usize,
    ) -> Result<Vec<Vec<f64>>, BoxDynError> {
        let count = self.read_count(coordinate_size)?;
        (0..count).map(|_| self.read_position(header)).collect()
    }

    fn read_rings(
        &mut self,
        header: Header,
        coordinate_size: usize,
    ) -> Result<Vec<Vec<Vec<f64>>>, BoxDynError> {
        let count = self.read_count(4)?;
        (0..count)
            .map(|_| self.read_positions(header, coordinate_size))
            .collect()
    }

    /// Reads the members of a `Multi*` geometry, returning their coordinates.
    fn read_members(&mut self, member_kind: u32, depth: usize) -> Result<Vec<Json>, BoxDynError> {
        let count = self.read_count(5)?;
        let mut members = Vec::with_capacity(count);

        for _ in 0..count {
            let order = self.order;
            let (member, _) = self.read_geometry(depth + 1)?;
            self.order = order;

            let expected = match member_kind {
                POINT => "Point",
                LINE_STRING => "LineString",
                _ => "Polygon",
            };
            if member["type"] != expected {
                return Err(format!("expected {expected} member, found {}", member["type"]).into());
            }

            members.push(member["coordinates"].clone());
        }

        Ok(members)
    }
}

fn write_geometry(buf: &mut Vec<u8>, geojson: &Json, depth: usize) -> Result<(), BoxDynError> {
    if depth > MAX_DEPTH {
        return Err(format!("GeoJSON geometry nested deeper than {MAX_DEPTH} levels").into());
    }

    let kind = geojson
        .get("type")
        .and_then(Json::as_str)
        .ok_or("GeoJSON geometry has no \"type\"")?;

    if kind == "GeometryCollection" {
        let geometries = geojson
            .get("geometries")
            .and_then(Json::as_array)
            .ok_or("GeometryCollection has no \"geometries\" array")?;
        write_header(buf, GEOMETRY_COLLECTION, false);
        write_count(buf, geometries.len())?;
        for geometry in geometries {
            write_geometry(buf, geometry, depth + 1)?;
        }
        return Ok(());
    }

    let coordinates = geojson
        .get("coordinates")
        .ok_or_else(|| format!("{kind} has no \"coordinates\""))?;
    let has_z = first_position(coordinates).is_some_and(|p| p.len() >= 3);

    match kind {
        "Point" => write_point(buf, coordinates, has_z),
        "LineString" => {
            write_header(buf, LINE_STRING, has_z);
            write_positions(buf, coordinates, has_z)
        }
        "Polygon" => {
            write_header(buf, POLYGON, has_z);
            write_rings(buf, coordinates, has_z)
        }
        "MultiPoint" => {
            let points = as_array(coordinates)?;
            write_header(buf, MULTI_POINT, has_z);
            write_count(buf, points.len())?;
            points
                .iter()
                .try_for_each(|point| write_point(buf, point, has_z))
        }
        "MultiLineString" => {
            let lines = as_array(coordinates)?;
            write_header(buf, MULTI_LINE_STRING, has_z);
            write_count(buf, lines.len())?;
            lines.iter().try_for_each(|line| {
                write_header(buf, LINE_STRING, has_z);
                write_positions(buf, line, has_z)
            })
        }
        "MultiPolygon" => {
            let polygons = as_array(coordinates)?;
            write_header(buf, MULTI_POLYGON, has_z);
            write_count(buf, polygons.len())?;
            polygons.iter().try_for_each(|polygon| {
                write_header(buf, POLYGON, has_z);
                write_rings(buf, polygon, has_z)
            })
        }
        other => Err(format!("unsupported GeoJSON geometry type {other:?}").into()),
    }
}

fn write_header(buf: &mut Vec<u8>, kind: u32, has_z: bool) {
    buf.push(1);
    let code = if has_z { kind + 1000 } else { kind };
    buf.extend_from_slice(&code.to_le_bytes());
}

fn write_count(buf: &mut Vec<u8>, count: usize) -> Result<(), BoxDynError> {
    buf.write_u32::<LittleEndian>(u32::try_from(count)?)?;
    Ok(())
}

fn write_point(buf: &mut Vec<u8>, position: &Json, has_z: bool) -> Result<(), BoxDynError> {
    write_header(buf, POINT, has_z);

    if as_array(position)?.is_empty() {
        buf.write_f64::<LittleEndian>(f64::NAN)?;
        buf.write_f64::<LittleEndian>(f64::NAN)?;
        if has_z {
            buf.write_f64::<LittleEndian>(f64::NAN)?;
        }
        return Ok(());
    }

    write_position(buf, position, has_z)
}

fn write_position(buf: &mut Vec<u8>, position: &Json, has_z: bool) -> Result<(), BoxDynError> {
    let ordinates = as_array(position)?;
    let wanted = if has_z { 3 } else { 2 };

    if ordinates.len() < wanted {
        return Err(format!("position {position} has fewer than {wanted} ordinates").into());
    }

    for ordinate in &ordinates[..wanted] {
        let ordinate = ordinate
            .as_f64()
            .ok_or_else(|| format!("ordinate {ordinate} is not a number"))?;
        buf.write_f64::<LittleEndian>(ordinate)?;
    }

    Ok(())
}

fn write_positions(buf: &mut Vec<u8>, positions: &Json, has_z: bool) -> Result<(), BoxDynError> {
    let positions = as_array(positions)?;
    write_count(buf, positions.len())?;
    positions
        .iter()
        .try_for_each(|position| write_position(buf, position, has_z))
}

fn write_rings(buf: &mut Vec<u8>, rings: &Json, has_z: bool) -> Result<(), BoxDynError> {
    let rings = as_array(rings)?;
    write_count(buf, rings.len())?;
    rings
        .iter()
        .try_for_each(|ring| write_positions(buf, ring, has_z))
}

fn as_array(value: &Json) -> Result<&Vec<Json>, BoxDynError> {
    value
        .as_array()
        .ok_or_else(|| format!("expected a coordinate array, found {value}").into())
}

/// Finds the first position (an array of numbers) nested in `coordinates`.
fn first_position(coordinates: &Json) -> Option<&Vec<Json>> {
    let array = coordinates.as_array()?;
    match array.first() {
        Some(Json::Number(_)) => Some(array),
        Some(nested) => first_position(nested),
        None => None,
    }
}

//! Route geometry decoding.
//!
//! The provider returns route geometry either as an encoded polyline string
//! (points in `lat, lng` order) or as a GeoJSON `LineString` (points already
//! in `lng, lat` order). [`decode_geometry`] turns both into a uniform
//! sequence of [`Coordinate`] values.
//!
//! # Polyline Format
//!
//! Each point is two signed deltas (latitude then longitude) relative to the
//! previous point. A delta is zig-zag encoded, split into 5-bit groups
//! little-endian, each group offset by 63 with `0x20` marking continuation.

use serde_json::Value;

use crate::error::ProviderError;
use crate::request::Coordinate;

/// Decimal digits used by the provider's polyline encoding.
pub const DEFAULT_PRECISION: u32 = 5;

const CHAR_OFFSET: u8 = 63;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const MAX_SHIFT: u32 = 60;

/// Decode a provider geometry into canonical `[lng, lat]` coordinates.
pub fn decode_geometry(geometry: &Value) -> Result<Vec<Coordinate>, ProviderError> {
    match geometry {
        Value::String(encoded) => decode_polyline(encoded, DEFAULT_PRECISION),
        Value::Object(fields) if fields.get("type").and_then(Value::as_str) == Some("LineString") => {
            match fields.get("coordinates") {
                Some(Value::Array(positions)) => line_string_coordinates(positions),
                _ => Err(ProviderError::UnknownGeometry),
            }
        }
        _ => Err(ProviderError::UnknownGeometry),
    }
}

/// Decode an encoded polyline with the given precision.
///
/// Deltas are accumulated as integers and scaled once per point, so long
/// polylines do not drift. A running total that overflows is reported as an
/// invalid polyline, and every decoded point must lie within WGS84 bounds.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, ProviderError> {
    let bytes = encoded.as_bytes();
    let factor = 10f64.powi(precision as i32);

    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = lat
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or(ProviderError::InvalidPolyline { offset: index })?;
        lng = lng
            .checked_add(next_value(bytes, &mut index)?)
            .ok_or(ProviderError::InvalidPolyline { offset: index })?;

        let point = Coordinate::new(lng as f64 / factor, lat as f64 / factor);
        if !point.is_valid() {
            return Err(ProviderError::InvalidCoordinate {
                index: points.len(),
            });
        }
        points.push(point);
    }

    Ok(points)
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, ProviderError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = match bytes.get(*index) {
            Some(&byte) if (CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) => byte,
            _ => return Err(ProviderError::InvalidPolyline { offset: *index }),
        };
        *index += 1;

        let chunk = i64::from(byte - CHAR_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
        if shift > MAX_SHIFT {
            return Err(ProviderError::InvalidPolyline { offset: *index });
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

// GeoJSON positions are already [lng, lat]; extra elements (elevation) are dropped.
fn line_string_coordinates(positions: &[Value]) -> Result<Vec<Coordinate>, ProviderError> {
    positions
        .iter()
        .enumerate()
        .map(|(index, position)| {
            let pair = position
                .as_array()
                .filter(|pair| pair.len() >= 2)
                .ok_or(ProviderError::InvalidCoordinate { index })?;
            match (pair[0].as_f64(), pair[1].as_f64()) {
                (Some(lng), Some(lat)) => Some(Coordinate::new(lng, lat))
                    .filter(Coordinate::is_valid)
                    .ok_or(ProviderError::InvalidCoordinate { index }),
                _ => Err(ProviderError::InvalidCoordinate { index }),
            }
        })
        .collect()
}

/// `[min_lng, min_lat, max_lng, max_lat]`, or `None` for an empty sequence.
pub fn bounding_box(coordinates: &[Coordinate]) -> Option<[f64; 4]> {
    let first = coordinates.first()?;
    let init = [first.lng, first.lat, first.lng, first.lat];
    Some(coordinates.iter().fold(init, |[min_lng, min_lat, max_lng, max_lat], c| {
        [
            min_lng.min(c.lng),
            min_lat.min(c.lat),
            max_lng.max(c.lng),
            max_lat.max(c.lat),
        ]
    }))
}

//! Lenient coordinate parsing.
//!
//! Feed records arrive loosely typed: latitude and longitude may be JSON
//! numbers, numeric strings (`"28.61"`), `null`, or absent altogether. Point
//! payloads may also come as GeoJSON or WKT. Anything that does not yield a
//! finite, in-range coordinate parses to `None` so the caller can drop the
//! record instead of failing.

use crate::{Coordinate, GeoError, Result};
use serde_json::Value;

/// Parse a single degree value from a JSON number or numeric string.
///
/// Returns `None` for `null`, booleans, empty or non-numeric strings and
/// non-finite numbers.
pub fn parse_loose_degrees(value: &Value) -> Option<f64> {
    let degrees = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    degrees.is_finite().then_some(degrees)
}

/// Parse a latitude/longitude pair from loosely typed JSON values.
///
/// # Example
/// ```
/// use annaseva_geo::parse_loose_coordinate;
/// use serde_json::json;
///
/// let coord = parse_loose_coordinate(&json!("28.6139"), &json!(77.209)).unwrap();
/// assert!((coord.latitude - 28.6139).abs() < 1e-9);
///
/// assert!(parse_loose_coordinate(&json!(null), &json!(77.209)).is_none());
/// ```
pub fn parse_loose_coordinate(lat: &Value, lng: &Value) -> Option<Coordinate> {
    let coord = Coordinate::new(parse_loose_degrees(lat)?, parse_loose_degrees(lng)?);
    coord.is_valid().then_some(coord)
}

/// Parse a point from any of the shapes feeds use.
///
/// Supports:
/// - `{"lat": .., "lng": ..}` and `{"latitude": .., "longitude": ..}`
/// - GeoJSON: `{"type": "Point", "coordinates": [lng, lat]}`
/// - WKT string: `"POINT(lng lat)"`
pub fn parse_point(value: &Value) -> Option<Coordinate> {
    match value {
        Value::Object(map) => {
            if let Some(coords) = map.get("coordinates").and_then(Value::as_array) {
                if coords.len() >= 2 {
                    return parse_loose_coordinate(&coords[1], &coords[0]);
                }
                return None;
            }

            let lat = map.get("lat").or_else(|| map.get("latitude"))?;
            let lng = map.get("lng").or_else(|| map.get("longitude"))?;
            parse_loose_coordinate(lat, lng)
        }
        Value::String(wkt) => parse_wkt_point(wkt).ok().filter(Coordinate::is_valid),
        _ => None,
    }
}

/// Parse a WKT POINT string.
///
/// Format: `POINT(longitude latitude)`
fn parse_wkt_point(wkt: &str) -> Result<Coordinate> {
    let wkt = wkt.trim();

    let body = wkt
        .strip_prefix("POINT")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| GeoError::InvalidWkt(format!("Expected POINT(lng lat), got: {wkt}")))?;

    let parts: Vec<&str> = body.split_whitespace().collect();
    let [lng, lat] = parts.as_slice() else {
        return Err(GeoError::InvalidWkt(format!(
            "Expected 2 coordinates, got {}",
            parts.len()
        )));
    };

    let lng: f64 = lng
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid longitude: {lng}")))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| GeoError::InvalidWkt(format!("Invalid latitude: {lat}")))?;

    Ok(Coordinate::new(lat, lng))
}

//! Haversine distance calculation.
//!
//! Great-circle distance on a sphere of Earth's mean radius. No datum
//! conversion is performed; inputs are treated as WGS84 degrees.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlng/2)`,
/// `d = 2·R·atan2(√a, √(1−a))`.
///
/// # Example
/// ```
/// use annaseva_geo::{haversine_distance, Coordinate};
///
/// let delhi = Coordinate::new(28.6139, 77.2090);
/// let rohini = Coordinate::new(28.7041, 77.1025);
///
/// let distance = haversine_distance(&delhi, &rohini);
/// assert!((distance - 14.44).abs() < 0.01);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_KM
}

/// Calculates the great-circle distance between two coordinates in meters.
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    central_angle(from, to) * EARTH_RADIUS_M
}

/// Central angle between two points in radians.
#[inline]
fn central_angle(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lng1) = from.to_radians();
    let (lat2, lng2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

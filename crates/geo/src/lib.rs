//! Geospatial core for Anna Seva.
//!
//! This crate provides:
//! - Haversine great-circle distance
//! - Lenient coordinate parsing for loosely-typed feed records
//! - Validation, near-duplicate collapsing and radius filtering over any
//!   [`Located`] record type
//! - Batch ranking by distance with optional parallelism
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use annaseva_geo::{deduplicate, haversine_distance, Coordinate};
//!
//! let connaught_place = Coordinate::new(28.6315, 77.2167);
//! let india_gate = Coordinate::new(28.6129, 77.2295);
//!
//! let distance_km = haversine_distance(&connaught_place, &india_gate);
//! assert!((distance_km - 2.4).abs() < 0.2);
//!
//! // The second point sits ~50 m from the first and is collapsed into it.
//! let points = vec![connaught_place, Coordinate::new(28.6319, 77.2167), india_gate];
//! assert_eq!(deduplicate(points, 0.1).len(), 2);
//! ```

mod error;
mod haversine;
mod loose;
mod proximity;
pub mod batch;

#[cfg(feature = "wasm")]
mod wasm;

pub use batch::{distances_from, rank_by_distance, Ranked};
pub use error::{check_distance, GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use loose::{parse_loose_coordinate, parse_loose_degrees, parse_point};
pub use proximity::{
    deduplicate, merge_and_deduplicate, retain_locatable, within_radius, Located,
    DEFAULT_DUPLICATE_THRESHOLD_KM,
};

/// A geographic coordinate with latitude and longitude in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!("({latitude}, {longitude})")))
        }
    }

    /// Returns true if both components are finite and within range.
    ///
    /// NaN fails every comparison, so it is rejected without a separate check.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to another coordinate in kilometers.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(self, other)
    }

    /// Shifts the coordinate by raw degree offsets.
    ///
    /// This is a flat-earth approximation: a degree of longitude shrinks with
    /// latitude, so the result is only meaningful for offsets of a few
    /// kilometers away from the poles.
    #[inline]
    pub fn offset_degrees(&self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.latitude + d_lat, self.longitude + d_lng)
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

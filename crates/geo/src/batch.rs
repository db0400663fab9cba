//! Batch distance calculations with optional parallelism.
//!
//! Used when a whole feed has to be measured against one reference point,
//! e.g. to order map markers or list views nearest-first.

use crate::{haversine_distance, Coordinate, Located};
use serde::Serialize;

/// A record paired with its distance from a reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    /// Distance from the reference point in kilometers
    pub distance_km: f64,
    /// The ranked record
    #[serde(flatten)]
    pub item: T,
}

/// Distance from `origin` to every item, in input order.
///
/// Unlocatable items get `f64::INFINITY`.
///
/// # Example
/// ```
/// use annaseva_geo::{distances_from, Coordinate};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let items = vec![Coordinate::new(0.0, 0.05), Coordinate::new(f64::NAN, 0.0)];
///
/// let distances = distances_from(&origin, &items);
/// assert!((distances[0] - 5.56).abs() < 0.01);
/// assert!(distances[1].is_infinite());
/// ```
pub fn distances_from<T: Located + Sync>(origin: &Coordinate, items: &[T]) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| distance_or_infinity(origin, item))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| distance_or_infinity(origin, item))
            .collect()
    }
}

/// Rank items by distance from `origin`, closest first.
///
/// Unlocatable items are dropped. Ties keep their input order. When
/// `max_results` is set, only that many of the closest items are returned.
pub fn rank_by_distance<T: Located + Sync>(
    origin: &Coordinate,
    items: Vec<T>,
    max_results: Option<usize>,
) -> Vec<Ranked<T>> {
    let distances = distances_from(origin, &items);

    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .zip(distances)
        .filter(|(_, distance)| distance.is_finite())
        .map(|(item, distance_km)| Ranked { distance_km, item })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    if let Some(max) = max_results {
        ranked.truncate(max);
    }

    ranked
}

#[inline]
fn distance_or_infinity<T: Located>(origin: &Coordinate, item: &T) -> f64 {
    item.valid_coordinate()
        .map_or(f64::INFINITY, |coord| haversine_distance(origin, &coord))
}

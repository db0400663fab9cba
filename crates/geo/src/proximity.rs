//! Validation, near-duplicate collapsing and radius filtering.
//!
//! Every operation here is a pure, order-stable transformation over an
//! already-materialized batch. None of them fail: records that cannot be
//! placed on the map are dropped, never reported.

use crate::{haversine_distance, Coordinate};

/// Default near-duplicate threshold (100 m).
pub const DEFAULT_DUPLICATE_THRESHOLD_KM: f64 = 0.1;

/// Anything that may carry a position.
///
/// Returning `None` (or an invalid coordinate) marks the record as
/// unlocatable; the filters below drop such records.
pub trait Located {
    /// The record's position, if it has one.
    fn coordinate(&self) -> Option<Coordinate>;

    /// The position, only when it is finite and in range.
    #[inline]
    fn valid_coordinate(&self) -> Option<Coordinate> {
        self.coordinate().filter(Coordinate::is_valid)
    }
}

impl Located for Coordinate {
    #[inline]
    fn coordinate(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn coordinate(&self) -> Option<Coordinate> {
        (**self).coordinate()
    }
}

/// Drop every record without a usable coordinate.
pub fn retain_locatable<T: Located>(items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.valid_coordinate().is_some())
        .collect()
}

/// Collapse near-duplicates, keeping the first record of each cluster.
///
/// Records are visited in input order. A candidate is discarded when its
/// distance to any already-kept record is strictly below `threshold_km`; a
/// pair exactly at the threshold is kept. This is the greedy O(n²) scan, so
/// the input order decides which member of a cluster survives.
/// Unlocatable records are dropped.
///
/// A non-finite or non-positive threshold merges nothing.
pub fn deduplicate<T: Located>(items: Vec<T>, threshold_km: f64) -> Vec<T> {
    let mut kept: Vec<(Coordinate, T)> = Vec::with_capacity(items.len());

    for item in items {
        let Some(candidate) = item.valid_coordinate() else {
            continue;
        };

        let is_duplicate = kept
            .iter()
            .any(|(existing, _)| haversine_distance(existing, &candidate) < threshold_km);

        if !is_duplicate {
            kept.push((candidate, item));
        }
    }

    kept.into_iter().map(|(_, item)| item).collect()
}

/// Keep records no farther than `radius_km` from `center` (inclusive).
///
/// Unlocatable records are dropped.
pub fn within_radius<T: Located>(items: Vec<T>, center: &Coordinate, radius_km: f64) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| {
            item.valid_coordinate()
                .is_some_and(|coord| haversine_distance(center, &coord) <= radius_km)
        })
        .collect()
}

/// Flatten independently produced batches in order, then validate and
/// collapse near-duplicates across all of them.
pub fn merge_and_deduplicate<T, I>(batches: I, threshold_km: f64) -> Vec<T>
where
    T: Located,
    I: IntoIterator<Item = Vec<T>>,
{
    let merged: Vec<T> = batches.into_iter().flatten().collect();
    deduplicate(retain_locatable(merged), threshold_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: &'static str,
        lat: Option<f64>,
        lng: Option<f64>,
    }

    impl Record {
        fn at(id: &'static str, lat: f64, lng: f64) -> Self {
            Self { id, lat: Some(lat), lng: Some(lng) }
        }
    }

    impl Located for Record {
        fn coordinate(&self) -> Option<Coordinate> {
            Some(Coordinate::new(self.lat?, self.lng?))
        }
    }

    fn ids(records: &[Record]) -> Vec<&'static str> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_validation_drops_missing_and_nan() {
        let records = vec![
            Record::at("a", 28.61, 77.20),
            Record { id: "no-lat", lat: None, lng: Some(77.2) },
            Record { id: "no-lng", lat: Some(28.6), lng: None },
            Record::at("nan", f64::NAN, 77.2),
            Record::at("b", 28.70, 77.10),
        ];

        let valid = retain_locatable(records.clone());
        assert_eq!(ids(&valid), vec!["a", "b"]);

        let deduped = deduplicate(records.clone(), DEFAULT_DUPLICATE_THRESHOLD_KM);
        assert_eq!(ids(&deduped), vec!["a", "b"]);

        let near = within_radius(records, &Coordinate::new(28.61, 77.20), 100.0);
        assert_eq!(ids(&near), vec!["a", "b"]);
    }

    #[test]
    fn test_threshold_boundary_is_exclusive() {
        // 0.00089° of longitude at the equator is ~0.0990 km, 0.00091° is ~0.1012 km.
        let just_below = vec![Record::at("first", 0.0, 0.0), Record::at("second", 0.0, 0.00089)];
        let just_above = vec![Record::at("first", 0.0, 0.0), Record::at("second", 0.0, 0.00091)];

        assert_eq!(ids(&deduplicate(just_below, 0.1)), vec!["first"]);
        assert_eq!(ids(&deduplicate(just_above, 0.1)), vec!["first", "second"]);
    }

    #[test]
    fn test_pair_exactly_at_threshold_is_kept() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.00091);
        let threshold = haversine_distance(&a, &b);
        assert_eq!(deduplicate(vec![a, b], threshold).len(), 2);
    }

    #[test]
    fn test_first_seen_wins() {
        let records = vec![
            Record::at("x", 10.0, 10.0),
            Record::at("x-dup", 10.0, 10.0005),
            Record::at("y", 11.0, 11.0),
            Record::at("y-dup", 11.0005, 11.0),
        ];
        assert_eq!(ids(&deduplicate(records, 0.1)), vec!["x", "y"]);
    }

    #[test]
    fn test_duplicate_compares_against_every_kept_record() {
        // "c" is far from "a" but within threshold of "b".
        let records = vec![
            Record::at("a", 0.0, 0.0),
            Record::at("b", 0.0, 0.01),
            Record::at("c", 0.0, 0.0105),
        ];
        assert_eq!(ids(&deduplicate(records, 0.1)), vec!["a", "b"]);
    }

    #[test]
    fn test_non_positive_threshold_merges_nothing() {
        let same = vec![Record::at("a", 1.0, 1.0), Record::at("b", 1.0, 1.0)];
        assert_eq!(deduplicate(same.clone(), 0.0).len(), 2);
        assert_eq!(deduplicate(same, f64::NAN).len(), 2);
    }

    #[test]
    fn test_radius_filter() {
        let records = vec![Record::at("near", 0.0, 0.05), Record::at("far", 0.0, 0.2)];
        let kept = within_radius(records, &Coordinate::new(0.0, 0.0), 10.0);
        assert_eq!(ids(&kept), vec!["near"]);
    }

    #[test]
    fn test_radius_filter_is_inclusive() {
        let center = Coordinate::new(0.0, 0.0);
        let edge = Coordinate::new(0.0, 0.05);
        let radius = haversine_distance(&center, &edge);
        assert_eq!(within_radius(vec![edge], &center, radius).len(), 1);
    }

    #[test]
    fn test_merge_keeps_batch_order() {
        let provider_a = vec![Record::at("a1", 28.6139, 77.2090), Record::at("a2", 28.65, 77.25)];
        let provider_b = vec![
            Record::at("b1", 28.6139, 77.2091),
            Record { id: "b-bad", lat: None, lng: None },
            Record::at("b2", 28.55, 77.15),
        ];

        let merged = merge_and_deduplicate(vec![provider_a, provider_b], DEFAULT_DUPLICATE_THRESHOLD_KM);
        assert_eq!(ids(&merged), vec!["a1", "a2", "b2"]);
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<Record> = Vec::new();
        assert!(deduplicate(empty.clone(), 0.1).is_empty());
        assert!(within_radius(empty.clone(), &Coordinate::new(0.0, 0.0), 1.0).is_empty());
        assert!(merge_and_deduplicate(Vec::<Vec<Record>>::new(), 0.1).is_empty());
    }

    fn coordinates() -> impl Strategy<Value = Vec<Coordinate>> {
        prop::collection::vec(
            (28.55f64..28.65, 77.15f64..77.25).prop_map(|(lat, lng)| Coordinate::new(lat, lng)),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn prop_dedup_is_idempotent(points in coordinates(), threshold in 0.01f64..2.0) {
            let once = deduplicate(points, threshold);
            let twice = deduplicate(once.clone(), threshold);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_dedup_preserves_relative_order(points in coordinates(), threshold in 0.01f64..2.0) {
            let indexed: Vec<(usize, Coordinate)> = points.into_iter().enumerate().collect();
            let wrapped: Vec<Indexed> = indexed.iter().map(|&(i, c)| Indexed(i, c)).collect();
            let survivors = deduplicate(wrapped, threshold);
            prop_assert!(survivors.windows(2).all(|w| w[0].0 < w[1].0));
        }

        #[test]
        fn prop_survivors_are_pairwise_apart(points in coordinates(), threshold in 0.01f64..2.0) {
            let survivors = deduplicate(points, threshold);
            for (i, a) in survivors.iter().enumerate() {
                for b in &survivors[i + 1..] {
                    prop_assert!(haversine_distance(a, b) >= threshold);
                }
            }
        }

        #[test]
        fn prop_output_never_grows(points in coordinates(), radius in 0.1f64..20.0) {
            let len = points.len();
            let center = Coordinate::new(28.6, 77.2);
            prop_assert!(within_radius(points.clone(), &center, radius).len() <= len);
            prop_assert!(deduplicate(points, 0.1).len() <= len);
        }
    }

    #[derive(Debug, Clone)]
    struct Indexed(usize, Coordinate);

    impl Located for Indexed {
        fn coordinate(&self) -> Option<Coordinate> {
            Some(self.1)
        }
    }
}

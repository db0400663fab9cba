//! Synthetic surplus and shortage sites scattered around a center.
//!
//! Offsets are drawn uniformly in raw degrees, independently for latitude
//! and longitude. That is a flat-earth approximation: a degree of longitude
//! shrinks with latitude, so the scatter is only a sensible "nearby" shape
//! for windows of a few kilometers away from the poles.
//!
//! The random source is always passed in, so seeded callers get
//! reproducible batches.

use crate::model::{PointOfInterest, Severity, ShortageDetails, SurplusDetails};
use annaseva_core::config::GeneratorConfig;
use annaseva_geo::{parse_loose_degrees, Coordinate};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Food categories offered by generated surplus sites.
pub const SURPLUS_FOODS: [&str; 5] = ["Bread", "Vegetables", "Fruits", "Dairy", "Grains"];

/// Severities assigned to generated shortage sites.
pub const SHORTAGE_SEVERITIES: [Severity; 3] =
    [Severity::High, Severity::Medium, Severity::Critical];

/// Provenance tag of generated records.
pub const GENERATED_SOURCE: &str = "Generated";

/// Location generator bound to one configuration.
#[derive(Debug, Clone)]
pub struct LocationGenerator {
    config: GeneratorConfig,
}

impl Default for LocationGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl LocationGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The configured fallback center.
    pub fn default_center(&self) -> Coordinate {
        Coordinate::new(self.config.default_latitude, self.config.default_longitude)
    }

    /// Turn raw query parameters into a usable center.
    ///
    /// An absent parameter takes its component from the default center. If a
    /// supplied parameter is not numeric, or the pair is out of range, the
    /// whole default center is used instead.
    pub fn resolve_center(&self, lat: Option<&str>, lng: Option<&str>) -> Coordinate {
        let default = self.default_center();

        let component = |raw: Option<&str>, fallback: f64| match raw {
            None => Some(fallback),
            Some(raw) => parse_loose_degrees(&serde_json::Value::from(raw)),
        };

        match (
            component(lat, default.latitude),
            component(lng, default.longitude),
        ) {
            (Some(latitude), Some(longitude)) => {
                let center = Coordinate::new(latitude, longitude);
                if center.is_valid() {
                    center
                } else {
                    debug!(%center, "Center out of range, using default");
                    default
                }
            }
            _ => {
                debug!(?lat, ?lng, "Unparseable center, using default");
                default
            }
        }
    }

    /// Surplus sites within `surplus_window_deg` of `center`.
    ///
    /// Always returns exactly `count` records with ids `surplus-1..=count`.
    pub fn surplus<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        count: usize,
        rng: &mut R,
    ) -> Vec<PointOfInterest> {
        let center = self.usable_center(center);
        let window = self.config.surplus_window_deg;
        let now = Utc::now();

        let records: Vec<PointOfInterest> = (1..=count)
            .map(|n| {
                let coordinate = scatter(center, window, rng);
                let food = SURPLUS_FOODS.choose(rng).copied().unwrap_or("Grains");
                let amount = rng.gen_range(20..=119);
                let unit = if food == "Bread" { "loaves" } else { "kg" };

                PointOfInterest::surplus(
                    format!("surplus-{n}"),
                    coordinate,
                    SurplusDetails {
                        quantity: Some(format!("{amount} {unit}")),
                        ..Default::default()
                    },
                )
                .named(format!("Excess {food}"))
                .described(format!(
                    "Surplus {} available for donation",
                    food.to_lowercase()
                ))
                .from_source(GENERATED_SOURCE)
                .updated_at(now)
            })
            .collect();

        debug!(%center, count = records.len(), "Generated surplus sites");
        records
    }

    /// Shortage sites within `shortage_window_deg` of `center`.
    ///
    /// Always returns exactly `count` records with ids `shortage-1..=count`.
    pub fn shortages<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        count: usize,
        rng: &mut R,
    ) -> Vec<PointOfInterest> {
        let center = self.usable_center(center);
        let window = self.config.shortage_window_deg;
        let now = Utc::now();

        let records: Vec<PointOfInterest> = (1..=count)
            .map(|n| {
                let coordinate = scatter(center, window, rng);
                let severity = SHORTAGE_SEVERITIES.choose(rng).copied();

                PointOfInterest::shortage(
                    format!("shortage-{n}"),
                    coordinate,
                    ShortageDetails {
                        severity,
                        people_affected: None,
                    },
                )
                .from_source(GENERATED_SOURCE)
                .updated_at(now)
            })
            .collect();

        debug!(%center, count = records.len(), "Generated shortage sites");
        records
    }

    /// `surplus` with the configured default count.
    pub fn default_surplus<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        rng: &mut R,
    ) -> Vec<PointOfInterest> {
        self.surplus(center, self.config.surplus_count, rng)
    }

    /// `shortages` with the configured default count.
    pub fn default_shortages<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        rng: &mut R,
    ) -> Vec<PointOfInterest> {
        self.shortages(center, self.config.shortage_count, rng)
    }

    fn usable_center(&self, center: Coordinate) -> Coordinate {
        if center.is_valid() {
            center
        } else {
            self.default_center()
        }
    }
}

/// Uniform offset in `[-window, +window]` degrees on each axis.
///
/// Latitude is clamped at the poles and longitude wrapped across the
/// antimeridian so the result is always a valid coordinate. A negative
/// window is taken by magnitude; a non-finite one means no offset.
pub fn scatter<R: Rng + ?Sized>(center: Coordinate, window: f64, rng: &mut R) -> Coordinate {
    let window = if window.is_finite() { window.abs() } else { 0.0 };
    let d_lat = rng.gen_range(-window..=window);
    let d_lng = rng.gen_range(-window..=window);
    let shifted = center.offset_degrees(d_lat, d_lng);

    Coordinate::new(
        shifted.latitude.clamp(-90.0, 90.0),
        wrap_longitude(shifted.longitude),
    )
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Details, PoiKind};
    use annaseva_geo::Located;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    fn delhi() -> Coordinate {
        Coordinate::new(28.6139, 77.2090)
    }

    #[test]
    fn test_surplus_bounds_over_many_records() {
        let generator = LocationGenerator::default();
        let mut rng = StdRng::seed_from_u64(7);

        let records = generator.surplus(delhi(), 1000, &mut rng);
        assert_eq!(records.len(), 1000);

        for record in &records {
            let c = record.coordinate().unwrap();
            assert!(c.latitude >= 28.6039 - EPS && c.latitude <= 28.6239 + EPS, "{c}");
            assert!(c.longitude >= 77.1990 - EPS && c.longitude <= 77.2190 + EPS, "{c}");
        }
    }

    #[test]
    fn test_surplus_record_shape() {
        let generator = LocationGenerator::default();
        let mut rng = StdRng::seed_from_u64(42);

        let records = generator.default_surplus(delhi(), &mut rng);
        assert_eq!(records.len(), 3);

        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, format!("surplus-{}", i + 1));
            assert_eq!(record.kind(), PoiKind::Surplus);
            assert_eq!(record.source, GENERATED_SOURCE);

            let name = record.name.as_deref().unwrap();
            let food = name.strip_prefix("Excess ").unwrap();
            assert!(SURPLUS_FOODS.contains(&food));
            assert_eq!(
                record.description.as_deref(),
                Some(format!("Surplus {} available for donation", food.to_lowercase()).as_str())
            );

            let Details::Surplus(details) = &record.details else {
                panic!("expected surplus details");
            };
            let quantity = details.quantity.as_deref().unwrap();
            let (amount, unit) = quantity.split_once(' ').unwrap();
            let amount: u32 = amount.parse().unwrap();
            assert!((20..=119).contains(&amount));
            assert_eq!(unit, if food == "Bread" { "loaves" } else { "kg" });
        }
    }

    #[test]
    fn test_shortage_record_shape() {
        let generator = LocationGenerator::default();
        let mut rng = StdRng::seed_from_u64(3);

        let records = generator.default_shortages(delhi(), &mut rng);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "shortage-1");
        assert_eq!(records[1].id, "shortage-2");

        for record in &records {
            assert_eq!(record.kind(), PoiKind::Shortage);
            assert!(SHORTAGE_SEVERITIES.contains(&record.severity().unwrap()));
            let c = record.coordinate().unwrap();
            assert!((c.latitude - 28.6139).abs() <= 0.015 + EPS);
            assert!((c.longitude - 77.2090).abs() <= 0.015 + EPS);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generator = LocationGenerator::default();
        let a = generator.surplus(delhi(), 5, &mut StdRng::seed_from_u64(99));
        let b = generator.surplus(delhi(), 5, &mut StdRng::seed_from_u64(99));

        let strip = |records: &[PointOfInterest]| -> Vec<(Option<f64>, Option<f64>, Option<String>)> {
            records
                .iter()
                .map(|r| (r.lat, r.lng, r.name.clone()))
                .collect()
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_zero_count() {
        let generator = LocationGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generator.surplus(delhi(), 0, &mut rng).is_empty());
        assert!(generator.shortages(delhi(), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_invalid_center_falls_back_to_default() {
        let generator = LocationGenerator::default();
        let mut rng = StdRng::seed_from_u64(5);

        let records = generator.surplus(Coordinate::new(f64::NAN, 77.0), 10, &mut rng);
        for record in &records {
            let c = record.coordinate().unwrap();
            assert!((c.latitude - 28.6139).abs() <= 0.01 + EPS);
        }
    }

    #[test]
    fn test_resolve_center() {
        let generator = LocationGenerator::default();
        let default = generator.default_center();

        assert_eq!(generator.resolve_center(None, None), default);
        assert_eq!(
            generator.resolve_center(Some("19.0760"), Some("72.8777")),
            Coordinate::new(19.076, 72.8777)
        );
        assert_eq!(
            generator.resolve_center(Some("19.0760"), None),
            Coordinate::new(19.076, default.longitude)
        );
        assert_eq!(generator.resolve_center(Some("abc"), Some("72.8")), default);
        assert_eq!(generator.resolve_center(Some("NaN"), Some("72.8")), default);
        assert_eq!(generator.resolve_center(Some("95"), Some("72.8")), default);
        assert_eq!(generator.resolve_center(Some(""), Some("72.8")), default);
    }

    #[test]
    fn test_scatter_near_pole_and_antimeridian() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let c = scatter(Coordinate::new(89.999, 179.999), 0.01, &mut rng);
            assert!(c.is_valid(), "{c}");
        }
    }

    #[test]
    fn test_unvalidated_windows_do_not_panic() {
        let generator = LocationGenerator::new(GeneratorConfig {
            surplus_window_deg: -0.01,
            shortage_window_deg: f64::NAN,
            ..GeneratorConfig::default()
        });
        let center = Coordinate::new(28.6139, 77.2090);
        let mut rng = StdRng::seed_from_u64(5);

        for poi in generator.surplus(center, 50, &mut rng) {
            let c = poi.coordinate().unwrap();
            assert!((c.latitude - center.latitude).abs() <= 0.01 + EPS);
            assert!((c.longitude - center.longitude).abs() <= 0.01 + EPS);
        }
        for poi in generator.shortages(center, 5, &mut rng) {
            assert_eq!(poi.coordinate(), Some(center));
        }
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(10.0), 10.0);
        assert!((wrap_longitude(180.5) - (-179.5)).abs() < 1e-9);
        assert!((wrap_longitude(-180.5) - 179.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_shortages_stay_in_window(
            seed in any::<u64>(),
            lat in -80.0f64..80.0,
            lng in -170.0f64..170.0,
        ) {
            let generator = LocationGenerator::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let center = Coordinate::new(lat, lng);

            for record in generator.shortages(center, 20, &mut rng) {
                let c = record.coordinate().unwrap();
                prop_assert!((c.latitude - lat).abs() <= 0.015 + EPS);
                prop_assert!((c.longitude - lng).abs() <= 0.015 + EPS);
            }
        }

        #[test]
        fn prop_count_is_exact(seed in any::<u64>(), count in 0usize..50) {
            let generator = LocationGenerator::default();
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert_eq!(generator.surplus(delhi(), count, &mut rng).len(), count);
            prop_assert_eq!(generator.shortages(delhi(), count, &mut rng).len(), count);
        }
    }
}

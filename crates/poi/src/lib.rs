//! Point-of-interest records for Anna Seva.
//!
//! - [`PointOfInterest`]: the single surplus/shortage record every feed produces
//! - [`LocationGenerator`]: synthetic sites scattered around a center
//! - [`FoodWasteStats`]: mock dashboard figures
//!
//! # Example
//!
//! ```
//! use annaseva_geo::{deduplicate, Coordinate};
//! use annaseva_poi::LocationGenerator;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let generator = LocationGenerator::default();
//! let mut rng = StdRng::seed_from_u64(7);
//! let center = generator.resolve_center(Some("28.6139"), Some("77.2090"));
//!
//! let mut records = generator.surplus(center, 3, &mut rng);
//! records.extend(generator.shortages(center, 2, &mut rng));
//!
//! assert!(deduplicate(records, 0.1).len() <= 5);
//! ```

mod generator;
mod model;
mod stats;

pub use generator::{
    scatter, LocationGenerator, GENERATED_SOURCE, SHORTAGE_SEVERITIES, SURPLUS_FOODS,
};
pub use model::{
    Contact, Details, PoiKind, PointOfInterest, Severity, ShortageDetails, SurplusDetails,
};
pub use stats::FoodWasteStats;

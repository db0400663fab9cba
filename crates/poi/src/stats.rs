//! Headline figures for the dashboard.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Aggregate food-waste figures around a center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodWasteStats {
    /// Surplus food available, in kilograms
    pub total_surplus: u32,
    /// Active shortage reports
    pub total_shortages: u32,
    /// People covered by the shortage reports
    pub people_affected: u32,
    pub last_updated: DateTime<Utc>,
}

impl FoodWasteStats {
    /// Mock figures; nothing is counted.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            total_surplus: rng.gen_range(100..=1099),
            total_shortages: rng.gen_range(10..=59),
            people_affected: rng.gen_range(100..=599),
            last_updated: Utc::now(),
        }
    }
}

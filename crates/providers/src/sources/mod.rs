//! Concrete providers
//!
//! Remote:
//! - [`OpenFoodFacts`] (no key)
//! - [`UsdaFoodData`] (`DEMO_KEY` without a key)
//! - [`FeedingAmerica`], [`FoodRescueUs`] (empty without a key)
//!
//! Local:
//! - [`CommunityReports`]
//! - [`GeneratedSurplus`], [`GeneratedShortages`]

mod community;
mod feeding_america;
mod food_rescue;
mod generated;
mod open_food_facts;
mod usda;

pub use community::CommunityReports;
pub use feeding_america::FeedingAmerica;
pub use food_rescue::FoodRescueUs;
pub use generated::{GeneratedShortages, GeneratedSurplus};
pub use open_food_facts::OpenFoodFacts;
pub use usda::{UsdaFoodData, DEMO_KEY};

use serde_json::Value;

/// Feeds use both string and numeric ids.
fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Upstream id namespaced by provider, so two feeds reusing the same raw id
/// stay distinct after merging.
fn provider_id(provider: &str, value: &Value) -> Option<String> {
    id_from_value(value).map(|raw| format!("{provider}-{raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use annaseva_geo::merge_and_deduplicate;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_id_from_value() {
        assert_eq!(id_from_value(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(id_from_value(&json!(42)).as_deref(), Some("42"));
        assert_eq!(id_from_value(&json!("  ")), None);
        assert_eq!(id_from_value(&json!(null)), None);
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(
            provider_id("feeding-america", &json!(8)).as_deref(),
            Some("feeding-america-8")
        );
        assert_eq!(provider_id("usda-fdc", &json!("")), None);
    }

    #[test]
    fn test_shared_raw_ids_stay_distinct_after_merge() {
        let banks: feeding_america::FoodBanksResponse = serde_json::from_value(json!({
            "foodbanks": [{"id": 8, "latitude": 28.60, "longitude": 77.20}]
        }))
        .unwrap();
        let donations: food_rescue::DonationsResponse = serde_json::from_value(json!({
            "donations": [{"id": 8, "latitude": 28.70, "longitude": 77.10}]
        }))
        .unwrap();

        let now = Utc::now();
        let merged = merge_and_deduplicate(
            vec![
                feeding_america::map_food_banks(banks, now),
                food_rescue::map_donations(donations, now),
            ],
            0.1,
        );

        let ids: Vec<&str> = merged.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["feeding-america-8", "food-rescue-us-8"]);
    }
}

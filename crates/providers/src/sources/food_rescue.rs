//! Food Rescue US donation listings (requires a key)

use crate::client::HttpClient;
use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_geo::parse_loose_coordinate;
use annaseva_poi::{Details, PointOfInterest, SurplusDetails};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const SOURCE: &str = "Food Rescue US";

/// Food Rescue US provider
#[derive(Debug, Clone)]
pub struct FoodRescueUs {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl FoodRescueUs {
    pub fn new(client: HttpClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Fetcher for FoodRescueUs {
    fn name(&self) -> &'static str {
        "food-rescue-us"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let Some(api_key) = &self.api_key else {
            warn!(provider = self.name(), "API key not provided, skipping");
            return Ok(Vec::new());
        };

        let url = format!("{}/donations", self.base_url.trim_end_matches('/'));
        let params = [
            ("api_key", api_key.clone()),
            ("lat", query.location.latitude.to_string()),
            ("lng", query.location.longitude.to_string()),
            ("radius", query.radius_km.to_string()),
        ];

        let response: DonationsResponse = self.client.get_json(&url, &params).await?;
        Ok(map_donations(response, Utc::now()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DonationsResponse {
    #[serde(default)]
    donations: Vec<Donation>,
}

#[derive(Debug, Deserialize)]
struct Donation {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    food_name: Option<String>,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    pickup_time: Option<String>,
    #[serde(default)]
    donor_name: Option<String>,
}

pub(crate) fn map_donations(response: DonationsResponse, now: DateTime<Utc>) -> Vec<PointOfInterest> {
    response
        .donations
        .into_iter()
        .enumerate()
        .map(|(index, donation)| {
            let id = donation
                .id
                .as_ref()
                .and_then(|raw| super::provider_id("food-rescue-us", raw))
                .unwrap_or_else(|| format!("donation-{}", index + 1));

            // Unparseable timestamps count as "just observed".
            let observed = donation
                .created_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map_or(now, |at| at.with_timezone(&Utc));

            PointOfInterest::with_details(
                id,
                parse_loose_coordinate(&donation.latitude, &donation.longitude),
                Details::Surplus(SurplusDetails {
                    quantity: Some(donation.quantity.unwrap_or_else(|| "Unknown".into())),
                    pickup_time: donation.pickup_time,
                    donor: donation.donor_name,
                }),
            )
            .named(donation.food_name.unwrap_or_else(|| "Food Donation".into()))
            .described(format!(
                "Food Donation: {}",
                donation
                    .description
                    .as_deref()
                    .unwrap_or("Available for pickup")
            ))
            .from_source(SOURCE)
            .in_category(donation.category.unwrap_or_else(|| "General".into()))
            .updated_at(observed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use annaseva_core::retry::RetryConfig;
    use annaseva_geo::{Coordinate, Located};
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_map_donations() {
        let response: DonationsResponse = serde_json::from_value(json!({
            "donations": [
                {
                    "id": 501,
                    "food_name": "Sandwich trays",
                    "latitude": "40.7128",
                    "longitude": "-74.0060",
                    "quantity": "12 trays",
                    "created_at": "2024-03-01T10:00:00Z",
                    "category": "Prepared Food",
                    "pickup_time": "18:00",
                    "donor_name": "Midtown Deli"
                },
                {"latitude": 40.7, "longitude": -74.0, "created_at": "yesterday"}
            ]
        }))
        .unwrap();

        let now = Utc::now();
        let records = map_donations(response, now);
        assert_eq!(records.len(), 2);

        let trays = &records[0];
        assert_eq!(trays.id, "food-rescue-us-501");
        assert_eq!(trays.coordinate(), Some(Coordinate::new(40.7128, -74.006)));
        assert_eq!(trays.description.as_deref(), Some("Food Donation: Available for pickup"));
        assert_eq!(trays.last_updated.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let Details::Surplus(details) = &trays.details else {
            panic!("expected surplus details");
        };
        assert_eq!(details.pickup_time.as_deref(), Some("18:00"));
        assert_eq!(details.donor.as_deref(), Some("Midtown Deli"));

        let anonymous = &records[1];
        assert_eq!(anonymous.id, "donation-2");
        assert_eq!(anonymous.name.as_deref(), Some("Food Donation"));
        assert_eq!(anonymous.category.as_deref(), Some("General"));
        assert_eq!(anonymous.last_updated, now);
    }

    #[tokio::test]
    async fn test_missing_key_returns_empty() {
        let client = HttpClient::new(Duration::from_secs(1), RetryConfig::no_retry()).unwrap();
        let provider = FoodRescueUs::new(client, "http://127.0.0.1:9", None);

        let records = provider
            .fetch(&SearchQuery::new(Coordinate::new(40.7, -74.0)))
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}

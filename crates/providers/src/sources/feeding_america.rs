//! Feeding America food bank directory
//!
//! Requires a key. Without one the provider stays registered but returns
//! nothing, so enabling it is purely a configuration change.

use crate::client::HttpClient;
use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_geo::parse_loose_coordinate;
use annaseva_poi::{Contact, Details, PointOfInterest, SurplusDetails};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const SOURCE: &str = "Feeding America";

/// Feeding America provider
#[derive(Debug, Clone)]
pub struct FeedingAmerica {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl FeedingAmerica {
    pub fn new(client: HttpClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Fetcher for FeedingAmerica {
    fn name(&self) -> &'static str {
        "feeding-america"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let Some(api_key) = &self.api_key else {
            warn!(provider = self.name(), "API key not provided, skipping");
            return Ok(Vec::new());
        };

        let url = format!("{}/foodbanks", self.base_url.trim_end_matches('/'));
        let params = [
            ("api_key", api_key.clone()),
            ("lat", query.location.latitude.to_string()),
            ("lng", query.location.longitude.to_string()),
            ("radius", query.radius_km.to_string()),
        ];

        let response: FoodBanksResponse = self.client.get_json(&url, &params).await?;
        Ok(map_food_banks(response, Utc::now()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FoodBanksResponse {
    #[serde(default)]
    foodbanks: Vec<FoodBank>,
}

#[derive(Debug, Deserialize)]
struct FoodBank {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

pub(crate) fn map_food_banks(response: FoodBanksResponse, now: DateTime<Utc>) -> Vec<PointOfInterest> {
    response
        .foodbanks
        .into_iter()
        .enumerate()
        .map(|(index, bank)| {
            let id = bank
                .id
                .as_ref()
                .and_then(|raw| super::provider_id("feeding-america", raw))
                .unwrap_or_else(|| format!("foodbank-{}", index + 1));

            let mut poi = PointOfInterest::with_details(
                id,
                parse_loose_coordinate(&bank.latitude, &bank.longitude),
                Details::Surplus(SurplusDetails {
                    quantity: Some("Variable".into()),
                    ..Default::default()
                }),
            )
            .named(bank.name.unwrap_or_else(|| "Unknown Food Bank".into()))
            .described(format!(
                "Food Bank: {}",
                bank.description
                    .as_deref()
                    .unwrap_or("Providing food assistance")
            ))
            .from_source(SOURCE)
            .in_category("Food Bank")
            .updated_at(now);

            if bank.phone.is_some() || bank.email.is_some() || bank.website.is_some() {
                poi.contact = Some(Contact {
                    phone: bank.phone,
                    email: bank.email,
                    website: bank.website,
                });
            }
            poi
        })
        .collect()
}

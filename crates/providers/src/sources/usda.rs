//! USDA FoodData Central search
//!
//! Foods have no position of their own, so every result is pinned to the
//! query location. After deduplication that leaves at most one USDA record
//! per search, which is all the map needs.

use crate::client::HttpClient;
use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_geo::Coordinate;
use annaseva_poi::{Details, PointOfInterest, SurplusDetails};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

pub const SOURCE: &str = "USDA Food Data Central";

/// Key accepted by the public API for low-volume use.
pub const DEMO_KEY: &str = "DEMO_KEY";

/// USDA FoodData Central provider
#[derive(Debug, Clone)]
pub struct UsdaFoodData {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl UsdaFoodData {
    /// `api_key` falls back to [`DEMO_KEY`].
    pub fn new(client: HttpClient, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.unwrap_or_else(|| DEMO_KEY.to_string()),
        }
    }
}

#[async_trait]
impl Fetcher for UsdaFoodData {
    fn name(&self) -> &'static str {
        "usda-fooddata"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let url = format!("{}/foods/search", self.base_url.trim_end_matches('/'));
        let params = [
            ("api_key", self.api_key.clone()),
            ("query", query.query.clone()),
            ("pageSize", "50".to_string()),
            ("dataType", "Foundation,SR Legacy".to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&url, &params).await?;
        Ok(map_foods(response, query.location, Utc::now()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    foods: Vec<Food>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Food {
    #[serde(default)]
    fdc_id: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    brand_owner: Option<String>,
    #[serde(default)]
    serving_size: Option<f64>,
    #[serde(default)]
    serving_size_unit: Option<String>,
    #[serde(default)]
    food_category: Option<String>,
}

pub(crate) fn map_foods(
    response: SearchResponse,
    location: Coordinate,
    now: DateTime<Utc>,
) -> Vec<PointOfInterest> {
    response
        .foods
        .into_iter()
        .enumerate()
        .map(|(index, food)| {
            let id = food
                .fdc_id
                .as_ref()
                .and_then(|raw| super::provider_id("usda-fdc", raw))
                .unwrap_or_else(|| format!("usda-{}", index + 1));

            let quantity = match (food.serving_size, food.serving_size_unit) {
                (Some(size), Some(unit)) => format!("{size} {unit}"),
                (Some(size), None) => size.to_string(),
                _ => "Unknown".to_string(),
            };

            let mut poi = PointOfInterest::with_details(
                id,
                Some(location),
                Details::Surplus(SurplusDetails {
                    quantity: Some(quantity),
                    ..Default::default()
                }),
            )
            .named(food.description.unwrap_or_else(|| "Unknown Food".into()))
            .described(format!(
                "USDA Food: {}",
                food.brand_owner.as_deref().unwrap_or("No Brand")
            ))
            .from_source(SOURCE)
            .updated_at(now);

            poi.category = Some(food.food_category.unwrap_or_else(|| "General".into()));
            poi
        })
        .collect()
}

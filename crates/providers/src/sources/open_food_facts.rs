//! Open Food Facts product search
//!
//! Free, no key. Products rarely carry a usable position: the `origins`
//! field is free text and only becomes a coordinate when it happens to read
//! `"lat,lng"`. Everything else is dropped by the validation filter.

use crate::client::HttpClient;
use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_geo::{parse_loose_coordinate, Coordinate};
use annaseva_poi::{Details, PointOfInterest, SurplusDetails};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

pub const SOURCE: &str = "Open Food Facts";

const PAGE_SIZE: &str = "50";

/// Open Food Facts search provider
#[derive(Debug, Clone)]
pub struct OpenFoodFacts {
    client: HttpClient,
    url: String,
}

impl OpenFoodFacts {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Fetcher for OpenFoodFacts {
    fn name(&self) -> &'static str {
        "open-food-facts"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let params = [
            ("search_terms", query.query.clone()),
            ("search_simple", "1".to_string()),
            ("action", "process".to_string()),
            ("json", "1".to_string()),
            ("page_size", PAGE_SIZE.to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&self.url, &params).await?;
        Ok(map_products(response, Utc::now()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    origins: Option<String>,
    #[serde(default)]
    brands: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    categories_tags: Vec<String>,
}

pub(crate) fn map_products(response: SearchResponse, now: DateTime<Utc>) -> Vec<PointOfInterest> {
    response
        .products
        .into_iter()
        .enumerate()
        .map(|(index, product)| {
            let id = product
                .code
                .as_ref()
                .and_then(|raw| super::provider_id("open-food-facts", raw))
                .unwrap_or_else(|| format!("off-{}", index + 1));

            let details = SurplusDetails {
                quantity: Some(non_blank(product.quantity).unwrap_or_else(|| "Unknown".into())),
                ..Default::default()
            };

            let mut poi = PointOfInterest::with_details(
                id,
                product.origins.as_deref().and_then(origin_coordinate),
                Details::Surplus(details),
            )
            .named(non_blank(product.product_name).unwrap_or_else(|| "Unknown Product".into()))
            .described(format!(
                "Food product: {}",
                non_blank(product.brands).unwrap_or_else(|| "Unknown Brand".into())
            ))
            .from_source(SOURCE)
            .updated_at(now);

            poi.category = Some(
                product
                    .categories_tags
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "General".into()),
            );
            poi
        })
        .collect()
}

/// `"lat,lng"` origins become a coordinate; place names do not.
fn origin_coordinate(origins: &str) -> Option<Coordinate> {
    let mut parts = origins.split(',');
    let lat = Value::from(parts.next()?);
    let lng = Value::from(parts.next()?);
    parse_loose_coordinate(&lat, &lng)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annaseva_geo::{retain_locatable, Located};
    use serde_json::json;

    fn fixture() -> SearchResponse {
        serde_json::from_value(json!({
            "count": 3,
            "products": [
                {
                    "code": "8901058000290",
                    "product_name": "Whole Wheat Bread",
                    "origins": "28.61, 77.20",
                    "brands": "Harvest Gold",
                    "quantity": "400 g",
                    "categories_tags": ["en:breads", "en:cereals"]
                },
                {
                    "code": 12345,
                    "origins": "India"
                },
                {}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_map_products() {
        let records = map_products(fixture(), Utc::now());
        assert_eq!(records.len(), 3);

        let bread = &records[0];
        assert_eq!(bread.id, "open-food-facts-8901058000290");
        assert_eq!(bread.name.as_deref(), Some("Whole Wheat Bread"));
        assert_eq!(bread.description.as_deref(), Some("Food product: Harvest Gold"));
        assert_eq!(bread.category.as_deref(), Some("en:breads"));
        assert_eq!(bread.source, SOURCE);
        assert_eq!(bread.coordinate(), Some(Coordinate::new(28.61, 77.20)));

        let unnamed = &records[1];
        assert_eq!(unnamed.id, "open-food-facts-12345");
        assert_eq!(unnamed.name.as_deref(), Some("Unknown Product"));
        assert_eq!(unnamed.description.as_deref(), Some("Food product: Unknown Brand"));
        assert_eq!(unnamed.category.as_deref(), Some("General"));
        assert!(unnamed.coordinate().is_none());

        assert_eq!(records[2].id, "off-3");
    }

    #[test]
    fn test_only_coordinate_origins_survive_validation() {
        let records = retain_locatable(map_products(fixture(), Utc::now()));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "open-food-facts-8901058000290");
    }

    #[test]
    fn test_missing_products_field() {
        let response: SearchResponse = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(map_products(response, Utc::now()).is_empty());
    }
}

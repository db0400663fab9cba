//! Concurrent fan-out over every registered provider

use crate::client::HttpClient;
use crate::error::{ProviderError, ProviderResult};
use crate::fetcher::{Fetcher, SearchQuery};
use crate::sources::{
    CommunityReports, FeedingAmerica, FoodRescueUs, GeneratedShortages, GeneratedSurplus,
    OpenFoodFacts, UsdaFoodData,
};
use annaseva_core::config::ConfigSchema;
use annaseva_geo::{merge_and_deduplicate, within_radius};
use annaseva_poi::{LocationGenerator, PointOfInterest};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Runs every provider concurrently and merges what comes back.
///
/// A provider that errors, times out or panics contributes an empty batch.
/// Batches are concatenated in registration order before deduplication, so
/// the earlier-registered provider wins a near-duplicate pair regardless of
/// which one answered first.
#[derive(Clone)]
pub struct Aggregator {
    fetchers: Vec<Arc<dyn Fetcher>>,
    threshold_km: f64,
    timeout: Option<Duration>,
}

impl Aggregator {
    /// An empty aggregator deduplicating at `threshold_km`.
    pub fn new(threshold_km: f64) -> Self {
        Self {
            fetchers: Vec::new(),
            threshold_km,
            timeout: None,
        }
    }

    /// The standard provider set for a configuration.
    ///
    /// Generated surplus, generated shortages and community reports are
    /// always registered. Remote providers follow when
    /// `providers.remote_enabled` is set.
    pub fn from_config(schema: &ConfigSchema) -> ProviderResult<Self> {
        Self::from_config_seeded(schema, None)
    }

    /// [`Aggregator::from_config`] with the local providers drawing from
    /// `seed`, so repeated searches return the same generated records.
    pub fn from_config_seeded(schema: &ConfigSchema, seed: Option<u64>) -> ProviderResult<Self> {
        let generator = LocationGenerator::new(schema.generator.clone());
        let mut surplus = GeneratedSurplus::new(generator.clone());
        let mut shortages = GeneratedShortages::new(generator);
        let mut community = CommunityReports::new(schema.generator.community_window_deg);
        if let Some(seed) = seed {
            surplus = surplus.seeded(seed);
            shortages = shortages.seeded(seed.wrapping_add(1));
            community = community.seeded(seed.wrapping_add(2));
        }

        let mut aggregator = Self::new(schema.proximity.duplicate_threshold_km)
            .with_fetcher(surplus)
            .with_fetcher(shortages)
            .with_fetcher(community);

        let providers = &schema.providers;
        if providers.remote_enabled {
            let client = HttpClient::from_config(providers)?;
            aggregator = aggregator
                .with_fetcher(OpenFoodFacts::new(
                    client.clone(),
                    &providers.open_food_facts_url,
                ))
                .with_fetcher(UsdaFoodData::new(
                    client.clone(),
                    &providers.usda_url,
                    providers.usda_api_key.clone(),
                ))
                .with_fetcher(FeedingAmerica::new(
                    client.clone(),
                    &providers.feeding_america_url,
                    providers.feeding_america_api_key.clone(),
                ))
                .with_fetcher(FoodRescueUs::new(
                    client,
                    &providers.food_rescue_us_url,
                    providers.food_rescue_us_api_key.clone(),
                ));
        }

        info!(providers = ?aggregator.names(), "Provider registry ready");
        Ok(aggregator)
    }

    /// Register a provider.
    #[must_use]
    pub fn with_fetcher<F: Fetcher + 'static>(mut self, fetcher: F) -> Self {
        self.fetchers.push(Arc::new(fetcher));
        self
    }

    /// Give up on any provider that takes longer than `limit`.
    #[must_use]
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Provider names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fetchers.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// One batch per provider, in registration order.
    pub async fn fetch_all(&self, query: &SearchQuery) -> Vec<Vec<PointOfInterest>> {
        let mut tasks = JoinSet::new();

        for (index, fetcher) in self.fetchers.iter().enumerate() {
            let fetcher = Arc::clone(fetcher);
            let query = query.clone();
            let timeout = self.timeout;

            tasks.spawn(async move {
                let start = Instant::now();
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, fetcher.fetch(&query))
                        .await
                        .unwrap_or(Err(ProviderError::Timeout(limit))),
                    None => fetcher.fetch(&query).await,
                };
                (index, result, start.elapsed())
            });
        }

        let mut batches: Vec<Vec<PointOfInterest>> = vec![Vec::new(); self.fetchers.len()];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(records), elapsed)) => {
                    debug!(
                        provider = self.fetchers[index].name(),
                        count = records.len(),
                        elapsed_ms = elapsed.as_millis(),
                        "Provider answered"
                    );
                    batches[index] = records;
                }
                Ok((index, Err(e), _)) => {
                    warn!(
                        provider = self.fetchers[index].name(),
                        error = %e,
                        "Provider failed, using empty result"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Provider task aborted, using empty result");
                }
            }
        }

        batches
    }

    /// Every provider's records, validated and deduplicated.
    pub async fn search(&self, query: &SearchQuery) -> Vec<PointOfInterest> {
        let batches = self.fetch_all(query).await;
        let fetched: usize = batches.iter().map(Vec::len).sum();

        let merged = merge_and_deduplicate(batches, self.threshold_km);
        debug!(fetched, kept = merged.len(), "Merged provider results");
        merged
    }

    /// [`Aggregator::search`] restricted to `query.radius_km` around
    /// `query.location`.
    pub async fn search_within(&self, query: &SearchQuery) -> Vec<PointOfInterest> {
        within_radius(self.search(query).await, &query.location, query.radius_km)
    }
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("fetchers", &self.names())
            .field("threshold_km", &self.threshold_km)
            .field("timeout", &self.timeout)
            .finish()
    }
}

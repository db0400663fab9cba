use std::sync::Arc;

use annaseva_geo::{Ranked, check_distance, merge_and_deduplicate, rank_by_distance, within_radius};
use annaseva_poi::{FoodWasteStats, PointOfInterest};
use annaseva_providers::SearchQuery;
use annaseva_telemetry::MetricsSnapshot;
use axum::{
    Json,
    extract::{Query, State},
    http::Uri,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error::ServerError, state::AppState};

/// Raw center parameters. Kept as strings so a malformed value falls back to
/// the default center instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CenterParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Kilometers
    pub radius: Option<String>,
    /// Near-duplicate threshold in kilometers
    pub threshold: Option<String>,
    pub limit: Option<String>,
    /// Search term for remote providers
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub message: &'static str,
    pub timestamp: String,
}

pub async fn test_handler(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    info!("Test endpoint hit");
    state.metrics.increment("http.requests.test");

    Json(TestResponse {
        message: "API is working!",
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn surplus_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CenterParams>,
) -> Json<Vec<PointOfInterest>> {
    let _timer = state.metrics.timer("http.latency_ms.surplus");
    state.metrics.increment("http.requests.surplus");

    let center = state
        .generator
        .resolve_center(params.lat.as_deref(), params.lng.as_deref());
    info!(%center, "Generating surplus locations");

    let records = state.generator.default_surplus(center, &mut state.rng());
    Json(records)
}

pub async fn shortages_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CenterParams>,
) -> Json<Vec<PointOfInterest>> {
    let _timer = state.metrics.timer("http.latency_ms.shortages");
    state.metrics.increment("http.requests.shortages");

    let center = state
        .generator
        .resolve_center(params.lat.as_deref(), params.lng.as_deref());
    info!(%center, "Generating shortage areas");

    let records = state.generator.default_shortages(center, &mut state.rng());
    Json(records)
}

/// Everything the registered providers know about, merged, deduplicated,
/// limited to the radius and sorted nearest first.
pub async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Json<Vec<Ranked<PointOfInterest>>> {
    let _timer = state.metrics.timer("http.latency_ms.nearby");
    state.metrics.increment("http.requests.nearby");

    let proximity = &state.config.proximity;
    let center = state
        .generator
        .resolve_center(params.lat.as_deref(), params.lng.as_deref());
    let radius_km = positive_km(params.radius.as_deref()).unwrap_or(proximity.default_radius_km);
    let threshold_km =
        positive_km(params.threshold.as_deref()).unwrap_or(proximity.duplicate_threshold_km);
    let limit = params
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .or(proximity.max_results);

    let mut query = SearchQuery::new(center).with_radius(radius_km);
    if let Some(term) = params.q.filter(|q| !q.trim().is_empty()) {
        query = query.with_query(term);
    }

    let batches = state.aggregator.fetch_all(&query).await;
    let fetched: usize = batches.iter().map(Vec::len).sum();

    let merged = merge_and_deduplicate(batches, threshold_km);
    let nearby = within_radius(merged, &center, radius_km);
    let ranked = rank_by_distance(&center, nearby, limit);

    info!(
        %center,
        radius_km,
        threshold_km,
        fetched,
        returned = ranked.len(),
        "Nearby search"
    );
    state.metrics.gauge("nearby.last_result_count", ranked.len() as u64);

    Json(ranked)
}

pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CenterParams>,
) -> Json<FoodWasteStats> {
    let _timer = state.metrics.timer("http.latency_ms.stats");
    state.metrics.increment("http.requests.stats");

    let center = state
        .generator
        .resolve_center(params.lat.as_deref(), params.lng.as_deref());
    debug!(%center, "Generating food waste stats");

    Json(FoodWasteStats::generate(&mut state.rng()))
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    state.metrics.increment("http.requests.metrics");
    Json(state.metrics.snapshot())
}

pub async fn fallback_handler(uri: Uri) -> ServerError {
    ServerError::NotFound(uri.path().to_string())
}

fn positive_km(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|r| r.trim().parse::<f64>().ok())
        .and_then(|km| check_distance(km).ok())
}

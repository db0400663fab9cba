//! Nearby command
//!
//! Same pipeline as the `/nearby` route: fetch every registered provider,
//! collapse near-duplicates, keep what lies inside the radius and rank the
//! rest nearest first.

use crate::Format;
use crate::output::{Status, format_count, format_distance, format_duration, poi_line, print_json};
use annaseva_core::Error;
use annaseva_core::config::ConfigSchema;
use annaseva_geo::{check_distance, merge_and_deduplicate, rank_by_distance, within_radius};
use annaseva_poi::LocationGenerator;
use annaseva_providers::{Aggregator, SearchQuery};
use annaseva_telemetry::Timer;
use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::info;

/// Command line knobs; anything unset falls back to configuration.
#[derive(Debug, Default)]
pub struct Options {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<f64>,
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
    pub query: Option<String>,
}

pub async fn run(schema: &ConfigSchema, options: Options, format: Format) -> Result<()> {
    let proximity = &schema.proximity;
    let radius_km = km_or(options.radius, proximity.default_radius_km, "radius")?;
    let threshold_km = km_or(options.threshold, proximity.duplicate_threshold_km, "threshold")?;
    let limit = options.limit.or(proximity.max_results);

    let center = LocationGenerator::new(schema.generator.clone())
        .resolve_center(options.lat.as_deref(), options.lng.as_deref());

    let mut query = SearchQuery::new(center).with_radius(radius_km);
    if let Some(term) = options.query {
        query = query.with_query(term);
    }

    let aggregator = Aggregator::from_config(schema).map_err(Error::from)?;
    let timer = Timer::start("cli.nearby");

    let batches = aggregator.fetch_all(&query).await;
    let fetched: usize = batches.iter().map(Vec::len).sum();
    let merged = merge_and_deduplicate(batches, threshold_km);
    let ranked = rank_by_distance(&center, within_radius(merged, &center, radius_km), limit);

    let elapsed = timer.stop();
    info!(%center, fetched, returned = ranked.len(), "Nearby search");

    if format == Format::Json {
        return print_json(&ranked);
    }

    Status::header(&format!(
        "Within {} of {}",
        format_distance(radius_km),
        center
    ));
    if ranked.is_empty() {
        Status::warning("Nothing found inside the radius");
    }
    for entry in &ranked {
        println!(
            "  {:>9}  {}",
            format_distance(entry.distance_km).cyan(),
            poi_line(&entry.item)
        );
    }
    println!();
    Status::info(&format!(
        "{} from {} in {}",
        format_count(ranked.len(), "site", "sites"),
        format_count(aggregator.len(), "provider", "providers"),
        format_duration(elapsed)
    ));
    Ok(())
}

fn km_or(value: Option<f64>, fallback: f64, what: &str) -> Result<f64, Error> {
    match value {
        None => Ok(fallback),
        Some(km) => check_distance(km).map_err(|e| {
            Error::validation(format!("Invalid {what}: {e}"))
                .with_suggestion("Distances are positive kilometers")
        }),
    }
}

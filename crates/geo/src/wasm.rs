//! WASM bindings for the geo crate.
//!
//! The map page filters feeds in the browser; these bindings let it run the
//! same validation, deduplication and radius logic as the server. Records are
//! passed as JSON arrays of objects carrying loose `lat`/`lng` fields; every
//! other field is preserved untouched.

use crate::{deduplicate, haversine_distance, parse_point, within_radius, Coordinate, Located};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// A JSON record whose position is read from its own `lat`/`lng` fields.
struct JsonRecord(Value);

impl Located for JsonRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        parse_point(&self.0)
    }
}

fn parse_records(records_json: &str) -> Result<Vec<JsonRecord>, JsValue> {
    let values: Vec<Value> = serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;
    Ok(values.into_iter().map(JsonRecord).collect())
}

fn to_json(records: Vec<JsonRecord>) -> Result<String, JsValue> {
    let values: Vec<Value> = records.into_iter().map(|r| r.0).collect();
    serde_json::to_string(&values)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Distance between two coordinates in kilometers.
#[wasm_bindgen]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance(&Coordinate::new(lat1, lng1), &Coordinate::new(lat2, lng2))
}

/// Drop unlocatable records and collapse near-duplicates.
///
/// # Arguments
/// * `records_json` - JSON array of records with `lat`/`lng` fields
/// * `threshold_km` - Near-duplicate threshold in kilometers
#[wasm_bindgen]
pub fn deduplicate_json(records_json: &str, threshold_km: f64) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    to_json(deduplicate(records, threshold_km))
}

/// Keep records within `radius_km` of the user.
#[wasm_bindgen]
pub fn filter_within_radius_json(
    user_lat: f64,
    user_lng: f64,
    records_json: &str,
    radius_km: f64,
) -> Result<String, JsValue> {
    let records = parse_records(records_json)?;
    let center = Coordinate::new(user_lat, user_lng);
    to_json(within_radius(records, &center, radius_km))
}

//! Distance command

use crate::Format;
use crate::output::format_distance;
use annaseva_core::Error;
use annaseva_geo::{Coordinate, haversine_distance};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run(from: &str, to: &str, format: Format) -> Result<()> {
    let from = parse_pair(from)?;
    let to = parse_pair(to)?;
    let km = haversine_distance(&from, &to);

    if format == Format::Json {
        return crate::output::print_json(&json!({
            "from": from,
            "to": to,
            "distanceKm": km,
        }));
    }

    println!("{} -> {}: {}", from, to, format_distance(km).bold());
    Ok(())
}

/// Parse `"lat,lng"` into a valid coordinate.
pub(crate) fn parse_pair(raw: &str) -> Result<Coordinate, Error> {
    let invalid = || {
        Error::new(
            annaseva_core::ErrorCode::InvalidInput,
            format!("Expected \"lat,lng\", got {raw:?}"),
        )
        .with_suggestion("Pass two decimal degrees separated by a comma, e.g. 28.6139,77.2090")
    };

    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lng.trim().parse().map_err(|_| invalid())?;

    Coordinate::try_new(latitude, longitude)
        .map_err(|_| Error::invalid_coordinate(latitude, longitude))
}

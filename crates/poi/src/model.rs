//! The point-of-interest record shared by every feed.
//!
//! Wire shape (camelCase, flat):
//!
//! ```json
//! {"id": "surplus-1", "type": "surplus", "lat": 28.61, "lng": 77.21,
//!  "name": "Excess Bread", "quantity": "40 loaves",
//!  "lastUpdated": "2024-01-01T00:00:00Z", "source": "Generated"}
//! ```
//!
//! `lat`/`lng` are read leniently: numbers, numeric strings and `null` are
//! all accepted, and anything unusable becomes `None`. A record without both
//! halves of its coordinate is still representable; the proximity filters
//! drop it.

use annaseva_geo::{parse_loose_degrees, Coordinate, Located};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surplus or shortage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiKind {
    /// Food available for donation
    Surplus,
    /// People in need of food
    Shortage,
}

impl fmt::Display for PoiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiKind::Surplus => f.write_str("surplus"),
            PoiKind::Shortage => f.write_str("shortage"),
        }
    }
}

/// How badly a shortage site is affected.
///
/// Serialized capitalized; parsed case-insensitively since feeds disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Every severity, mildest first.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Capitalized label as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown severity: {s:?}"))
    }
}

impl TryFrom<String> for Severity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Attributes only meaningful for surplus sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusDetails {
    /// Free-text amount, e.g. `"40 kg"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// When the donation can be collected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    /// Who is donating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor: Option<String>,
}

/// Attributes only meaningful for shortage sites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortageDetails {
    /// How badly the site is affected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Number of people affected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people_affected: Option<u32>,
}

/// Kind-dependent payload, tagged by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Details {
    /// Surplus site payload
    Surplus(SurplusDetails),
    /// Shortage site payload
    Shortage(ShortageDetails),
}

/// Contact channels for an organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A single surplus or shortage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    /// Identifier, unique within one batch only
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Kind and kind-specific attributes
    #[serde(flatten)]
    pub details: Details,

    /// Latitude in degrees
    #[serde(default, deserialize_with = "loose_degrees")]
    pub lat: Option<f64>,

    /// Longitude in degrees
    #[serde(default, deserialize_with = "loose_degrees")]
    pub lng: Option<f64>,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the record was generated or observed
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,

    /// Provenance tag, display only
    #[serde(default)]
    pub source: String,

    /// Display category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Contact channels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

impl PointOfInterest {
    /// A surplus record at `coordinate`.
    pub fn surplus(id: impl Into<String>, coordinate: Coordinate, details: SurplusDetails) -> Self {
        Self::with_details(id, Some(coordinate), Details::Surplus(details))
    }

    /// A shortage record at `coordinate`.
    pub fn shortage(
        id: impl Into<String>,
        coordinate: Coordinate,
        details: ShortageDetails,
    ) -> Self {
        Self::with_details(id, Some(coordinate), Details::Shortage(details))
    }

    /// A record whose coordinate may be unknown.
    pub fn with_details(id: impl Into<String>, coordinate: Option<Coordinate>, details: Details) -> Self {
        Self {
            id: id.into(),
            details,
            lat: coordinate.map(|c| c.latitude),
            lng: coordinate.map(|c| c.longitude),
            name: None,
            description: None,
            last_updated: Utc::now(),
            source: String::new(),
            category: None,
            contact: None,
        }
    }

    /// Set the display label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the provenance tag.
    #[must_use]
    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the display category.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the observation time.
    #[must_use]
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    /// Surplus or shortage.
    pub fn kind(&self) -> PoiKind {
        match self.details {
            Details::Surplus(_) => PoiKind::Surplus,
            Details::Shortage(_) => PoiKind::Shortage,
        }
    }

    /// Severity, for shortage records that carry one.
    pub fn severity(&self) -> Option<Severity> {
        match &self.details {
            Details::Shortage(details) => details.severity,
            Details::Surplus(_) => None,
        }
    }
}

impl Located for PointOfInterest {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lng?))
    }
}

fn loose_degrees<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(parse_loose_degrees(&value))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

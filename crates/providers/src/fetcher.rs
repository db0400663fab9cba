//! The capability every provider implements

use crate::error::ProviderResult;
use annaseva_geo::Coordinate;
use annaseva_poi::PointOfInterest;
use async_trait::async_trait;

/// Search term used when a caller has none.
pub const DEFAULT_QUERY: &str = "food";

/// Radius used when a caller has none, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// What to look for and where.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text search term
    pub query: String,
    /// Reference point
    pub location: Coordinate,
    /// Search radius in kilometers
    pub radius_km: f64,
}

impl SearchQuery {
    pub fn new(location: Coordinate) -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            location,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }
}

/// A source of point-of-interest records.
///
/// Implementations may fail freely; the aggregator turns any error into an
/// empty batch so one bad source never hides the others.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch records relevant to `query`.
    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>>;
}

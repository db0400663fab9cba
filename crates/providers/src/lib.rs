//! Food data providers for Anna Seva
//!
//! Every source of surplus and shortage records sits behind the [`Fetcher`]
//! trait. The [`Aggregator`] runs them concurrently, turns failures into
//! empty batches and hands the merged list to the proximity filters in
//! `annaseva-geo`.
//!
//! # Example
//!
//! ```rust,no_run
//! use annaseva_core::config::ConfigSchema;
//! use annaseva_geo::Coordinate;
//! use annaseva_providers::{Aggregator, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::from_config(&ConfigSchema::default())?;
//!
//!     let query = SearchQuery::new(Coordinate::new(28.6139, 77.2090)).with_radius(10.0);
//!     for poi in aggregator.search_within(&query).await {
//!         println!("{} {}", poi.id, poi.kind());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod aggregate;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod sources;

pub use aggregate::Aggregator;
pub use client::HttpClient;
pub use error::{ProviderError, ProviderResult};
pub use fetcher::{Fetcher, SearchQuery, DEFAULT_QUERY, DEFAULT_RADIUS_KM};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregate::Aggregator;
    pub use crate::error::{ProviderError, ProviderResult};
    pub use crate::fetcher::{Fetcher, SearchQuery};
    pub use crate::sources::*;
}

//! Providers backed by the location generator

use crate::error::ProviderResult;
use crate::fetcher::{Fetcher, SearchQuery};
use annaseva_poi::{LocationGenerator, PointOfInterest};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Synthetic surplus sites around the query location
#[derive(Debug, Clone)]
pub struct GeneratedSurplus {
    generator: LocationGenerator,
    seed: Option<u64>,
}

impl GeneratedSurplus {
    pub fn new(generator: LocationGenerator) -> Self {
        Self {
            generator,
            seed: None,
        }
    }

    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[async_trait]
impl Fetcher for GeneratedSurplus {
    fn name(&self) -> &'static str {
        "generated-surplus"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let mut rng = rng_for(self.seed);
        Ok(self.generator.default_surplus(query.location, &mut rng))
    }
}

/// Synthetic shortage sites around the query location
#[derive(Debug, Clone)]
pub struct GeneratedShortages {
    generator: LocationGenerator,
    seed: Option<u64>,
}

impl GeneratedShortages {
    pub fn new(generator: LocationGenerator) -> Self {
        Self {
            generator,
            seed: None,
        }
    }

    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[async_trait]
impl Fetcher for GeneratedShortages {
    fn name(&self) -> &'static str {
        "generated-shortages"
    }

    async fn fetch(&self, query: &SearchQuery) -> ProviderResult<Vec<PointOfInterest>> {
        let mut rng = rng_for(self.seed);
        Ok(self.generator.default_shortages(query.location, &mut rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use annaseva_geo::Coordinate;
    use annaseva_poi::PoiKind;

    #[test]
    fn test_generated_counts() {
        let query = SearchQuery::new(Coordinate::new(28.6139, 77.209));

        let surplus = tokio_test::block_on(
            GeneratedSurplus::new(LocationGenerator::default())
                .seeded(1)
                .fetch(&query),
        )
        .unwrap();
        assert_eq!(surplus.len(), 3);
        assert!(surplus.iter().all(|p| p.kind() == PoiKind::Surplus));

        let shortages = tokio_test::block_on(
            GeneratedShortages::new(LocationGenerator::default()).fetch(&query),
        )
        .unwrap();
        assert_eq!(shortages.len(), 2);
        assert!(shortages.iter().all(|p| p.kind() == PoiKind::Shortage));
    }
}

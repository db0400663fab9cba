use std::sync::Arc;

use annaseva_core::config::ConfigSchema;
use annaseva_poi::LocationGenerator;
use annaseva_providers::Aggregator;
use annaseva_telemetry::MetricsRegistry;
use rand::{SeedableRng, rngs::StdRng};

use crate::error::ServerError;

pub struct AppState {
    pub config: ConfigSchema,
    pub generator: LocationGenerator,
    pub aggregator: Aggregator,
    pub metrics: MetricsRegistry,
    seed: Option<u64>,
}

impl AppState {
    pub fn new(config: ConfigSchema) -> Result<Arc<Self>, ServerError> {
        Self::build(config, None)
    }

    /// Same as [`AppState::new`], but every generated batch, including the
    /// local providers behind `/nearby`, is drawn from a fixed seed.
    pub fn seeded(config: ConfigSchema, seed: u64) -> Result<Arc<Self>, ServerError> {
        Self::build(config, Some(seed))
    }

    fn build(config: ConfigSchema, seed: Option<u64>) -> Result<Arc<Self>, ServerError> {
        let generator = LocationGenerator::new(config.generator.clone());
        let aggregator = Aggregator::from_config_seeded(&config, seed)?;

        Ok(Arc::new(Self {
            config,
            generator,
            aggregator,
            metrics: MetricsRegistry::new(),
            seed,
        }))
    }

    /// Random source for one request.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

//! CLI command implementations

pub mod distance;
pub mod generate;
pub mod nearby;
pub mod serve;
pub mod stats;

use rand::{SeedableRng, rngs::StdRng};

/// Seeded when the operator asked for reproducible output.
pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

//! Random dataset generation

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::models::{Dataset, Shape};
use crate::VALUE_UPPER_BOUND;

/// Produces grids of pseudo-random values in `[0, VALUE_UPPER_BOUND)`.
///
/// The random source is injected, so tests can use a fixed seed while the
/// benchmark seeds from the clock.
#[derive(Debug, Clone)]
pub struct DatasetGenerator<R: Rng> {
    rng: R,
    seed: Option<u64>,
}

impl DatasetGenerator<SmallRng> {
    /// Deterministic generator: the same seed yields the same datasets.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Generator seeded from the current wall-clock time, second resolution.
    pub fn from_clock() -> Self {
        Self::from_seed(clock_seed())
    }
}

impl<R: Rng> DatasetGenerator<R> {
    /// Wrap a caller-supplied random source.
    pub fn new(rng: R) -> Self {
        Self { rng, seed: None }
    }

    /// Seed of the random source, when it was created from one.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Fill a new dataset of `shape` row by row.
    pub fn generate(&mut self, shape: Shape) -> Dataset {
        let rng = &mut self.rng;
        Dataset::from_fn(shape, |_, _| rng.gen_range(0..VALUE_UPPER_BOUND))
    }
}

/// Current Unix time in whole seconds
pub fn clock_seed() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

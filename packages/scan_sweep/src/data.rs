use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every generated element falls in this range, keeping even 10 million element sums well
/// inside `i32` range.
pub(crate) const VALUE_RANGE: RangeInclusive<i32> = 1..=100;

/// Produces benchmark input from an explicitly seeded generator, so any run can be repeated
/// exactly by passing the same seed.
#[derive(Debug)]
pub(crate) struct DataGenerator {
    seed: u64,
    rng: StdRng,
}

impl DataGenerator {
    /// Creates a generator from `seed`, or from a freshly drawn random seed if `None`.
    pub(crate) fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());

        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this generator was created from.
    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates `len` values uniformly distributed over [`VALUE_RANGE`].
    pub(crate) fn generate(&mut self, len: usize) -> Vec<i32> {
        (0..len)
            .map(|_| self.rng.random_range(VALUE_RANGE))
            .collect()
    }
}

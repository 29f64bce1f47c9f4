//! Caller-owned random integer streams.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Stateful source of uniformly distributed integers.
///
/// Every generator and permutation routine takes one of these explicitly;
/// nothing in the crate draws from global randomness.
pub trait RandomSource {
    /// Uniform integer in the inclusive range `[low, high]`.
    ///
    /// # Panics
    /// Implementations may panic when `low > high`.
    fn next_in(&mut self, low: usize, high: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn next_in(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..=high)
    }
}

/// Deterministic stream for a given seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// Random source trait — the seam between the sampler and its randomness.
//
// The sampler draws exactly one uniform value per token on sampling sweeps
// (and one per token during initialization), in corpus traversal order.
// Tests substitute a scripted source; real runs use a seeded `StdRng`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform draws in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

/// `StdRng`-backed source that remembers its seed so runs can be replayed.
pub struct SeededSource {
    seed: u64,
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for SeededSource {
    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

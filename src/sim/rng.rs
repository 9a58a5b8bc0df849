//! Seeded random source for the scene
//!
//! Every random decision in the simulation (enemy spawn velocity, enemy fire)
//! draws from this one stream, so a seed fully determines a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Scene RNG: the run seed plus the live PCG stream
#[derive(Debug, Clone)]
pub struct SceneRng {
    seed: u64,
    rng: Pcg32,
}

impl SceneRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[min, max]`, both ends inclusive
    pub fn between(&mut self, min: i32, max: i32) -> i32 {
        self.rng.random_range(min..=max)
    }

    /// Bernoulli trial with probability `1 / n`: draws one integer in `[1, n]`
    /// and succeeds when it is 1.
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rng.random_range(1..=n) == 1
    }
}

//! Injected randomness
//!
//! The session never owns a global generator; every random draw goes through
//! a `RandomSource` so tests can substitute a scripted sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform random numbers
pub trait RandomSource {
    /// Uniform integer in `[min, max]` (inclusive)
    fn uniform_int(&mut self, min: i64, max: i64) -> i64;
    /// Uniform float in `[min, max)`
    fn uniform_float(&mut self, min: f32, max: f32) -> f32;
}

/// Seeded PCG generator for reproducible sessions
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn uniform_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }
}

// Jitter Sources
// Uniform noise added to the heuristic fake score to model sampling uncertainty

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Default half-width of the heuristic fake-score jitter.
pub const DEFAULT_JITTER_BOUND: f64 = 0.2;

pub trait JitterSource: Send + Sync {
    /// Uniform sample in `[-bound, bound]`. A non-positive bound yields 0.
    fn sample(&self, bound: f64) -> f64;
}

/// Thread-local RNG; non-deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn sample(&self, bound: f64) -> f64 {
        if bound <= 0.0 {
            return 0.0;
        }
        rand::rng().random_range(-bound..=bound)
    }
}

/// Reproducible jitter from a fixed seed.
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&self, bound: f64) -> f64 {
        if bound <= 0.0 {
            return 0.0;
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.random_range(-bound..=bound)
    }
}

/// No noise at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn sample(&self, _bound: f64) -> f64 {
        0.0
    }
}

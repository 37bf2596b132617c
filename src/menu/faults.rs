//! Random fault injection for the list endpoint.
//!
//! # Design Decisions
//! - The failure rate is a fixed constant
//! - Draws come from a `RandomSource` owned by the injector, so tests can
//!   substitute a seeded or fixed source

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability that a list request fails with a simulated upstream error.
pub const FAILURE_RATE: f64 = 0.1;

/// Source of uniform draws in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Per-thread entropy-seeded generator. The production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic generator for reproducible runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        let mut rng = self.rng.lock().expect("seeded rng mutex poisoned");
        rng.gen::<f64>()
    }
}

/// Decides, per call, whether to simulate an upstream failure.
pub struct FaultInjector {
    source: Box<dyn RandomSource>,
}

impl FaultInjector {
    pub fn new<R: RandomSource + 'static>(source: R) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Draw once; `true` means the caller should fail this request.
    pub fn should_fail(&self) -> bool {
        self.source.next_unit() < FAILURE_RATE
    }
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}

impl std::fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultInjector")
            .field("failure_rate", &FAILURE_RATE)
            .finish()
    }
}

//! Biased two-way outcome generator.
//!
//! Every draw is independent: one uniform sample compared against a single
//! threshold. There is no memoization and no seeding requirement, although
//! a seeded source is available for reproducible headless runs.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default probability of a [`Outcome::Rare`] draw.
pub const DEFAULT_RARE_PROBABILITY: f64 = 0.10;

/// Result of a single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Common,
    Rare,
}

impl Outcome {
    pub fn is_rare(self) -> bool {
        matches!(self, Outcome::Rare)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Common => write!(f, "common"),
            Outcome::Rare => write!(f, "rare"),
        }
    }
}

/// The two fixed integers an outcome is displayed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeValues {
    pub common: i64,
    pub rare: i64,
}

impl Default for OutcomeValues {
    fn default() -> Self {
        Self {
            common: 69,
            rare: 67,
        }
    }
}

impl OutcomeValues {
    /// Integer shown for an outcome.
    pub fn value_of(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Common => self.common,
            Outcome::Rare => self.rare,
        }
    }
}

/// Anything that can produce outcomes on demand.
pub trait OutcomeSource {
    fn draw(&mut self) -> Outcome;
}

/// Uniform-threshold generator backed by a `rand` RNG.
#[derive(Debug, Clone)]
pub struct RandomOutcomes<R = ThreadRng> {
    rng: R,
    rare_probability: f64,
}

impl RandomOutcomes<ThreadRng> {
    /// Generator using the thread-local, non-deterministic RNG.
    pub fn new(rare_probability: f64) -> Self {
        Self::with_rng(rand::thread_rng(), rare_probability)
    }
}

impl RandomOutcomes<StdRng> {
    /// Generator with a fixed seed, for reproducible runs.
    pub fn seeded(rare_probability: f64, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), rare_probability)
    }
}

impl<R: Rng> RandomOutcomes<R> {
    pub fn with_rng(rng: R, rare_probability: f64) -> Self {
        Self {
            rng,
            rare_probability: rare_probability.clamp(0.0, 1.0),
        }
    }

    pub fn rare_probability(&self) -> f64 {
        self.rare_probability
    }
}

impl<R: Rng> OutcomeSource for RandomOutcomes<R> {
    fn draw(&mut self) -> Outcome {
        // gen::<f64>() is uniform on [0, 1), so p = 0.0 never yields Rare
        // and p = 1.0 always does.
        if self.rng.gen::<f64>() < self.rare_probability {
            Outcome::Rare
        } else {
            Outcome::Common
        }
    }
}

impl<T: OutcomeSource + ?Sized> OutcomeSource for Box<T> {
    fn draw(&mut self) -> Outcome {
        (**self).draw()
    }
}

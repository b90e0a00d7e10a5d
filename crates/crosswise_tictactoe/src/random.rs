//! Injected randomness for tie-breaks, probability checks and delays.
//!
//! Strategies never touch a global generator. Production code uses
//! [`SeededRandom`]; tests substitute [`ScriptedRandom`] to pin every draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::instrument;

/// Source of uniform random draws.
pub trait RandomSource: Send {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform real in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Returns true with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform integer in `min..=max`.
    fn between(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        let offset = (self.unit() * span as f64) as u64;
        min + offset.min(span - 1)
    }
}

/// Picks one element uniformly, or `None` when `items` is empty.
pub fn choose<T: Copy, R: RandomSource + ?Sized>(rng: &mut R, items: &[T]) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.pick(items.len()).min(items.len() - 1);
    Some(items[index])
}

/// [`RandomSource`] backed by a seedable standard generator.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Creates a reproducible source from `seed`.
    #[instrument]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// [`RandomSource`] replaying fixed sequences.
///
/// Once a sequence runs dry it keeps answering with its fallback (`0` for
/// picks, `0.0` for units unless changed with [`ScriptedRandom::with_fallback_unit`]).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
    units: VecDeque<f64>,
    fallback_unit: f64,
}

impl ScriptedRandom {
    /// Creates a source that always picks index 0 and draws 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues index picks, consumed in order.
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Queues unit draws, consumed in order.
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    /// Sets the unit draw returned once the queue is empty.
    pub fn with_fallback_unit(mut self, unit: f64) -> Self {
        self.fallback_unit = unit;
        self
    }

    /// Number of unit draws still queued.
    pub fn remaining_units(&self) -> usize {
        self.units.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(self.fallback_unit)
    }
}

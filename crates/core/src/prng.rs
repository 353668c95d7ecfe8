//! Deterministic random sources for particle spawning.
//!
//! Spawn positions are drawn through the [`UniformSource`] trait so the
//! population can be seeded from the reproducible [`Xorshift64`] generator in
//! production and from a fixed script in tests.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed `f64` values in [0, 1).
pub trait UniformSource {
    /// Returns the next value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a value in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the (13, 7, 17) shift triple. A seed of 0 is replaced with a fixed
/// non-zero value, since zero is a fixed point of the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl UniformSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` scaled by 2^-53, so every mantissa bit is random.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into [0, 1). Used to place particles at exact
/// coordinates in reproducible scenarios.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Creates a source replaying `values`. An empty list yields 0.0 forever.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl UniformSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

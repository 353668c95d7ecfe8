//! Coherent noise sampling for the flow field.
//!
//! A [`NoiseSampler`] maps continuous coordinates to a scalar in [-1, 1].
//! The production sampler is [`NoiseField`], a fractal sum of Perlin octaves;
//! [`ConstantField`] returns a fixed value and is used to drive particles
//! along known headings.
//!
//! All implementations are deterministic: same inputs produce the same output.

use crate::error::SimError;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// A smooth scalar function of 2D space, optionally evolving over time.
pub trait NoiseSampler: Send + Sync {
    /// Sample the static field at `(x, y)`.
    fn sample2(&self, x: f64, y: f64) -> f64;

    /// Sample the field at `(x, y)` at time coordinate `t`.
    fn sample3(&self, x: f64, y: f64, t: f64) -> f64;
}

/// Octave configuration for [`NoiseField`].
///
/// Each successive octave has its amplitude divided by `alpha` and its
/// frequency multiplied by `beta`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    pub alpha: f64,
    pub beta: f64,
    pub octaves: usize,
    pub seed: u32,
}

impl NoiseConfig {
    /// Upper bound on octave count accepted by the fractal generator.
    pub const MAX_OCTAVES: usize = 32;

    /// Checks that the configuration describes a usable fractal sum.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(SimError::invalid_param("alpha", "must be finite and > 0"));
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(SimError::invalid_param("beta", "must be finite and > 0"));
        }
        if self.octaves == 0 || self.octaves > Self::MAX_OCTAVES {
            return Err(SimError::invalid_param(
                "octaves",
                format!("must be in 1..={}", Self::MAX_OCTAVES),
            ));
        }
        Ok(())
    }
}

/// Folds a 64-bit run seed into the 32-bit seed the noise generator takes.
pub fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Fractal Perlin noise field, clamped to [-1, 1].
#[derive(Debug, Clone)]
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    config: NoiseConfig,
}

impl NoiseField {
    /// Builds the generator. Fails if `config` does not validate.
    pub fn new(config: NoiseConfig) -> Result<Self, SimError> {
        config.validate()?;
        let fbm = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves)
            .set_frequency(1.0)
            .set_persistence(1.0 / config.alpha)
            .set_lacunarity(config.beta);
        Ok(Self { fbm, config })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }
}

impl NoiseSampler for NoiseField {
    fn sample2(&self, x: f64, y: f64) -> f64 {
        self.fbm.get([x, y]).clamp(-1.0, 1.0)
    }

    fn sample3(&self, x: f64, y: f64, t: f64) -> f64 {
        self.fbm.get([x, y, t]).clamp(-1.0, 1.0)
    }
}

/// A field that returns the same value everywhere, at all times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantField(pub f64);

impl NoiseSampler for ConstantField {
    fn sample2(&self, _x: f64, _y: f64) -> f64 {
        self.0
    }

    fn sample3(&self, _x: f64, _y: f64, _t: f64) -> f64 {
        self.0
    }
}

impl<T: NoiseSampler + ?Sized> NoiseSampler for Box<T> {
    fn sample2(&self, x: f64, y: f64) -> f64 {
        (**self).sample2(x, y)
    }

    fn sample3(&self, x: f64, y: f64, t: f64) -> f64 {
        (**self).sample3(x, y, t)
    }
}

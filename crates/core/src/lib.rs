#![deny(unsafe_code)]
//! Core types and traits for the flowfield particle simulation.
//!
//! Provides the [`NoiseSampler`] trait and its fractal Perlin implementation,
//! the [`RenderSink`] boundary, the [`Rgba`] color, the `Xorshift64` PRNG,
//! [`RunSeed`], and JSON parameter helpers.

pub mod color;
pub mod error;
pub mod noise_field;
pub mod params;
pub mod prng;
pub mod seed;
pub mod sink;

pub use color::Rgba;
pub use error::SimError;
pub use noise_field::{ConstantField, NoiseConfig, NoiseField, NoiseSampler};
pub use prng::{ScriptedSource, UniformSource, Xorshift64};
pub use seed::RunSeed;
pub use sink::{NullSink, RecordingSink, RenderSink, SinkEvent};

#![deny(unsafe_code)]
//! Flow-field particle simulation.
//!
//! Particles drift across a bounded canvas, each tick turning toward the
//! heading given by a coherent noise field. When every particle has left the
//! canvas the epoch ends: particles return to their spawn points and the
//! field advances in time, producing a new set of trails.
//!
//! The pieces, leaf first: [`Population`] owns particle state,
//! [`integrate`](integrate::integrate) moves one particle, and
//! [`EpochController`] sweeps the population and manages resets. A
//! [`Runner`] paces the controller in real or virtual time.

pub mod clock;
pub mod config;
pub mod epoch;
pub mod integrate;
pub mod particle;

pub use clock::{Clock, ManualClock, Runner, SystemClock};
pub use config::{FlowMode, FlowParams};
pub use epoch::{EpochController, EpochStats, Phase, SimulationState, TickOutcome};
pub use integrate::{Boundary, Sampling, StepConfig, StepOutcome};
pub use particle::{Particle, Population};

/// The production controller: fractal Perlin noise.
pub type FlowSimulation = EpochController<flowfield_core::NoiseField>;

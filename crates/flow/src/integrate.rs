//! The per-particle integration step.
//!
//! One step samples the noise field under the particle, turns the sample into
//! a heading, moves the particle `speed` units along it, re-checks the canvas
//! bounds and plots the landing pixel.

use crate::particle::Particle;
use flowfield_core::{NoiseSampler, RenderSink, Rgba};
use glam::DVec2;
use std::f64::consts::TAU;

/// Which noise dimensionality drives the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// `sample2(x, y)`: the field never changes.
    Planar,
    /// `sample3(x, y, t)`: the field evolves with the time coordinate.
    Temporal,
}

/// Fate of a particle that steps off the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Deactivate it until the next reset.
    Retire,
    /// Keep stepping it; it is plotted again once back on the canvas.
    Roam,
}

/// Constants shared by every step of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    pub zoom: f64,
    pub speed: f64,
    pub width: usize,
    pub height: usize,
    pub sampling: Sampling,
    pub boundary: Boundary,
    pub color: Rgba,
}

/// What one call to [`integrate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved and plotted at this pixel.
    Plotted { x: usize, y: usize },
    /// Moved outside the canvas and was deactivated.
    Exited,
    /// Moved or stayed outside the canvas, still active, nothing plotted.
    Offscreen,
    /// Already inactive; untouched.
    Inactive,
}

/// Maps a noise sample in [-1, 1] onto a full turn.
pub fn direction_angle(force: f64) -> f64 {
    force * TAU
}

/// Strict canvas test: `0 <= x < width` and `0 <= y < height`.
pub fn in_bounds(position: DVec2, width: usize, height: usize) -> bool {
    position.x >= 0.0
        && position.y >= 0.0
        && position.x < width as f64
        && position.y < height as f64
}

/// Nearest pixel to `position`, or `None` when the position is off the canvas.
///
/// Positions within half a pixel of the far edge round onto `width` or
/// `height`; those land on the last row or column.
pub fn to_pixel(position: DVec2, width: usize, height: usize) -> Option<(usize, usize)> {
    if !in_bounds(position, width, height) {
        return None;
    }
    let x = (position.x.round() as usize).min(width - 1);
    let y = (position.y.round() as usize).min(height - 1);
    Some((x, y))
}

/// Advances one particle by one step and plots it.
///
/// Inactive particles are left alone and nothing reaches the sink for them.
/// Every active particle that lands on the canvas is plotted exactly once.
pub fn integrate<F, S>(
    particle: &mut Particle,
    field: &F,
    time: f64,
    config: &StepConfig,
    sink: &mut S,
) -> StepOutcome
where
    F: NoiseSampler + ?Sized,
    S: RenderSink + ?Sized,
{
    if !particle.is_active() {
        return StepOutcome::Inactive;
    }

    let scaled = particle.position() / config.zoom;
    let force = match config.sampling {
        Sampling::Planar => field.sample2(scaled.x, scaled.y),
        Sampling::Temporal => field.sample3(scaled.x, scaled.y, time),
    };
    let angle = direction_angle(force);
    let next = particle.position() + DVec2::new(angle.cos(), angle.sin()) * config.speed;
    particle.move_to(next);

    match (to_pixel(next, config.width, config.height), config.boundary) {
        (Some((x, y)), _) => {
            sink.plot(x, y, config.color);
            StepOutcome::Plotted { x, y }
        }
        (None, Boundary::Retire) => {
            particle.deactivate();
            StepOutcome::Exited
        }
        (None, Boundary::Roam) => StepOutcome::Offscreen,
    }
}

//! Named simulation constants and their JSON form.

use flowfield_core::noise_field::{noise_seed, NoiseConfig};
use flowfield_core::params::{param_f64, param_string, param_u64, param_usize};
use flowfield_core::{Rgba, SimError};
use serde_json::{json, Value};
use std::time::Duration;

use crate::integrate::{Boundary, Sampling, StepConfig};

const DEFAULT_WIDTH: usize = 500;
const DEFAULT_HEIGHT: usize = 500;
/// Per-octave amplitude divisor.
const DEFAULT_ALPHA: f64 = 10.0;
/// Per-octave frequency multiplier.
const DEFAULT_BETA: f64 = 3.0;
const DEFAULT_OCTAVES: usize = 3;
/// Canvas coordinates are divided by this before sampling noise.
const DEFAULT_ZOOM: f64 = 100.0;
const DEFAULT_SPEED: f64 = 1.0;
const DEFAULT_PARTICLES: usize = 100;
const DEFAULT_Z_INCREMENT: f64 = 0.01;
const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
const DEFAULT_COLOR: Rgba = Rgba::opaque(10, 10, 250);
const DEFAULT_BACKGROUND: Rgba = Rgba::BLACK;

/// How the controller treats a population that has fully left the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowMode {
    /// Reset every particle to its origin and advance the field in time.
    #[default]
    Epochs,
    /// Static 2D field, no resets: particles keep drifting even while off
    /// the canvas and are drawn again whenever they come back.
    Continuous,
}

impl FlowMode {
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name {
            "epochs" => Ok(FlowMode::Epochs),
            "continuous" => Ok(FlowMode::Continuous),
            other => Err(SimError::invalid_param(
                "mode",
                format!("unknown mode '{other}', expected 'epochs' or 'continuous'"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowMode::Epochs => "epochs",
            FlowMode::Continuous => "continuous",
        }
    }

    /// Noise dimensionality used by this mode.
    pub fn sampling(self) -> Sampling {
        match self {
            FlowMode::Epochs => Sampling::Temporal,
            FlowMode::Continuous => Sampling::Planar,
        }
    }

    /// What happens to a particle that steps off the canvas.
    pub fn boundary(self) -> Boundary {
        match self {
            FlowMode::Epochs => Boundary::Retire,
            FlowMode::Continuous => Boundary::Roam,
        }
    }
}

/// Every tunable constant of a flow-field run.
///
/// [`Default`] reproduces the classic 500x500 canvas with 100 blue particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParams {
    pub width: usize,
    pub height: usize,
    pub alpha: f64,
    pub beta: f64,
    pub octaves: usize,
    pub zoom: f64,
    pub speed: f64,
    pub particles: usize,
    /// Added to the field's time coordinate at each epoch reset.
    pub z_increment: f64,
    pub tick_interval_ms: u64,
    pub color: Rgba,
    pub background: Rgba,
    pub mode: FlowMode,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
            octaves: DEFAULT_OCTAVES,
            zoom: DEFAULT_ZOOM,
            speed: DEFAULT_SPEED,
            particles: DEFAULT_PARTICLES,
            z_increment: DEFAULT_Z_INCREMENT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            color: DEFAULT_COLOR,
            background: DEFAULT_BACKGROUND,
            mode: FlowMode::default(),
        }
    }
}

impl FlowParams {
    /// Reads parameters from a JSON object, falling back to defaults for
    /// missing or mistyped keys, then validates the result.
    ///
    /// Colors and mode are strings and must parse when present.
    pub fn from_json(params: &Value) -> Result<Self, SimError> {
        let color = match params.get("color").and_then(Value::as_str) {
            Some(hex) => Rgba::from_hex(hex)?,
            None => DEFAULT_COLOR,
        };
        let background = match params.get("background").and_then(Value::as_str) {
            Some(hex) => Rgba::from_hex(hex)?,
            None => DEFAULT_BACKGROUND,
        };
        let mode = FlowMode::from_name(&param_string(params, "mode", FlowMode::Epochs.as_str()))?;
        let parsed = Self {
            width: param_usize(params, "width", DEFAULT_WIDTH),
            height: param_usize(params, "height", DEFAULT_HEIGHT),
            alpha: param_f64(params, "alpha", DEFAULT_ALPHA),
            beta: param_f64(params, "beta", DEFAULT_BETA),
            octaves: param_usize(params, "octaves", DEFAULT_OCTAVES),
            zoom: param_f64(params, "zoom", DEFAULT_ZOOM),
            speed: param_f64(params, "speed", DEFAULT_SPEED),
            particles: param_usize(params, "particles", DEFAULT_PARTICLES),
            z_increment: param_f64(params, "z_increment", DEFAULT_Z_INCREMENT),
            tick_interval_ms: param_u64(params, "tick_interval_ms", DEFAULT_TICK_INTERVAL_MS),
            color,
            background,
            mode,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Same parameters with the canvas resized.
    pub fn with_dimensions(self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(SimError::InvalidDimensions)?;
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(SimError::invalid_param("zoom", "must be finite and > 0"));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(SimError::invalid_param("speed", "must be finite and > 0"));
        }
        if !self.z_increment.is_finite() || self.z_increment < 0.0 {
            return Err(SimError::invalid_param(
                "z_increment",
                "must be finite and >= 0",
            ));
        }
        self.noise_config(0).validate()
    }

    /// Noise generator configuration for a run seeded with `seed`.
    pub fn noise_config(&self, seed: u64) -> NoiseConfig {
        NoiseConfig {
            alpha: self.alpha,
            beta: self.beta,
            octaves: self.octaves,
            seed: noise_seed(seed),
        }
    }

    /// Per-particle integration constants.
    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            zoom: self.zoom,
            speed: self.speed,
            width: self.width,
            height: self.height,
            sampling: self.mode.sampling(),
            boundary: self.mode.boundary(),
            color: self.color,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Current values as a JSON object accepted by [`from_json`](Self::from_json).
    pub fn to_json(&self) -> Value {
        json!({
            "width": self.width,
            "height": self.height,
            "alpha": self.alpha,
            "beta": self.beta,
            "octaves": self.octaves,
            "zoom": self.zoom,
            "speed": self.speed,
            "particles": self.particles,
            "z_increment": self.z_increment,
            "tick_interval_ms": self.tick_interval_ms,
            "color": self.color.to_hex(),
            "background": self.background.to_hex(),
            "mode": self.mode.as_str(),
        })
    }

    /// Type, default, range and description of every parameter.
    pub fn param_schema() -> Value {
        json!({
            "width": {
                "type": "integer",
                "default": DEFAULT_WIDTH,
                "min": 1,
                "description": "Canvas width in pixels"
            },
            "height": {
                "type": "integer",
                "default": DEFAULT_HEIGHT,
                "min": 1,
                "description": "Canvas height in pixels"
            },
            "alpha": {
                "type": "number",
                "default": DEFAULT_ALPHA,
                "min": 0.0,
                "description": "Noise amplitude divisor applied per octave"
            },
            "beta": {
                "type": "number",
                "default": DEFAULT_BETA,
                "min": 0.0,
                "description": "Noise frequency multiplier applied per octave"
            },
            "octaves": {
                "type": "integer",
                "default": DEFAULT_OCTAVES,
                "min": 1,
                "max": NoiseConfig::MAX_OCTAVES,
                "description": "Number of noise octaves summed"
            },
            "zoom": {
                "type": "number",
                "default": DEFAULT_ZOOM,
                "min": 0.0,
                "description": "Divisor applied to canvas coordinates before sampling"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": 0.0,
                "description": "Distance moved by a particle per tick"
            },
            "particles": {
                "type": "integer",
                "default": DEFAULT_PARTICLES,
                "min": 0,
                "description": "Number of particles spawned at startup"
            },
            "z_increment": {
                "type": "number",
                "default": DEFAULT_Z_INCREMENT,
                "min": 0.0,
                "description": "Field time advance per completed epoch"
            },
            "tick_interval_ms": {
                "type": "integer",
                "default": DEFAULT_TICK_INTERVAL_MS,
                "min": 0,
                "description": "Real-time delay between ticks"
            },
            "color": {
                "type": "color",
                "default": DEFAULT_COLOR.to_hex(),
                "description": "Particle trail color"
            },
            "background": {
                "type": "color",
                "default": DEFAULT_BACKGROUND.to_hex(),
                "description": "Canvas color after each epoch reset"
            },
            "mode": {
                "type": "string",
                "default": FlowMode::Epochs.as_str(),
                "options": ["epochs", "continuous"],
                "description": "epochs: reset and evolve the field; continuous: endless drift over a static field"
            }
        })
    }
}

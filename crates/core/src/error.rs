//! Error types for flowfield.
//!
//! The simulation itself is total: stepping, sampling and resetting never
//! fail. Errors only surface when building a simulation from parameters or
//! when writing output.

use thiserror::Error;

/// Errors produced while configuring a simulation or writing its output.
#[derive(Debug, Error)]
pub enum SimError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A parameter was present but its value cannot drive a simulation.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing a snapshot or sidecar failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl SimError {
    /// Shorthand for [`SimError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

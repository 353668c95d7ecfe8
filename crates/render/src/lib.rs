#![deny(unsafe_code)]
//! Concrete render sinks for flowfield.
//!
//! [`PixelCanvas`] is an in-memory RGBA8 buffer, [`SharedCanvas`] lets a
//! simulation thread and a presenter thread use one buffer safely, and
//! [`snapshot::write_png`] saves a canvas to disk.

pub mod canvas;
pub mod shared;

#[cfg(feature = "png")]
pub mod snapshot;

pub use canvas::PixelCanvas;
pub use shared::SharedCanvas;

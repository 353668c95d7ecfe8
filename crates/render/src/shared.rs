//! A canvas shared between a simulation thread and a presenter thread.
//!
//! Every plot, clear and present takes the lock, so the simulation is the
//! single writer and readers only ever see whole-tick states when they copy
//! out between presents.

use crate::canvas::PixelCanvas;
use flowfield_core::{RenderSink, Rgba};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to a mutex-guarded [`PixelCanvas`].
#[derive(Debug, Clone)]
pub struct SharedCanvas {
    inner: Arc<Mutex<PixelCanvas>>,
}

impl SharedCanvas {
    pub fn new(canvas: PixelCanvas) -> Self {
        Self {
            inner: Arc::new(Mutex::new(canvas)),
        }
    }

    /// A poisoned lock still holds a usable pixel buffer, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, PixelCanvas> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copies the current buffer out.
    pub fn snapshot(&self) -> PixelCanvas {
        self.lock().clone()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.lock().frames()
    }

    /// Runs `f` with the canvas locked.
    pub fn with<R>(&self, f: impl FnOnce(&PixelCanvas) -> R) -> R {
        f(&self.lock())
    }
}

impl RenderSink for SharedCanvas {
    fn clear(&mut self) {
        self.lock().clear();
    }

    fn plot(&mut self, x: usize, y: usize, color: Rgba) {
        self.lock().plot(x, y, color);
    }

    fn present(&mut self) {
        self.lock().present();
    }
}

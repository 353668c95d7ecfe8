//! The `RenderSink` trait: the only boundary between the simulation and
//! whatever displays it.
//!
//! The trait is object-safe so a controller can drive `&mut dyn RenderSink`
//! when the presentation layer is chosen at runtime.

use crate::color::Rgba;

/// Receives plotted pixels from the simulation.
///
/// Per tick the simulation calls [`plot`](RenderSink::plot) once for each
/// particle that moved to an in-canvas pixel, then
/// [`present`](RenderSink::present) exactly once. [`clear`](RenderSink::clear)
/// is called only at an epoch reset, so trails accumulate within an epoch.
pub trait RenderSink {
    /// Clear the drawing surface to its background color.
    fn clear(&mut self);

    /// Plot one pixel. Callers guarantee `x < width` and `y < height`.
    fn plot(&mut self, x: usize, y: usize, color: Rgba);

    /// Signal that the current tick's pixels are ready to display.
    fn present(&mut self);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn plot(&mut self, x: usize, y: usize, color: Rgba) {
        (**self).plot(x, y, color);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn plot(&mut self, x: usize, y: usize, color: Rgba) {
        (**self).plot(x, y, color);
    }

    fn present(&mut self) {
        (**self).present();
    }
}

/// Discards everything. Useful for running a simulation purely for its state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn clear(&mut self) {}
    fn plot(&mut self, _x: usize, _y: usize, _color: Rgba) {}
    fn present(&mut self) {}
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    Clear,
    Plot { x: usize, y: usize, color: Rgba },
    Present,
}

/// Records every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far, oldest first.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Only the plotted coordinates, in emission order.
    pub fn plots(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                SinkEvent::Plot { x, y, .. } => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, kind: fn(&SinkEvent) -> bool) -> usize {
        self.events.iter().filter(|e| kind(e)).count()
    }

    /// Drops recorded events, keeping the allocation.
    pub fn reset(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.events.push(SinkEvent::Clear);
    }

    fn plot(&mut self, x: usize, y: usize, color: Rgba) {
        self.events.push(SinkEvent::Plot { x, y, color });
    }

    fn present(&mut self) {
        self.events.push(SinkEvent::Present);
    }
}

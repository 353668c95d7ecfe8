//! RGBA8 pixel buffer that implements [`RenderSink`].

use flowfield_core::{RenderSink, Rgba, SimError};

/// A row-major RGBA8 image with a background color.
///
/// `plot` overwrites one pixel, `clear` refills with the background, and
/// `present` only counts frames: the buffer is always readable.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    background: Rgba,
    data: Vec<u8>,
    frames: u64,
}

impl PixelCanvas {
    /// Creates a canvas filled with `background`.
    ///
    /// Returns `SimError::InvalidDimensions` if either dimension is zero or
    /// the byte length overflows `usize`.
    pub fn new(width: usize, height: usize, background: Rgba) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        let mut canvas = Self {
            width,
            height,
            background,
            data: vec![0; len],
            frames: 0,
        };
        canvas.fill(background);
        Ok(canvas)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Number of `present` calls received.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` off the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        let px = &self.data[i..i + 4];
        Some(Rgba {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Number of pixels that differ from the background.
    pub fn painted(&self) -> usize {
        let bg = self.background.to_bytes();
        self.data.chunks_exact(4).filter(|px| *px != bg.as_slice()).count()
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * 4)
    }

    fn fill(&mut self, color: Rgba) {
        let bytes = color.to_bytes();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }
}

impl RenderSink for PixelCanvas {
    fn clear(&mut self) {
        self.fill(self.background);
    }

    /// Off-canvas coordinates are dropped.
    fn plot(&mut self, x: usize, y: usize, color: Rgba) {
        match self.offset(x, y) {
            Some(i) => self.data[i..i + 4].copy_from_slice(&color.to_bytes()),
            None => log::warn!(
                "dropped plot at ({x}, {y}) outside {}x{} canvas",
                self.width,
                self.height
            ),
        }
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

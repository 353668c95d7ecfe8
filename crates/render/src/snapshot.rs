//! PNG output of a [`PixelCanvas`].
//!
//! Feature-gated behind `png` (default on) so the `image` dependency stays
//! optional.

use crate::canvas::PixelCanvas;
use flowfield_core::SimError;
use std::path::Path;

/// Writes the canvas as an RGBA PNG.
///
/// Returns `SimError::InvalidDimensions` if a dimension overflows `u32`, or
/// `SimError::Io` on encode or write failure.
pub fn write_png(canvas: &PixelCanvas, path: &Path) -> Result<(), SimError> {
    let w = u32::try_from(canvas.width()).map_err(|_| SimError::InvalidDimensions)?;
    let h = u32::try_from(canvas.height()).map_err(|_| SimError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, canvas.data().to_vec())
        .ok_or_else(|| SimError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?;
    log::info!("wrote {}x{} snapshot to {}", w, h, path.display());
    Ok(())
}

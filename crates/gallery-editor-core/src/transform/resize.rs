//! Resampling to new dimensions.
//!
//! Uses the `image` crate's triangle (bilinear) filter, which is what a 2D
//! canvas `drawImage` scale produces by default.

use image::imageops::FilterType;

use super::TransformError;
use crate::surface::{buffer_len, Surface};

/// Resize a surface to exact dimensions.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimensions` for a zero or unallocatable
/// target size and `TransformError::InvalidSurface` if the source cannot be
/// converted.
pub fn resize(surface: &Surface, width: u32, height: u32) -> Result<Surface, TransformError> {
    if width == 0 || height == 0 || buffer_len(width, height).is_none() {
        return Err(TransformError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if surface.width == width && surface.height == height && surface.is_valid() {
        return Ok(surface.clone());
    }

    let rgba = surface
        .to_rgba_image()
        .filter(|_| surface.is_valid())
        .ok_or(TransformError::InvalidSurface)?;

    let resized = image::imageops::resize(&rgba, width, height, FilterType::Triangle);
    Ok(Surface::from_rgba_image(resized))
}

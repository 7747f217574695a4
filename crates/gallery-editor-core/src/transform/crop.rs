//! Image cropping and ratio-constrained crop regions.
//!
//! Crop regions are expressed in whole pixels of the source surface. A region
//! for a fixed aspect ratio is the largest rectangle of that ratio that fits
//! in the surface, centered on both axes.
//!
//! # Example
//!
//! ```ignore
//! let region = CropRegion::centered(1920, 1080, AspectRatio::Square);
//! assert_eq!(region, CropRegion { x: 420, y: 0, width: 1080, height: 1080 });
//! let cropped = crop(&surface, &region)?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::surface::{Surface, CHANNELS};

/// Crop aspect ratio presets offered by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Keep the current dimensions.
    #[default]
    #[serde(rename = "free")]
    Free,
    /// 1:1
    #[serde(rename = "1:1")]
    Square,
    /// 4:3
    #[serde(rename = "4:3")]
    Standard,
    /// 16:9
    #[serde(rename = "16:9")]
    Widescreen,
    /// 16:10
    #[serde(rename = "16:10")]
    Widescreen16x10,
}

impl AspectRatio {
    /// (width, height) terms of the ratio, or `None` for [`AspectRatio::Free`].
    pub fn terms(self) -> Option<(u32, u32)> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some((1, 1)),
            AspectRatio::Standard => Some((4, 3)),
            AspectRatio::Widescreen => Some((16, 9)),
            AspectRatio::Widescreen16x10 => Some((16, 10)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Free => "free",
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Widescreen16x10 => "16:10",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = TransformError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" | "" => Ok(AspectRatio::Free),
            "1:1" => Ok(AspectRatio::Square),
            "4:3" => Ok(AspectRatio::Standard),
            "16:9" => Ok(AspectRatio::Widescreen),
            "16:10" => Ok(AspectRatio::Widescreen16x10),
            _ => Err(TransformError::UnsupportedRatio(value.to_string())),
        }
    }
}

/// Axis-aligned crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Largest region of `ratio` that fits a `width x height` surface, centered.
    ///
    /// When the surface is wider than the ratio the full height is kept,
    /// otherwise the full width. Fractional sizes round down (but never below one
    /// pixel) so the region always stays inside the surface.
    pub fn centered(width: u32, height: u32, ratio: AspectRatio) -> Self {
        let Some((rw, rh)) = ratio.terms() else {
            return Self::full(width, height);
        };
        if width == 0 || height == 0 {
            return Self::full(width, height);
        }

        let (w, h) = (width as u64, height as u64);
        let (rw, rh) = (rw as u64, rh as u64);

        // width / height > rw / rh, compared without floating point
        let (crop_w, crop_h) = if w * rh > h * rw {
            ((h * rw / rh).clamp(1, w), h)
        } else {
            (w, (w * rh / rw).clamp(1, h))
        };

        Self {
            x: ((w - crop_w) / 2) as u32,
            y: ((h - crop_h) / 2) as u32,
            width: crop_w as u32,
            height: crop_h as u32,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// True if the region lies entirely within a `width x height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// True if the region has a zero dimension.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Copy a region of a surface into a new surface.
///
/// # Errors
///
/// - [`TransformError::EmptyRegion`] if the region has no area
/// - [`TransformError::CropOutOfBounds`] if it extends past the surface
/// - [`TransformError::InvalidSurface`] if the source buffer is detached
pub fn crop(surface: &Surface, region: &CropRegion) -> Result<Surface, TransformError> {
    if region.is_empty() {
        return Err(TransformError::EmptyRegion);
    }
    if !region.fits_within(surface.width, surface.height) {
        return Err(TransformError::CropOutOfBounds {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            surface_width: surface.width,
            surface_height: surface.height,
        });
    }
    if !surface.is_valid() {
        return Err(TransformError::InvalidSurface);
    }

    // Fast path: full crop returns a clone
    if region.x == 0
        && region.y == 0
        && region.width == surface.width
        && region.height == surface.height
    {
        return Ok(surface.clone());
    }

    let src_row = surface.width as usize * CHANNELS;
    let dst_row = region.width as usize * CHANNELS;
    let x_offset = region.x as usize * CHANNELS;
    let mut pixels = Vec::with_capacity(dst_row * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = y as usize * src_row + x_offset;
        pixels.extend_from_slice(&surface.pixels[start..start + dst_row]);
    }

    Ok(Surface {
        width: region.width,
        height: region.height,
        pixels,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! Drawable RGBA surfaces.
//!
//! A [`Surface`] is the editor's off-screen canvas: a row-major RGBA8 buffer
//! with explicit dimensions. Every transform and filter in this crate takes a
//! `&Surface` and returns a brand new one, so a surface is never modified
//! after it has been handed to the pipeline.

use thiserror::Error;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Errors raised when building a surface from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Pixel buffer length does not match `width * height * 4`.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Dimensions whose RGBA buffer cannot be addressed.
    #[error("Surface dimensions {width}x{height} are too large")]
    TooLarge { width: u32, height: u32 },
}

/// An in-memory RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

/// Allocate a blank, fully transparent surface of the given dimensions.
///
/// A zero dimension yields an empty surface.
pub fn create_surface(width: u32, height: u32) -> Result<Surface, SurfaceError> {
    let len = buffer_len(width, height).ok_or(SurfaceError::TooLarge { width, height })?;
    Ok(Surface {
        width,
        height,
        pixels: vec![0u8; len],
    })
}

/// Number of bytes an RGBA buffer of the given dimensions occupies, or `None`
/// when it would not fit in an allocation.
#[inline]
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
        .filter(|&len| len <= isize::MAX as usize)
}

impl Surface {
    /// Wrap an existing RGBA buffer, checking its length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SurfaceError> {
        let expected = buffer_len(width, height).ok_or(SurfaceError::TooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(SurfaceError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a surface filled with a single RGBA color.
    ///
    /// Dimensions too large to allocate leave the buffer empty.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(buffer_len(width, height).unwrap_or(0))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Surface from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for codec and resampling work.
    ///
    /// Returns `None` when the buffer does not match the dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// (width, height) pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// True when the buffer length agrees with the dimensions and neither
    /// dimension is zero. Anything else is treated as a detached surface.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && buffer_len(self.width, self.height) == Some(self.pixels.len())
    }

    /// RGBA value at (x, y), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let px = self.pixels.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Average of the R, G and B channels over the whole surface.
    #[cfg(test)]
    pub(crate) fn mean_intensity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: u64 = self
            .pixels
            .chunks_exact(CHANNELS)
            .map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64)
            .sum();
        sum as f64 / (self.pixel_count() * 3) as f64
    }
}

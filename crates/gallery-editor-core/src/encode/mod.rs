//! Surface serialization for download and upload.
//!
//! This module provides functionality for:
//! - Encoding surfaces to PNG (lossless, keeps alpha)
//! - Encoding surfaces to JPEG with configurable quality
//!
//! # Architecture
//!
//! Encoding is synchronous here. The browser binding wraps it in a promise so
//! the editor can await it before starting an upload, mirroring
//! `canvas.toBlob`.
//!
//! # Examples
//!
//! ```ignore
//! use gallery_editor_core::encode::{encode_surface, EncodeOptions};
//!
//! let bytes = encode_surface(&surface, &EncodeOptions::default())?;
//! ```

mod jpeg;
mod png;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::{buffer_len, Surface};

pub use self::jpeg::{encode_jpeg, jpeg_quality};
pub use self::png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Format name not recognised
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The codec failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ImageFormat,
        message: String,
    },
}

/// Output formats the editor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type used for uploads and blobs.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    /// Parse a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => f.write_str("PNG"),
            ImageFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = EncodeError;

    /// Accepts `png`, `jpeg`, `jpg` or a MIME type.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            mime => Self::from_mime(mime)
                .ok_or_else(|| EncodeError::UnsupportedFormat(value.to_string())),
        }
    }
}

/// Format and quality for [`encode_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub format: ImageFormat,
    /// 0.0 to 1.0, like `canvas.toBlob`. Only JPEG uses it.
    pub quality: f32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: 1.0,
        }
    }
}

impl EncodeOptions {
    pub fn png() -> Self {
        Self::default()
    }

    pub fn jpeg(quality: f32) -> Self {
        Self {
            format: ImageFormat::Jpeg,
            quality,
        }
    }
}

/// Encode a surface with the requested format.
///
/// # Errors
///
/// Fails if the surface is detached (zero dimensions or a pixel buffer that
/// does not match them) or if the codec reports an error. Callers do not
/// retry; they reload the source image instead.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(format = %options.format, width = surface.width, height = surface.height)
)]
pub fn encode_surface(surface: &Surface, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let bytes = match options.format {
        ImageFormat::Png => encode_png(surface)?,
        ImageFormat::Jpeg => encode_jpeg(surface, jpeg_quality(options.quality))?,
    };
    tracing::debug!(bytes = bytes.len(), "surface encoded");
    Ok(bytes)
}

/// Check that a surface can be handed to a codec.
pub(crate) fn validate(surface: &Surface) -> Result<(), EncodeError> {
    if surface.width == 0 || surface.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: surface.width,
            height: surface.height,
        });
    }

    let expected =
        buffer_len(surface.width, surface.height).ok_or(EncodeError::InvalidDimensions {
            width: surface.width,
            height: surface.height,
        })?;
    if surface.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: surface.pixels.len(),
        });
    }
    Ok(())
}

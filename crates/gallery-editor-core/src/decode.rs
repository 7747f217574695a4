//! Decoding of source images into surfaces.
//!
//! The editor loads gallery images as PNG or JPEG, or as the PNG returned by
//! the background-removal service. Anything the `image` crate can sniff with
//! the enabled codecs is accepted; the result is always RGBA.

use std::io::Cursor;

use image::{ImageError, ImageReader};
use thiserror::Error;

use crate::surface::Surface;

/// Error types for image decoding operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

impl From<ImageError> for DecodeError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::Unsupported(_) => DecodeError::InvalidFormat,
            other => DecodeError::CorruptedFile(other.to_string()),
        }
    }
}

/// Decode encoded image bytes into an RGBA surface.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are empty or not a known format.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or damaged.
#[tracing::instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> Result<Surface, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode()?;
    let surface = Surface::from_rgba_image(img.into_rgba8());
    tracing::debug!(width = surface.width, height = surface.height, "image decoded");
    Ok(surface)
}

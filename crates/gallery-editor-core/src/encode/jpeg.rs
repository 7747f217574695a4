//! JPEG encoding for export.
//!
//! JPEG has no alpha channel, so transparent pixels are composited onto
//! black first, which is what a canvas does when asked for `image/jpeg`.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError, ImageFormat};
use crate::surface::{Surface, CHANNELS};

/// Map a canvas-style quality (0.0 to 1.0) onto the JPEG scale (1 to 100).
///
/// Non-finite values fall back to the maximum.
pub fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode an RGBA surface to JPEG bytes.
///
/// # Arguments
///
/// * `surface` - Source surface
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
pub fn encode_jpeg(surface: &Surface, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(surface)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let rgb: Vec<u8> = surface
        .pixels
        .chunks_exact(CHANNELS)
        .flat_map(|px| {
            let a = px[3] as u16;
            [
                ((px[0] as u16 * a + 127) / 255) as u8,
                ((px[1] as u16 * a + 127) / 255) as u8,
                ((px[2] as u16 * a + 127) / 255) as u8,
            ]
        })
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, surface.width, surface.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Jpeg,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! PNG encoding.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError, ImageFormat};
use crate::surface::Surface;

/// Encode an RGBA surface as PNG, alpha included.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, EncodeError> {
    validate(surface)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &surface.pixels,
            surface.width,
            surface.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed {
            format: ImageFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png_basic() {
        let surface = Surface::filled(16, 9, [255, 0, 0, 255]);
        let bytes = encode_png(&surface).unwrap();
        assert_eq!(&bytes[0..8], &PNG_MAGIC);
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let surface = Surface::filled(3, 3, [10, 20, 30, 40]);
        let bytes = encode_png(&surface).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [10, 20, 30, 40]);
    }

    #[test]
    fn test_encode_png_is_lossless() {
        let mut pixels = Vec::new();
        for i in 0..(10 * 7) {
            pixels.extend_from_slice(&[(i * 3) as u8, (i * 5) as u8, (i * 7) as u8, 255]);
        }
        let surface = Surface::new(10, 7, pixels).unwrap();
        let bytes = encode_png(&surface).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.into_raw(), surface.pixels);
    }

    #[test]
    fn test_encode_png_zero_width() {
        let surface = Surface {
            width: 0,
            height: 5,
            pixels: vec![],
        };
        assert!(matches!(
            encode_png(&surface),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_encode_png_deterministic() {
        let surface = Surface::filled(20, 20, [1, 2, 3, 4]);
        assert_eq!(encode_png(&surface).unwrap(), encode_png(&surface).unwrap());
    }
}

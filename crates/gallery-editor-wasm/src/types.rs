//! WASM-compatible wrapper types for image data.

use gallery_editor_core::surface::{self, Surface, SurfaceError};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// An RGBA surface wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` and `image_data()`
/// copy it into JavaScript memory. Keep surfaces in WASM while editing and
/// extract pixels only to draw.
#[wasm_bindgen]
pub struct JsSurface {
    inner: Surface,
}

#[wasm_bindgen]
impl JsSurface {
    /// Create a surface from RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// Throws if the buffer length is not `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSurface, JsValue> {
        Self::from_parts(width, height, pixels).map_err(js_error)
    }

    /// Get the surface width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the surface height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Returns the pixels as a `Uint8ClampedArray`, ready for `new ImageData(...)`.
    pub fn image_data(&self) -> js_sys::Uint8ClampedArray {
        js_sys::Uint8ClampedArray::from(self.inner.pixels.as_slice())
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSurface {
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, SurfaceError> {
        Surface::new(width, height, pixels).map(Self::from_surface)
    }

    pub(crate) fn from_surface(inner: Surface) -> Self {
        Self { inner }
    }

    pub(crate) fn as_surface(&self) -> &Surface {
        &self.inner
    }

    pub(crate) fn into_surface(self) -> Surface {
        self.inner
    }
}

/// Allocate a blank (transparent black) surface.
///
/// Throws when the dimensions are too large to allocate.
#[wasm_bindgen]
pub fn create_surface(width: u32, height: u32) -> Result<JsSurface, JsValue> {
    blank_surface(width, height).map_err(js_error)
}

fn blank_surface(width: u32, height: u32) -> Result<JsSurface, SurfaceError> {
    surface::create_surface(width, height).map(JsSurface::from_surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_surface_creation() {
        let img = JsSurface::from_parts(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_surface_rejects_wrong_length() {
        let result = JsSurface::from_parts(2, 2, vec![0u8; 12]);
        assert_eq!(
            result.err(),
            Some(SurfaceError::BufferSizeMismatch {
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn test_js_surface_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8, 4, 2];
        let img = JsSurface::from_parts(2, 1, pixels.clone()).unwrap();
        assert_eq!(img.pixels(), pixels);
        assert_eq!(img.into_surface().pixels, pixels);
    }

    #[test]
    fn test_create_surface_is_blank() {
        let img = blank_surface(3, 2).unwrap();
        assert_eq!(img.byte_length(), 24);
        assert!(img.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_create_surface_too_large() {
        assert_eq!(
            blank_surface(u32::MAX, u32::MAX).err(),
            Some(SurfaceError::TooLarge {
                width: u32::MAX,
                height: u32::MAX
            })
        );
    }
}

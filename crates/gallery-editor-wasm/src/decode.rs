//! Image decoding WASM bindings.
//!
//! ```typescript
//! const bytes = new Uint8Array(await blob.arrayBuffer());
//! const surface = decode_image(bytes);
//! console.log(`Decoded ${surface.width}x${surface.height}`);
//! ```

use gallery_editor_core::decode;
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::types::JsSurface;

/// Decode PNG or JPEG bytes into an RGBA surface.
///
/// # Errors
///
/// Throws if the bytes are not a supported image or are truncated.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSurface, JsValue> {
    decode::decode_image(bytes)
        .map(JsSurface::from_surface)
        .map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_editor_core::encode::encode_png;
    use gallery_editor_core::Surface;

    #[test]
    fn test_decode_png() {
        let bytes = encode_png(&Surface::filled(5, 4, [1, 2, 3, 4])).unwrap();
        let surface = decode_image(&bytes).unwrap();
        assert_eq!(surface.width(), 5);
        assert_eq!(surface.height(), 4);
        assert_eq!(&surface.pixels()[0..4], &[1, 2, 3, 4]);
    }
}

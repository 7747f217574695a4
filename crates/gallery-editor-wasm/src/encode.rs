//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_surface`] - Encode a surface to PNG or JPEG bytes
//! - [`surface_to_encoded_bytes`] - Same, as a Promise (the `canvas.toBlob` shape)
//!
//! # Example
//!
//! ```typescript
//! const png = encode_surface(surface, 'png', 1.0);
//!
//! const jpeg = await surface_to_encoded_bytes(surface, 'image/jpeg', 0.92);
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use gallery_editor_core::encode::{self, EncodeError, EncodeOptions, ImageFormat};
use js_sys::{Promise, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::types::JsSurface;

fn encode_with(image: &JsSurface, format: &str, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let format: ImageFormat = format.parse()?;
    encode::encode_surface(image.as_surface(), &EncodeOptions { format, quality })
}

/// Encode a surface.
///
/// # Arguments
///
/// * `format` - `"png"`, `"jpeg"`, `"jpg"` or a MIME type
/// * `quality` - 0.0 to 1.0, used by JPEG only
///
/// # Errors
///
/// Throws for an unknown format, a detached surface, or a codec failure.
#[wasm_bindgen]
pub fn encode_surface(image: &JsSurface, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    encode_with(image, format, quality).map_err(js_error)
}

/// Encode a surface, resolving with a `Uint8Array`.
///
/// The promise rejects with the failure message instead of throwing.
#[wasm_bindgen]
pub fn surface_to_encoded_bytes(image: &JsSurface, format: &str, quality: f32) -> Promise {
    match encode_with(image, format, quality) {
        Ok(bytes) => {
            let value: JsValue = Uint8Array::from(bytes.as_slice()).into();
            Promise::resolve(&value)
        }
        Err(err) => Promise::reject(&js_error(err)),
    }
}

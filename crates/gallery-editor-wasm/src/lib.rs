//! Gallery Editor WASM - WebAssembly bindings for the gallery editor
//!
//! This crate exposes the gallery-editor-core pipeline to the browser view.
//!
//! # Module Structure
//!
//! - `types` - `JsSurface`, the RGBA surface handed to and from JavaScript
//! - `adjustments` - Slider values and the adjustment composer
//! - `transform` - Rotate, flip, crop and resize
//! - `encode` / `decode` - PNG and JPEG serialization
//! - `session` - `JsEditorSession`, the editor state machine
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditorSession } from '@gallery/editor-wasm';
//!
//! await init();
//!
//! const session = new JsEditorSession({ maxGalleryImages: 5 });
//! session.open(image.filename, image.id, new Uint8Array(await blob.arrayBuffer()));
//! session.rotate(90);
//! session.set_adjustment('brightness', 120);
//! session.apply_adjustments();
//!
//! const request = session.begin_commit(gallery.length);
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod adjustments;
mod decode;
mod encode;
mod session;
mod transform;
mod types;

// Re-export public types
pub use adjustments::{apply_adjustments, apply_filter, JsAdjustmentSet};
pub use decode::decode_image;
pub use encode::{encode_surface, surface_to_encoded_bytes};
pub use session::{JsCommitRequest, JsEditorSession};
pub use transform::{crop, crop_region_for_ratio, flip, resize, rotate};
pub use types::{create_surface, JsSurface};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert an error into the `JsValue` thrown to JavaScript.
///
/// On wasm32 the message is also written to the browser console.
pub(crate) fn js_error(err: impl Display) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

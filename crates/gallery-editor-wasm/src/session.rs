//! WASM bindings for the editor session.
//!
//! The view owns one `JsEditorSession` per open editor. Network calls stay
//! in JavaScript: `begin_*` returns what to send, `finish_*` / `fail_*`
//! report the outcome.
//!
//! ```typescript
//! const request = session.begin_commit(gallery.length);
//! const res = await fetch('/api/images', { method: 'POST', body: form(request) });
//! if (res.ok) {
//!   session.finish_commit(await res.json());
//!   if (request.replaces) await deleteImage(request.replaces);
//! } else {
//!   showError(session.fail_commit(res.status, (await res.json()).message));
//! }
//! ```

use gallery_editor_core::adjustments::AdjustmentStage;
use gallery_editor_core::remote::{self, RemoteFailure, UploadedImage};
use gallery_editor_core::session::{CommitRequest, EditorSession, SessionError};
use gallery_editor_core::{AspectRatio, CropRegion, EditorConfig, EncodeOptions, FlipAxis, Rotation};
use wasm_bindgen::prelude::*;

use crate::adjustments::JsAdjustmentSet;
use crate::js_error;
use crate::types::JsSurface;

/// Upload the host should perform to save the edited image.
#[wasm_bindgen]
pub struct JsCommitRequest {
    inner: CommitRequest,
}

#[wasm_bindgen]
impl JsCommitRequest {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.inner.filename.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    /// Encoded image bytes (a copy)
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Id of the stored image to delete after a successful upload
    #[wasm_bindgen(getter)]
    pub fn replaces(&self) -> Option<String> {
        self.inner.replaces.clone()
    }
}

/// The gallery editor state machine.
#[wasm_bindgen]
pub struct JsEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl JsEditorSession {
    /// Create an idle session. `config` may be omitted or a partial
    /// `EditorConfig` object (`{ maxUploadBytes, maxGalleryImages, ... }`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditorSession, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(js_error)?
        };
        EditorSession::new(config)
            .map(Self::from_session)
            .map_err(js_error)
    }

    /// `"idle"`, `"loaded"`, `"removing-background"` or `"committing"`
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.phase().as_str().to_string()
    }

    /// True while an upload or background removal is in flight
    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.phase().is_busy()
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.document().is_some()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dirty(&self) -> bool {
        self.inner.document().is_some_and(|doc| doc.is_dirty())
    }

    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> Option<String> {
        self.inner.document().map(|doc| doc.filename().to_string())
    }

    /// Copy of the current surface, for drawing
    pub fn current(&self) -> Option<JsSurface> {
        self.inner
            .document()
            .map(|doc| JsSurface::from_surface(doc.current().clone()))
    }

    /// Copy of the surface as opened
    pub fn original(&self) -> Option<JsSurface> {
        self.inner
            .document()
            .map(|doc| JsSurface::from_surface(doc.original().clone()))
    }

    /// Decode and open an image. `stored_id` is the gallery id, if any.
    pub fn open(
        &mut self,
        filename: &str,
        stored_id: Option<String>,
        bytes: &[u8],
    ) -> Result<(), JsValue> {
        self.inner.open(filename, stored_id, bytes).map_err(js_error)
    }

    /// Open a surface that is already decoded. Consumes the surface.
    pub fn open_surface(
        &mut self,
        filename: &str,
        stored_id: Option<String>,
        surface: JsSurface,
    ) -> Result<(), JsValue> {
        self.inner
            .open_surface(filename, stored_id, surface.into_surface())
            .map_err(js_error)
    }

    /// Rotate clockwise by 90, 180 or 270 degrees.
    pub fn rotate(&mut self, degrees: i32) -> Result<(), JsValue> {
        let rotation = Rotation::try_from(degrees).map_err(js_error)?;
        self.inner.rotate(rotation).map_err(js_error)
    }

    pub fn flip(&mut self, axis: &str) -> Result<(), JsValue> {
        let axis: FlipAxis = axis.parse().map_err(js_error)?;
        self.inner.flip(axis).map_err(js_error)
    }

    pub fn crop(&mut self, x: u32, y: u32, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .crop(&CropRegion::new(x, y, width, height))
            .map_err(js_error)
    }

    /// Crop to a centered region of `ratio`. Returns `{ x, y, width, height }`.
    pub fn crop_to_ratio(&mut self, ratio: &str) -> Result<JsValue, JsValue> {
        let ratio: AspectRatio = ratio.parse().map_err(js_error)?;
        let region = self.inner.crop_to_ratio(ratio).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&region).map_err(js_error)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner.resize(width, height).map_err(js_error)
    }

    /// Move one slider by name. Rendered on `apply_adjustments`.
    pub fn set_adjustment(&mut self, name: &str, pct: i32) -> Result<(), JsValue> {
        let stage = AdjustmentStage::from_name(name)
            .ok_or_else(|| js_error(format!("Unknown adjustment: {name}")))?;
        self.inner.set_adjustment(stage, pct).map_err(js_error)
    }

    pub fn set_adjustments(&mut self, adjustments: &JsAdjustmentSet) -> Result<(), JsValue> {
        self.inner
            .set_adjustments(*adjustments.inner())
            .map_err(js_error)
    }

    /// Current slider values (all 100 when no image is open)
    pub fn pending_adjustments(&self) -> JsAdjustmentSet {
        JsAdjustmentSet::from_inner(
            self.inner
                .document()
                .map(|doc| *doc.pending())
                .unwrap_or_default(),
        )
    }

    pub fn reset_adjustments(&mut self) -> Result<(), JsValue> {
        self.inner.reset_adjustments().map_err(js_error)
    }

    /// Render the sliders onto the image. Returns whether anything changed.
    pub fn apply_adjustments(&mut self) -> Result<bool, JsValue> {
        self.inner.apply_adjustments().map_err(js_error)
    }

    pub fn revert(&mut self) -> Result<(), JsValue> {
        self.inner.revert().map_err(js_error)
    }

    /// Encode the current image for download. Without a format the
    /// configured export options are used.
    pub fn export(&self, format: Option<String>, quality: Option<f32>) -> Result<Vec<u8>, JsValue> {
        let options = match format {
            Some(format) => Some(EncodeOptions {
                format: format.parse().map_err(js_error)?,
                quality: quality.unwrap_or(1.0),
            }),
            None => None,
        };
        self.inner.export(options.as_ref()).map_err(js_error)
    }

    /// `edited_<filename>`
    pub fn download_filename(&self) -> Result<String, JsValue> {
        self.inner.download_filename().map_err(js_error)
    }

    /// Pre-check a plain gallery upload against the configured limits.
    pub fn check_upload(
        &self,
        size: u32,
        mime: &str,
        existing_count: usize,
    ) -> Result<(), JsValue> {
        remote::validate_upload(size as u64, mime, existing_count, self.inner.config())
            .map_err(js_error)
    }

    /// Pre-check a file for the background-removal service.
    pub fn check_background_removal(&self, size: u32, mime: &str) -> Result<(), JsValue> {
        remote::validate_background_removal(size as u64, mime, self.inner.config())
            .map_err(js_error)
    }

    /// Start saving. `gallery_count` is the number of stored images.
    pub fn begin_commit(&mut self, gallery_count: usize) -> Result<JsCommitRequest, JsValue> {
        self.inner
            .begin_commit(gallery_count)
            .map(|inner| JsCommitRequest { inner })
            .map_err(js_error)
    }

    /// Report a successful upload (the server's image object). Closes the session.
    pub fn finish_commit(&mut self, uploaded: JsValue) -> Result<JsValue, JsValue> {
        let image: UploadedImage = serde_wasm_bindgen::from_value(uploaded).map_err(js_error)?;
        let image = self.inner.finish_commit(Ok(image)).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&image).map_err(js_error)
    }

    /// Report a failed upload. The document stays open; returns the message
    /// to show.
    pub fn fail_commit(&mut self, status: u16, message: Option<String>) -> Result<String, JsValue> {
        let failure = self.failure(status, message.as_deref());
        let text = failure.to_string();
        match self.inner.finish_commit(Err(failure)) {
            Err(SessionError::Remote(_)) | Ok(_) => Ok(text),
            Err(err) => Err(js_error(err)),
        }
    }

    /// Start background removal. Returns the PNG bytes to send.
    pub fn begin_background_removal(&mut self) -> Result<Vec<u8>, JsValue> {
        self.inner.begin_background_removal().map_err(js_error)
    }

    /// Report the service's image. Throws if it cannot be decoded.
    pub fn finish_background_removal(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner
            .finish_background_removal(Ok(bytes))
            .map_err(js_error)
    }

    /// Report a failed background removal; returns the message to show.
    pub fn fail_background_removal(
        &mut self,
        status: u16,
        message: Option<String>,
    ) -> Result<String, JsValue> {
        let failure = self.failure(status, message.as_deref());
        let text = failure.to_string();
        match self.inner.finish_background_removal(Err(failure)) {
            Err(SessionError::Remote(_)) | Ok(()) => Ok(text),
            Err(err) => Err(js_error(err)),
        }
    }

    pub fn cancel_background_removal(&mut self) -> Result<(), JsValue> {
        self.inner.cancel_background_removal().map_err(js_error)
    }

    /// Close the editor. Pass `discard = true` to drop unsaved edits.
    pub fn close(&mut self, discard: bool) -> Result<(), JsValue> {
        self.inner.close(discard).map_err(js_error)
    }
}

impl JsEditorSession {
    pub(crate) fn from_session(inner: EditorSession) -> Self {
        Self { inner }
    }

    fn failure(&self, status: u16, message: Option<&str>) -> RemoteFailure {
        RemoteFailure::from_status(status, message, self.inner.config().max_upload_bytes)
    }
}

//! Editor session: the lifecycle of one image opened in the gallery editor.
//!
//! The session owns the pristine original, the current surface and the
//! pending slider values. Its state is a tagged union, so a document can be
//! loaded, waiting on the background-removal service, or being saved, but
//! never two of those at once.
//!
//! ```text
//! Idle ──open──▶ Loaded ──begin_background_removal──▶ RemovingBackground
//!                  │  ▲ ◀── finish / cancel ──────────────────┘
//!                  │  └──── finish_commit(Err) ──┐
//!                  └──begin_commit──▶ Committing ┴─ finish_commit(Ok) ──▶ Idle
//! ```
//!
//! Network calls are made by the host. The session hands out the bytes to
//! send (`begin_*`) and receives the outcome (`finish_*`).

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::adjustments::AdjustmentStage;
use crate::composer::apply_adjustments;
use crate::config::{ConfigError, EditorConfig};
use crate::decode::{decode_image, DecodeError};
use crate::encode::{encode_surface, EncodeError, EncodeOptions};
use crate::remote::{validate_background_removal, validate_upload, RemoteFailure, UploadedImage};
use crate::surface::Surface;
use crate::transform::{
    crop, flip, resize, rotate, AspectRatio, CropRegion, FlipAxis, Rotation, TransformError,
};
use crate::AdjustmentSet;

/// Errors returned by [`EditorSession`] operations.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("The editor is busy ({0})")]
    Busy(EditorPhase),

    #[error("No image is open in the editor")]
    NoImage,

    #[error("There are no changes to save")]
    NoChanges,

    #[error("No remote operation is pending")]
    NotPending,

    #[error("The image has unsaved changes")]
    UnsavedChanges,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Remote(#[from] RemoteFailure),
}

/// What the editor is doing, without the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorPhase {
    Idle,
    Loaded,
    RemovingBackground,
    Committing,
}

impl EditorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorPhase::Idle => "idle",
            EditorPhase::Loaded => "loaded",
            EditorPhase::RemovingBackground => "removing-background",
            EditorPhase::Committing => "committing",
        }
    }

    /// Whether a remote call is in flight.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            EditorPhase::RemovingBackground | EditorPhase::Committing
        )
    }
}

impl fmt::Display for EditorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image opened in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    filename: String,
    stored_id: Option<String>,
    original: Surface,
    current: Surface,
    pending: AdjustmentSet,
    dirty: bool,
}

impl Document {
    fn new(filename: String, stored_id: Option<String>, surface: Surface) -> Self {
        Self {
            filename,
            stored_id,
            original: surface.clone(),
            current: surface,
            pending: AdjustmentSet::default(),
            dirty: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Gallery id of the image this document was opened from.
    pub fn stored_id(&self) -> Option<&str> {
        self.stored_id.as_deref()
    }

    /// The surface as it was when opened.
    pub fn original(&self) -> &Surface {
        &self.original
    }

    pub fn current(&self) -> &Surface {
        &self.current
    }

    /// Slider values not yet applied to the current surface.
    pub fn pending(&self) -> &AdjustmentSet {
        &self.pending
    }

    /// Whether the current surface differs from what is stored.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn replace_current(&mut self, surface: Surface) {
        self.current = surface;
        self.dirty = true;
    }
}

/// Session state. Busy variants carry the document they operate on.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Loaded(Document),
    RemovingBackground(Document),
    Committing(Document),
}

impl SessionState {
    pub fn phase(&self) -> EditorPhase {
        match self {
            SessionState::Idle => EditorPhase::Idle,
            SessionState::Loaded(_) => EditorPhase::Loaded,
            SessionState::RemovingBackground(_) => EditorPhase::RemovingBackground,
            SessionState::Committing(_) => EditorPhase::Committing,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            SessionState::Idle => None,
            SessionState::Loaded(doc)
            | SessionState::RemovingBackground(doc)
            | SessionState::Committing(doc) => Some(doc),
        }
    }
}

/// Upload the host should perform to save the edited image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
    /// Stored image to delete once the upload succeeds
    pub replaces: Option<String>,
}

/// The editor's state machine for one opened image at a time.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    config: EditorConfig,
    state: SessionState,
}

impl EditorSession {
    /// Create an idle session with a validated config.
    pub fn new(config: EditorConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::Idle,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> EditorPhase {
        self.state.phase()
    }

    pub fn document(&self) -> Option<&Document> {
        self.state.document()
    }

    /// Decode `bytes` and open them as a new document.
    ///
    /// Replaces a clean loaded document; refuses a dirty one.
    pub fn open(
        &mut self,
        filename: &str,
        stored_id: Option<String>,
        bytes: &[u8],
    ) -> Result<(), SessionError> {
        self.check_can_open()?;
        let surface = decode_image(bytes)?;
        self.open_surface(filename, stored_id, surface)
    }

    /// Open an already decoded surface.
    pub fn open_surface(
        &mut self,
        filename: &str,
        stored_id: Option<String>,
        surface: Surface,
    ) -> Result<(), SessionError> {
        self.check_can_open()?;
        if !surface.is_valid() {
            return Err(TransformError::InvalidSurface.into());
        }
        debug!(
            filename,
            width = surface.width,
            height = surface.height,
            "document opened"
        );
        self.state =
            SessionState::Loaded(Document::new(filename.to_string(), stored_id, surface));
        Ok(())
    }

    pub fn rotate(&mut self, rotation: Rotation) -> Result<(), SessionError> {
        let doc = self.loaded_mut()?;
        let rotated = rotate(&doc.current, rotation);
        doc.replace_current(rotated);
        debug!(degrees = rotation.degrees(), "rotated");
        Ok(())
    }

    pub fn flip(&mut self, axis: FlipAxis) -> Result<(), SessionError> {
        let doc = self.loaded_mut()?;
        let flipped = flip(&doc.current, axis);
        doc.replace_current(flipped);
        debug!(%axis, "flipped");
        Ok(())
    }

    pub fn crop(&mut self, region: &CropRegion) -> Result<(), SessionError> {
        let doc = self.loaded_mut()?;
        let cropped = crop(&doc.current, region)?;
        doc.replace_current(cropped);
        debug!(?region, "cropped");
        Ok(())
    }

    /// Crop to the largest centered region of `ratio`.
    ///
    /// `Free` leaves the surface untouched. Returns the region used.
    pub fn crop_to_ratio(&mut self, ratio: AspectRatio) -> Result<CropRegion, SessionError> {
        let doc = self.loaded_mut()?;
        let (width, height) = doc.current.dimensions();
        let region = CropRegion::centered(width, height, ratio);
        if region != CropRegion::full(width, height) {
            let cropped = crop(&doc.current, &region)?;
            doc.replace_current(cropped);
            debug!(%ratio, ?region, "cropped to ratio");
        }
        Ok(region)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        let doc = self.loaded_mut()?;
        let resized = resize(&doc.current, width, height)?;
        doc.replace_current(resized);
        debug!(width, height, "resized");
        Ok(())
    }

    /// Move one slider. Nothing is rendered until [`Self::apply_adjustments`].
    pub fn set_adjustment(&mut self, stage: AdjustmentStage, pct: i32) -> Result<(), SessionError> {
        self.loaded_mut()?.pending.set(stage, pct);
        Ok(())
    }

    pub fn set_adjustments(&mut self, adjustments: AdjustmentSet) -> Result<(), SessionError> {
        self.loaded_mut()?.pending = adjustments;
        Ok(())
    }

    /// Put every slider back to neutral.
    pub fn reset_adjustments(&mut self) -> Result<(), SessionError> {
        self.loaded_mut()?.pending = AdjustmentSet::default();
        Ok(())
    }

    /// Render the pending sliders onto the current surface.
    ///
    /// Slider values are kept afterwards. Returns whether anything changed.
    pub fn apply_adjustments(&mut self) -> Result<bool, SessionError> {
        let doc = self.loaded_mut()?;
        let pending = doc.pending;
        let adjusted = match apply_adjustments(&doc.current, &pending) {
            Cow::Borrowed(_) => None,
            Cow::Owned(surface) => Some(surface),
        };
        match adjusted {
            Some(surface) => {
                doc.replace_current(surface);
                debug!(stages = ?pending.enabled_stages(), "adjustments applied");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Discard every edit and return to the surface as opened.
    pub fn revert(&mut self) -> Result<(), SessionError> {
        let doc = self.loaded_mut()?;
        doc.current = doc.original.clone();
        doc.pending = AdjustmentSet::default();
        doc.dirty = false;
        debug!("reverted to original");
        Ok(())
    }

    /// Encode the current surface for download without changing state.
    ///
    /// Uses the configured export options unless `options` is given.
    pub fn export(&self, options: Option<&EncodeOptions>) -> Result<Vec<u8>, SessionError> {
        let doc = self.document().ok_or(SessionError::NoImage)?;
        let options = options.unwrap_or(&self.config.export);
        Ok(encode_surface(&doc.current, options)?)
    }

    pub fn download_filename(&self) -> Result<String, SessionError> {
        let doc = self.document().ok_or(SessionError::NoImage)?;
        Ok(self.config.download_filename(&doc.filename))
    }

    /// Start saving the edited image back to the gallery.
    ///
    /// `gallery_count` is the number of images currently stored. The image
    /// being replaced does not count toward the gallery limit.
    pub fn begin_commit(&mut self, gallery_count: usize) -> Result<CommitRequest, SessionError> {
        let doc = self.loaded()?;
        if !doc.dirty {
            return Err(SessionError::NoChanges);
        }

        let export = self.config.export;
        let bytes = encode_surface(&doc.current, &export)?;
        let mime_type = export.format.mime_type();
        let existing = if doc.stored_id.is_some() {
            gallery_count.saturating_sub(1)
        } else {
            gallery_count
        };
        if let Err(failure) =
            validate_upload(bytes.len() as u64, mime_type, existing, &self.config)
        {
            warn!(%failure, "commit rejected before upload");
            return Err(failure.into());
        }

        let request = CommitRequest {
            filename: doc.filename.clone(),
            mime_type,
            bytes,
            replaces: doc.stored_id.clone(),
        };
        self.promote(SessionState::Committing);
        debug!(bytes = request.bytes.len(), "commit started");
        Ok(request)
    }

    /// Report the outcome of the upload started by [`Self::begin_commit`].
    ///
    /// Success closes the session. Failure returns to `Loaded` with the
    /// document intact.
    pub fn finish_commit(
        &mut self,
        result: Result<UploadedImage, RemoteFailure>,
    ) -> Result<UploadedImage, SessionError> {
        let doc = match std::mem::take(&mut self.state) {
            SessionState::Committing(doc) => doc,
            other => {
                self.state = other;
                warn!(phase = %self.phase(), "commit result without pending commit");
                return Err(SessionError::NotPending);
            }
        };

        match result {
            Ok(image) => {
                debug!(id = %image.id, "commit finished, closing editor");
                Ok(image)
            }
            Err(failure) => {
                warn!(%failure, "commit failed");
                self.state = SessionState::Loaded(doc);
                Err(failure.into())
            }
        }
    }

    /// Start a background-removal request. Returns the PNG bytes to send.
    pub fn begin_background_removal(&mut self) -> Result<Vec<u8>, SessionError> {
        let doc = self.loaded()?;
        let png = EncodeOptions::png();
        let bytes = encode_surface(&doc.current, &png)?;
        if let Err(failure) = validate_background_removal(
            bytes.len() as u64,
            png.format.mime_type(),
            &self.config,
        ) {
            warn!(%failure, "background removal rejected before upload");
            return Err(failure.into());
        }

        self.promote(SessionState::RemovingBackground);
        debug!(bytes = bytes.len(), "background removal started");
        Ok(bytes)
    }

    /// Report the outcome of background removal.
    ///
    /// On success the returned image becomes the current surface. Any
    /// failure leaves the document as it was.
    pub fn finish_background_removal(
        &mut self,
        result: Result<Vec<u8>, RemoteFailure>,
    ) -> Result<(), SessionError> {
        let mut doc = match std::mem::take(&mut self.state) {
            SessionState::RemovingBackground(doc) => doc,
            other => {
                self.state = other;
                warn!(phase = %self.phase(), "background removal result without pending request");
                return Err(SessionError::NotPending);
            }
        };

        let outcome = result
            .map_err(SessionError::from)
            .and_then(|bytes| decode_image(&bytes).map_err(SessionError::from));
        let outcome = match outcome {
            Ok(surface) => {
                doc.replace_current(surface);
                debug!("background removed");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "background removal failed");
                Err(err)
            }
        };
        self.state = SessionState::Loaded(doc);
        outcome
    }

    /// Abandon an in-flight background removal. A late result is refused.
    pub fn cancel_background_removal(&mut self) -> Result<(), SessionError> {
        match std::mem::take(&mut self.state) {
            SessionState::RemovingBackground(doc) => {
                self.state = SessionState::Loaded(doc);
                debug!("background removal cancelled");
                Ok(())
            }
            other => {
                self.state = other;
                Err(SessionError::NotPending)
            }
        }
    }

    /// Close the editor. A dirty document is only dropped when `discard` is set.
    pub fn close(&mut self, discard: bool) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Idle => return Ok(()),
            SessionState::Loaded(doc) if doc.dirty && !discard => {
                return Err(SessionError::UnsavedChanges)
            }
            SessionState::Loaded(_) => {}
            other => return Err(busy(other.phase())),
        }
        self.state = SessionState::Idle;
        debug!(discard, "editor closed");
        Ok(())
    }

    fn check_can_open(&self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Idle => Ok(()),
            SessionState::Loaded(doc) if doc.dirty => Err(SessionError::UnsavedChanges),
            SessionState::Loaded(_) => Ok(()),
            other => Err(busy(other.phase())),
        }
    }

    fn loaded(&self) -> Result<&Document, SessionError> {
        match &self.state {
            SessionState::Loaded(doc) => Ok(doc),
            SessionState::Idle => Err(SessionError::NoImage),
            other => Err(busy(other.phase())),
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut Document, SessionError> {
        let phase = self.phase();
        match &mut self.state {
            SessionState::Loaded(doc) => Ok(doc),
            SessionState::Idle => Err(SessionError::NoImage),
            _ => Err(busy(phase)),
        }
    }

    /// Move a loaded document into a busy state.
    fn promote(&mut self, next: fn(Document) -> SessionState) {
        self.state = match std::mem::take(&mut self.state) {
            SessionState::Loaded(doc) => next(doc),
            other => other,
        };
    }
}

fn busy(phase: EditorPhase) -> SessionError {
    warn!(%phase, "operation rejected while busy");
    SessionError::Busy(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_png, ImageFormat};

    fn gradient(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 20) as u8, (y * 20) as u8, 90, 255]);
            }
        }
        Surface::new(width, height, pixels).unwrap()
    }

    fn loaded_session() -> EditorSession {
        let mut session = EditorSession::default();
        session
            .open_surface("photo.png", Some("img-1".to_string()), gradient(8, 4))
            .unwrap();
        session
    }

    fn uploaded() -> UploadedImage {
        UploadedImage {
            id: "img-2".to_string(),
            filename: "photo.png".to_string(),
            url: "/images/img-2".to_string(),
            size: 100,
            content_type: Some("image/png".to_string()),
        }
    }

    fn current(session: &EditorSession) -> &Surface {
        session.document().unwrap().current()
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = EditorSession::new(EditorConfig::default()).unwrap();
        assert_eq!(session.phase(), EditorPhase::Idle);
        assert!(session.document().is_none());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EditorConfig {
            max_upload_bytes: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(
            EditorSession::new(config),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_open_decodes_bytes() {
        let source = gradient(5, 3);
        let bytes = encode_png(&source).unwrap();
        let mut session = EditorSession::default();
        session.open("a.png", None, &bytes).unwrap();

        let doc = session.document().unwrap();
        assert_eq!(session.phase(), EditorPhase::Loaded);
        assert_eq!(doc.current(), &source);
        assert_eq!(doc.original(), &source);
        assert_eq!(doc.filename(), "a.png");
        assert_eq!(doc.stored_id(), None);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_open_invalid_bytes_stays_idle() {
        let mut session = EditorSession::default();
        let err = session.open("a.png", None, b"nope").unwrap_err();
        assert_eq!(err, SessionError::Decode(DecodeError::InvalidFormat));
        assert_eq!(session.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_operations_without_image() {
        let mut session = EditorSession::default();
        assert_eq!(session.rotate(Rotation::Quarter), Err(SessionError::NoImage));
        assert_eq!(session.apply_adjustments(), Err(SessionError::NoImage));
        assert_eq!(session.export(None), Err(SessionError::NoImage));
        assert_eq!(session.begin_commit(0), Err(SessionError::NoImage));
    }

    #[test]
    fn test_rotate_marks_dirty_and_swaps_dimensions() {
        let mut session = loaded_session();
        session.rotate(Rotation::Quarter).unwrap();
        assert_eq!(current(&session).dimensions(), (4, 8));
        assert!(session.document().unwrap().is_dirty());
        assert_eq!(session.document().unwrap().original().dimensions(), (8, 4));
    }

    #[test]
    fn test_flip_and_crop() {
        let mut session = loaded_session();
        session.flip(FlipAxis::Horizontal).unwrap();
        assert_eq!(current(&session).pixel(0, 0), Some([140, 0, 90, 255]));

        session.crop(&CropRegion::new(1, 1, 3, 2)).unwrap();
        assert_eq!(current(&session).dimensions(), (3, 2));

        let err = session.crop(&CropRegion::new(2, 0, 5, 1)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transform(TransformError::CropOutOfBounds { .. })
        ));
        assert_eq!(current(&session).dimensions(), (3, 2));
    }

    #[test]
    fn test_crop_to_ratio() {
        let mut session = loaded_session();
        let region = session.crop_to_ratio(AspectRatio::Square).unwrap();
        assert_eq!(region, CropRegion::new(2, 0, 4, 4));
        assert_eq!(current(&session).dimensions(), (4, 4));
    }

    #[test]
    fn test_crop_to_free_ratio_is_noop() {
        let mut session = loaded_session();
        let region = session.crop_to_ratio(AspectRatio::Free).unwrap();
        assert_eq!(region, CropRegion::full(8, 4));
        assert!(!session.document().unwrap().is_dirty());
    }

    #[test]
    fn test_resize() {
        let mut session = loaded_session();
        session.resize(4, 2).unwrap();
        assert_eq!(current(&session).dimensions(), (4, 2));
        assert!(matches!(
            session.resize(0, 2),
            Err(SessionError::Transform(TransformError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn test_apply_adjustments_keeps_sliders() {
        let mut session = loaded_session();
        session
            .set_adjustment(AdjustmentStage::Brightness, 150)
            .unwrap();
        assert!(!session.document().unwrap().is_dirty());

        assert!(session.apply_adjustments().unwrap());
        let doc = session.document().unwrap();
        assert!(doc.is_dirty());
        assert_eq!(doc.pending().brightness, 150);
        assert!(doc.current().mean_intensity() > doc.original().mean_intensity());
    }

    #[test]
    fn test_apply_neutral_adjustments_is_noop() {
        let mut session = loaded_session();
        assert!(!session.apply_adjustments().unwrap());
        assert!(!session.document().unwrap().is_dirty());
    }

    #[test]
    fn test_reset_adjustments() {
        let mut session = loaded_session();
        session
            .set_adjustments(AdjustmentSet {
                contrast: 40,
                ..AdjustmentSet::default()
            })
            .unwrap();
        session.reset_adjustments().unwrap();
        assert!(session.document().unwrap().pending().is_neutral());
    }

    #[test]
    fn test_revert_restores_original() {
        let mut session = loaded_session();
        let original = current(&session).clone();
        session.rotate(Rotation::Half).unwrap();
        session.set_adjustment(AdjustmentStage::Contrast, 170).unwrap();
        session.apply_adjustments().unwrap();

        session.revert().unwrap();
        let doc = session.document().unwrap();
        assert_eq!(doc.current(), &original);
        assert!(!doc.is_dirty());
        assert!(doc.pending().is_neutral());
    }

    #[test]
    fn test_commit_requires_changes() {
        let mut session = loaded_session();
        assert_eq!(session.begin_commit(1), Err(SessionError::NoChanges));
        assert_eq!(session.phase(), EditorPhase::Loaded);
    }

    #[test]
    fn test_commit_success_closes() {
        let mut session = loaded_session();
        session.flip(FlipAxis::Vertical).unwrap();

        let request = session.begin_commit(5).unwrap();
        assert_eq!(request.filename, "photo.png");
        assert_eq!(request.mime_type, "image/png");
        assert_eq!(request.replaces.as_deref(), Some("img-1"));
        assert_eq!(&request.bytes[0..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!(session.phase(), EditorPhase::Committing);

        let image = session.finish_commit(Ok(uploaded())).unwrap();
        assert_eq!(image.id, "img-2");
        assert_eq!(session.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_commit_failure_returns_to_loaded() {
        let mut session = loaded_session();
        session.rotate(Rotation::ThreeQuarter).unwrap();
        let edited = current(&session).clone();
        session.begin_commit(1).unwrap();

        let err = session
            .finish_commit(Err(RemoteFailure::ServiceUnavailable))
            .unwrap_err();
        assert_eq!(err, SessionError::Remote(RemoteFailure::ServiceUnavailable));
        assert_eq!(session.phase(), EditorPhase::Loaded);
        assert_eq!(current(&session), &edited);
        assert!(session.document().unwrap().is_dirty());
    }

    #[test]
    fn test_commit_new_image_respects_gallery_limit() {
        let mut session = EditorSession::default();
        session.open_surface("new.png", None, gradient(2, 2)).unwrap();
        session.rotate(Rotation::Quarter).unwrap();
        assert_eq!(
            session.begin_commit(5),
            Err(SessionError::Remote(RemoteFailure::LimitReached { limit: 5 }))
        );
        assert_eq!(session.phase(), EditorPhase::Loaded);
    }

    #[test]
    fn test_commit_uses_export_format() {
        let config = EditorConfig {
            export: EncodeOptions::jpeg(0.9),
            ..EditorConfig::default()
        };
        let mut session = EditorSession::new(config).unwrap();
        session.open_surface("a.jpg", None, gradient(4, 4)).unwrap();
        session.flip(FlipAxis::Horizontal).unwrap();
        let request = session.begin_commit(0).unwrap();
        assert_eq!(request.mime_type, ImageFormat::Jpeg.mime_type());
        assert_eq!(&request.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_busy_states_reject_mutations() {
        let mut session = loaded_session();
        session.begin_background_removal().unwrap();
        let busy = || SessionError::Busy(EditorPhase::RemovingBackground);
        assert_eq!(session.rotate(Rotation::Quarter), Err(busy()));
        assert_eq!(session.flip(FlipAxis::Vertical), Err(busy()));
        assert_eq!(session.apply_adjustments(), Err(busy()));
        assert_eq!(session.begin_commit(0), Err(busy()));
        assert_eq!(session.begin_background_removal(), Err(busy()));
        assert_eq!(session.close(true), Err(busy()));

        session.cancel_background_removal().unwrap();
        session.flip(FlipAxis::Vertical).unwrap();
        session.begin_commit(0).unwrap();
        assert_eq!(
            session.revert(),
            Err(SessionError::Busy(EditorPhase::Committing))
        );
    }

    #[test]
    fn test_export_does_not_change_state() {
        let session = loaded_session();
        let bytes = session.export(None).unwrap();
        assert_eq!(&bytes[0..4], &[0x89, b'P', b'N', b'G']);
        let jpeg = session.export(Some(&EncodeOptions::jpeg(0.5))).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(session.phase(), EditorPhase::Loaded);
        assert_eq!(session.download_filename().unwrap(), "edited_photo.png");
    }

    #[test]
    fn test_background_removal_success() {
        let mut session = loaded_session();
        let sent = session.begin_background_removal().unwrap();
        assert_eq!(&sent[0..4], &[0x89, b'P', b'N', b'G']);

        let cutout = Surface::filled(8, 4, [1, 2, 3, 0]);
        let reply = encode_png(&cutout).unwrap();
        session.finish_background_removal(Ok(reply)).unwrap();

        let doc = session.document().unwrap();
        assert_eq!(session.phase(), EditorPhase::Loaded);
        assert_eq!(doc.current(), &cutout);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_background_removal_failure_keeps_document() {
        let mut session = loaded_session();
        let before = current(&session).clone();
        session.begin_background_removal().unwrap();

        let err = session
            .finish_background_removal(Err(RemoteFailure::Rejected("bad".into())))
            .unwrap_err();
        assert_eq!(err, SessionError::Remote(RemoteFailure::Rejected("bad".into())));
        assert_eq!(session.phase(), EditorPhase::Loaded);
        assert_eq!(current(&session), &before);
        assert!(!session.document().unwrap().is_dirty());
    }

    #[test]
    fn test_background_removal_garbage_reply() {
        let mut session = loaded_session();
        session.begin_background_removal().unwrap();
        let err = session
            .finish_background_removal(Ok(b"not an image".to_vec()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
        assert_eq!(session.phase(), EditorPhase::Loaded);
    }

    #[test]
    fn test_late_result_after_cancel_is_refused() {
        let mut session = loaded_session();
        session.begin_background_removal().unwrap();
        session.cancel_background_removal().unwrap();
        let reply = encode_png(&Surface::filled(8, 4, [0, 0, 0, 0])).unwrap();
        assert_eq!(
            session.finish_background_removal(Ok(reply)),
            Err(SessionError::NotPending)
        );
        assert!(!session.document().unwrap().is_dirty());
        assert_eq!(
            session.cancel_background_removal(),
            Err(SessionError::NotPending)
        );
    }

    #[test]
    fn test_finish_commit_without_commit() {
        let mut session = loaded_session();
        assert_eq!(
            session.finish_commit(Ok(uploaded())),
            Err(SessionError::NotPending)
        );
        assert_eq!(session.phase(), EditorPhase::Loaded);
    }

    #[test]
    fn test_close_requires_discard_when_dirty() {
        let mut session = loaded_session();
        session.rotate(Rotation::Half).unwrap();
        assert_eq!(session.close(false), Err(SessionError::UnsavedChanges));
        assert_eq!(session.phase(), EditorPhase::Loaded);
        session.close(true).unwrap();
        assert_eq!(session.phase(), EditorPhase::Idle);
        session.close(false).unwrap();
    }

    #[test]
    fn test_open_over_dirty_document_refused() {
        let mut session = loaded_session();
        session.open_surface("b.png", None, gradient(2, 2)).unwrap();
        assert_eq!(session.document().unwrap().filename(), "b.png");

        session.rotate(Rotation::Quarter).unwrap();
        assert_eq!(
            session.open_surface("c.png", None, gradient(2, 2)),
            Err(SessionError::UnsavedChanges)
        );
    }

    #[test]
    fn test_open_empty_surface_refused() {
        let mut session = EditorSession::default();
        let empty = Surface {
            width: 0,
            height: 0,
            pixels: vec![],
        };
        assert_eq!(
            session.open_surface("x.png", None, empty),
            Err(SessionError::Transform(TransformError::InvalidSurface))
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

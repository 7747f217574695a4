//! Gallery Editor Core - Image adjustment pipeline
//!
//! This crate provides the image processing behind the gallery editor:
//! RGBA surfaces, geometric transforms, filter adjustments and their
//! composer, PNG/JPEG serialization, and the editor session state machine
//! that ties them to the upload and background-removal services.

pub mod adjustments;
pub mod composer;
pub mod config;
pub mod decode;
pub mod encode;
pub mod luminance;
pub mod remote;
pub mod session;
pub mod surface;
pub mod transform;

pub use adjustments::{AdjustmentStage, NEUTRAL};
pub use composer::apply_adjustments;
pub use config::{ConfigError, EditorConfig};
pub use decode::{decode_image, DecodeError};
pub use encode::{encode_surface, EncodeError, EncodeOptions, ImageFormat};
pub use remote::{RemoteFailure, UploadedImage};
pub use session::{CommitRequest, EditorPhase, EditorSession, SessionError, SessionState};
pub use surface::{create_surface, Surface, SurfaceError};
pub use transform::{
    crop, flip, resize, rotate, rotate_degrees, AspectRatio, CropRegion, FlipAxis, Rotation,
    TransformError,
};

/// Slider values for the five filter adjustments.
///
/// Each field is a percentage where 100 means "leave unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustmentSet {
    /// Brightness (0 to 200 in the UI)
    pub brightness: i32,
    /// Contrast (0 to 200 in the UI)
    pub contrast: i32,
    /// Saturation (0 to 200 in the UI)
    pub saturation: i32,
    /// Shadows (0 to 200 in the UI)
    pub shadows: i32,
    /// Sharpness (0 to 200 in the UI, only values above 100 have an effect)
    pub sharpness: i32,
}

impl Default for AdjustmentSet {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL,
            contrast: NEUTRAL,
            saturation: NEUTRAL,
            shadows: NEUTRAL,
            sharpness: NEUTRAL,
        }
    }
}

impl AdjustmentSet {
    /// Create a new AdjustmentSet with every slider at neutral
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are neutral
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    pub fn get(&self, stage: AdjustmentStage) -> i32 {
        match stage {
            AdjustmentStage::Brightness => self.brightness,
            AdjustmentStage::Contrast => self.contrast,
            AdjustmentStage::Saturation => self.saturation,
            AdjustmentStage::Shadows => self.shadows,
            AdjustmentStage::Sharpness => self.sharpness,
        }
    }

    pub fn set(&mut self, stage: AdjustmentStage, pct: i32) {
        let slot = match stage {
            AdjustmentStage::Brightness => &mut self.brightness,
            AdjustmentStage::Contrast => &mut self.contrast,
            AdjustmentStage::Saturation => &mut self.saturation,
            AdjustmentStage::Shadows => &mut self.shadows,
            AdjustmentStage::Sharpness => &mut self.sharpness,
        };
        *slot = pct;
    }

    /// Stages the composer would run, in application order.
    pub fn enabled_stages(&self) -> Vec<AdjustmentStage> {
        AdjustmentStage::ORDER
            .into_iter()
            .filter(|&stage| self.get(stage) != NEUTRAL)
            .collect()
    }
}

//! Geometric transforms: quarter-turn rotation, flips, cropping and resizing.
//!
//! Every operation borrows its source surface and allocates the result, so the
//! editor can keep the previous surface around until the new one is accepted.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Rotations are clockwise as seen on screen
//! - Crop regions are in whole pixels of the source surface

mod crop;
mod flip;
mod resize;
mod rotation;

use thiserror::Error;

pub use crop::{crop, AspectRatio, CropRegion};
pub use flip::{flip, FlipAxis};
pub use resize::resize;
pub use rotation::{rotate, rotate_degrees, Rotation};

/// Errors from geometric transforms.
///
/// Unsupported angles and axes are caller contract violations; they are
/// reported instead of being silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// Rotation angle outside 90/180/270.
    #[error("Unsupported rotation angle: {0} (expected 90, 180 or 270)")]
    UnsupportedAngle(i32),

    /// Flip axis name not recognised.
    #[error("Unsupported flip axis: {0:?} (expected \"horizontal\" or \"vertical\")")]
    UnsupportedAxis(String),

    /// Aspect ratio name not recognised.
    #[error("Unsupported aspect ratio: {0:?}")]
    UnsupportedRatio(String),

    /// Crop region extends past the surface.
    #[error(
        "Crop region {x},{y} {width}x{height} exceeds surface bounds {surface_width}x{surface_height}"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    /// Crop region has no area.
    #[error("Crop region must have a non-zero width and height")]
    EmptyRegion,

    /// Resize target has a zero dimension.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source surface buffer does not match its dimensions.
    #[error("Source surface is detached or corrupted")]
    InvalidSurface,
}

//! WASM bindings for geometric transforms.
//!
//! Rotation is in quarter turns only and flips take the axis names used by the
//! editor toolbar (`"horizontal"`, `"vertical"`).

use gallery_editor_core::transform::{self, AspectRatio, CropRegion, FlipAxis};
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::types::JsSurface;

/// Rotate clockwise by 90, 180 or 270 degrees.
///
/// Throws for any other angle.
#[wasm_bindgen]
pub fn rotate(image: &JsSurface, degrees: i32) -> Result<JsSurface, JsValue> {
    transform::rotate_degrees(image.as_surface(), degrees)
        .map(JsSurface::from_surface)
        .map_err(js_error)
}

/// Mirror along `"horizontal"` or `"vertical"`.
#[wasm_bindgen]
pub fn flip(image: &JsSurface, axis: &str) -> Result<JsSurface, JsValue> {
    let axis: FlipAxis = axis.parse().map_err(js_error)?;
    Ok(JsSurface::from_surface(transform::flip(
        image.as_surface(),
        axis,
    )))
}

/// Copy a region given in whole pixels.
#[wasm_bindgen]
pub fn crop(
    image: &JsSurface,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<JsSurface, JsValue> {
    let region = CropRegion::new(x, y, width, height);
    transform::crop(image.as_surface(), &region)
        .map(JsSurface::from_surface)
        .map_err(js_error)
}

/// Largest centered region of `ratio` (`"free"`, `"1:1"`, `"4:3"`, `"16:9"`,
/// `"16:10"`) inside a `width` x `height` surface.
///
/// Returns `{ x, y, width, height }`.
#[wasm_bindgen]
pub fn crop_region_for_ratio(width: u32, height: u32, ratio: &str) -> Result<JsValue, JsValue> {
    let ratio: AspectRatio = ratio.parse().map_err(js_error)?;
    let region = CropRegion::centered(width, height, ratio);
    serde_wasm_bindgen::to_value(&region).map_err(js_error)
}

/// Resample to exact dimensions (bilinear).
#[wasm_bindgen]
pub fn resize(image: &JsSurface, width: u32, height: u32) -> Result<JsSurface, JsValue> {
    transform::resize(image.as_surface(), width, height)
        .map(JsSurface::from_surface)
        .map_err(js_error)
}

//! Adjustment slider WASM bindings.
//!
//! This module provides JavaScript bindings for the AdjustmentSet type,
//! mirroring the editor's five sliders (each 0 to 200, neutral at 100).

use gallery_editor_core::adjustments::{apply_stage, AdjustmentStage};
use gallery_editor_core::{composer, AdjustmentSet};
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::types::JsSurface;

/// Adjustment slider values for JavaScript
#[wasm_bindgen]
pub struct JsAdjustmentSet {
    inner: AdjustmentSet,
}

#[wasm_bindgen]
impl JsAdjustmentSet {
    /// Create a set with every slider at 100
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: AdjustmentSet::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> i32 {
        self.inner.brightness
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        self.inner.brightness = value;
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> i32 {
        self.inner.contrast
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        self.inner.contrast = value;
    }

    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> i32 {
        self.inner.saturation
    }

    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: i32) {
        self.inner.saturation = value;
    }

    #[wasm_bindgen(getter)]
    pub fn shadows(&self) -> i32 {
        self.inner.shadows
    }

    #[wasm_bindgen(setter)]
    pub fn set_shadows(&mut self, value: i32) {
        self.inner.shadows = value;
    }

    /// Only values above 100 sharpen
    #[wasm_bindgen(getter)]
    pub fn sharpness(&self) -> i32 {
        self.inner.sharpness
    }

    #[wasm_bindgen(setter)]
    pub fn set_sharpness(&mut self, value: i32) {
        self.inner.sharpness = value;
    }

    /// Check if all sliders are at 100
    pub fn is_neutral(&self) -> bool {
        self.inner.is_neutral()
    }

    /// Put every slider back to 100
    pub fn reset(&mut self) {
        self.inner = AdjustmentSet::default();
    }

    /// Names of the filters that would run, in application order
    pub fn enabled_stages(&self) -> Vec<String> {
        self.inner
            .enabled_stages()
            .into_iter()
            .map(|stage| stage.name().to_string())
            .collect()
    }

    /// Serialize to a plain object (`{ brightness, contrast, ... }`)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(js_error)
    }

    /// Deserialize from a plain object. Missing sliders default to 100.
    pub fn from_json(value: JsValue) -> Result<JsAdjustmentSet, JsValue> {
        let inner: AdjustmentSet = serde_wasm_bindgen::from_value(value).map_err(js_error)?;
        Ok(Self { inner })
    }
}

impl Default for JsAdjustmentSet {
    fn default() -> Self {
        Self::new()
    }
}

impl JsAdjustmentSet {
    pub(crate) fn from_inner(inner: AdjustmentSet) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &AdjustmentSet {
        &self.inner
    }
}

/// Apply every non-neutral slider to a surface, in the editor's order.
///
/// Returns a new surface. The source is never modified.
///
/// # Example (TypeScript)
/// ```typescript
/// const adj = new JsAdjustmentSet();
/// adj.brightness = 120;
/// adj.contrast = 150;
///
/// const adjusted = apply_adjustments(surface, adj);
/// ctx.putImageData(new ImageData(adjusted.image_data(), adjusted.width), 0, 0);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(image: &JsSurface, adjustments: &JsAdjustmentSet) -> JsSurface {
    let result = composer::apply_adjustments(image.as_surface(), adjustments.inner());
    JsSurface::from_surface(result.into_owned())
}

/// Apply a single filter by slider name (`"brightness"`, `"contrast"`, ...).
#[wasm_bindgen]
pub fn apply_filter(image: &JsSurface, stage: &str, pct: i32) -> Result<JsSurface, JsValue> {
    let stage = AdjustmentStage::from_name(stage)
        .ok_or_else(|| js_error(format!("Unknown adjustment: {stage}")))?;
    Ok(JsSurface::from_surface(apply_stage(
        image.as_surface(),
        stage,
        pct,
    )))
}

//! Ordered application of an [`AdjustmentSet`].
//!
//! ## Adjustment Order
//! 1. Brightness
//! 2. Contrast
//! 3. Saturation
//! 4. Shadows
//! 5. Sharpness
//!
//! Each stage rounds back to 8-bit before the next one runs, so stages do not
//! commute: brightness then contrast differs from contrast then brightness.
//! Stages left at 100 are skipped entirely.

use std::borrow::Cow;

use tracing::debug;

use crate::adjustments::{apply_stage, AdjustmentStage, NEUTRAL};
use crate::surface::Surface;
use crate::AdjustmentSet;

/// Apply every non-neutral adjustment in [`AdjustmentStage::ORDER`].
///
/// Returns `Cow::Borrowed(surface)` when the set is entirely neutral, so the
/// caller can keep the original surface without a copy.
///
/// # Example
/// ```ignore
/// let mut adj = AdjustmentSet::default();
/// adj.brightness = 150;
/// let brighter = apply_adjustments(&surface, &adj).into_owned();
/// ```
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(width = surface.width, height = surface.height)
)]
pub fn apply_adjustments<'a>(
    surface: &'a Surface,
    adjustments: &AdjustmentSet,
) -> Cow<'a, Surface> {
    // Early exit if no adjustments
    if adjustments.is_neutral() {
        debug!("all adjustments neutral, returning source surface");
        return Cow::Borrowed(surface);
    }

    apply_in_order(surface, adjustments, &AdjustmentStage::ORDER)
}

/// Apply the non-neutral stages of `adjustments` following `order`.
///
/// Stages missing from `order` are not applied. Exposed so callers can
/// preview alternative orderings.
pub fn apply_in_order<'a>(
    surface: &'a Surface,
    adjustments: &AdjustmentSet,
    order: &[AdjustmentStage],
) -> Cow<'a, Surface> {
    let mut result = Cow::Borrowed(surface);
    for &stage in order {
        let pct = adjustments.get(stage);
        if pct == NEUTRAL {
            continue;
        }
        debug!(%stage, pct, "applying adjustment");
        result = Cow::Owned(apply_stage(&result, stage, pct));
    }
    result
}


// ============================================================================
// Property-Based Tests
// ============================================================================

//! Per-pixel filter adjustments.
//!
//! Each filter takes a surface and an integer percentage (100 = neutral) and
//! returns a new surface. The formulas follow the CSS filter functions the
//! editor's canvas used (`brightness()`, `contrast()`, `saturate()`), so the
//! output matches what the browser showed before.
//!
//! Channels are processed as `f32` in 0..=255, then rounded and clamped back
//! to u8. Alpha is never touched. Negative percentages act like 0.
//!
//! ## Filters
//! - Brightness: `c * p`
//! - Contrast: `(c - 127.5) * p + 127.5`
//! - Saturation: `l + (c - l) * s` around BT.709 luma, as CSS `saturate()`
//! - Shadows: brightness at half the swing, `100 + (pct - 100) * 0.5`
//! - Sharpness: 3x3 edge-enhancement convolution above 100

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::luminance::luminance;
use crate::surface::{Surface, CHANNELS};

/// Neutral value for every adjustment slider.
pub const NEUTRAL: i32 = 100;

/// One of the five filter adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentStage {
    Brightness,
    Contrast,
    Saturation,
    Shadows,
    Sharpness,
}

impl AdjustmentStage {
    /// The order in which the composer applies stages.
    pub const ORDER: [AdjustmentStage; 5] = [
        AdjustmentStage::Brightness,
        AdjustmentStage::Contrast,
        AdjustmentStage::Saturation,
        AdjustmentStage::Shadows,
        AdjustmentStage::Sharpness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AdjustmentStage::Brightness => "brightness",
            AdjustmentStage::Contrast => "contrast",
            AdjustmentStage::Saturation => "saturation",
            AdjustmentStage::Shadows => "shadows",
            AdjustmentStage::Sharpness => "sharpness",
        }
    }

    /// Look up a stage by its slider name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|stage| stage.name() == name)
    }
}

impl fmt::Display for AdjustmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply a single stage at the given percentage.
pub fn apply_stage(surface: &Surface, stage: AdjustmentStage, pct: i32) -> Surface {
    match stage {
        AdjustmentStage::Brightness => adjust_brightness(surface, pct),
        AdjustmentStage::Contrast => adjust_contrast(surface, pct),
        AdjustmentStage::Saturation => adjust_saturation(surface, pct),
        AdjustmentStage::Shadows => adjust_shadows(surface, pct),
        AdjustmentStage::Sharpness => adjust_sharpness(surface, pct),
    }
}

/// Percentage to a non-negative multiplier.
#[inline]
fn amount(pct: f32) -> f32 {
    (pct / 100.0).max(0.0)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Run `f` over the RGB channels of every pixel, copying alpha through.
fn map_rgb<F>(surface: &Surface, f: F) -> Surface
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32),
{
    let mut pixels = surface.pixels.clone();
    for px in pixels.chunks_exact_mut(CHANNELS) {
        let (r, g, b) = f(px[0] as f32, px[1] as f32, px[2] as f32);
        px[0] = to_u8(r);
        px[1] = to_u8(g);
        px[2] = to_u8(b);
    }
    Surface {
        width: surface.width,
        height: surface.height,
        pixels,
    }
}

/// Scale every channel linearly. 100 keeps the image, 0 turns it black.
pub fn adjust_brightness(surface: &Surface, pct: i32) -> Surface {
    scale_brightness(surface, pct as f32)
}

/// Brightness with a fractional percentage.
fn scale_brightness(surface: &Surface, pct: f32) -> Surface {
    let k = amount(pct);
    map_rgb(surface, |r, g, b| (r * k, g * k, b * k))
}

/// Linear contrast around mid-gray. 0 collapses to flat gray.
pub fn adjust_contrast(surface: &Surface, pct: i32) -> Surface {
    let k = amount(pct as f32);
    let mid = 127.5;
    map_rgb(surface, |r, g, b| {
        ((r - mid) * k + mid, (g - mid) * k + mid, (b - mid) * k + mid)
    })
}

/// Scale chroma while keeping luminance. 0 is grayscale.
pub fn adjust_saturation(surface: &Surface, pct: i32) -> Surface {
    let s = amount(pct as f32);
    map_rgb(surface, |r, g, b| {
        let l = luminance(r, g, b);
        (l + (r - l) * s, l + (g - l) * s, l + (b - l) * s)
    })
}

/// Brightness attenuated to half the slider's swing.
pub fn adjust_shadows(surface: &Surface, pct: i32) -> Surface {
    scale_brightness(surface, shadows_brightness(pct))
}

/// Brightness percentage used by the shadows slider.
#[inline]
pub fn shadows_brightness(pct: i32) -> f32 {
    NEUTRAL as f32 + (pct as f32 - NEUTRAL as f32) * 0.5
}

/// Edge enhancement. A copy for `pct <= 100`, otherwise a 3x3 sharpen kernel
/// with strength `(pct - 100) / 100`.
pub fn adjust_sharpness(surface: &Surface, pct: i32) -> Surface {
    if pct <= NEUTRAL {
        return surface.clone();
    }
    convolve_rgb(surface, &sharpen_kernel(pct))
}

/// `[[0,-f,0],[-f,1+4f,-f],[0,-f,0]]` with `f = (pct - 100) / 100`.
pub fn sharpen_kernel(pct: i32) -> [[f32; 3]; 3] {
    let f = (pct as f32 - NEUTRAL as f32) / 100.0;
    [[0.0, -f, 0.0], [-f, 1.0 + 4.0 * f, -f], [0.0, -f, 0.0]]
}

/// Convolve the RGB channels with a 3x3 kernel, clamping samples to the edge.
///
/// Reads only from the source buffer, so the result does not depend on the
/// traversal order.
pub fn convolve_rgb(surface: &Surface, kernel: &[[f32; 3]; 3]) -> Surface {
    if !surface.is_valid() {
        return surface.clone();
    }

    let (w, h) = (surface.width as i64, surface.height as i64);
    let src = &surface.pixels;
    let mut pixels = src.clone();

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (ky, row) in kernel.iter().enumerate() {
                for (kx, &weight) in row.iter().enumerate() {
                    if weight == 0.0 {
                        continue;
                    }
                    let sx = (x + kx as i64 - 1).clamp(0, w - 1);
                    let sy = (y + ky as i64 - 1).clamp(0, h - 1);
                    let idx = (sy * w + sx) as usize * CHANNELS;
                    for (c, value) in acc.iter_mut().enumerate() {
                        *value += src[idx + c] as f32 * weight;
                    }
                }
            }
            let idx = (y * w + x) as usize * CHANNELS;
            for (c, value) in acc.into_iter().enumerate() {
                pixels[idx + c] = to_u8(value);
            }
        }
    }

    Surface {
        width: surface.width,
        height: surface.height,
        pixels,
    }
}

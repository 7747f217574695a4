//! Mirror a surface along one axis.

use std::fmt;
use std::str::FromStr;

use super::TransformError;
use crate::surface::{Surface, CHANNELS};

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipAxis {
    /// Left and right swap.
    Horizontal,
    /// Top and bottom swap.
    Vertical,
}

impl FlipAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            FlipAxis::Horizontal => "horizontal",
            FlipAxis::Vertical => "vertical",
        }
    }
}

impl fmt::Display for FlipAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlipAxis {
    type Err = TransformError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(FlipAxis::Horizontal),
            "vertical" => Ok(FlipAxis::Vertical),
            _ => Err(TransformError::UnsupportedAxis(value.to_string())),
        }
    }
}

/// Mirror a surface. Output dimensions equal the input dimensions.
pub fn flip(surface: &Surface, axis: FlipAxis) -> Surface {
    let row_len = surface.width as usize * CHANNELS;
    if row_len == 0 {
        return surface.clone();
    }

    let mut pixels = Vec::with_capacity(surface.pixels.len());
    match axis {
        FlipAxis::Horizontal => {
            for row in surface.pixels.chunks_exact(row_len) {
                for px in row.chunks_exact(CHANNELS).rev() {
                    pixels.extend_from_slice(px);
                }
            }
        }
        FlipAxis::Vertical => {
            for row in surface.pixels.chunks_exact(row_len).rev() {
                pixels.extend_from_slice(row);
            }
        }
    }

    Surface {
        width: surface.width,
        height: surface.height,
        pixels,
    }
}

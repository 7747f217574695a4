//! Quarter-turn rotation.
//!
//! The editor only rotates in 90° steps, so every output pixel maps to exactly
//! one source pixel and no interpolation is needed. The source is turned about
//! its own center and placed at the center of the new surface, which for quarter
//! turns means a pure index remap.
//!
//! For a source of size `w x h`, a clockwise turn maps source `(x, y)` to:
//! ```text
//!  90°: (h - 1 - y, x)        output is h x w
//! 180°: (w - 1 - x, h - 1 - y) output is w x h
//! 270°: (y, w - 1 - x)        output is h x w
//! ```

use super::TransformError;
use crate::surface::{Surface, CHANNELS};

/// Supported rotation angles, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// 90° clockwise.
    Quarter,
    /// 180°.
    Half,
    /// 270° clockwise (90° counter-clockwise).
    ThreeQuarter,
}

impl Rotation {
    /// Angle in degrees.
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Quarter => Rotation::ThreeQuarter,
            Rotation::Half => Rotation::Half,
            Rotation::ThreeQuarter => Rotation::Quarter,
        }
    }

    /// Returns true if this rotation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        !matches!(self, Rotation::Half)
    }

    /// Output dimensions for a source of the given size.
    pub fn output_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = TransformError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarter),
            other => Err(TransformError::UnsupportedAngle(other)),
        }
    }
}

/// Rotate a surface clockwise by a quarter, half or three-quarter turn.
pub fn rotate(surface: &Surface, rotation: Rotation) -> Surface {
    let (w, h) = (surface.width, surface.height);
    let (dst_w, dst_h) = rotation.output_dimensions(w, h);
    if !surface.is_valid() {
        return Surface {
            width: dst_w,
            height: dst_h,
            pixels: surface.pixels.clone(),
        };
    }
    let mut output = Surface {
        width: dst_w,
        height: dst_h,
        pixels: vec![0u8; surface.pixels.len()],
    };

    let pixels = surface.pixels.chunks_exact(CHANNELS).take(surface.pixel_count());
    for (i, px) in pixels.enumerate() {
        let x = (i % w as usize) as u32;
        let y = (i / w as usize) as u32;
        let (dx, dy) = match rotation {
            Rotation::Quarter => (h - 1 - y, x),
            Rotation::Half => (w - 1 - x, h - 1 - y),
            Rotation::ThreeQuarter => (y, w - 1 - x),
        };
        let dst_idx = output.index(dx, dy);
        output.pixels[dst_idx..dst_idx + CHANNELS].copy_from_slice(px);
    }

    output
}

/// Rotate by an angle in degrees, rejecting anything but 90, 180 and 270.
pub fn rotate_degrees(surface: &Surface, degrees: i32) -> Result<Surface, TransformError> {
    let rotation = Rotation::try_from(degrees)?;
    Ok(rotate(surface, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::create_surface;

    /// Create a test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::with_capacity((width * height) as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, ((x + y) % 256) as u8, 255]);
            }
        }
        Surface {
            width,
            height,
            pixels,
        }
    }

    #[test]
    fn test_90_degree_rotation_swaps_dimensions() {
        let img = test_image(100, 50);
        let rotated = rotate(&img, Rotation::Quarter);
        assert_eq!(rotated.dimensions(), (50, 100));
    }

    #[test]
    fn test_180_degree_rotation_keeps_dimensions() {
        let img = test_image(100, 50);
        let rotated = rotate(&img, Rotation::Half);
        assert_eq!(rotated.dimensions(), (100, 50));
    }

    #[test]
    fn test_270_degree_rotation_swaps_dimensions() {
        let img = test_image(30, 20);
        let rotated = rotate(&img, Rotation::ThreeQuarter);
        assert_eq!(rotated.dimensions(), (20, 30));
    }

    #[test]
    fn test_quarter_turn_moves_top_left_to_top_right() {
        let img = test_image(4, 3);
        let rotated = rotate(&img, Rotation::Quarter);
        // Source top-left (0,0) lands at the top-right of a 3x4 output
        assert_eq!(rotated.pixel(2, 0), img.pixel(0, 0));
        // Source bottom-left (0,2) lands at the top-left
        assert_eq!(rotated.pixel(0, 0), img.pixel(0, 2));
    }

    #[test]
    fn test_half_turn_moves_corner_to_opposite_corner() {
        let img = test_image(5, 4);
        let rotated = rotate(&img, Rotation::Half);
        assert_eq!(rotated.pixel(4, 3), img.pixel(0, 0));
        assert_eq!(rotated.pixel(0, 0), img.pixel(4, 3));
    }

    #[test]
    fn test_three_quarter_turn_moves_top_left_to_bottom_left() {
        let img = test_image(4, 3);
        let rotated = rotate(&img, Rotation::ThreeQuarter);
        assert_eq!(rotated.pixel(0, 3), img.pixel(0, 0));
    }

    #[test]
    fn test_two_quarter_turns_equal_half_turn() {
        let img = test_image(100, 50);
        let once = rotate(&img, Rotation::Quarter);
        assert_eq!(once.dimensions(), (50, 100));
        let twice = rotate(&once, Rotation::Quarter);
        assert_eq!(twice.dimensions(), (100, 50));
        assert_eq!(twice, rotate(&img, Rotation::Half));
    }

    #[test]
    fn test_rotate_degrees_rejects_other_angles() {
        let img = test_image(4, 4);
        for angle in [0, 45, -90, 360, 91] {
            assert_eq!(
                rotate_degrees(&img, angle),
                Err(TransformError::UnsupportedAngle(angle))
            );
        }
    }

    #[test]
    fn test_rotate_degrees_accepts_quarter_turns() {
        let img = test_image(6, 2);
        assert_eq!(rotate_degrees(&img, 90).unwrap().dimensions(), (2, 6));
        assert_eq!(rotate_degrees(&img, 180).unwrap().dimensions(), (6, 2));
        assert_eq!(rotate_degrees(&img, 270).unwrap().dimensions(), (2, 6));
    }

    #[test]
    fn test_rotation_does_not_touch_source() {
        let img = test_image(8, 3);
        let before = img.clone();
        let _ = rotate(&img, Rotation::Quarter);
        assert_eq!(img, before);
    }

    #[test]
    fn test_1x1_rotation() {
        let img = test_image(1, 1);
        assert_eq!(rotate(&img, Rotation::Quarter), img);
    }

    #[test]
    fn test_empty_surface_rotation() {
        let img = create_surface(0, 5).unwrap();
        let rotated = rotate(&img, Rotation::Quarter);
        assert_eq!(rotated.dimensions(), (5, 0));
        assert!(rotated.is_empty());
    }

    #[test]
    fn test_detached_surface_rotation_keeps_buffer() {
        let mut img = test_image(3, 2);
        img.pixels.truncate(10);
        let rotated = rotate(&img, Rotation::Quarter);
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(rotated.pixels, img.pixels);
        assert!(!rotated.is_valid());
    }

    #[test]
    fn test_inverse_rotation() {
        assert_eq!(Rotation::Quarter.inverse(), Rotation::ThreeQuarter);
        assert_eq!(Rotation::Half.inverse(), Rotation::Half);
        assert_eq!(Rotation::ThreeQuarter.inverse().degrees(), 90);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn surface_strategy() -> impl Strategy<Value = Surface> {
        (1u32..=16, 1u32..=16).prop_flat_map(|(w, h)| {
            let len = (w * h) as usize * CHANNELS;
            prop::collection::vec(any::<u8>(), len..=len).prop_map(move |pixels| Surface {
                width: w,
                height: h,
                pixels,
            })
        })
    }

    fn rotation_strategy() -> impl Strategy<Value = Rotation> {
        prop_oneof![
            Just(Rotation::Quarter),
            Just(Rotation::Half),
            Just(Rotation::ThreeQuarter),
        ]
    }

    proptest! {
        /// Property: rotating by d then by 360 - d restores the original.
        #[test]
        fn prop_rotation_inverse_restores_surface(
            surface in surface_strategy(),
            rotation in rotation_strategy(),
        ) {
            let there = rotate(&surface, rotation);
            let back = rotate(&there, rotation.inverse());
            prop_assert_eq!(back.dimensions(), surface.dimensions());
            prop_assert_eq!(back, surface);
        }

        /// Property: quarter turns swap dimensions, half turns keep them.
        #[test]
        fn prop_output_dimensions(
            surface in surface_strategy(),
            rotation in rotation_strategy(),
        ) {
            let rotated = rotate(&surface, rotation);
            let expected = rotation.output_dimensions(surface.width, surface.height);
            prop_assert_eq!(rotated.dimensions(), expected);
            prop_assert_eq!(rotated.byte_size(), surface.byte_size());
        }

        /// Property: four quarter turns are the identity.
        #[test]
        fn prop_full_turn_is_identity(surface in surface_strategy()) {
            let mut current = surface.clone();
            for _ in 0..4 {
                current = rotate(&current, Rotation::Quarter);
            }
            prop_assert_eq!(current, surface);
        }

        /// Property: angles outside the supported set are rejected.
        #[test]
        fn prop_unsupported_angles_rejected(angle in any::<i32>()) {
            prop_assume!(angle != 90 && angle != 180 && angle != 270);
            prop_assert_eq!(
                Rotation::try_from(angle),
                Err(TransformError::UnsupportedAngle(angle))
            );
        }
    }
}

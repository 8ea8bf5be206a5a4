//! RGBA color for clear operations.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGBA color with components in the 0.0-1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0.0-1.0 range)
    pub r: f32,
    /// Green component (0.0-1.0 range)
    pub g: f32,
    /// Blue component (0.0-1.0 range)
    pub b: f32,
    /// Alpha component (0.0-1.0 range)
    pub a: f32,
}

impl Rgba {
    /// Default clear color for the draw area (cornflower blue).
    pub const CORNFLOWER_BLUE: Self = Self::new(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0, 1.0);

    /// Default color for letterbox/pillarbox bars.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from RGB bytes (0-255).
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb() {
        let color = Rgba::from_rgb(100, 149, 237);
        assert_eq!(color, Rgba::CORNFLOWER_BLUE);
    }

    #[test]
    fn test_default_is_black() {
        assert_eq!(Rgba::default(), Rgba::BLACK);
    }
}

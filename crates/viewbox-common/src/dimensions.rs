//! Dimension and scale value types.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
///
/// Plain value type compared by value. Used for actual (window/back-buffer)
/// resolutions, virtual (internal render) resolutions, and display modes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Creates a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height as a real-number division.
    ///
    /// Returns 1.0 for a zero height so callers never divide by zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    /// Whether both axes are strictly positive.
    ///
    /// Aspect-ratio math divides by both axes, so settings require this.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns a copy with the given width.
    #[must_use]
    pub const fn with_width(self, width: u32) -> Self {
        Self { width, ..self }
    }

    /// Returns a copy with the given height.
    #[must_use]
    pub const fn with_height(self, height: u32) -> Self {
        Self { height, ..self }
    }

    /// Gets the total pixel count.
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Per-axis scale factors between the virtual and actual resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    /// Horizontal scale factor (actual width / virtual width)
    pub x: f64,
    /// Vertical scale factor (actual height / virtual height)
    pub y: f64,
}

impl Scale {
    /// Creates a new scale.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a uniform scale with both axes equal.
    #[must_use]
    pub const fn uniform(factor: f64) -> Self {
        Self { x: factor, y: factor }
    }

    /// The smaller of the two factors.
    #[must_use]
    pub fn min_factor(&self) -> f64 {
        self.x.min(self.y)
    }

    /// The larger of the two factors.
    #[must_use]
    pub fn max_factor(&self) -> f64 {
        self.x.max(self.y)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::new(1920, 1080).to_string(), "1920x1080");
    }

    #[test]
    fn test_dimensions_zero_height_aspect() {
        let dims = Dimensions::new(800, 0);
        assert!((dims.aspect_ratio() - 1.0).abs() < f64::EPSILON);
        assert!(!dims.is_positive());
    }

    #[test]
    fn test_dimensions_with_axis() {
        let dims = Dimensions::new(800, 600);
        assert_eq!(dims.with_width(1024), Dimensions::new(1024, 600));
        assert_eq!(dims.with_height(768), Dimensions::new(800, 768));
    }

    #[test]
    fn test_dimensions_pixel_count() {
        assert_eq!(Dimensions::new(1920, 1080).pixel_count(), 1920 * 1080);
    }

    #[test]
    fn test_scale_factors() {
        let scale = Scale::new(0.8, 0.96);
        assert!((scale.min_factor() - 0.8).abs() < f64::EPSILON);
        assert!((scale.max_factor() - 0.96).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scale_default_is_identity() {
        assert_eq!(Scale::default(), Scale::uniform(1.0));
    }

    proptest! {
        #[test]
        fn prop_aspect_ratio_is_finite(w in 0u32..=10_000, h in 0u32..=10_000) {
            let ratio = Dimensions::new(w, h).aspect_ratio();
            prop_assert!(ratio.is_finite());
            prop_assert!(ratio >= 0.0);
        }
    }
}

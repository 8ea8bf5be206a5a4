//! # Viewbox Common
//!
//! Common value types and shared abstractions for Viewbox.
//!
//! This crate provides the foundational types used across the Viewbox
//! subsystems:
//! - Dimension and scale value types
//! - RGBA color with the default clear colors
//! - Common error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod dimensions;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::dimensions::*;
    pub use crate::error::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_aspect_ratio() {
        let dims = Dimensions::new(1280, 800);
        assert!((dims.aspect_ratio() - 1.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_colors_differ() {
        assert_ne!(Rgba::CORNFLOWER_BLUE, Rgba::BLACK);
    }
}

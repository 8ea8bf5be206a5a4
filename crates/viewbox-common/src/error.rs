//! Error types for Viewbox.

use thiserror::Error;

use crate::dimensions::Dimensions;

/// Top-level error type for Viewbox operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewboxError {
    /// A requested resolution is not legal for the current display.
    ///
    /// Raised when a windowed/borderless resolution exceeds the display's
    /// usable area, or when a full-screen resolution is not among the
    /// display's supported exact resolutions. The recomputation pipeline
    /// aborts before any display command is issued, so prior settings
    /// remain in effect.
    #[error("invalid resolution selected: {width}x{height}")]
    InvalidResolutionSelected {
        /// Rejected width in pixels
        width: u32,
        /// Rejected height in pixels
        height: u32,
    },
}

impl ViewboxError {
    /// Builds an invalid-resolution error from a dimensions value.
    #[must_use]
    pub const fn invalid_resolution(resolution: Dimensions) -> Self {
        Self::InvalidResolutionSelected {
            width: resolution.width,
            height: resolution.height,
        }
    }
}

/// Result type alias for Viewbox operations.
pub type ViewboxResult<T> = Result<T, ViewboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_resolution_message() {
        let err = ViewboxError::invalid_resolution(Dimensions::new(9999, 9999));
        assert_eq!(err.to_string(), "invalid resolution selected: 9999x9999");
    }
}

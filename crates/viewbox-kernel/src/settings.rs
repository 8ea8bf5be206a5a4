//! Resolution settings record.

use serde::{Deserialize, Serialize};
use viewbox_common::Dimensions;

use crate::modes::{BoxingMode, ScreenMode, VirtualResolutionMode, WidthChangePolicy};

/// Default width for actual and virtual resolutions.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default height for actual and virtual resolutions.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Default resolution (800x600).
pub const DEFAULT_RESOLUTION: Dimensions = Dimensions::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);

/// Configuration bundle for a resolution manager.
///
/// Pure data; no validation happens here. Whether a resolution/mode
/// combination is legal depends on the live display, so validation is the
/// manager's responsibility. After construction, fields are mutated only
/// through the manager's setters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSettings {
    /// Preferred boxing mode. The mode actually in effect may differ when
    /// [`BoxingMode::BiggestArea`] resolves to a concrete choice.
    pub preferred_boxing_mode: BoxingMode,
    /// Whether the user may resize the window.
    pub is_user_resizeable: bool,
    /// Screen mode.
    pub screen_mode: ScreenMode,
    /// Whether to re-derive the actual height from the virtual aspect
    /// ratio when the actual resolution changes.
    pub enforce_aspect_ratio: bool,
    /// Policy for aspect enforcement when only the width changed.
    pub width_change_policy: WidthChangePolicy,
    /// How the virtual resolution tracks the actual resolution.
    pub virtual_resolution_mode: VirtualResolutionMode,
    /// Actual (window/back-buffer) resolution in pixels.
    pub actual_resolution: Dimensions,
    /// Virtual (internal render) resolution in pixels. Both axes must be
    /// strictly positive; it is a divisor in the aspect-ratio math.
    pub virtual_resolution: Dimensions,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            preferred_boxing_mode: BoxingMode::None,
            is_user_resizeable: true,
            screen_mode: ScreenMode::Windowed,
            enforce_aspect_ratio: false,
            width_change_policy: WidthChangePolicy::default(),
            virtual_resolution_mode: VirtualResolutionMode::Fixed,
            actual_resolution: DEFAULT_RESOLUTION,
            virtual_resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl ResolutionSettings {
    /// Creates settings with the given actual and virtual resolutions and
    /// defaults for everything else (windowed, no boxing, resizeable).
    #[must_use]
    pub fn new(actual_resolution: Dimensions, virtual_resolution: Dimensions) -> Self {
        Self {
            actual_resolution,
            virtual_resolution,
            ..Self::default()
        }
    }

    /// Creates settings from raw width/height pairs.
    #[must_use]
    pub fn from_sizes(
        actual_width: u32,
        actual_height: u32,
        virtual_width: u32,
        virtual_height: u32,
    ) -> Self {
        Self::new(
            Dimensions::new(actual_width, actual_height),
            Dimensions::new(virtual_width, virtual_height),
        )
    }

    /// Sets the screen mode.
    #[must_use]
    pub fn with_screen_mode(mut self, mode: ScreenMode) -> Self {
        self.screen_mode = mode;
        self
    }

    /// Sets the preferred boxing mode.
    #[must_use]
    pub fn with_boxing_mode(mut self, mode: BoxingMode) -> Self {
        self.preferred_boxing_mode = mode;
        self
    }

    /// Sets whether the user may resize the window.
    #[must_use]
    pub fn with_user_resizeable(mut self, resizeable: bool) -> Self {
        self.is_user_resizeable = resizeable;
        self
    }

    /// Sets aspect-ratio enforcement.
    #[must_use]
    pub fn with_enforce_aspect_ratio(mut self, enforce: bool) -> Self {
        self.enforce_aspect_ratio = enforce;
        self
    }

    /// Sets the width-only-change policy for aspect enforcement.
    #[must_use]
    pub fn with_width_change_policy(mut self, policy: WidthChangePolicy) -> Self {
        self.width_change_policy = policy;
        self
    }

    /// Sets how the virtual resolution tracks the actual resolution.
    #[must_use]
    pub fn with_virtual_resolution_mode(mut self, mode: VirtualResolutionMode) -> Self {
        self.virtual_resolution_mode = mode;
        self
    }

    /// Virtual width divided by virtual height as a real-number division.
    #[must_use]
    pub fn virtual_aspect_ratio(&self) -> f64 {
        self.virtual_resolution.aspect_ratio()
    }

    /// Actual width divided by actual height as a real-number division.
    #[must_use]
    pub fn actual_aspect_ratio(&self) -> f64 {
        self.actual_resolution.aspect_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ResolutionSettings::default();
        assert_eq!(settings.actual_resolution, Dimensions::new(800, 600));
        assert_eq!(settings.virtual_resolution, Dimensions::new(800, 600));
        assert_eq!(settings.screen_mode, ScreenMode::Windowed);
        assert_eq!(settings.preferred_boxing_mode, BoxingMode::None);
        assert!(settings.is_user_resizeable);
        assert!(!settings.enforce_aspect_ratio);
    }

    #[test]
    fn test_builders_normalize_to_canonical_form() {
        let a = ResolutionSettings::from_sizes(1024, 768, 1280, 800)
            .with_screen_mode(ScreenMode::Borderless)
            .with_boxing_mode(BoxingMode::Pillarbox);
        let b = ResolutionSettings::new(Dimensions::new(1024, 768), Dimensions::new(1280, 800))
            .with_screen_mode(ScreenMode::Borderless)
            .with_boxing_mode(BoxingMode::Pillarbox);
        assert_eq!(a, b);
    }

    #[test]
    fn test_aspect_ratios() {
        let settings = ResolutionSettings::from_sizes(1024, 768, 1280, 800);
        assert!((settings.virtual_aspect_ratio() - 1.6).abs() < 1e-12);
        assert!((settings.actual_aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
    }
}

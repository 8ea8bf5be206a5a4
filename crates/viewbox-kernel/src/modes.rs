//! Screen and boxing mode enumerations.

use serde::{Deserialize, Serialize};

/// Window/display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScreenMode {
    /// Ordinary decorated window.
    #[default]
    Windowed,
    /// Exclusive full-screen mode.
    FullScreen,
    /// Borderless window, not necessarily covering the screen.
    Borderless,
    /// Borderless window covering the full display.
    BorderlessFullScreen,
}

impl ScreenMode {
    /// Whether this mode drives the display in full screen.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        matches!(self, Self::FullScreen | Self::BorderlessFullScreen)
    }

    /// Whether this mode removes the window chrome.
    #[must_use]
    pub fn is_borderless(&self) -> bool {
        matches!(self, Self::Borderless | Self::BorderlessFullScreen)
    }

    /// Flips between the windowed and full-screen member of each pair.
    ///
    /// Windowed pairs with FullScreen, Borderless with
    /// BorderlessFullScreen.
    #[must_use]
    pub fn toggled_fullscreen(&self) -> Self {
        match self {
            Self::Windowed => Self::FullScreen,
            Self::FullScreen => Self::Windowed,
            Self::Borderless => Self::BorderlessFullScreen,
            Self::BorderlessFullScreen => Self::Borderless,
        }
    }

    /// Flips between the decorated and borderless member of each pair.
    #[must_use]
    pub fn toggled_borderless(&self) -> Self {
        match self {
            Self::Windowed => Self::Borderless,
            Self::Borderless => Self::Windowed,
            Self::FullScreen => Self::BorderlessFullScreen,
            Self::BorderlessFullScreen => Self::FullScreen,
        }
    }

    /// Advances through all four modes.
    ///
    /// Order: Borderless, BorderlessFullScreen, Windowed, FullScreen,
    /// back to Borderless.
    #[must_use]
    pub fn cycled(&self) -> Self {
        match self {
            Self::Borderless => Self::BorderlessFullScreen,
            Self::BorderlessFullScreen => Self::Windowed,
            Self::Windowed => Self::FullScreen,
            Self::FullScreen => Self::Borderless,
        }
    }
}

/// Aspect-preserving boxing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoxingMode {
    /// Fill the full viewport with no bars. Causes stretching unless the
    /// aspect ratios already match.
    #[default]
    None,
    /// Horizontal bars above and below the draw area.
    Letterbox,
    /// Vertical bars left and right of the draw area.
    Pillarbox,
    /// Pick whichever of letterbox/pillarbox yields the largest draw area.
    BiggestArea,
}

impl BoxingMode {
    /// Advances through all four modes.
    ///
    /// Order: None, BiggestArea, Pillarbox, Letterbox, back to None.
    #[must_use]
    pub fn cycled(&self) -> Self {
        match self {
            Self::None => Self::BiggestArea,
            Self::BiggestArea => Self::Pillarbox,
            Self::Pillarbox => Self::Letterbox,
            Self::Letterbox => Self::None,
        }
    }
}

/// Policy for aspect-ratio enforcement when only the width changed.
///
/// The enforcement step recomputes the height from the virtual aspect
/// ratio when the height changed (alone or together with the width).
/// A width-only change is ambiguous, so the behavior is a named choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WidthChangePolicy {
    /// Leave the height untouched on a width-only change.
    #[default]
    LeaveHeight,
    /// Recompute the height from the virtual aspect ratio, as the other
    /// branches do.
    MatchVirtualAspect,
}

/// How the virtual resolution tracks the actual resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum VirtualResolutionMode {
    /// Virtual resolution is a fixed value.
    #[default]
    Fixed,
    /// Virtual resolution follows the actual resolution multiplied by the
    /// given factor. Only honored with [`BoxingMode::None`].
    Multiplied(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_mode_predicates() {
        assert!(!ScreenMode::Windowed.is_fullscreen());
        assert!(ScreenMode::FullScreen.is_fullscreen());
        assert!(!ScreenMode::Borderless.is_fullscreen());
        assert!(ScreenMode::BorderlessFullScreen.is_fullscreen());

        assert!(!ScreenMode::Windowed.is_borderless());
        assert!(!ScreenMode::FullScreen.is_borderless());
        assert!(ScreenMode::Borderless.is_borderless());
        assert!(ScreenMode::BorderlessFullScreen.is_borderless());
    }

    #[test]
    fn test_fullscreen_toggle_pairs() {
        assert_eq!(
            ScreenMode::Windowed.toggled_fullscreen(),
            ScreenMode::FullScreen
        );
        assert_eq!(
            ScreenMode::FullScreen.toggled_fullscreen(),
            ScreenMode::Windowed
        );
        assert_eq!(
            ScreenMode::Borderless.toggled_fullscreen(),
            ScreenMode::BorderlessFullScreen
        );
        assert_eq!(
            ScreenMode::BorderlessFullScreen.toggled_fullscreen(),
            ScreenMode::Borderless
        );
    }

    #[test]
    fn test_borderless_toggle_pairs() {
        assert_eq!(
            ScreenMode::Windowed.toggled_borderless(),
            ScreenMode::Borderless
        );
        assert_eq!(
            ScreenMode::FullScreen.toggled_borderless(),
            ScreenMode::BorderlessFullScreen
        );
    }

    #[test]
    fn test_screen_mode_cycle_returns_after_four() {
        for start in [
            ScreenMode::Windowed,
            ScreenMode::FullScreen,
            ScreenMode::Borderless,
            ScreenMode::BorderlessFullScreen,
        ] {
            let mut mode = start;
            for _ in 0..4 {
                mode = mode.cycled();
            }
            assert_eq!(mode, start);
        }
    }

    #[test]
    fn test_boxing_mode_cycle_order() {
        assert_eq!(BoxingMode::None.cycled(), BoxingMode::BiggestArea);
        assert_eq!(BoxingMode::BiggestArea.cycled(), BoxingMode::Pillarbox);
        assert_eq!(BoxingMode::Pillarbox.cycled(), BoxingMode::Letterbox);
        assert_eq!(BoxingMode::Letterbox.cycled(), BoxingMode::None);
    }
}

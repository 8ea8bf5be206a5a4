//! Display and window adapter traits.
//!
//! The seam between the resolution manager and the graphics subsystem.
//! The manager queries the display for supported modes, commands it to
//! resize the back buffer and switch modes, and observes the window's
//! client size. Handles are typically borrowed by the manager, not owned:
//! blanket impls over `&mut T` let several managers coexist in a process
//! without any global state.

use glam::IVec2;
use viewbox_common::{Dimensions, Rgba};

use crate::target::{FilterMode, RenderTargetDesc};

/// Graphics-device side of the adapter seam.
///
/// Covers display-mode queries, back-buffer/mode commands, and the owned
/// render-target resource the manager blits through.
pub trait DisplayAdapter {
    /// Offscreen render-target resource created by this adapter.
    type RenderTarget;

    /// Current resolution of the display the window occupies.
    fn current_display_resolution(&self) -> Dimensions;

    /// Exact resolutions the display supports for full-screen modes.
    fn supported_resolutions(&self) -> Vec<Dimensions>;

    /// Stages a new back-buffer size. Takes effect on
    /// [`apply_changes`](Self::apply_changes).
    fn set_back_buffer_size(&mut self, size: Dimensions);

    /// Stages the full-screen flag. Takes effect on
    /// [`apply_changes`](Self::apply_changes).
    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Commits staged back-buffer and mode changes to the device.
    fn apply_changes(&mut self);

    /// Allocates a render target of the given size.
    fn create_render_target(
        &mut self,
        size: Dimensions,
        desc: &RenderTargetDesc,
    ) -> Self::RenderTarget;

    /// Makes the given render target the draw destination.
    fn bind_render_target(&mut self, target: &Self::RenderTarget);

    /// Restores the real back buffer as the draw destination.
    fn unbind_render_target(&mut self);

    /// Clears the current draw destination.
    fn clear(&mut self, color: Rgba);

    /// Draws the render target onto the back buffer at the given position
    /// and size.
    fn blit_render_target(
        &mut self,
        target: &Self::RenderTarget,
        position: IVec2,
        size: Dimensions,
        filter: FilterMode,
    );
}

/// Window side of the adapter seam.
pub trait WindowAdapter {
    /// Current client-area size as reported by the windowing system.
    fn client_size(&self) -> Dimensions;

    /// Shows or hides the window chrome.
    fn set_borderless(&mut self, borderless: bool);

    /// Allows or forbids user resizing.
    fn set_user_resizeable(&mut self, resizeable: bool);
}

impl<D: DisplayAdapter + ?Sized> DisplayAdapter for &mut D {
    type RenderTarget = D::RenderTarget;

    fn current_display_resolution(&self) -> Dimensions {
        (**self).current_display_resolution()
    }

    fn supported_resolutions(&self) -> Vec<Dimensions> {
        (**self).supported_resolutions()
    }

    fn set_back_buffer_size(&mut self, size: Dimensions) {
        (**self).set_back_buffer_size(size);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        (**self).set_fullscreen(fullscreen);
    }

    fn apply_changes(&mut self) {
        (**self).apply_changes();
    }

    fn create_render_target(
        &mut self,
        size: Dimensions,
        desc: &RenderTargetDesc,
    ) -> Self::RenderTarget {
        (**self).create_render_target(size, desc)
    }

    fn bind_render_target(&mut self, target: &Self::RenderTarget) {
        (**self).bind_render_target(target);
    }

    fn unbind_render_target(&mut self) {
        (**self).unbind_render_target();
    }

    fn clear(&mut self, color: Rgba) {
        (**self).clear(color);
    }

    fn blit_render_target(
        &mut self,
        target: &Self::RenderTarget,
        position: IVec2,
        size: Dimensions,
        filter: FilterMode,
    ) {
        (**self).blit_render_target(target, position, size, filter);
    }
}

impl<W: WindowAdapter + ?Sized> WindowAdapter for &mut W {
    fn client_size(&self) -> Dimensions {
        (**self).client_size()
    }

    fn set_borderless(&mut self, borderless: bool) {
        (**self).set_borderless(borderless);
    }

    fn set_user_resizeable(&mut self, resizeable: bool) {
        (**self).set_user_resizeable(resizeable);
    }
}

//! Window adapter over winit.

use std::sync::Arc;

use viewbox_common::Dimensions;
use viewbox_kernel::adapter::WindowAdapter;
use winit::window::Window;

/// [`WindowAdapter`] implementation over a winit window handle.
///
/// Holds the window behind an `Arc` so the display adapter and the event
/// loop can keep their own handles to the same window.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    window: Arc<Window>,
}

impl WinitWindow {
    /// Wraps a winit window handle.
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    /// The underlying winit window.
    #[must_use]
    pub fn inner(&self) -> &Arc<Window> {
        &self.window
    }
}

impl WindowAdapter for WinitWindow {
    fn client_size(&self) -> Dimensions {
        let size = self.window.inner_size();
        Dimensions::new(size.width, size.height)
    }

    fn set_borderless(&mut self, borderless: bool) {
        self.window.set_decorations(!borderless);
    }

    fn set_user_resizeable(&mut self, resizeable: bool) {
        self.window.set_resizable(resizeable);
    }
}

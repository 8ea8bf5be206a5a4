//! # Viewbox Backend
//!
//! wgpu/winit implementations of the Viewbox adapter traits:
//! - [`WinitWindow`]: window adapter over a winit window handle
//! - [`WgpuDisplay`]: display adapter owning the wgpu surface, device, and
//!   a fullscreen-triangle blit pipeline
//!
//! The crate also ships the `boxing_demo` binary, an interactive window
//! showing letterbox/pillarbox boxing and screen-mode transitions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod display;
pub mod window;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::display::*;
    pub use crate::window::*;
}

pub use prelude::*;

//! # Viewbox Kernel
//!
//! Core resolution and boxing management.
//!
//! This crate decouples the resolution an application renders at internally
//! (the "virtual" resolution) from the resolution its window actually
//! occupies (the "actual" resolution):
//! - Screen and boxing mode enumerations with transition tables
//! - Immutable-intent resolution settings
//! - Display/window adapter traits (the seam to the graphics subsystem)
//! - Letterbox/pillarbox geometry math
//! - The stateful resolution manager with its guarded recomputation
//!   pipeline
//!
//! ## Recomputation pipeline
//!
//! Every settings change funnels through a single pipeline that normalizes
//! the actual resolution, validates it against the live display, pushes the
//! change to the display adapter, and regenerates the render-target
//! geometry. Committing a change to the display can synchronously echo a
//! window-resize back into the manager; a single-flight guard drops the
//! nested invocation so the outer run's final state wins.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod adapter;
pub mod boxing;
pub mod headless;
pub mod manager;
pub mod modes;
pub mod settings;
pub mod target;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::*;
    pub use crate::boxing::*;
    pub use crate::headless::*;
    pub use crate::manager::*;
    pub use crate::modes::*;
    pub use crate::settings::*;
    pub use crate::target::*;
}

pub use prelude::*;

//! In-memory adapter pair for tests and headless use.
//!
//! [`HeadlessDisplay`] and [`HeadlessWindow`] share one state cell and
//! model the parts of a windowing stack the manager cares about: staged
//! back-buffer changes that only land on `apply_changes`, a client size
//! that follows the back buffer, and an optional maximum client size so
//! tests can exercise the OS-clamped-the-window resize echo. Every
//! command is recorded for ordering assertions.

use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec2;
use viewbox_common::{Dimensions, Rgba};

use crate::adapter::{DisplayAdapter, WindowAdapter};
use crate::target::{FilterMode, RenderTargetDesc};

/// A command observed by the headless adapter pair.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterCommand {
    /// Back-buffer size staged.
    SetBackBufferSize(Dimensions),
    /// Full-screen flag staged.
    SetFullscreen(bool),
    /// Staged changes committed.
    ApplyChanges,
    /// Window chrome toggled.
    SetBorderless(bool),
    /// User-resize flag propagated.
    SetUserResizeable(bool),
    /// Render target allocated.
    CreateRenderTarget(Dimensions),
    /// Render target bound as draw destination.
    BindRenderTarget(u32),
    /// Back buffer restored as draw destination.
    UnbindRenderTarget,
    /// Draw destination cleared.
    Clear(Rgba),
    /// Render target blitted onto the back buffer.
    Blit {
        /// Id of the blitted target.
        target: u32,
        /// Destination offset.
        position: IVec2,
        /// Destination size.
        size: Dimensions,
        /// Sampling filter.
        filter: FilterMode,
    },
}

/// Render target handed out by the headless display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessRenderTarget {
    /// Allocation id, increasing per created target.
    pub id: u32,
    /// Size at creation (the virtual resolution).
    pub size: Dimensions,
    /// Descriptor at creation.
    pub desc: RenderTargetDesc,
}

#[derive(Debug)]
struct HeadlessState {
    display_resolution: Dimensions,
    supported: Vec<Dimensions>,
    back_buffer: Dimensions,
    pending_back_buffer: Dimensions,
    fullscreen: bool,
    pending_fullscreen: bool,
    borderless: bool,
    resizeable: bool,
    client_size: Dimensions,
    max_client: Option<Dimensions>,
    next_target_id: u32,
    commands: Vec<AdapterCommand>,
}

impl HeadlessState {
    fn clamp_client(&self, size: Dimensions) -> Dimensions {
        match self.max_client {
            Some(max) => Dimensions::new(size.width.min(max.width), size.height.min(max.height)),
            None => size,
        }
    }
}

/// Display half of the headless adapter pair.
#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    state: Rc<RefCell<HeadlessState>>,
}

/// Window half of the headless adapter pair.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessDisplay {
    /// Creates a linked display/window pair.
    ///
    /// `supported` is the exact-resolution list reported for full-screen
    /// validation; it gets the display resolution appended if absent.
    #[must_use]
    pub fn pair(
        display_resolution: Dimensions,
        mut supported: Vec<Dimensions>,
    ) -> (HeadlessDisplay, HeadlessWindow) {
        if !supported.contains(&display_resolution) {
            supported.push(display_resolution);
        }
        let state = Rc::new(RefCell::new(HeadlessState {
            display_resolution,
            supported,
            back_buffer: Dimensions::default(),
            pending_back_buffer: Dimensions::default(),
            fullscreen: false,
            pending_fullscreen: false,
            borderless: false,
            resizeable: true,
            client_size: Dimensions::default(),
            max_client: None,
            next_target_id: 0,
            commands: Vec::new(),
        }));
        (
            HeadlessDisplay {
                state: Rc::clone(&state),
            },
            HeadlessWindow { state },
        )
    }

    /// Limits the client size the "OS" will grant, per axis.
    pub fn set_max_client_size(&self, max: Option<Dimensions>) {
        self.state.borrow_mut().max_client = max;
    }

    /// Committed back-buffer size.
    #[must_use]
    pub fn back_buffer(&self) -> Dimensions {
        self.state.borrow().back_buffer
    }

    /// Committed full-screen flag.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.state.borrow().fullscreen
    }

    /// Current borderless flag.
    #[must_use]
    pub fn is_borderless(&self) -> bool {
        self.state.borrow().borderless
    }

    /// Current user-resizeable flag.
    #[must_use]
    pub fn is_user_resizeable(&self) -> bool {
        self.state.borrow().resizeable
    }

    /// Snapshot of every command observed so far.
    #[must_use]
    pub fn commands(&self) -> Vec<AdapterCommand> {
        self.state.borrow().commands.clone()
    }

    /// Clears the recorded command log.
    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }
}

impl HeadlessWindow {
    /// Overrides the client size, simulating a user drag or an OS move.
    pub fn force_client_size(&self, size: Dimensions) {
        self.state.borrow_mut().client_size = size;
    }
}

impl DisplayAdapter for HeadlessDisplay {
    type RenderTarget = HeadlessRenderTarget;

    fn current_display_resolution(&self) -> Dimensions {
        self.state.borrow().display_resolution
    }

    fn supported_resolutions(&self) -> Vec<Dimensions> {
        self.state.borrow().supported.clone()
    }

    fn set_back_buffer_size(&mut self, size: Dimensions) {
        let mut state = self.state.borrow_mut();
        state.pending_back_buffer = size;
        state.commands.push(AdapterCommand::SetBackBufferSize(size));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        let mut state = self.state.borrow_mut();
        state.pending_fullscreen = fullscreen;
        state.commands.push(AdapterCommand::SetFullscreen(fullscreen));
    }

    fn apply_changes(&mut self) {
        let mut state = self.state.borrow_mut();
        state.back_buffer = state.pending_back_buffer;
        state.fullscreen = state.pending_fullscreen;
        // Committing the back buffer resizes the window, possibly clamped.
        state.client_size = state.clamp_client(state.back_buffer);
        state.commands.push(AdapterCommand::ApplyChanges);
    }

    fn create_render_target(
        &mut self,
        size: Dimensions,
        desc: &RenderTargetDesc,
    ) -> Self::RenderTarget {
        let mut state = self.state.borrow_mut();
        let id = state.next_target_id;
        state.next_target_id += 1;
        state.commands.push(AdapterCommand::CreateRenderTarget(size));
        HeadlessRenderTarget {
            id,
            size,
            desc: *desc,
        }
    }

    fn bind_render_target(&mut self, target: &Self::RenderTarget) {
        self.state
            .borrow_mut()
            .commands
            .push(AdapterCommand::BindRenderTarget(target.id));
    }

    fn unbind_render_target(&mut self) {
        self.state
            .borrow_mut()
            .commands
            .push(AdapterCommand::UnbindRenderTarget);
    }

    fn clear(&mut self, color: Rgba) {
        self.state
            .borrow_mut()
            .commands
            .push(AdapterCommand::Clear(color));
    }

    fn blit_render_target(
        &mut self,
        target: &Self::RenderTarget,
        position: IVec2,
        size: Dimensions,
        filter: FilterMode,
    ) {
        self.state.borrow_mut().commands.push(AdapterCommand::Blit {
            target: target.id,
            position,
            size,
            filter,
        });
    }
}

impl WindowAdapter for HeadlessWindow {
    fn client_size(&self) -> Dimensions {
        self.state.borrow().client_size
    }

    fn set_borderless(&mut self, borderless: bool) {
        let mut state = self.state.borrow_mut();
        state.borderless = borderless;
        state.commands.push(AdapterCommand::SetBorderless(borderless));
    }

    fn set_user_resizeable(&mut self, resizeable: bool) {
        let mut state = self.state.borrow_mut();
        state.resizeable = resizeable;
        state
            .commands
            .push(AdapterCommand::SetUserResizeable(resizeable));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_commits_staged_changes() {
        let (mut display, window) = HeadlessDisplay::pair(Dimensions::new(1920, 1080), vec![]);
        display.set_back_buffer_size(Dimensions::new(1024, 768));
        assert_eq!(display.back_buffer(), Dimensions::default());
        display.apply_changes();
        assert_eq!(display.back_buffer(), Dimensions::new(1024, 768));
        assert_eq!(window.client_size(), Dimensions::new(1024, 768));
    }

    #[test]
    fn test_client_size_clamp() {
        let (mut display, window) = HeadlessDisplay::pair(Dimensions::new(1920, 1080), vec![]);
        display.set_max_client_size(Some(Dimensions::new(800, 600)));
        display.set_back_buffer_size(Dimensions::new(1024, 768));
        display.apply_changes();
        assert_eq!(display.back_buffer(), Dimensions::new(1024, 768));
        assert_eq!(window.client_size(), Dimensions::new(800, 600));
    }

    #[test]
    fn test_display_resolution_always_supported() {
        let (display, _window) = HeadlessDisplay::pair(Dimensions::new(1920, 1080), vec![]);
        assert!(display
            .supported_resolutions()
            .contains(&Dimensions::new(1920, 1080)));
    }
}

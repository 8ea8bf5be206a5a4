//! Interactive boxing demo.
//!
//! Opens a window rendering an 800x600 virtual scene and lets you poke
//! the resolution manager from the keyboard:
//! - `F` toggles full screen
//! - `B` toggles borderless
//! - `M` cycles through all four screen modes
//! - `X` cycles the boxing mode
//! - `R` toggles user resizing
//! - `A` toggles aspect-ratio enforcement

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use viewbox_backend::{WgpuDisplay, WinitWindow};
use viewbox_common::{Dimensions, Rgba};
use viewbox_kernel::manager::ResolutionManager;
use viewbox_kernel::modes::BoxingMode;
use viewbox_kernel::settings::ResolutionSettings;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;
const VIRTUAL_WIDTH: u32 = 800;
const VIRTUAL_HEIGHT: u32 = 600;

#[derive(Default)]
struct DemoApp {
    window: Option<Arc<Window>>,
    manager: Option<ResolutionManager<WgpuDisplay, WinitWindow>>,
}

impl DemoApp {
    fn handle_key(&mut self, key: KeyCode) {
        let Some(manager) = &mut self.manager else {
            return;
        };
        let result = match key {
            KeyCode::KeyF => manager.toggle_full_screen(),
            KeyCode::KeyB => manager.toggle_borderless(),
            KeyCode::KeyM => manager.cycle_screen_mode(),
            KeyCode::KeyX => manager.cycle_boxing_mode(),
            KeyCode::KeyR => manager.toggle_user_resizeable(),
            KeyCode::KeyA => {
                let enforce = !manager.enforces_aspect_ratio();
                manager.set_enforce_aspect_ratio(enforce)
            }
            _ => return,
        };
        match result {
            Ok(()) => info!(
                mode = ?manager.screen_mode(),
                boxing = ?manager.current_boxing_mode(),
                actual = %Dimensions::new(manager.actual_width(), manager.actual_height()),
                "settings changed"
            ),
            Err(e) => warn!("change rejected: {e}"),
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        info!("Application resumed, creating window...");

        let window_attrs = Window::default_attributes()
            .with_title("Viewbox Boxing Demo")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                warn!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let display = match pollster::block_on(WgpuDisplay::new(Arc::clone(&window))) {
            Ok(display) => display,
            Err(e) => {
                warn!("Failed to initialize display: {e}");
                event_loop.exit();
                return;
            }
        };

        let settings = ResolutionSettings::from_sizes(
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            VIRTUAL_WIDTH,
            VIRTUAL_HEIGHT,
        )
        .with_boxing_mode(BoxingMode::BiggestArea);

        match ResolutionManager::new(WinitWindow::new(Arc::clone(&window)), display, settings) {
            Ok(manager) => {
                info!(
                    "Viewbox demo ready - {}x{} virtual in a {}x{} window",
                    VIRTUAL_WIDTH, VIRTUAL_HEIGHT, WINDOW_WIDTH, WINDOW_HEIGHT
                );
                self.manager = Some(manager);
            }
            Err(e) => {
                warn!("Failed to initialize resolution manager: {e}");
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    if let Some(manager) = &mut self.manager {
                        let size = Dimensions::new(new_size.width, new_size.height);
                        if let Err(e) = manager.on_window_resized(size) {
                            warn!("resize to {size} rejected: {e}");
                        }
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                if let Some(manager) = &mut self.manager {
                    // Draw area in cornflower blue, boxing bars in black.
                    let _target = manager.clear_screen(Some(Rgba::CORNFLOWER_BLUE));
                    manager.end_draw(Some(Rgba::BLACK));
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("viewbox=info".parse()?))
        .init();

    info!("Viewbox boxing demo starting...");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::default();
    event_loop.run_app(&mut app)?;

    info!("Viewbox boxing demo shutdown complete");
    Ok(())
}

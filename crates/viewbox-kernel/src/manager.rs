//! The resolution and boxing manager.
//!
//! Owns the current settings, the derived render-target geometry, and the
//! render target itself. Every input change funnels through one guarded
//! recomputation pipeline; see the crate docs for the ordering contract.

use glam::{IVec2, Mat4, Vec3};
use tracing::{debug, warn};
use viewbox_common::{Dimensions, Rgba, Scale, ViewboxError, ViewboxResult};

use crate::adapter::{DisplayAdapter, WindowAdapter};
use crate::boxing::{boxed_geometry, resolution_scale};
use crate::modes::{BoxingMode, ScreenMode, VirtualResolutionMode, WidthChangePolicy};
use crate::settings::ResolutionSettings;
use crate::target::{DepthFormat, FilterMode, RenderTargetDesc, SurfaceFormat, TargetUsage};

/// Stateful manager decoupling the virtual render resolution from the
/// actual window resolution.
///
/// Generic over the display and window adapter so the core stays
/// independent of the graphics backend; pass `&mut` handles to keep them
/// borrowed. Single-threaded by design: all mutation happens on the
/// thread that owns the window.
pub struct ResolutionManager<D: DisplayAdapter, W: WindowAdapter> {
    display: D,
    window: W,
    settings: ResolutionSettings,
    /// Actual resolution before the most recent change; decides which
    /// axis moved when enforcing the aspect ratio.
    previous_resolution: Dimensions,
    current_boxing_mode: BoxingMode,
    render_position: IVec2,
    render_actual_resolution: Dimensions,
    scale_matrix: Mat4,
    scale_matrix_dirty: bool,
    /// Single-flight guard: a pipeline run triggered while one is already
    /// in flight is dropped, so the outer run's final state wins.
    is_applying_changes: bool,
    target_desc: RenderTargetDesc,
    blit_filter: FilterMode,
    render_target: D::RenderTarget,
}

impl<D: DisplayAdapter, W: WindowAdapter> ResolutionManager<D, W> {
    /// Creates a manager and immediately runs the recomputation pipeline.
    ///
    /// Fails when the settings' resolution/mode combination is not legal
    /// for the current display.
    pub fn new(window: W, mut display: D, settings: ResolutionSettings) -> ViewboxResult<Self> {
        let target_desc = RenderTargetDesc::default();
        let render_target = display.create_render_target(settings.virtual_resolution, &target_desc);
        let mut manager = Self {
            previous_resolution: settings.actual_resolution,
            current_boxing_mode: BoxingMode::None,
            render_position: IVec2::ZERO,
            render_actual_resolution: settings.actual_resolution,
            scale_matrix: Mat4::IDENTITY,
            scale_matrix_dirty: true,
            is_applying_changes: false,
            target_desc,
            blit_filter: FilterMode::Point,
            render_target,
            settings,
            display,
            window,
        };
        manager.apply_resolution_changes()?;
        Ok(manager)
    }

    // === Recomputation pipeline ===

    /// Runs the recomputation pipeline: normalize the actual resolution,
    /// validate against the live display, commit to the adapter, and
    /// regenerate the render-target geometry.
    ///
    /// No-ops while a run is already in flight. On a validation error the
    /// pipeline aborts before any adapter command is issued.
    pub fn apply_resolution_changes(&mut self) -> ViewboxResult<()> {
        if self.is_applying_changes {
            return Ok(());
        }
        self.is_applying_changes = true;
        let result = self.run_pipeline();
        self.is_applying_changes = false;
        result
    }

    fn run_pipeline(&mut self) -> ViewboxResult<()> {
        // Normalize on a local copy; settings stay untouched until the
        // dimensions have passed validation.
        let mut dims = self.settings.actual_resolution;

        // A borderless full-screen window always matches the screen.
        if self.settings.screen_mode == ScreenMode::BorderlessFullScreen {
            dims = self.display.current_display_resolution();
        }

        if self.settings.enforce_aspect_ratio {
            dims = self.enforce_aspect(dims);
        }

        self.validate(&mut dims)?;

        self.settings.actual_resolution = dims;
        debug!(resolution = %dims, mode = ?self.settings.screen_mode, "applying resolution");

        self.display.set_back_buffer_size(dims);
        self.display
            .set_fullscreen(self.settings.screen_mode.is_fullscreen());
        self.display.apply_changes();
        self.window
            .set_borderless(self.settings.screen_mode.is_borderless());
        self.window
            .set_user_resizeable(self.settings.is_user_resizeable);
        self.display.apply_changes();

        // Committing can resize the window behind our back (the OS may
        // clamp or adjust). Adopting the reported size here replaces the
        // re-entrant resize event, which the guard suppresses.
        let reported = self.window.client_size();
        if reported.is_positive() && reported != self.settings.actual_resolution {
            debug!(requested = %self.settings.actual_resolution, granted = %reported,
                "window reported a different client size");
            self.previous_resolution = self.settings.actual_resolution;
            self.settings.actual_resolution = reported;
        }

        if let VirtualResolutionMode::Multiplied(factor) = self.settings.virtual_resolution_mode {
            if self.settings.preferred_boxing_mode == BoxingMode::None {
                let actual = self.settings.actual_resolution;
                self.settings.virtual_resolution = Dimensions::new(
                    (f64::from(actual.width) * factor).round() as u32,
                    (f64::from(actual.height) * factor).round() as u32,
                );
            }
        }

        self.regenerate_render_target();
        Ok(())
    }

    /// Re-derives the height from the virtual aspect ratio when the
    /// height changed (alone or together with the width). A width-only
    /// change follows [`WidthChangePolicy`].
    fn enforce_aspect(&self, mut dims: Dimensions) -> Dimensions {
        let prev = self.previous_resolution;
        let width_changed = dims.width != prev.width;
        let height_changed = dims.height != prev.height;
        let aspect = self.settings.virtual_aspect_ratio();

        if height_changed {
            dims.height = (f64::from(dims.width) / aspect).ceil() as u32;
        } else if width_changed
            && self.settings.width_change_policy == WidthChangePolicy::MatchVirtualAspect
        {
            dims.height = (f64::from(dims.width) / aspect).ceil() as u32;
        }
        dims
    }

    fn validate(&self, dims: &mut Dimensions) -> ViewboxResult<()> {
        let display_res = self.display.current_display_resolution();
        match self.settings.screen_mode {
            ScreenMode::Windowed | ScreenMode::Borderless => {
                // Reference behavior: the height is checked against both
                // display axes, the width is not checked at all.
                if dims.height > display_res.width || dims.height > display_res.height {
                    warn!(rejected = %dims, display = %display_res, "windowed resolution rejected");
                    return Err(ViewboxError::invalid_resolution(*dims));
                }
            }
            ScreenMode::FullScreen | ScreenMode::BorderlessFullScreen => {
                if !self.display.supported_resolutions().contains(dims) {
                    warn!(rejected = %dims, "full-screen resolution not supported by the display");
                    return Err(ViewboxError::invalid_resolution(*dims));
                }
            }
        }

        // A boxing mode that cannot be honored at this aspect gets an
        // aspect-correcting height instead of a failure.
        let virtual_aspect = self.settings.virtual_aspect_ratio();
        let actual_aspect = dims.aspect_ratio();
        let preferred = self.settings.preferred_boxing_mode;
        if (preferred == BoxingMode::Pillarbox && virtual_aspect > actual_aspect)
            || (preferred == BoxingMode::Letterbox && virtual_aspect < actual_aspect)
        {
            dims.height = (f64::from(dims.width) / virtual_aspect).ceil() as u32;
            debug!(corrected = %dims, ?preferred, "boxing mode unhonorable, height corrected");
        }
        Ok(())
    }

    fn regenerate_render_target(&mut self) {
        let geometry = boxed_geometry(
            self.settings.preferred_boxing_mode,
            self.settings.actual_resolution,
            self.settings.virtual_resolution,
        );
        self.current_boxing_mode = geometry.mode;
        self.render_position = geometry.position;
        self.render_actual_resolution = geometry.size;
        self.refresh_scale_matrix();
        self.render_target = self
            .display
            .create_render_target(self.settings.virtual_resolution, &self.target_desc);
        debug!(
            boxing = ?self.current_boxing_mode,
            position = ?self.render_position,
            size = %self.render_actual_resolution,
            "render-target geometry regenerated"
        );
    }

    fn refresh_scale_matrix(&mut self) {
        let scale = self.scale();
        self.scale_matrix = Mat4::from_scale(Vec3::new(scale.x as f32, scale.y as f32, 1.0));
        self.scale_matrix_dirty = false;
    }

    // === Mutators (each writes one field, then runs the pipeline) ===

    /// Sets the preferred boxing mode.
    pub fn set_preferred_boxing_mode(&mut self, mode: BoxingMode) -> ViewboxResult<()> {
        let prev = self.settings.preferred_boxing_mode;
        self.settings.preferred_boxing_mode = mode;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.preferred_boxing_mode = prev;
        }
        result
    }

    /// Sets whether the user may resize the window.
    pub fn set_user_resizeable(&mut self, resizeable: bool) -> ViewboxResult<()> {
        let prev = self.settings.is_user_resizeable;
        self.settings.is_user_resizeable = resizeable;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.is_user_resizeable = prev;
        }
        result
    }

    /// Sets the screen mode. On rejection the previous mode stays in
    /// effect.
    pub fn set_screen_mode(&mut self, mode: ScreenMode) -> ViewboxResult<()> {
        let prev = self.settings.screen_mode;
        self.settings.screen_mode = mode;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.screen_mode = prev;
        }
        result
    }

    /// Sets aspect-ratio enforcement.
    pub fn set_enforce_aspect_ratio(&mut self, enforce: bool) -> ViewboxResult<()> {
        let prev = self.settings.enforce_aspect_ratio;
        self.settings.enforce_aspect_ratio = enforce;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.enforce_aspect_ratio = prev;
        }
        result
    }

    /// Sets the width-only-change policy for aspect enforcement.
    pub fn set_width_change_policy(&mut self, policy: WidthChangePolicy) -> ViewboxResult<()> {
        let prev = self.settings.width_change_policy;
        self.settings.width_change_policy = policy;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.width_change_policy = prev;
        }
        result
    }

    /// Sets how the virtual resolution tracks the actual resolution.
    pub fn set_virtual_resolution_mode(&mut self, mode: VirtualResolutionMode) -> ViewboxResult<()> {
        let prev = self.settings.virtual_resolution_mode;
        self.settings.virtual_resolution_mode = mode;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.virtual_resolution_mode = prev;
        }
        result
    }

    /// Sets the actual width, keeping the height.
    pub fn set_actual_width(&mut self, width: u32) -> ViewboxResult<()> {
        self.set_actual_resolution(self.settings.actual_resolution.with_width(width))
    }

    /// Sets the actual height, keeping the width.
    pub fn set_actual_height(&mut self, height: u32) -> ViewboxResult<()> {
        self.set_actual_resolution(self.settings.actual_resolution.with_height(height))
    }

    /// Sets the actual resolution.
    pub fn set_actual_resolution(&mut self, resolution: Dimensions) -> ViewboxResult<()> {
        let prev_actual = self.settings.actual_resolution;
        let prev_previous = self.previous_resolution;
        self.previous_resolution = prev_actual;
        self.settings.actual_resolution = resolution;
        let result = self.apply_resolution_changes();
        if result.is_err() {
            self.settings.actual_resolution = prev_actual;
            self.previous_resolution = prev_previous;
        }
        result
    }

    /// Sets the virtual width. Marks the scale transform dirty; the
    /// render target is rebuilt lazily on the next recomputation or draw.
    pub fn set_virtual_width(&mut self, width: u32) {
        self.settings.virtual_resolution = self.settings.virtual_resolution.with_width(width);
        self.scale_matrix_dirty = true;
    }

    /// Sets the virtual height. Lazy like [`set_virtual_width`](Self::set_virtual_width).
    pub fn set_virtual_height(&mut self, height: u32) {
        self.settings.virtual_resolution = self.settings.virtual_resolution.with_height(height);
        self.scale_matrix_dirty = true;
    }

    /// Window-resize event entry point: the host forwards the new
    /// client-area size here.
    pub fn on_window_resized(&mut self, size: Dimensions) -> ViewboxResult<()> {
        self.previous_resolution = self.settings.actual_resolution;
        self.settings.actual_resolution = size;
        self.apply_resolution_changes()
    }

    // === Toggles ===

    /// Windowed pairs with FullScreen, Borderless with
    /// BorderlessFullScreen.
    pub fn toggle_full_screen(&mut self) -> ViewboxResult<()> {
        self.set_screen_mode(self.settings.screen_mode.toggled_fullscreen())
    }

    /// Windowed pairs with Borderless, FullScreen with
    /// BorderlessFullScreen.
    pub fn toggle_borderless(&mut self) -> ViewboxResult<()> {
        self.set_screen_mode(self.settings.screen_mode.toggled_borderless())
    }

    /// Flips the user-resizeable flag.
    pub fn toggle_user_resizeable(&mut self) -> ViewboxResult<()> {
        self.set_user_resizeable(!self.settings.is_user_resizeable)
    }

    /// Advances through all four screen modes.
    pub fn cycle_screen_mode(&mut self) -> ViewboxResult<()> {
        self.set_screen_mode(self.settings.screen_mode.cycled())
    }

    /// Advances through all four boxing modes.
    pub fn cycle_boxing_mode(&mut self) -> ViewboxResult<()> {
        self.set_preferred_boxing_mode(self.settings.preferred_boxing_mode.cycled())
    }

    // === Render-target knobs (lazy, no pipeline run) ===

    /// Enables or disables the render target's mip chain.
    pub fn set_render_target_mip_map(&mut self, mip_map: bool) {
        self.target_desc.mip_map = mip_map;
        self.scale_matrix_dirty = true;
    }

    /// Sets the render target's color surface format.
    pub fn set_render_target_surface_format(&mut self, format: SurfaceFormat) {
        self.target_desc.surface_format = format;
        self.scale_matrix_dirty = true;
    }

    /// Sets the render target's depth/stencil format.
    pub fn set_render_target_depth_format(&mut self, format: DepthFormat) {
        self.target_desc.depth_format = format;
        self.scale_matrix_dirty = true;
    }

    /// Sets the render target's preferred multisample count.
    pub fn set_render_target_multisample_count(&mut self, count: u32) {
        self.target_desc.multisample_count = count;
        self.scale_matrix_dirty = true;
    }

    /// Sets the render target's contents policy.
    pub fn set_render_target_usage(&mut self, usage: TargetUsage) {
        self.target_desc.usage = usage;
        self.scale_matrix_dirty = true;
    }

    /// Sets the filter used when blitting the render target.
    pub fn set_blit_filter(&mut self, filter: FilterMode) {
        self.blit_filter = filter;
    }

    // === Frame operations ===

    /// Binds the owned render target as the draw destination and clears
    /// it, rebuilding the target first if a lazy change is pending.
    /// Returns the target for subsequent drawing.
    pub fn clear_screen(&mut self, draw_area_color: Option<Rgba>) -> &D::RenderTarget {
        if self.scale_matrix_dirty {
            self.regenerate_render_target();
        }
        self.display.bind_render_target(&self.render_target);
        self.display
            .clear(draw_area_color.unwrap_or(Rgba::CORNFLOWER_BLUE));
        &self.render_target
    }

    /// Restores the back buffer, clears it to the bar color, and blits
    /// the render target into the boxed draw area.
    pub fn end_draw(&mut self, bar_color: Option<Rgba>) {
        self.display.unbind_render_target();
        self.display.clear(bar_color.unwrap_or(Rgba::BLACK));
        self.display.blit_render_target(
            &self.render_target,
            self.render_position,
            self.render_actual_resolution,
            self.blit_filter,
        );
    }

    // === Accessors ===

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> &ResolutionSettings {
        &self.settings
    }

    /// Preferred boxing mode.
    #[must_use]
    pub fn preferred_boxing_mode(&self) -> BoxingMode {
        self.settings.preferred_boxing_mode
    }

    /// Boxing mode actually in effect this frame.
    #[must_use]
    pub fn current_boxing_mode(&self) -> BoxingMode {
        self.current_boxing_mode
    }

    /// Offset at which the render target is blitted onto the back buffer.
    #[must_use]
    pub fn render_position(&self) -> IVec2 {
        self.render_position
    }

    /// On-screen pixel size of the blitted render target.
    #[must_use]
    pub fn render_actual_resolution(&self) -> Dimensions {
        self.render_actual_resolution
    }

    /// Current screen mode.
    #[must_use]
    pub fn screen_mode(&self) -> ScreenMode {
        self.settings.screen_mode
    }

    /// Whether the current mode drives the display in full screen.
    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.settings.screen_mode.is_fullscreen()
    }

    /// Whether the current mode removes the window chrome.
    #[must_use]
    pub fn is_borderless(&self) -> bool {
        self.settings.screen_mode.is_borderless()
    }

    /// Whether the user may resize the window.
    #[must_use]
    pub fn is_user_resizeable(&self) -> bool {
        self.settings.is_user_resizeable
    }

    /// Whether aspect-ratio enforcement is active.
    #[must_use]
    pub fn enforces_aspect_ratio(&self) -> bool {
        self.settings.enforce_aspect_ratio
    }

    /// Actual width in pixels.
    #[must_use]
    pub fn actual_width(&self) -> u32 {
        self.settings.actual_resolution.width
    }

    /// Actual height in pixels.
    #[must_use]
    pub fn actual_height(&self) -> u32 {
        self.settings.actual_resolution.height
    }

    /// Virtual width in pixels.
    #[must_use]
    pub fn virtual_width(&self) -> u32 {
        self.settings.virtual_resolution.width
    }

    /// Virtual height in pixels.
    #[must_use]
    pub fn virtual_height(&self) -> u32 {
        self.settings.virtual_resolution.height
    }

    /// Actual width divided by virtual width.
    #[must_use]
    pub fn width_scale(&self) -> f64 {
        f64::from(self.actual_width()) / f64::from(self.virtual_width())
    }

    /// Actual height divided by virtual height.
    #[must_use]
    pub fn height_scale(&self) -> f64 {
        f64::from(self.actual_height()) / f64::from(self.virtual_height())
    }

    /// Per-axis scale between the virtual and actual resolutions.
    #[must_use]
    pub fn scale(&self) -> Scale {
        resolution_scale(
            self.settings.actual_resolution,
            self.settings.virtual_resolution,
        )
    }

    /// Virtual aspect ratio.
    #[must_use]
    pub fn virtual_aspect_ratio(&self) -> f64 {
        self.settings.virtual_aspect_ratio()
    }

    /// Actual aspect ratio.
    #[must_use]
    pub fn actual_aspect_ratio(&self) -> f64 {
        self.settings.actual_aspect_ratio()
    }

    /// Cached scale transform (diagonal scale by the per-axis factors).
    ///
    /// Refreshed by the recomputation pipeline and by
    /// [`clear_screen`](Self::clear_screen) when a lazy change is pending.
    #[must_use]
    pub fn scale_matrix(&self) -> Mat4 {
        self.scale_matrix
    }

    /// Whether a lazy change is waiting for the next recomputation.
    #[must_use]
    pub fn is_scale_matrix_dirty(&self) -> bool {
        self.scale_matrix_dirty
    }

    /// Render-target creation parameters currently in effect.
    #[must_use]
    pub fn render_target_desc(&self) -> &RenderTargetDesc {
        &self.target_desc
    }

    /// Current resolution of the display the window occupies.
    #[must_use]
    pub fn current_display_resolution(&self) -> Dimensions {
        self.display.current_display_resolution()
    }

    /// Exact resolutions the display supports for full-screen modes.
    #[must_use]
    pub fn supported_resolutions(&self) -> Vec<Dimensions> {
        self.display.supported_resolutions()
    }

    /// Tears the manager down, dropping the owned render target and
    /// returning the adapter handles.
    #[must_use]
    pub fn into_parts(self) -> (D, W) {
        (self.display, self.window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{AdapterCommand, HeadlessDisplay, HeadlessWindow};
    use proptest::prelude::*;

    const DISPLAY: Dimensions = Dimensions::new(1920, 1080);

    fn supported() -> Vec<Dimensions> {
        vec![
            Dimensions::new(800, 600),
            Dimensions::new(1024, 768),
            Dimensions::new(1280, 720),
            DISPLAY,
        ]
    }

    fn new_manager(
        settings: ResolutionSettings,
    ) -> (
        ResolutionManager<HeadlessDisplay, HeadlessWindow>,
        HeadlessDisplay,
    ) {
        let (display, window) = HeadlessDisplay::pair(DISPLAY, supported());
        let inspect = display.clone();
        let manager =
            ResolutionManager::new(window, display, settings).expect("settings should validate");
        (manager, inspect)
    }

    #[test]
    fn test_boxing_none_is_identity() {
        let (manager, _) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        assert_eq!(manager.render_actual_resolution(), Dimensions::new(1024, 768));
        assert_eq!(manager.render_position(), IVec2::ZERO);
        assert_eq!(manager.current_boxing_mode(), BoxingMode::None);
    }

    #[test]
    fn test_identity_scenario() {
        let (manager, _) = new_manager(ResolutionSettings::from_sizes(800, 600, 800, 600));
        assert_eq!(manager.render_actual_resolution(), Dimensions::new(800, 600));
        assert_eq!(manager.render_position(), IVec2::ZERO);
        assert_eq!(manager.scale(), Scale::uniform(1.0));
        assert_eq!(manager.scale_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_pillarbox_unhonorable_aspect_corrects_height() {
        // Virtual 1280x800 is wider than the 1024x768 window, so the
        // pillarbox request triggers the aspect fallback: height becomes
        // ceil(1024 / 1.6) = 640 and the boxing fits exactly.
        let settings = ResolutionSettings::from_sizes(1024, 768, 1280, 800)
            .with_boxing_mode(BoxingMode::Pillarbox);
        let (manager, _) = new_manager(settings);
        assert_eq!(manager.actual_height(), 640);
        assert_eq!(manager.render_actual_resolution(), Dimensions::new(1024, 640));
        assert_eq!(manager.render_position(), IVec2::ZERO);
        assert_eq!(manager.current_boxing_mode(), BoxingMode::Pillarbox);
    }

    #[test]
    fn test_letterbox_aspect_within_one_pixel() {
        let settings = ResolutionSettings::from_sizes(1024, 768, 1280, 800)
            .with_boxing_mode(BoxingMode::Letterbox);
        let (manager, _) = new_manager(settings);
        let size = manager.render_actual_resolution();
        let render_aspect = f64::from(size.width) / f64::from(size.height);
        assert!((render_aspect - manager.virtual_aspect_ratio()).abs() < 0.01);
        assert!(manager.render_position().x + size.width as i32 <= manager.actual_width() as i32);
        assert!(manager.render_position().y + size.height as i32 <= manager.actual_height() as i32);
    }

    #[test]
    fn test_toggle_full_screen_four_times_round_trips() {
        let (mut manager, _) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        let start = manager.screen_mode();
        for _ in 0..4 {
            manager.toggle_full_screen().expect("supported resolution");
        }
        assert_eq!(manager.screen_mode(), start);
    }

    #[test]
    fn test_toggle_borderless_four_times_round_trips() {
        let (mut manager, _) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        let start = manager.screen_mode();
        for _ in 0..4 {
            manager.toggle_borderless().expect("valid resolution");
        }
        assert_eq!(manager.screen_mode(), start);
    }

    #[test]
    fn test_cycle_screen_mode_four_times_round_trips() {
        let (mut manager, _) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        let start = manager.screen_mode();
        for _ in 0..4 {
            manager.cycle_screen_mode().expect("supported resolution");
        }
        assert_eq!(manager.screen_mode(), start);
    }

    #[test]
    fn test_unsupported_fullscreen_resolution_rejected() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1000, 700, 800, 600));
        inspect.clear_commands();
        let err = manager.set_screen_mode(ScreenMode::FullScreen);
        assert_eq!(
            err,
            Err(ViewboxError::InvalidResolutionSelected {
                width: 1000,
                height: 700
            })
        );
        // Prior settings stay in effect and the display was never touched.
        assert_eq!(manager.screen_mode(), ScreenMode::Windowed);
        assert!(inspect.commands().is_empty());
    }

    #[test]
    fn test_windowed_height_checked_against_both_display_axes() {
        // Display is 1920x1080: a height of 1200 exceeds the display
        // height and is rejected even though it is below the display
        // width. The width is not checked at all.
        let (mut manager, _) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        let err = manager.set_actual_height(1200);
        assert!(err.is_err());
        assert_eq!(manager.actual_height(), 768);
        assert!(manager.set_actual_width(5000).is_ok());
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let settings = ResolutionSettings::from_sizes(1024, 768, 1280, 800)
            .with_boxing_mode(BoxingMode::BiggestArea);
        let (mut manager, _) = new_manager(settings);
        manager.apply_resolution_changes().expect("already valid");
        let (position, size, matrix) = (
            manager.render_position(),
            manager.render_actual_resolution(),
            manager.scale_matrix(),
        );
        manager.apply_resolution_changes().expect("already valid");
        assert_eq!(manager.render_position(), position);
        assert_eq!(manager.render_actual_resolution(), size);
        assert_eq!(manager.scale_matrix(), matrix);
    }

    #[test]
    fn test_borderless_fullscreen_matches_display() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        manager
            .set_screen_mode(ScreenMode::BorderlessFullScreen)
            .expect("display resolution is always supported");
        assert_eq!(manager.actual_width(), DISPLAY.width);
        assert_eq!(manager.actual_height(), DISPLAY.height);
        assert!(manager.is_fullscreen());
        assert!(manager.is_borderless());
        assert!(inspect.is_fullscreen());
        assert!(inspect.is_borderless());
    }

    #[test]
    fn test_aspect_enforcement_on_height_change() {
        let settings =
            ResolutionSettings::from_sizes(800, 600, 800, 600).with_enforce_aspect_ratio(true);
        let (mut manager, _) = new_manager(settings);
        // Height-only change: recomputed as ceil(800 / (4/3)) = 600.
        manager.set_actual_height(720).expect("valid");
        assert_eq!(manager.actual_height(), 600);
        // Both axes changed: height follows the new width.
        manager
            .on_window_resized(Dimensions::new(1000, 900))
            .expect("valid");
        assert_eq!(manager.actual_width(), 1000);
        assert_eq!(manager.actual_height(), 750);
    }

    #[test]
    fn test_width_change_policy() {
        let settings =
            ResolutionSettings::from_sizes(800, 600, 800, 600).with_enforce_aspect_ratio(true);
        let (mut manager, _) = new_manager(settings);
        // Default policy leaves the height alone on a width-only change.
        manager.set_actual_width(1000).expect("valid");
        assert_eq!(manager.actual_height(), 600);
        manager
            .set_width_change_policy(WidthChangePolicy::MatchVirtualAspect)
            .expect("valid");
        manager.set_actual_width(1200).expect("valid");
        assert_eq!(manager.actual_height(), 900);
    }

    #[test]
    fn test_clamped_window_size_is_adopted() {
        let (display, window) = HeadlessDisplay::pair(DISPLAY, supported());
        display.set_max_client_size(Some(Dimensions::new(1280, 720)));
        let inspect = display.clone();
        let mut manager = ResolutionManager::new(
            window,
            display,
            ResolutionSettings::from_sizes(1024, 600, 800, 600),
        )
        .expect("valid settings");
        manager.set_actual_width(1600).expect("valid");
        // The OS granted only 1280 wide; the manager adopts the reported
        // client size instead of the requested one.
        assert_eq!(manager.actual_width(), 1280);
        assert_eq!(inspect.back_buffer(), Dimensions::new(1600, 600));
        assert_eq!(manager.render_actual_resolution(), Dimensions::new(1280, 600));
    }

    #[test]
    fn test_user_resizeable_propagates() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        assert!(inspect.is_user_resizeable());
        manager.toggle_user_resizeable().expect("valid");
        assert!(!manager.is_user_resizeable());
        assert!(!inspect.is_user_resizeable());
    }

    #[test]
    fn test_virtual_setters_are_lazy() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        inspect.clear_commands();
        manager.set_virtual_width(1280);
        manager.set_virtual_height(800);
        assert!(manager.is_scale_matrix_dirty());
        assert!(inspect.commands().is_empty());
        // The next draw rebuilds the target at the new virtual size.
        let _ = manager.clear_screen(None);
        assert!(!manager.is_scale_matrix_dirty());
        assert!(inspect
            .commands()
            .contains(&AdapterCommand::CreateRenderTarget(Dimensions::new(1280, 800))));
    }

    #[test]
    fn test_target_knobs_are_lazy() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        inspect.clear_commands();
        manager.set_render_target_mip_map(true);
        manager.set_render_target_surface_format(SurfaceFormat::Rgba16Float);
        manager.set_render_target_multisample_count(4);
        assert!(manager.is_scale_matrix_dirty());
        assert!(inspect.commands().is_empty());
        let _ = manager.clear_screen(None);
        assert!(manager.render_target_desc().mip_map);
    }

    #[test]
    fn test_frame_command_order() {
        let (mut manager, inspect) = new_manager(ResolutionSettings::from_sizes(1024, 768, 800, 600));
        inspect.clear_commands();
        let _ = manager.clear_screen(None);
        manager.end_draw(None);
        let commands = inspect.commands();
        assert!(matches!(commands[0], AdapterCommand::BindRenderTarget(_)));
        assert_eq!(commands[1], AdapterCommand::Clear(Rgba::CORNFLOWER_BLUE));
        assert_eq!(commands[2], AdapterCommand::UnbindRenderTarget);
        assert_eq!(commands[3], AdapterCommand::Clear(Rgba::BLACK));
        assert!(matches!(
            commands[4],
            AdapterCommand::Blit {
                size: Dimensions {
                    width: 1024,
                    height: 768
                },
                ..
            }
        ));
    }

    #[test]
    fn test_multiplied_virtual_mode_tracks_actual() {
        let settings = ResolutionSettings::from_sizes(1000, 800, 800, 600)
            .with_virtual_resolution_mode(VirtualResolutionMode::Multiplied(0.5));
        let (manager, _) = new_manager(settings);
        assert_eq!(manager.virtual_width(), 500);
        assert_eq!(manager.virtual_height(), 400);
        assert_eq!(manager.scale(), Scale::uniform(2.0));
    }

    #[test]
    fn test_rejected_construction() {
        let (display, window) = HeadlessDisplay::pair(DISPLAY, supported());
        let settings = ResolutionSettings::from_sizes(999, 777, 800, 600)
            .with_screen_mode(ScreenMode::FullScreen);
        let result = ResolutionManager::new(window, display, settings);
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_biggest_area_never_exceeds_viewport(
            aw in 1u32..=1920,
            ah in 1u32..=1080,
            vw in 1u32..=4000,
            vh in 1u32..=4000,
        ) {
            let settings = ResolutionSettings::from_sizes(aw, ah, vw, vh)
                .with_boxing_mode(BoxingMode::BiggestArea);
            let (display, window) = HeadlessDisplay::pair(DISPLAY, supported());
            let manager = ResolutionManager::new(window, display, settings)
                .expect("windowed resolution within display bounds");
            let size = manager.render_actual_resolution();
            let position = manager.render_position();
            prop_assert!(position.x >= 0);
            prop_assert!(position.y >= 0);
            prop_assert!(position.x + size.width as i32 <= manager.actual_width() as i32);
            prop_assert!(position.y + size.height as i32 <= manager.actual_height() as i32);
        }
    }
}

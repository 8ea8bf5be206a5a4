//! Display adapter over wgpu.
//!
//! Owns the surface, device, and queue for one window plus a
//! fullscreen-triangle blit pipeline that draws the manager's render
//! target into the boxed area of the back buffer.

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::IVec2;
use tracing::{info, warn};
use viewbox_common::{Dimensions, Rgba};
use viewbox_kernel::adapter::DisplayAdapter;
use viewbox_kernel::target::{DepthFormat, FilterMode, RenderTargetDesc, SurfaceFormat};
use winit::dpi::PhysicalSize;
use winit::window::{Fullscreen, Window};

const BLIT_SHADER: &str = r"
@group(0) @binding(0) var blit_texture: texture_2d<f32>;
@group(0) @binding(1) var blit_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(blit_texture, blit_sampler, in.uv);
}
";

/// Offscreen render target created by [`WgpuDisplay`].
#[derive(Debug)]
pub struct WgpuRenderTarget {
    view: wgpu::TextureView,
    depth_view: Option<wgpu::TextureView>,
    size: Dimensions,
}

impl WgpuRenderTarget {
    /// Size at creation (the virtual resolution).
    #[must_use]
    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// Color view, for binding in application render passes.
    #[must_use]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Depth/stencil view when the descriptor requested one.
    #[must_use]
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_view.as_ref()
    }
}

/// [`DisplayAdapter`] implementation over wgpu.
///
/// Back-buffer size and full-screen flag are staged by the setters and
/// committed by `apply_changes`, mirroring how a swap chain actually
/// reconfigures. `blit_render_target` presents the acquired frame.
pub struct WgpuDisplay {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pending_size: Option<Dimensions>,
    pending_fullscreen: Option<bool>,
    blit_pipeline: wgpu::RenderPipeline,
    blit_layout: wgpu::BindGroupLayout,
    point_sampler: wgpu::Sampler,
    linear_sampler: wgpu::Sampler,
    frame: Option<wgpu::SurfaceTexture>,
    bound: Option<(wgpu::TextureView, Option<wgpu::TextureView>)>,
}

impl WgpuDisplay {
    /// Creates a display adapter for the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to find a suitable GPU adapter")?;

        info!("Using GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Viewbox Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .context("Failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Viewbox Blit Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Viewbox Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Viewbox Blit Pipeline Layout"),
            bind_group_layouts: &[&blit_layout],
            push_constant_ranges: &[],
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Viewbox Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let point_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Viewbox Point Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Viewbox Linear Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pending_size: None,
            pending_fullscreen: None,
            blit_pipeline,
            blit_layout,
            point_sampler,
            linear_sampler,
            frame: None,
            bound: None,
        })
    }

    /// The wgpu device, for application pipelines drawing into the
    /// render target.
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu queue.
    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Surface format the blit pipeline outputs to.
    #[must_use]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn acquire_frame(&mut self) -> bool {
        if self.frame.is_some() {
            return true;
        }
        match self.surface.get_current_texture() {
            Ok(frame) => {
                self.frame = Some(frame);
                true
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                match self.surface.get_current_texture() {
                    Ok(frame) => {
                        self.frame = Some(frame);
                        true
                    }
                    Err(e) => {
                        warn!("Failed to reacquire surface frame: {e}");
                        false
                    }
                }
            }
            Err(e) => {
                warn!("Failed to acquire surface frame: {e}");
                false
            }
        }
    }

    fn clear_view(
        &self,
        view: &wgpu::TextureView,
        depth_view: Option<&wgpu::TextureView>,
        color: Rgba,
    ) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewbox Clear Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewbox Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(color.r),
                            g: f64::from(color.g),
                            b: f64::from(color.b),
                            a: f64::from(color.a),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth_view.map(|depth| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view: depth,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn color_format(format: SurfaceFormat) -> wgpu::TextureFormat {
    match format {
        SurfaceFormat::Rgba8 => wgpu::TextureFormat::Rgba8UnormSrgb,
        SurfaceFormat::Bgra8 => wgpu::TextureFormat::Bgra8UnormSrgb,
        SurfaceFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
    }
}

fn depth_format(format: DepthFormat) -> Option<wgpu::TextureFormat> {
    match format {
        DepthFormat::None => None,
        DepthFormat::Depth16 => Some(wgpu::TextureFormat::Depth16Unorm),
        DepthFormat::Depth24 => Some(wgpu::TextureFormat::Depth24Plus),
        DepthFormat::Depth24Stencil8 => Some(wgpu::TextureFormat::Depth24PlusStencil8),
    }
}

fn mip_count(size: Dimensions) -> u32 {
    32 - size.width.max(size.height).max(1).leading_zeros()
}

impl DisplayAdapter for WgpuDisplay {
    type RenderTarget = WgpuRenderTarget;

    fn current_display_resolution(&self) -> Dimensions {
        self.window
            .current_monitor()
            .map_or_else(
                || Dimensions::new(self.config.width, self.config.height),
                |monitor| {
                    let size = monitor.size();
                    Dimensions::new(size.width, size.height)
                },
            )
    }

    fn supported_resolutions(&self) -> Vec<Dimensions> {
        let mut resolutions: Vec<Dimensions> = self
            .window
            .current_monitor()
            .map(|monitor| {
                monitor
                    .video_modes()
                    .map(|mode| {
                        let size = mode.size();
                        Dimensions::new(size.width, size.height)
                    })
                    .collect()
            })
            .unwrap_or_default();
        resolutions.sort_by_key(Dimensions::pixel_count);
        resolutions.dedup();
        resolutions
    }

    fn set_back_buffer_size(&mut self, size: Dimensions) {
        self.pending_size = Some(size);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.pending_fullscreen = Some(fullscreen);
    }

    fn apply_changes(&mut self) {
        let size = self.pending_size.take();

        if let Some(fullscreen) = self.pending_fullscreen.take() {
            if fullscreen {
                let target = size.unwrap_or(Dimensions::new(self.config.width, self.config.height));
                let mode = self.window.current_monitor().and_then(|monitor| {
                    monitor.video_modes().find(|mode| {
                        let s = mode.size();
                        s.width == target.width && s.height == target.height
                    })
                });
                match mode {
                    Some(mode) => self.window.set_fullscreen(Some(Fullscreen::Exclusive(mode))),
                    // No exact video mode; fall back to desktop full screen.
                    None => self.window.set_fullscreen(Some(Fullscreen::Borderless(None))),
                }
            } else {
                self.window.set_fullscreen(None);
            }
        }

        if let Some(size) = size {
            if size.is_positive() {
                if self.window.fullscreen().is_none() {
                    let _ = self
                        .window
                        .request_inner_size(PhysicalSize::new(size.width, size.height));
                }
                self.config.width = size.width;
                self.config.height = size.height;
                self.surface.configure(&self.device, &self.config);
                // Any frame acquired from the old configuration is stale.
                self.frame = None;
            }
        }
    }

    fn create_render_target(
        &mut self,
        size: Dimensions,
        desc: &RenderTargetDesc,
    ) -> Self::RenderTarget {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewbox Render Target"),
            size: extent,
            mip_level_count: if desc.mip_map { mip_count(size) } else { 1 },
            // Multisampled blitting would need a resolve pass; render at
            // one sample regardless of the requested count.
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_format(desc.surface_format),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Viewbox Render Target View"),
            base_mip_level: 0,
            mip_level_count: Some(1),
            ..Default::default()
        });

        let depth_view = depth_format(desc.depth_format).map(|format| {
            let depth = self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Viewbox Depth Target"),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            depth.create_view(&wgpu::TextureViewDescriptor::default())
        });

        WgpuRenderTarget {
            view,
            depth_view,
            size,
        }
    }

    fn bind_render_target(&mut self, target: &Self::RenderTarget) {
        self.bound = Some((target.view.clone(), target.depth_view.clone()));
    }

    fn unbind_render_target(&mut self) {
        self.bound = None;
    }

    fn clear(&mut self, color: Rgba) {
        if let Some((view, depth_view)) = self.bound.clone() {
            self.clear_view(&view, depth_view.as_ref(), color);
            return;
        }
        if !self.acquire_frame() {
            return;
        }
        if let Some(frame) = &self.frame {
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            self.clear_view(&view, None, color);
        }
    }

    fn blit_render_target(
        &mut self,
        target: &Self::RenderTarget,
        position: IVec2,
        size: Dimensions,
        filter: FilterMode,
    ) {
        if !self.acquire_frame() {
            return;
        }
        let Some(frame) = self.frame.take() else {
            return;
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Clamp the destination rectangle to the surface. Committed
        // geometry never hangs off-screen; this guards against transient
        // sizes mid-reconfigure.
        let x0 = position.x.max(0);
        let y0 = position.y.max(0);
        let x1 = (position.x + size.width as i32).min(self.config.width as i32);
        let y1 = (position.y + size.height as i32).min(self.config.height as i32);

        if x1 > x0 && y1 > y0 {
            let sampler = match filter {
                FilterMode::Point => &self.point_sampler,
                FilterMode::Linear => &self.linear_sampler,
            };
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Viewbox Blit Bind Group"),
                layout: &self.blit_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&target.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Viewbox Blit Encoder"),
                });
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Viewbox Blit Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                pass.set_viewport(
                    x0 as f32,
                    y0 as f32,
                    (x1 - x0) as f32,
                    (y1 - y0) as f32,
                    0.0,
                    1.0,
                );
                pass.set_pipeline(&self.blit_pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.draw(0..3, 0..1);
            }
            self.queue.submit(std::iter::once(encoder.finish()));
        }

        frame.present();
    }
}

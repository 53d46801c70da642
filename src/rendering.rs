//! Rendering system with wgpu pipeline and shader management.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::animation::FrameTarget;
use crate::camera::CameraUniforms;
use crate::ocean::{Side, Vertex};
use crate::panel::OverlayFrame;
use crate::params::RenderConfig;
use crate::session::Session;
use crate::shader::{self, CAMERA_GROUP, WAVES_GROUP};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("failed to acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Rendering system managing the wgpu device, pipelines and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// One pipeline per `Side`, indexed by `Side::index`
    pipelines: Vec<wgpu::RenderPipeline>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    waves_buffer: wgpu::Buffer,
    waves_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<OverlayFrame>,
}

impl RenderSystem {
    /// Create the device, surface and the wave pipelines for `session`
    pub async fn new(
        window: Arc<Window>,
        session: &Session,
        render_config: &RenderConfig,
    ) -> Result<Self, RenderError> {
        let (width, height) = session.viewport.drawing_buffer_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        log::info!("Adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wave Shader"),
            source: wgpu::ShaderSource::Wgsl(shader::source(session.variant).into()),
        });

        let mesh = &session.surface.mesh;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[*session.camera_uniforms()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Laid out from the reflected struct, so sizes always agree
        let waves_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wave Uniform Buffer"),
            contents: &session.uniform_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = uniform_layout(&device, "Camera", wgpu::ShaderStages::VERTEX);
        let waves_layout = uniform_layout(
            &device,
            "Waves",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let waves_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Waves Bind Group"),
            layout: &waves_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: waves_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wave Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &waves_layout],
            push_constant_ranges: &[],
        });

        let pipelines = Side::ALL
            .iter()
            .map(|side| wave_pipeline(&device, &pipeline_layout, &shader, config.format, *side))
            .collect();

        let depth_view = depth_texture(&device, width, height);
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1, false);

        let [r, g, b] = render_config.clear_color;
        log::info!("Render target {}x{} ({:?})", width, height, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            camera_buffer,
            camera_bind_group,
            waves_buffer,
            waves_bind_group,
            depth_view,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            egui_renderer,
            overlay: None,
        })
    }

    /// Resize the surface and depth buffer to a drawing-buffer size
    ///
    /// On displays above the pixel-ratio cap the surface is smaller than the
    /// window; the compositor scales it up when presenting.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = depth_texture(&self.device, width, height);
        log::debug!("Render target {}x{}", width, height);
    }

    /// Panel output to draw on top of the next frame
    ///
    /// Texture updates from a frame that was never presented carry over.
    pub fn stage_overlay(&mut self, mut frame: OverlayFrame) {
        if let Some(mut pending) = self.overlay.take() {
            pending.textures_delta.append(frame.textures_delta);
            frame.textures_delta = pending.textures_delta;
        }
        self.overlay = Some(frame);
    }

    fn write_uniforms(&self, session: &Session) {
        let camera: &CameraUniforms = session.camera_uniforms();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*camera]));
        self.queue
            .write_buffer(&self.waves_buffer, 0, &session.uniform_bytes());
    }

    /// Render a frame: the wave mesh, then the panel over it
    pub fn render(&mut self, session: &Session) -> Result<(), RenderError> {
        self.write_uniforms(session);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Frame acquire timed out, skipping frame");
                return Ok(());
            }
            Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Wave Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipelines[session.material().side.index()]);
            render_pass.set_bind_group(CAMERA_GROUP, &self.camera_bind_group, &[]);
            render_pass.set_bind_group(WAVES_GROUP, &self.waves_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        let mut command_buffers = Vec::new();
        let overlay = self.overlay.take();
        if let Some(frame) = &overlay {
            // Panel coordinates are logical; the buffer may be clamped below
            // the window's scale factor
            let screen = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.config.width, self.config.height],
                pixels_per_point: session.viewport.pixel_ratio() as f32,
            };

            for (id, delta) in &frame.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.device, &self.queue, *id, delta);
            }
            command_buffers = self.egui_renderer.update_buffers(
                &self.device,
                &self.queue,
                &mut encoder,
                &frame.primitives,
                &screen,
            );

            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut egui_pass, &frame.primitives, &screen);
        }

        command_buffers.push(encoder.finish());
        self.queue.submit(command_buffers);
        output.present();

        if let Some(frame) = overlay {
            for id in &frame.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        Ok(())
    }
}

impl FrameTarget for RenderSystem {
    type Error = RenderError;

    fn draw(&mut self, session: &Session) -> Result<(), RenderError> {
        self.render(session)
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    name: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{} Bind Group Layout", name)),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn wave_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    side: Side,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("Wave Pipeline ({})", side)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: side.cull_mode(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

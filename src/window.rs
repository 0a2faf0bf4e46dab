use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};
use treemorph::palette::{hex, Color};
use treemorph::{Category, InstanceRaw, InstanceSet, Mesh, MorphEngine, Time, Vertex};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::input::Command;
use crate::shader::{Globals, MaterialUniform, SHADER_SOURCE};
use crate::ViewerError;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TITLE_INTERVAL: Duration = Duration::from_millis(250);
/// Direction the key light travels.
const LIGHT_DIR: Vec3 = Vec3::new(-0.4, -1.0, -0.3);
const AMBIENT: f32 = 0.25;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl Camera {
    fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.2,
            distance: 32.0,
            target: Vec3::new(0.0, 1.0, 0.0),
        }
    }

    fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }
}

/// GPU resources of one category: its mesh, its instance slots and its
/// material.
struct CategoryDraw {
    category: Category,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    material_bind_group: wgpu::BindGroup,
    double_sided: bool,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    culled_pipeline: wgpu::RenderPipeline,
    double_sided_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    draws: Vec<CategoryDraw>,
    clear_color: wgpu::Color,
    pub camera: Camera,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, engine: &MorphEngine) -> Result<Self, ViewerError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::NoAdapter)?;

        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
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
            .or(surface_caps.formats.first())
            .copied()
            .ok_or(ViewerError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);
        let camera = Camera::new();

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<Globals>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globals Bind Group Layout"),
                entries: &[uniform_layout_entry],
            });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Material Bind Group Layout"),
                entries: &[uniform_layout_entry],
            });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Instance Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &material_bind_group_layout],
            push_constant_ranges: &[],
        });

        let culled_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            Some(wgpu::Face::Back),
            "Culled Pipeline",
        );
        let double_sided_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            None,
            "Double Sided Pipeline",
        );

        let instances = engine.instances();
        let draws = Category::ALL
            .iter()
            .map(|&category| {
                let mesh = Mesh::for_category(category);
                let material = category.material();
                let instance_count = match instances.buffer(category) {
                    Some(buffer) => buffer.len() as u32,
                    None => 1,
                };

                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(category.name()),
                    contents: mesh.as_bytes(),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                // Keep at least one slot so empty categories still get a valid buffer.
                let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(category.name()),
                    size: (instance_count.max(1) as usize * std::mem::size_of::<InstanceRaw>())
                        as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });

                let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Material Buffer"),
                    contents: bytemuck::bytes_of(&MaterialUniform::from(material)),
                    usage: wgpu::BufferUsages::UNIFORM,
                });

                let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Material Bind Group"),
                    layout: &material_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                });

                CategoryDraw {
                    category,
                    vertex_buffer,
                    vertex_count: mesh.vertex_count(),
                    instance_buffer,
                    instance_count,
                    material_bind_group,
                    double_sided: material.double_sided,
                }
            })
            .collect();

        let void = Color::from_hex(hex::VOID).to_linear();
        let clear_color = wgpu::Color {
            r: void.r as f64,
            g: void.g as f64,
            b: void.b as f64,
            a: 1.0,
        };

        let state = Self {
            surface,
            device,
            queue,
            config,
            culled_pipeline,
            double_sided_pipeline,
            globals_buffer,
            globals_bind_group,
            depth_texture,
            draws,
            clear_color,
            camera,
        };
        state.upload(instances);
        Ok(state)
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    /// Copy the latest instance slots to the GPU.
    pub fn upload(&self, instances: &InstanceSet) {
        for draw in &self.draws {
            match instances.buffer(draw.category) {
                Some(buffer) if !buffer.is_empty() => {
                    self.queue
                        .write_buffer(&draw.instance_buffer, 0, buffer.as_bytes());
                }
                Some(_) => {}
                None => {
                    let star = instances.star.raw();
                    self.queue
                        .write_buffer(&draw.instance_buffer, 0, bytemuck::bytes_of(&star));
                }
            }
        }
    }

    fn update_globals(&self, elapsed: f64) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let proj = Mat4::perspective_rh(45.0_f32.to_radians(), aspect, 0.1, 200.0);
        let view_proj = proj * view;

        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: self.camera.position().extend(1.0).to_array(),
            light_dir: LIGHT_DIR.normalize().extend(AMBIENT).to_array(),
            params: [elapsed as f32, 0.0, 0.0, 0.0],
        };

        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    pub fn render(&mut self, elapsed: f64) -> Result<(), wgpu::SurfaceError> {
        self.update_globals(elapsed);

        let output = self.surface.get_current_texture()?;
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
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for draw in &self.draws {
                if draw.instance_count == 0 {
                    continue;
                }
                let pipeline = if draw.double_sided {
                    &self.double_sided_pipeline
                } else {
                    &self.culled_pipeline
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &draw.material_bind_group, &[]);
                render_pass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
                render_pass.draw(0..draw.vertex_count, 0..draw.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
    label: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                },
            ],
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
            cull_mode,
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

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
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

pub struct App {
    engine: MorphEngine,
    time: Time,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    last_title: Instant,
    error: Option<ViewerError>,
}

impl App {
    pub fn new(engine: MorphEngine) -> Self {
        Self {
            engine,
            time: Time::new(),
            window: None,
            gpu_state: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            last_title: Instant::now(),
            error: None,
        }
    }

    /// The setup error that ended the event loop, if any.
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title("treemorph")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &self.engine))?;
        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn apply(&mut self, command: Command, event_loop: &ActiveEventLoop) {
        match command {
            Command::ToggleMorph => {
                let state = self.engine.toggle();
                log::info!("morphing toward {:?}", state);
            }
            Command::TogglePause => {
                self.time.toggle_pause();
                log::info!("clock {}", if self.time.is_paused() { "paused" } else { "resumed" });
            }
            Command::Quit => event_loop.exit(),
        }
    }

    fn update_title(&mut self) {
        if self.last_title.elapsed() < TITLE_INTERVAL {
            return;
        }
        self.last_title = Instant::now();
        if let Some(window) = &self.window {
            window.set_title(&format!(
                "treemorph | [Space] {} | {:.0}% | {:.0} fps{}",
                self.engine.state().action_label(),
                self.engine.progress() * 100.0,
                self.time.fps(),
                if self.time.is_paused() { " | paused" } else { "" },
            ));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("viewer setup failed: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        if let Some(command) = Command::from_key(code) {
                            self.apply(command, event_loop);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;

                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.yaw -= dx as f32 * 0.005;
                            gpu_state.camera.pitch += dy as f32 * 0.005;
                            gpu_state.camera.pitch = gpu_state.camera.pitch.clamp(-1.5, 1.5);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.distance -= scroll * 1.5;
                    gpu_state.camera.distance = gpu_state.camera.distance.clamp(8.0, 80.0);
                }
            }
            WindowEvent::RedrawRequested => {
                let (elapsed, delta) = self.time.update();
                let instances = self.engine.advance_frame(elapsed, delta);

                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.upload(instances);
                    match gpu_state.render(elapsed) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("out of GPU memory");
                            event_loop.exit();
                        }
                        Err(e) => log::warn!("render error: {:?}", e),
                    }
                }

                self.update_title();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

use cosmos_core::constants::{AMBIENT_INTENSITY, BACKGROUND_RGB, KEY_LIGHT_POSITION};
use cosmos_core::particles::{generate_cloud, PointVertex};
use cosmos_core::{
    Camera, CloudId, FrameInput, GeometryRef, QualitySettings, SceneRenderer, ShadingParams,
    Surface,
};
use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
    light_dir: [f32; 4], // xyz view-space direction, w ambient
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Instance {
    center: [f32; 3],
    size: f32,
    color: [f32; 4],
    kind: f32, // 0 lit sphere, otherwise gaussian falloff
}

const QUAD_CORNERS: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];
const INITIAL_INSTANCES: usize = 1024;

/// Flat colors standing in for the procedural surfaces of the web renderer.
fn surface_color(surface: Surface) -> Option<[f32; 4]> {
    Some(match surface {
        Surface::Lit | Surface::Glow | Surface::Rock => [1.0, 1.0, 1.0, 1.0],
        Surface::Earth => [0.15, 0.35, 0.7, 1.0],
        Surface::Moon => [0.6, 0.6, 0.6, 1.0],
        Surface::Mars => [0.75, 0.35, 0.18, 1.0],
        Surface::Jupiter => [0.82, 0.68, 0.5, 1.0],
        Surface::Saturn => [0.88, 0.8, 0.6, 1.0],
        // Shells and the ring have no impostor shape
        Surface::Clouds | Surface::Atmosphere | Surface::SaturnRing => return None,
    })
}

/// Preview renderer drawing every body as a camera-facing impostor in one
/// instanced pass.
pub struct NativeRenderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    quality: QualitySettings,
    clouds: FnvHashMap<CloudId, Vec<PointVertex>>,
    instances: Vec<Instance>,
    camera: Camera,
}

impl<'w> NativeRenderer<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        quality: QualitySettings,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: match quality.power {
                    cosmos_core::viewport::PowerMode::LowPower => wgpu::PowerPreference::LowPower,
                    cosmos_core::viewport::PowerMode::HighPerformance => {
                        wgpu::PowerPreference::HighPerformance
                    }
                },
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(cosmos_core::SCENE_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = create_instance_buffer(&device, INITIAL_INSTANCES);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: impostor instances
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Instance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 32,
                        shader_location: 4,
                    },
                ],
            },
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("impostors"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let aspect = config.width as f32 / config.height as f32;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_INSTANCES,
            quality,
            clouds: FnvHashMap::default(),
            instances: Vec::with_capacity(INITIAL_INSTANCES),
            camera: Camera::scene(aspect),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.camera = Camera::scene(new_size.width as f32 / new_size.height as f32);
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn push_points(&mut self, cloud: CloudId, shading: &ShadingParams, model: &Mat4) {
        let Some(style) = shading.points else {
            return;
        };
        if !cloud.is_streamed() && !self.clouds.contains_key(&cloud) {
            let points = generate_cloud(cloud, &self.quality);
            log::info!("[preview] generated {:?}: {} points", cloud, points.len());
            self.clouds.insert(cloud, points);
        }
        let Some(points) = self.clouds.get(&cloud) else {
            return;
        };
        let height = self.config.height as f32;
        let fovy = self.camera.fovy_radians;
        // Zero falloff would select the lit-sphere path
        let kind = style.falloff.max(1e-3);
        let scale = model.x_axis.truncate().length();
        self.instances.extend(points.iter().map(|p| {
            let size = style.sizing.world_size(p.size * style.size_scale, fovy, height) * scale;
            Instance {
                center: model.transform_point3(Vec3::from(p.position)).to_array(),
                size,
                color: [
                    p.color[0] * shading.tint[0],
                    p.color[1] * shading.tint[1],
                    p.color[2] * shading.tint[2],
                    p.color[3] * shading.tint[3] * style.opacity,
                ],
                kind,
            }
        }));
    }

    fn push_body(&mut self, shading: &ShadingParams, model: &Mat4) {
        let Some(base) = surface_color(shading.surface) else {
            return;
        };
        let radius = model.x_axis.truncate().length();
        let kind = if shading.surface == Surface::Glow { 2.0 } else { 0.0 };
        self.instances.push(Instance {
            center: model.transform_point3(Vec3::ZERO).to_array(),
            size: radius * 2.0,
            color: [
                base[0] * shading.tint[0],
                base[1] * shading.tint[1],
                base[2] * shading.tint[2],
                base[3] * shading.tint[3],
            ],
            kind,
        });
    }

    fn write_uniforms(&self) {
        let view = self.camera.view_matrix();
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
        let light = view
            .transform_vector3(Vec3::from(KEY_LIGHT_POSITION))
            .normalize_or_zero();
        let uniforms = Uniforms {
            view_proj: self.camera.view_projection().to_cols_array_2d(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            light_dir: light.extend(AMBIENT_INTENSITY).to_array(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn upload_instances(&mut self) {
        if self.instances.len() > self.instance_capacity {
            self.instance_capacity = self.instances.len().next_power_of_two();
            self.instance_vb = create_instance_buffer(&self.device, self.instance_capacity);
            log::info!("[preview] instance buffer grown to {}", self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&self.instances));
    }
}

impl SceneRenderer for NativeRenderer<'_> {
    type Error = wgpu::SurfaceError;

    fn begin_frame(&mut self, _input: &FrameInput) {
        self.instances.clear();
    }

    fn stream_points(&mut self, cloud: CloudId, points: &[PointVertex]) {
        let buffer = self.clouds.entry(cloud).or_default();
        buffer.clear();
        buffer.extend_from_slice(points);
    }

    fn submit_body(&mut self, geometry: GeometryRef, shading: &ShadingParams, model: &Mat4) {
        match geometry {
            GeometryRef::Cloud(cloud) => self.push_points(cloud, shading, model),
            _ => self.push_body(shading, model),
        }
    }

    fn finish_frame(&mut self) -> Result<(), Self::Error> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.write_uniforms();
        self.upload_instances();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: BACKGROUND_RGB[0] as f64,
                            g: BACKGROUND_RGB[1] as f64,
                            b: BACKGROUND_RGB[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !self.instances.is_empty() {
                rpass.set_pipeline(&self.pipeline);
                rpass.set_bind_group(0, &self.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
                rpass.draw(0..6, 0..self.instances.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_vb"),
        size: (std::mem::size_of::<Instance>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

use crate::camera::CameraUniform;
use crate::constants::{DRAW_UNIFORM_STRIDE, INITIAL_DRAW_CAPACITY, MSAA_SAMPLES};
use cosmos_core::constants::BACKGROUND_RGB;
use cosmos_core::particles::PointVertex;
use cosmos_core::shading::PointSizing;
use cosmos_core::viewport::PowerMode;
use cosmos_core::{
    BlendMode, CloudId, FrameInput, GeometryRef, QualitySettings, SceneRenderer, ShadingParams,
};
use glam::Mat4;
use web_sys as web;

mod helpers;
mod meshes;
mod points;
mod post;
mod targets;

use helpers::ScenePipelineDesc;
use meshes::MeshCache;
use points::PointClouds;
use post::{PostBindGroups, PostResources};
use targets::RenderTargets;

/// Per-draw uniforms (group 1), padded to the dynamic offset alignment.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    tint: [f32; 4],
    /// surface id, emissive, opacity, falloff
    params: [f32; 4],
    /// sizing mode (0 perspective, 1 viewport), perspective k, size scale, drift
    point: [f32; 4],
    _pad: [[f32; 4]; 9],
}

impl DrawUniforms {
    fn new(shading: &ShadingParams, model: &Mat4) -> Self {
        let (point, opacity, falloff) = match shading.points {
            Some(style) => {
                let (mode, k) = match style.sizing {
                    PointSizing::Perspective(k) => (0.0, k),
                    PointSizing::ViewportScaled => (1.0, 0.0),
                };
                (
                    [mode, k, style.size_scale, style.drift],
                    style.opacity,
                    style.falloff,
                )
            }
            None => ([0.0, 0.0, 1.0, 0.0], 1.0, 0.0),
        };
        Self {
            model: model.to_cols_array_2d(),
            tint: shading.tint,
            params: [shading.surface as u32 as f32, shading.emissive, opacity, falloff],
            point,
            _pad: [[0.0; 4]; 9],
        }
    }
}

const _: () = assert!(std::mem::size_of::<DrawUniforms>() == DRAW_UNIFORM_STRIDE);

#[derive(Clone, Copy, Debug)]
enum DrawKind {
    Mesh(GeometryRef),
    Points(CloudId),
}

#[derive(Clone, Copy, Debug)]
struct Draw {
    kind: DrawKind,
    blend: BlendMode,
    slot: u32,
}

struct BlendPipelines {
    opaque: wgpu::RenderPipeline,
    alpha: wgpu::RenderPipeline,
    additive: wgpu::RenderPipeline,
}

impl BlendPipelines {
    fn new(device: &wgpu::Device, desc: ScenePipelineDesc<'_>) -> Self {
        let make = |blend| helpers::make_scene_pipeline(device, &ScenePipelineDesc { blend, ..desc });
        Self {
            opaque: make(BlendMode::Opaque),
            alpha: make(BlendMode::Alpha),
            additive: make(BlendMode::Additive),
        }
    }

    fn get(&self, blend: BlendMode) -> &wgpu::RenderPipeline {
        match blend {
            BlendMode::Opaque => &self.opaque,
            BlendMode::Alpha => &self.alpha,
            BlendMode::Additive => &self.additive,
        }
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    quality: QualitySettings,

    targets: RenderTargets,
    post: Option<PostResources>,
    post_groups: Option<PostBindGroups>,

    camera_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_bgl: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,

    mesh_pipelines: BlendPipelines,
    point_pipelines: BlendPipelines,
    meshes: MeshCache,
    clouds: PointClouds,

    draws: Vec<Draw>,
    draw_uniforms: Vec<DrawUniforms>,

    width: u32,
    height: u32,
    time: f32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, quality: &QualitySettings) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let power_preference = match quality.power {
            PowerMode::LowPower => wgpu::PowerPreference::LowPower,
            PowerMode::HighPerformance => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_format = if quality.post_processing {
            targets::HDR_FORMAT
        } else {
            format
        };
        let sample_count = if quality.antialias
            && adapter
                .get_texture_format_features(scene_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };

        // Group 0: camera and lights
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniforms"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Group 1: one dynamic-offset slot per draw
        let draw_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(DRAW_UNIFORM_STRIDE as u64),
                },
                count: None,
            }],
        });
        let (draw_buffer, draw_bind_group) = create_draw_slots(&device, &draw_bgl, INITIAL_DRAW_CAPACITY);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_layout"),
            bind_group_layouts: &[&frame_bgl, &draw_bgl],
            push_constant_ranges: &[],
        });
        let bodies_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bodies_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::BODIES_WGSL.into()),
        });
        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::POINTS_WGSL.into()),
        });
        let mesh_pipelines = BlendPipelines::new(
            &device,
            ScenePipelineDesc {
                label: "mesh_pipeline",
                layout: &layout,
                shader: &bodies_shader,
                buffers: &[helpers::mesh_vertex_layout()],
                color_format: scene_format,
                sample_count,
                blend: BlendMode::Opaque,
            },
        );
        let point_pipelines = BlendPipelines::new(
            &device,
            ScenePipelineDesc {
                label: "point_pipeline",
                layout: &layout,
                shader: &points_shader,
                buffers: &[helpers::quad_vertex_layout(), helpers::point_instance_layout()],
                color_format: scene_format,
                sample_count,
                blend: BlendMode::Additive,
            },
        );

        let targets = RenderTargets::new(
            &device,
            width,
            height,
            scene_format,
            sample_count,
            quality.post_processing,
        );
        let post = quality
            .post_processing
            .then(|| post::create_post_resources(&device, format));
        let post_groups = match (&post, &targets.post) {
            (Some(post), Some(post_targets)) => {
                post.write_uniforms(&queue, width, height);
                Some(post.bind_groups(&device, post_targets))
            }
            _ => None,
        };
        let clouds = PointClouds::new(&device);

        log::info!(
            "[render] WebGPU ready: {:?} {}x{}, msaa x{}, post {}",
            format,
            width,
            height,
            sample_count,
            quality.post_processing
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            quality: *quality,
            targets,
            post,
            post_groups,
            camera_buffer,
            frame_bind_group,
            draw_bgl,
            draw_buffer,
            draw_bind_group,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            mesh_pipelines,
            point_pipelines,
            meshes: MeshCache::default(),
            clouds,
            draws: Vec::with_capacity(INITIAL_DRAW_CAPACITY),
            draw_uniforms: Vec::with_capacity(INITIAL_DRAW_CAPACITY),
            width,
            height,
            time: 0.0,
            clear_color: wgpu::Color {
                r: BACKGROUND_RGB[0] as f64,
                g: BACKGROUND_RGB[1] as f64,
                b: BACKGROUND_RGB[2] as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            // Recreate offscreen render targets and dependent bind groups
            self.targets
                .recreate(&self.device, width, height, self.quality.post_processing);
            self.rebuild_post_bind_groups();
        }
    }

    /// Reconfigure after the surface was lost or went out of date.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn rebuild_post_bind_groups(&mut self) {
        self.post_groups = match (&self.post, &self.targets.post) {
            (Some(post), Some(post_targets)) => {
                post.write_uniforms(&self.queue, self.width, self.height);
                Some(post.bind_groups(&self.device, post_targets))
            }
            _ => None,
        };
    }

    fn ensure_draw_capacity(&mut self, needed: usize) {
        if needed <= self.draw_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        let (buffer, bind_group) = create_draw_slots(&self.device, &self.draw_bgl, capacity);
        self.draw_buffer = buffer;
        self.draw_bind_group = bind_group;
        self.draw_capacity = capacity;
    }

    fn record_draw(&self, rpass: &mut wgpu::RenderPass<'_>, draw: &Draw) {
        let offset = draw.slot * DRAW_UNIFORM_STRIDE as u32;
        match draw.kind {
            DrawKind::Mesh(geometry) => {
                let Some(mesh) = self.meshes.get(geometry) else {
                    return;
                };
                rpass.set_pipeline(self.mesh_pipelines.get(draw.blend));
                rpass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            DrawKind::Points(id) => {
                let Some(cloud) = self.clouds.get(id) else {
                    return;
                };
                rpass.set_pipeline(self.point_pipelines.get(draw.blend));
                rpass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                rpass.set_vertex_buffer(0, self.clouds.quad.slice(..));
                rpass.set_vertex_buffer(1, cloud.buffer.slice(..));
                rpass.draw(0..points::QUAD_CORNERS.len() as u32, 0..cloud.count);
            }
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera = CameraUniform::new(self.width, self.height, self.time, self.quality.rim_light);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera));
        self.ensure_draw_capacity(self.draw_uniforms.len());
        if !self.draw_uniforms.is_empty() {
            self.queue.write_buffer(
                &self.draw_buffer,
                0,
                bytemuck::cast_slice(&self.draw_uniforms),
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let scene_target = match &self.targets.post {
                Some(post_targets) => &post_targets.hdr_view,
                None => &view,
            };
            let (color_view, resolve_target) = match &self.targets.msaa_view {
                Some(msaa) => (msaa, Some(scene_target)),
                None => (scene_target, None),
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            // Opaque bodies first, then translucent layers in submission order
            for draw in self.draws.iter().filter(|d| d.blend == BlendMode::Opaque) {
                self.record_draw(&mut rpass, draw);
            }
            for draw in self.draws.iter().filter(|d| d.blend != BlendMode::Opaque) {
                self.record_draw(&mut rpass, draw);
            }
        }

        if let (Some(post), Some(post_targets), Some(groups)) =
            (&self.post, &self.targets.post, &self.post_groups)
        {
            post.record(&mut encoder, post_targets, groups, &view);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl SceneRenderer for GpuState<'_> {
    type Error = wgpu::SurfaceError;

    fn begin_frame(&mut self, input: &FrameInput) {
        if input.elapsed.is_finite() {
            self.time = input.elapsed;
        }
        self.draws.clear();
        self.draw_uniforms.clear();
    }

    fn stream_points(&mut self, cloud: CloudId, points: &[PointVertex]) {
        self.clouds.stream(&self.device, &self.queue, cloud, points);
    }

    fn submit_body(&mut self, geometry: GeometryRef, shading: &ShadingParams, model: &Mat4) {
        let kind = match geometry {
            GeometryRef::Cloud(id) => {
                self.clouds.ensure(&self.device, id, &self.quality);
                DrawKind::Points(id)
            }
            mesh => {
                self.meshes.ensure(&self.device, mesh, &self.quality);
                DrawKind::Mesh(mesh)
            }
        };
        self.draws.push(Draw {
            kind,
            blend: shading.blend,
            slot: self.draw_uniforms.len() as u32,
        });
        self.draw_uniforms.push(DrawUniforms::new(shading, model));
    }

    fn finish_frame(&mut self) -> Result<(), Self::Error> {
        self.render()
    }
}

fn create_draw_slots(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("draw_uniforms"),
        size: (capacity.max(1) * DRAW_UNIFORM_STRIDE) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("draw_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(DRAW_UNIFORM_STRIDE as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

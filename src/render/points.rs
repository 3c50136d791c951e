use cosmos_core::particles::{generate_cloud, PointVertex};
use cosmos_core::{CloudId, QualitySettings};
use fnv::FnvHashMap;
use wgpu::util::DeviceExt;

/// Two triangles of a unit quad centered on the origin, expanded into a
/// camera-facing sprite per instance.
pub(crate) const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

pub(crate) struct GpuCloud {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) count: u32,
    capacity: usize,
}

/// Instance buffers for every point cloud.
///
/// Static clouds are generated once from their seed. Streamed clouds keep a
/// buffer that is rewritten every frame and grown when needed.
pub(crate) struct PointClouds {
    pub(crate) quad: wgpu::Buffer,
    clouds: FnvHashMap<CloudId, GpuCloud>,
}

impl PointClouds {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("point_quad"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            quad,
            clouds: FnvHashMap::default(),
        }
    }

    pub(crate) fn ensure(&mut self, device: &wgpu::Device, id: CloudId, quality: &QualitySettings) {
        if id.is_streamed() || self.clouds.contains_key(&id) {
            return;
        }
        let points = generate_cloud(id, quality);
        log::info!("[render] generated {:?}: {} points", id, points.len());
        self.clouds.insert(id, upload(device, id, &points, points.len()));
    }

    /// Replace a streamed cloud's points for this frame.
    pub(crate) fn stream(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: CloudId,
        points: &[PointVertex],
    ) {
        match self.clouds.get_mut(&id) {
            Some(cloud) if cloud.capacity >= points.len() => {
                queue.write_buffer(&cloud.buffer, 0, bytemuck::cast_slice(points));
                cloud.count = points.len() as u32;
            }
            _ => {
                let capacity = points.len().next_power_of_two().max(64);
                self.clouds.insert(id, upload(device, id, points, capacity));
            }
        }
    }

    pub(crate) fn get(&self, id: CloudId) -> Option<&GpuCloud> {
        self.clouds.get(&id).filter(|cloud| cloud.count > 0)
    }
}

fn upload(device: &wgpu::Device, id: CloudId, points: &[PointVertex], capacity: usize) -> GpuCloud {
    let mut contents = points.to_vec();
    // wgpu rejects empty buffers
    contents.resize(
        capacity.max(1),
        PointVertex {
            position: [0.0; 3],
            size: 0.0,
            color: [0.0; 4],
        },
    );
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?}", id)),
        contents: bytemuck::cast_slice(&contents),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    GpuCloud {
        buffer,
        count: points.len() as u32,
        capacity: capacity.max(1),
    }
}

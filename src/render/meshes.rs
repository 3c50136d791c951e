use cosmos_core::geometry;
use cosmos_core::{GeometryRef, QualitySettings};
use fnv::FnvHashMap;
use wgpu::util::DeviceExt;

pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

/// GPU buffers per mesh geometry, built on first use.
///
/// Geometries without a mesh (point clouds) are remembered as `None` so the
/// builder runs once per id.
#[derive(Default)]
pub(crate) struct MeshCache {
    meshes: FnvHashMap<GeometryRef, Option<GpuMesh>>,
}

impl MeshCache {
    pub(crate) fn ensure(&mut self, device: &wgpu::Device, geometry: GeometryRef, quality: &QualitySettings) {
        self.meshes.entry(geometry).or_insert_with(|| {
            let data = geometry::build(geometry, quality)?;
            if data.indices.is_empty() {
                return None;
            }
            let label = format!("{:?}", geometry);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            log::info!(
                "[render] built {:?}: {} triangles",
                geometry,
                data.triangle_count()
            );
            Some(GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: data.indices.len() as u32,
            })
        });
    }

    pub(crate) fn get(&self, geometry: GeometryRef) -> Option<&GpuMesh> {
        self.meshes.get(&geometry).and_then(Option::as_ref)
    }
}

//! CPU-side mesh construction for every [`GeometryRef`] that is not a point
//! cloud. Meshes are unit sized; bodies scale them through their parts.

use crate::catalog::{SATURN_RING_INNER, SATURN_RING_OUTER};
use crate::constants::CLOUD_SEED;
use crate::shading::{hex_rgba, GeometryRef};
use crate::viewport::QualitySettings;
use glam::{Mat3, Mat4, Vec3};
use rand::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other` transformed by `xf`.
    pub fn append(&mut self, other: &MeshData, xf: Mat4) {
        let base = self.vertices.len() as u32;
        let normal_xf = Mat3::from_mat4(xf).inverse().transpose();
        self.vertices.extend(other.vertices.iter().map(|v| MeshVertex {
            position: xf.transform_point3(Vec3::from_array(v.position)).to_array(),
            normal: (normal_xf * Vec3::from_array(v.normal))
                .normalize_or_zero()
                .to_array(),
            uv: v.uv,
            color: v.color,
        }));
        self.indices.extend(other.indices.iter().map(|i| base + i));
    }

    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2], color: [f32; 4]) -> u32 {
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
            color,
        });
        self.vertices.len() as u32 - 1
    }
}

/// Build the mesh behind a geometry id. Point clouds return `None`.
pub fn build(geometry: GeometryRef, quality: &QualitySettings) -> Option<MeshData> {
    match geometry {
        GeometryRef::Sphere => Some(uv_sphere(quality.sphere_segments, quality.sphere_segments)),
        GeometryRef::Shell => Some(uv_sphere(quality.shell_segments, quality.shell_segments)),
        GeometryRef::SaturnRing => Some(ring(
            SATURN_RING_INNER / SATURN_RING_OUTER,
            quality.ring_segments,
        )),
        GeometryRef::RocketHull => Some(rocket_hull()),
        GeometryRef::RocketFlame => Some(rocket_flame()),
        GeometryRef::MeteorRock(index) => Some(meteor_rock(index)),
        GeometryRef::MeteorCore => Some(icosphere(0, [1.0; 4])),
        GeometryRef::Cloud(_) => None,
    }
}

/// Unit UV sphere. `uv.y` runs 0 at the north pole to 1 at the south.
pub fn uv_sphere(width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshData::default();
    for y in 0..=hs {
        let v = y as f32 / hs as f32;
        let theta = v * PI;
        for x in 0..=ws {
            let u = x as f32 / ws as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            mesh.push(n, n, [u, v], [1.0; 4]);
        }
    }
    let row = ws + 1;
    for y in 0..hs {
        for x in 0..ws {
            let a = y * row + x;
            let b = a + row;
            if y != 0 {
                mesh.indices.extend([a, b, a + 1]);
            }
            if y != hs - 1 {
                mesh.indices.extend([b, b + 1, a + 1]);
            }
        }
    }
    mesh
}

/// Flat annulus in the XY plane with outer radius 1. `uv.x` is the radial
/// coordinate from inner (0) to outer (1) edge.
pub fn ring(inner_ratio: f32, segments: u32) -> MeshData {
    let segs = segments.max(3);
    let inner = inner_ratio.clamp(0.0, 0.999);
    let mut mesh = MeshData::default();
    for i in 0..=segs {
        let u = i as f32 / segs as f32;
        let (s, c) = (u * TAU).sin_cos();
        mesh.push(Vec3::new(c * inner, s * inner, 0.0), Vec3::Z, [0.0, u], [1.0; 4]);
        mesh.push(Vec3::new(c, s, 0.0), Vec3::Z, [1.0, u], [1.0; 4]);
    }
    for i in 0..segs {
        let a = i * 2;
        mesh.indices.extend([a, a + 1, a + 3, a, a + 3, a + 2]);
    }
    mesh
}

/// Capped frustum along Y, centered on the origin. A zero radius gives a cone.
pub fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: u32, color: [f32; 4]) -> MeshData {
    let segs = segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height.max(1e-6);
    let mut mesh = MeshData::default();
    for i in 0..=segs {
        let u = i as f32 / segs as f32;
        let (s, c) = (u * TAU).sin_cos();
        let n = Vec3::new(s, slope, c).normalize_or_zero();
        mesh.push(Vec3::new(s * radius_top, half, c * radius_top), n, [u, 0.0], color);
        mesh.push(Vec3::new(s * radius_bottom, -half, c * radius_bottom), n, [u, 1.0], color);
    }
    for i in 0..segs {
        let a = i * 2;
        mesh.indices.extend([a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }
    for (radius, y, normal) in [(radius_top, half, Vec3::Y), (radius_bottom, -half, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = mesh.push(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5], color);
        let first = mesh.vertices.len() as u32;
        for i in 0..=segs {
            let (s, c) = (i as f32 / segs as f32 * TAU).sin_cos();
            mesh.push(Vec3::new(s * radius, y, c * radius), normal, [0.5 + s * 0.5, 0.5 + c * 0.5], color);
        }
        for i in 0..segs {
            let (a, b) = (first + i, first + i + 1);
            if normal.y > 0.0 {
                mesh.indices.extend([center, a, b]);
            } else {
                mesh.indices.extend([center, b, a]);
            }
        }
    }
    mesh
}

pub fn cuboid(size: Vec3, color: [f32; 4]) -> MeshData {
    let h = size * 0.5;
    let mut mesh = MeshData::default();
    let faces = [
        (Vec3::X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::Z),
        (Vec3::NEG_Y, Vec3::Z),
        (Vec3::Z, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y),
    ];
    for (n, up) in faces {
        // side x up == n keeps the winding counter-clockwise from outside
        let side = up.cross(n);
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-1.0f32, -1.0f32), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (n + side * su + up * sv) * h;
            mesh.push(p, n, [(su + 1.0) * 0.5, (sv + 1.0) * 0.5], color);
        }
        mesh.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Unit icosahedron, optionally subdivided once per `detail` level.
pub fn icosphere(detail: u32, color: [f32; 4]) -> MeshData {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let mut points: Vec<Vec3> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    for _ in 0..detail {
        let mut next = Vec::with_capacity(faces.len() * 4);
        let mut midpoint = |a: u32, b: u32| -> u32 {
            let m = (points[a as usize] + points[b as usize]).normalize();
            points.push(m);
            points.len() as u32 - 1
        };
        for [a, b, c] in faces {
            let ab = midpoint(a, b);
            let bc = midpoint(b, c);
            let ca = midpoint(c, a);
            next.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }
    faceted(&points, &faces, color)
}

/// Non-indexed style mesh with one flat normal per face.
fn faceted(points: &[Vec3], faces: &[[u32; 3]], color: [f32; 4]) -> MeshData {
    let mut mesh = MeshData::default();
    for &[a, b, c] in faces {
        let (pa, pb, pc) = (points[a as usize], points[b as usize], points[c as usize]);
        let n = (pb - pa).cross(pc - pa).normalize_or_zero();
        for p in [pa, pb, pc] {
            let i = mesh.push(p, n, [0.0, 0.0], color);
            mesh.indices.push(i);
        }
    }
    mesh
}

/// Lumpy rock: a once-subdivided icosahedron with seeded per-vertex jitter.
pub fn meteor_rock(index: u8) -> MeshData {
    let base = icosphere(1, [1.0; 4]);
    let mut rng = StdRng::seed_from_u64(CLOUD_SEED ^ (0x4d45_5445_4f52 + index as u64));
    // Jitter shared corners identically so faces stay closed.
    let mut offsets: Vec<(Vec3, f32)> = Vec::new();
    let mut jitter = |p: Vec3| -> Vec3 {
        if let Some((_, n)) = offsets.iter().find(|(q, _)| q.distance_squared(p) < 1e-8) {
            return p + Vec3::splat(*n);
        }
        let n = (rng.gen::<f32>() - 0.5) * 0.4;
        offsets.push((p, n));
        p + Vec3::splat(n)
    };
    let points: Vec<Vec3> = base
        .vertices
        .iter()
        .map(|v| jitter(Vec3::from_array(v.position)))
        .collect();
    let faces: Vec<[u32; 3]> = (0..points.len() as u32 / 3)
        .map(|f| [f * 3, f * 3 + 1, f * 3 + 2])
        .collect();
    faceted(&points, &faces, [1.0; 4])
}

const HULL_SEGMENTS: u32 = 24;

fn at(y: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, y, 0.0))
}

/// Body, trim rings, nose, portholes, fins, engine and bell in rocket space.
pub fn rocket_hull() -> MeshData {
    let seg = HULL_SEGMENTS;
    let mut hull = MeshData::default();
    hull.append(&frustum(0.4, 0.5, 3.0, seg, hex_rgba(0xe8e8e8)), Mat4::IDENTITY);
    for y in [-0.8, 0.0, 0.8] {
        hull.append(&frustum(0.42, 0.42, 0.08, seg, hex_rgba(0xc0c0c0)), at(y));
    }
    hull.append(&frustum(0.0, 0.4, 1.2, seg, hex_rgba(0xcc2222)), at(2.1));
    hull.append(&frustum(0.0, 0.12, 0.3, seg / 2, hex_rgba(0xffffff)), at(2.85));
    for y in [0.6, 0.2, -0.2] {
        let xf = Mat4::from_translation(Vec3::new(0.38, y, 0.0)) * Mat4::from_rotation_z(FRAC_PI_2);
        hull.append(&frustum(0.12, 0.12, 0.08, seg, hex_rgba(0x1a3a5c)), xf);
    }
    for quarter in 0..4 {
        let turn = Mat4::from_rotation_y(quarter as f32 * FRAC_PI_2);
        let fin = turn * Mat4::from_translation(Vec3::new(0.55, -1.1, 0.0)) * Mat4::from_rotation_z(0.2);
        hull.append(&cuboid(Vec3::new(0.6, 0.9, 0.05), hex_rgba(0xcc2222)), fin);
        let tip = turn * Mat4::from_translation(Vec3::new(0.75, -0.7, 0.0)) * Mat4::from_rotation_z(0.4);
        hull.append(&cuboid(Vec3::new(0.25, 0.4, 0.04), hex_rgba(0xaa1111)), tip);
    }
    hull.append(&frustum(0.5, 0.45, 0.4, seg, hex_rgba(0x333333)), at(-1.7));
    hull.append(&frustum(0.3, 0.45, 0.5, seg, hex_rgba(0x1a1a1a)), at(-2.1));
    hull
}

/// Nested exhaust cones pointing down, relative to the exhaust point.
pub fn rocket_flame() -> MeshData {
    let mut flame = MeshData::default();
    flame.append(&frustum(0.28, 0.28, 0.01, 24, hex_rgba(0xff4400)), at(0.05));
    let cones = [
        (0.25, 1.2, -0.6, [1.0, 0.4, 0.0, 0.7]),
        (0.15, 0.9, -0.5, [1.0, 0.667, 0.0, 0.8]),
        (0.08, 0.6, -0.4, [1.0, 1.0, 1.0, 0.9]),
    ];
    for (radius, height, y, color) in cones {
        flame.append(&frustum(radius, 0.0, height, 16, color), at(y));
    }
    flame
}

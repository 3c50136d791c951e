//! Seeded point-cloud generation and the rocket exhaust simulation.

use crate::background::{StarLayerSpec, STAR_LAYERS};
use crate::constants::CLOUD_SEED;
use crate::shading::CloudId;
use crate::viewport::QualitySettings;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointVertex {
    fn new(position: Vec3, size: f32, color: [f32; 3], alpha: f32) -> Self {
        Self {
            position: position.to_array(),
            size,
            color: [color[0], color[1], color[2], alpha],
        }
    }
}

pub const FLAME_PARTICLES: usize = 150;
pub const SMOKE_PARTICLES: usize = 80;
pub const METEOR_TRAIL_POINTS: usize = 30;

fn rgb(hex: u32) -> [f32; 3] {
    let c = crate::shading::hex_rgba(hex);
    [c[0], c[1], c[2]]
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Independent deterministic stream per cloud.
fn cloud_rng(salt: u64) -> StdRng {
    StdRng::seed_from_u64(CLOUD_SEED ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn signed_unit(rng: &mut StdRng) -> f32 {
    rng.gen::<f32>() - 0.5
}

/// Build the static vertices for a generated cloud. Streamed clouds
/// (flame, smoke) come back empty; they are filled by [`ExhaustPlume`].
pub fn generate_cloud(id: CloudId, quality: &QualitySettings) -> Vec<PointVertex> {
    match id {
        CloudId::GalaxyCore => galaxy_core(),
        CloudId::GalaxyDust => galaxy_dust(),
        CloudId::GalaxyArms => galaxy_arms(),
        CloudId::Nebula => nebula(),
        CloudId::StarLayer(i) => STAR_LAYERS
            .get(i as usize)
            .map(|spec| star_layer(i, spec, quality))
            .unwrap_or_default(),
        CloudId::MeteorTrail => meteor_trail(),
        CloudId::Flame | CloudId::Smoke => Vec::new(),
    }
}

fn galaxy_core() -> Vec<PointVertex> {
    const COUNT: usize = 2500;
    const RADIUS: f32 = 6.0;
    let white = rgb(0xfffef5);
    let yellow = rgb(0xfff4d6);
    let mut rng = cloud_rng(1);
    (0..COUNT)
        .map(|_| {
            let r = rng.gen::<f32>().powi(4) * RADIUS;
            let theta = rng.gen::<f32>() * TAU;
            let phi = signed_unit(&mut rng) * 0.25;
            let pos = Vec3::new(theta.cos() * r, phi * r, theta.sin() * r);
            let size = (1.0 - r / RADIUS) + rng.gen::<f32>() * 0.25;
            PointVertex::new(pos, size, mix(white, yellow, r / RADIUS), 1.0)
        })
        .collect()
}

fn galaxy_dust() -> Vec<PointVertex> {
    const COUNT: usize = 8000;
    const RADIUS: f32 = 22.0;
    let core = rgb(0xffeedd);
    let mid = rgb(0xcc9966);
    let outer = rgb(0x664422);
    let mut rng = cloud_rng(2);
    (0..COUNT)
        .map(|_| {
            let r = rng.gen::<f32>().powi(2) * RADIUS;
            let theta = rng.gen::<f32>() * TAU + r * 0.25;
            let vertical = signed_unit(&mut rng) * r * 0.12;
            let pos = Vec3::new(
                theta.cos() * r + signed_unit(&mut rng) * 2.0,
                vertical,
                theta.sin() * r + signed_unit(&mut rng) * 2.0,
            );
            let nr = r / RADIUS;
            let color = if nr < 0.3 {
                mix(core, mid, nr / 0.3)
            } else {
                mix(mid, outer, (nr - 0.3) / 0.7)
            };
            let size = (1.0 - nr * 0.5) * 0.5 + rng.gen::<f32>() * 0.25;
            let fade = 1.0 - smoothstep(0.0, 18.0, Vec3::new(pos.x, 0.0, pos.z).length());
            PointVertex::new(pos, size, color, fade)
        })
        .collect()
}

fn galaxy_arms() -> Vec<PointVertex> {
    const COUNT: usize = 12000;
    const BRANCHES: usize = 5;
    const SPIN: f32 = 2.5;
    const RANDOMNESS: f32 = 0.15;
    const RANDOMNESS_POWER: i32 = 3;
    const RADIUS: f32 = 55.0;
    let core = rgb(0xfff8e0);
    let mid = rgb(0xe8d0a0);
    let outer = rgb(0x7090c0);
    let mut rng = cloud_rng(3);
    let scatter = |rng: &mut StdRng, r: f32| {
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        rng.gen::<f32>().powi(RANDOMNESS_POWER) * sign * RANDOMNESS * r
    };
    (0..COUNT)
        .map(|i| {
            let r = rng.gen::<f32>().powf(1.5) * RADIUS;
            let branch = (i % BRANCHES) as f32 / BRANCHES as f32 * TAU;
            let spin = r * SPIN * 0.06;
            let dx = scatter(&mut rng, r);
            let dy = scatter(&mut rng, r) * 0.08;
            let dz = scatter(&mut rng, r);
            let pos = Vec3::new(
                (branch + spin).cos() * r + dx,
                dy,
                (branch + spin).sin() * r + dz,
            );
            let nr = r / RADIUS;
            let color = if nr < 0.2 {
                mix(core, mid, nr / 0.2)
            } else {
                mix(mid, outer, (nr - 0.2) / 0.8)
            };
            let size = (1.0 - nr * 0.7) * 0.28 + rng.gen::<f32>() * 0.08;
            PointVertex::new(pos, size, color, 1.0)
        })
        .collect()
}

fn nebula() -> Vec<PointVertex> {
    const COUNT: usize = 2000;
    let purple = rgb(0x4a3060);
    let blue = rgb(0x2a4080);
    let magenta = rgb(0x603050);
    let mut rng = cloud_rng(4);
    (0..COUNT)
        .map(|_| {
            let theta = rng.gen::<f32>() * TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            let radius = 50.0 + rng.gen::<f32>() * 60.0;
            let cluster_x = (theta * 2.0).sin() * 15.0;
            let cluster_y = (phi * 1.5).cos() * 8.0;
            let pos = Vec3::new(
                radius * phi.sin() * theta.cos() + cluster_x,
                radius * phi.sin() * theta.sin() * 0.2 + cluster_y,
                radius * phi.cos() - 80.0,
            );
            let pick = rng.gen::<f32>();
            let t = rng.gen::<f32>();
            let color = if pick < 0.33 {
                mix(purple, blue, t)
            } else if pick < 0.66 {
                mix(blue, magenta, t)
            } else {
                mix(magenta, purple, t)
            };
            let size = rng.gen::<f32>() * 3.0 + 1.0;
            PointVertex::new(pos, size, color, 1.0)
        })
        .collect()
}

/// Number of stars a layer gets at the given density.
pub fn star_count(spec: &StarLayerSpec, quality: &QualitySettings) -> usize {
    (spec.count as f32 * quality.star_density).floor() as usize
}

fn star_layer(index: u8, spec: &StarLayerSpec, quality: &QualitySettings) -> Vec<PointVertex> {
    // Sparser layers use larger points.
    let size = if quality.star_density < 1.0 {
        spec.size_sparse
    } else {
        spec.size
    };
    let mut rng = cloud_rng(16 + index as u64);
    (0..star_count(spec, quality))
        .map(|_| {
            let theta = rng.gen::<f32>() * TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            let r = spec.radius * (0.6 + rng.gen::<f32>() * 0.4);
            let pos = Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos() - spec.depth,
            );
            PointVertex::new(pos, size, [1.0, 1.0, 1.0], 1.0)
        })
        .collect()
}

fn meteor_trail() -> Vec<PointVertex> {
    (0..METEOR_TRAIL_POINTS)
        .map(|i| {
            let step = i as f32 * 0.3;
            PointVertex::new(Vec3::new(step, -step, 0.0), 1.0, [1.0, 1.0, 1.0], 1.0)
        })
        .collect()
}

/// Flame and smoke particles trailing the rocket engine, in the engine's
/// local frame. The motion constants are per 60 Hz frame.
#[derive(Clone, Debug)]
pub struct ExhaustPlume {
    rng: StdRng,
    flame: Vec<PointVertex>,
    flame_velocity: Vec<Vec3>,
    smoke: Vec<PointVertex>,
}

const FLAME_FLOOR: f32 = -3.0;
const SMOKE_TOP: f32 = -2.0;
const SMOKE_FLOOR: f32 = -12.0;

impl ExhaustPlume {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut flame = Vec::with_capacity(FLAME_PARTICLES);
        let mut flame_velocity = Vec::with_capacity(FLAME_PARTICLES);
        for _ in 0..FLAME_PARTICLES {
            let pos = Vec3::new(
                signed_unit(&mut rng) * 0.3,
                -rng.gen::<f32>() * 2.5,
                signed_unit(&mut rng) * 0.3,
            );
            let t = rng.gen::<f32>();
            flame.push(PointVertex::new(pos, 1.0, [1.0, 0.5 + t * 0.5, t * 0.3], 1.0));
            flame_velocity.push(Vec3::new(
                signed_unit(&mut rng) * 0.015,
                -rng.gen::<f32>() * 0.08 - 0.04,
                signed_unit(&mut rng) * 0.015,
            ));
        }
        let smoke = (0..SMOKE_PARTICLES)
            .map(|_| {
                let pos = Vec3::new(
                    signed_unit(&mut rng) * 0.5,
                    SMOKE_TOP - rng.gen::<f32>() * 8.0,
                    signed_unit(&mut rng) * 0.5,
                );
                PointVertex::new(pos, 1.0, [1.0, 1.0, 1.0], 1.0)
            })
            .collect();
        Self {
            rng,
            flame,
            flame_velocity,
            smoke,
        }
    }

    /// Advance by `delta` seconds. Large gaps (tab switches) are capped.
    pub fn step(&mut self, delta: f32) {
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        let frames = (delta * 60.0).min(4.0);
        for (p, v) in self.flame.iter_mut().zip(&self.flame_velocity) {
            let mut pos = Vec3::from_array(p.position) + *v * frames;
            if pos.y < FLAME_FLOOR {
                pos = Vec3::new(
                    signed_unit(&mut self.rng) * 0.3,
                    0.0,
                    signed_unit(&mut self.rng) * 0.3,
                );
            }
            p.position = pos.to_array();
        }
        for p in self.smoke.iter_mut() {
            let mut pos = Vec3::from_array(p.position);
            pos.x += signed_unit(&mut self.rng) * 0.02 * frames;
            pos.y -= 0.03 * frames;
            pos.z += signed_unit(&mut self.rng) * 0.02 * frames;
            if pos.y < SMOKE_FLOOR {
                pos = Vec3::new(
                    signed_unit(&mut self.rng) * 0.5,
                    SMOKE_TOP,
                    signed_unit(&mut self.rng) * 0.5,
                );
            }
            p.position = pos.to_array();
        }
    }

    pub fn flame(&self) -> &[PointVertex] {
        &self.flame
    }

    pub fn smoke(&self) -> &[PointVertex] {
        &self.smoke
    }
}

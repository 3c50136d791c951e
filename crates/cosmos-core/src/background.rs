//! Always-present backdrop layers and the time-driven meteorite swarm.

use crate::body::{BodyId, BodyPart, BodyTransform, CelestialBody, PartLocal};
use crate::constants::{METEOR_GATE, METEOR_PERIOD};
use crate::shading::{
    hex_rgba, BlendMode, CloudId, GeometryRef, PointSizing, PointStyle, ShadingParams, Surface,
};
use crate::state::FrameInput;
use glam::Vec3;
use std::f32::consts::PI;

/// Direct function of progress over the whole scroll range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Parallax {
    /// Linear recession into depth while shrinking.
    Recede {
        z_start: f32,
        z_end: f32,
        scale_start: f32,
        scale_end: f32,
    },
    /// Star-field parallax scaled by the layer's depth.
    Drift { depth: f32 },
    /// Straight translation by `offset * progress`.
    Push { offset: Vec3 },
}

impl Parallax {
    /// Returns (position, uniform scale).
    pub fn evaluate(&self, progress: f32) -> (Vec3, f32) {
        match *self {
            Parallax::Recede {
                z_start,
                z_end,
                scale_start,
                scale_end,
            } => (
                Vec3::new(0.0, 0.0, z_start + progress * (z_end - z_start)),
                scale_start + progress * (scale_end - scale_start),
            ),
            Parallax::Drift { depth } => (
                Vec3::new(
                    (progress * PI).sin() * depth * 0.1,
                    progress * depth * 0.15,
                    progress * depth * 0.8,
                ),
                1.0,
            ),
            Parallax::Push { offset } => (offset * progress, 1.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackgroundLayer {
    id: BodyId,
    parallax: Parallax,
    base_rotation: Vec3,
    spin: Vec3,
    parts: Vec<BodyPart>,
}

impl BackgroundLayer {
    pub fn new(id: BodyId, parallax: Parallax, part: BodyPart) -> Self {
        Self {
            id,
            parallax,
            base_rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            parts: vec![part],
        }
    }

    pub fn with_rotation(mut self, base_rotation: Vec3, spin: Vec3) -> Self {
        self.base_rotation = base_rotation;
        self.spin = spin;
        self
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }
}

impl CelestialBody for BackgroundLayer {
    fn id(&self) -> BodyId {
        self.id
    }

    fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    fn parked(&self) -> BodyTransform {
        let (position, _) = self.parallax.evaluate(0.0);
        BodyTransform::parked(position, self.base_rotation)
    }

    fn update(&mut self, input: &FrameInput, _primary: Option<&BodyTransform>) -> BodyTransform {
        if !input.is_finite() {
            return self.parked();
        }
        let (position, scale) = self.parallax.evaluate(input.progress);
        BodyTransform::uniform(position, scale, self.base_rotation + self.spin * input.elapsed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarLayerSpec {
    pub count: usize,
    pub radius: f32,
    pub size: f32,
    pub size_sparse: f32,
    pub color: u32,
    pub speed: f32,
    pub depth: f32,
}

/// Far to near. The last layer only renders at full quality.
pub const STAR_LAYERS: [StarLayerSpec; 3] = [
    StarLayerSpec {
        count: 1200,
        radius: 200.0,
        size: 0.3,
        size_sparse: 0.4,
        color: 0xffffff,
        speed: 0.03,
        depth: 100.0,
    },
    StarLayerSpec {
        count: 600,
        radius: 150.0,
        size: 0.5,
        size_sparse: 0.6,
        color: 0xf0f0ff,
        speed: 0.05,
        depth: 60.0,
    },
    StarLayerSpec {
        count: 250,
        radius: 100.0,
        size: 0.7,
        size_sparse: 0.7,
        color: 0xfffef0,
        speed: 0.07,
        depth: 30.0,
    },
];

pub fn star_layer(index: u8) -> Option<BackgroundLayer> {
    let spec = STAR_LAYERS.get(index as usize)?;
    let style = PointStyle::new(PointSizing::ViewportScaled, 0.85, 2.0);
    let part = BodyPart {
        geometry: GeometryRef::Cloud(CloudId::StarLayer(index)),
        shading: ShadingParams::points(hex_rgba(spec.color), style),
        local: PartLocal::scaled(1.0),
    };
    Some(
        BackgroundLayer::new(BodyId::StarLayer(index), Parallax::Drift { depth: spec.depth }, part)
            .with_rotation(
                Vec3::ZERO,
                Vec3::new(spec.speed * 0.002, spec.speed * 0.001, 0.0),
            ),
    )
}

const GALAXY_RECEDE: Parallax = Parallax::Recede {
    z_start: -30.0,
    z_end: -180.0,
    scale_start: 2.5,
    scale_end: 0.4,
};
const GALAXY_TILT: f32 = -0.7;

/// Core, dust and arms share the recession and tilt but turn at their own
/// rates.
pub fn galaxy_layers() -> [BackgroundLayer; 3] {
    let layer = |id, cloud, k, opacity, falloff, turn: f32| {
        let part = BodyPart {
            geometry: GeometryRef::Cloud(cloud),
            shading: ShadingParams::points(
                [1.0; 4],
                PointStyle::new(PointSizing::Perspective(k), opacity, falloff),
            ),
            local: PartLocal::scaled(1.0),
        };
        BackgroundLayer::new(id, GALAXY_RECEDE, part)
            .with_rotation(Vec3::new(GALAXY_TILT, 0.0, 0.0), Vec3::new(0.0, -turn, 0.0))
    };
    [
        layer(BodyId::GalaxyCore, CloudId::GalaxyCore, 550.0, 0.85, 4.0, 0.002),
        layer(BodyId::GalaxyDust, CloudId::GalaxyDust, 450.0, 0.3, 3.0, 0.003),
        layer(BodyId::GalaxyArms, CloudId::GalaxyArms, 400.0, 0.5, 5.0, 0.006),
    ]
}

pub fn nebula() -> BackgroundLayer {
    let style = PointStyle::new(PointSizing::Perspective(200.0), 0.15, 8.0).with_drift(0.2);
    let part = BodyPart {
        geometry: GeometryRef::Cloud(CloudId::Nebula),
        shading: ShadingParams::points([1.0; 4], style),
        local: PartLocal::scaled(1.0),
    };
    BackgroundLayer::new(
        BodyId::Nebula,
        Parallax::Push {
            offset: Vec3::new(0.0, 0.0, 10.0),
        },
        part,
    )
    .with_rotation(Vec3::ZERO, Vec3::new(0.0, 0.002, 0.0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeteorSpec {
    pub start: Vec3,
    pub speed: f32,
    pub size: f32,
    pub delay: f32,
}

pub const METEORS: [MeteorSpec; 5] = [
    MeteorSpec {
        start: Vec3::new(30.0, 20.0, -20.0),
        speed: 0.8,
        size: 0.4,
        delay: 0.0,
    },
    MeteorSpec {
        start: Vec3::new(25.0, 25.0, -15.0),
        speed: 1.2,
        size: 0.3,
        delay: 3.0,
    },
    MeteorSpec {
        start: Vec3::new(35.0, 15.0, -25.0),
        speed: 0.6,
        size: 0.5,
        delay: 6.0,
    },
    MeteorSpec {
        start: Vec3::new(20.0, 30.0, -18.0),
        speed: 1.0,
        size: 0.25,
        delay: 9.0,
    },
    MeteorSpec {
        start: Vec3::new(40.0, 10.0, -22.0),
        speed: 0.9,
        size: 0.35,
        delay: 12.0,
    },
];

/// Tumbling rock falling diagonally on a fixed period, gated to the middle
/// of the page.
#[derive(Clone, Debug)]
pub struct Meteor {
    index: u8,
    spec: MeteorSpec,
    parts: Vec<BodyPart>,
}

impl Meteor {
    pub fn new(index: u8, spec: MeteorSpec) -> Self {
        let rock = BodyPart {
            geometry: GeometryRef::MeteorRock(index),
            shading: ShadingParams::surface(Surface::Rock)
                .with_tint(hex_rgba(0x8b4513))
                .with_emissive(0.2),
            local: PartLocal::scaled(spec.size),
        };
        let core = BodyPart {
            geometry: GeometryRef::MeteorCore,
            shading: ShadingParams::glow([1.0, 0.4, 0.0, 0.5], BlendMode::Alpha),
            local: PartLocal::scaled(spec.size * 0.7),
        };
        let trail_style =
            PointStyle::new(PointSizing::ViewportScaled, 0.6, 2.0).with_size_scale(spec.size * 0.8);
        let trail = BodyPart {
            geometry: GeometryRef::Cloud(CloudId::MeteorTrail),
            shading: ShadingParams::points(hex_rgba(0xff9900), trail_style),
            local: PartLocal::scaled(1.0).with_offset(Vec3::new(spec.size, -spec.size, 0.0)),
        };
        Self {
            index,
            spec,
            parts: vec![rock, core, trail],
        }
    }

    pub fn spec(&self) -> &MeteorSpec {
        &self.spec
    }

    /// Position along the fall cycle at `elapsed` seconds.
    pub fn position_at(&self, elapsed: f32) -> Vec3 {
        let t = ((elapsed + self.spec.delay) * self.spec.speed).rem_euclid(METEOR_PERIOD);
        self.spec.start + Vec3::new(-t * 3.0, -t * 3.0, t.sin() * 2.0)
    }
}

pub fn meteor_gate_open(progress: f32) -> bool {
    progress > METEOR_GATE.0 && progress < METEOR_GATE.1
}

impl CelestialBody for Meteor {
    fn id(&self) -> BodyId {
        BodyId::Meteor(self.index)
    }

    fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    fn parked(&self) -> BodyTransform {
        BodyTransform::parked(self.spec.start, Vec3::ZERO)
    }

    fn update(&mut self, input: &FrameInput, _primary: Option<&BodyTransform>) -> BodyTransform {
        if !input.is_finite() {
            return self.parked();
        }
        let rotation = Vec3::new(2.0, 1.5, 0.0) * input.elapsed;
        if !meteor_gate_open(input.progress) {
            return BodyTransform::parked(self.spec.start, rotation);
        }
        BodyTransform::uniform(self.position_at(input.elapsed), 1.0, rotation)
    }
}

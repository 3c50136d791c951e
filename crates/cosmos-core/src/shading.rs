//! Opaque geometry and shading descriptors handed to the renderer.
//!
//! The core never touches GPU resources: it names a geometry and a small set
//! of driving parameters, and the renderer maps them onto buffers and
//! pipelines.

/// Procedural point layers generated once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudId {
    GalaxyCore,
    GalaxyDust,
    GalaxyArms,
    Nebula,
    StarLayer(u8),
    MeteorTrail,
    /// Streamed every frame from the exhaust simulation.
    Flame,
    /// Streamed every frame from the exhaust simulation.
    Smoke,
}

impl CloudId {
    pub fn is_streamed(self) -> bool {
        matches!(self, CloudId::Flame | CloudId::Smoke)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryRef {
    /// Unit sphere at full body resolution.
    Sphere,
    /// Unit sphere at the cheaper shell resolution (clouds, atmospheres).
    Shell,
    /// Flat annulus in the XY plane, outer radius 1.
    SaturnRing,
    RocketHull,
    RocketFlame,
    MeteorRock(u8),
    MeteorCore,
    Cloud(CloudId),
}

/// Selects the procedural surface in the mesh shader.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Lit with vertex colors only.
    Lit = 0,
    /// Unlit vertex colors times tint.
    Glow = 1,
    Earth = 2,
    Clouds = 3,
    Atmosphere = 4,
    Moon = 5,
    Mars = 6,
    Jupiter = 7,
    Saturn = 8,
    SaturnRing = 9,
    Rock = 10,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    Alpha,
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointSizing {
    /// Point size in pixels is `size * k / depth`.
    Perspective(f32),
    /// Point size in pixels is `size * (viewport_height / 2) / depth`.
    ViewportScaled,
}

impl PointSizing {
    /// Sprite edge length in world units for a vertex `size`, so that a
    /// camera-facing quad covers the same pixels as the sized point.
    pub fn world_size(self, size: f32, fovy_radians: f32, viewport_height_px: f32) -> f32 {
        let half_fov = (fovy_radians * 0.5).tan();
        match self {
            PointSizing::Perspective(k) => {
                size * k * 2.0 * half_fov / viewport_height_px.max(1.0)
            }
            PointSizing::ViewportScaled => size * half_fov,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointStyle {
    pub sizing: PointSizing,
    pub opacity: f32,
    /// Gaussian falloff `exp(-r² * falloff)` across the sprite.
    pub falloff: f32,
    /// Time-driven positional drift amplitude.
    pub drift: f32,
    /// Multiplies every vertex size of the cloud.
    pub size_scale: f32,
}

impl PointStyle {
    pub fn new(sizing: PointSizing, opacity: f32, falloff: f32) -> Self {
        Self {
            sizing,
            opacity,
            falloff,
            drift: 0.0,
            size_scale: 1.0,
        }
    }

    pub fn with_drift(mut self, drift: f32) -> Self {
        self.drift = drift;
        self
    }

    pub fn with_size_scale(mut self, size_scale: f32) -> Self {
        self.size_scale = size_scale;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingParams {
    pub surface: Surface,
    pub tint: [f32; 4],
    pub emissive: f32,
    pub blend: BlendMode,
    pub points: Option<PointStyle>,
}

impl ShadingParams {
    pub fn surface(surface: Surface) -> Self {
        Self {
            surface,
            tint: [1.0; 4],
            emissive: 0.0,
            blend: BlendMode::Opaque,
            points: None,
        }
    }

    pub fn glow(tint: [f32; 4], blend: BlendMode) -> Self {
        Self {
            surface: Surface::Glow,
            tint,
            emissive: 1.0,
            blend,
            points: None,
        }
    }

    pub fn points(tint: [f32; 4], style: PointStyle) -> Self {
        Self {
            surface: Surface::Glow,
            tint,
            emissive: 1.0,
            blend: BlendMode::Additive,
            points: Some(style),
        }
    }

    pub fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }
}

/// `0xrrggbb` as 0..1 floats with alpha 1.
pub fn hex_rgba(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

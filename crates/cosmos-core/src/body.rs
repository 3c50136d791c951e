//! Scroll-windowed scene bodies.
//!
//! Every planet and the rocket is described by a [`BodySpec`]: a timeline
//! window, which scroll value it follows, a path shape and a scale curve.
//! [`WindowedBody`] evaluates any spec; there is no per-body control flow.

use crate::shading::{GeometryRef, ShadingParams};
use crate::smoothing::SmoothedScroll;
use crate::state::FrameInput;
use crate::timeline::{quintic_smoothstep, TimelineSample, TimelineWindow};
use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyId {
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Rocket,
    GalaxyCore,
    GalaxyDust,
    GalaxyArms,
    Nebula,
    StarLayer(u8),
    Meteor(u8),
}

/// Position, scale and XYZ Euler rotation of one body for one frame.
/// Zero scale means the body is not drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
}

impl Default for BodyTransform {
    fn default() -> Self {
        Self::hidden()
    }
}

impl BodyTransform {
    pub fn hidden() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn parked(at: Vec3, rotation: Vec3) -> Self {
        Self {
            position: at,
            scale: Vec3::ZERO,
            rotation,
        }
    }

    pub fn uniform(position: Vec3, scale: f32, rotation: Vec3) -> Self {
        Self {
            position,
            scale: Vec3::splat(scale.max(0.0)),
            rotation,
        }
    }

    #[inline]
    pub fn is_rendered(&self) -> bool {
        self.scale.max_element() > 0.0
    }

    #[inline]
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }
}

/// Placement of a mesh or point layer inside its body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartLocal {
    pub offset: Vec3,
    pub scale: f32,
    pub rotation: Vec3,
    /// Extra radians per second on top of the body's own spin.
    pub spin: Vec3,
}

impl PartLocal {
    pub fn scaled(scale: f32) -> Self {
        Self {
            offset: Vec3::ZERO,
            scale,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }

    pub fn matrix(&self, elapsed: f32) -> Mat4 {
        let r = self.rotation + self.spin * elapsed;
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.offset,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPart {
    pub geometry: GeometryRef,
    pub shading: ShadingParams,
    pub local: PartLocal,
}

/// Anything the composition places each tick.
pub trait CelestialBody {
    fn id(&self) -> BodyId;
    fn parts(&self) -> &[BodyPart];

    /// Body whose transform must be evaluated first and passed to `update`.
    fn primary(&self) -> Option<BodyId> {
        None
    }

    fn update(&mut self, input: &FrameInput, primary: Option<&BodyTransform>) -> BodyTransform;

    /// Off-stage transform used when a tick cannot be evaluated.
    fn parked(&self) -> BodyTransform {
        BodyTransform::hidden()
    }

    /// False while an internal smoother is still moving toward `progress`.
    fn is_settled(&self, _progress: f32) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollSource {
    Raw,
    /// Own exponential smoother with the given lerp factor.
    Smoothed(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleCurve {
    /// Full size from the first frame of entry, shrinking with the eased exit.
    Pop,
    /// Grows with the eased entry, shrinks with the eased exit.
    Grow,
    /// Raw entry times raw exit complement.
    Linear,
    /// Eased entry, quadratic fade on the raw exit.
    FadeQuadratic,
}

impl ScaleCurve {
    pub fn factor(self, s: &TimelineSample) -> f32 {
        match self {
            ScaleCurve::Pop => {
                if s.entry_raw > 0.0 {
                    1.0 - s.exit
                } else {
                    0.0
                }
            }
            ScaleCurve::Grow => s.entry * (1.0 - s.exit),
            ScaleCurve::Linear => s.entry_raw.min(1.0) * (1.0 - s.exit_raw),
            ScaleCurve::FadeQuadratic => {
                let keep = 1.0 - s.exit_raw;
                s.entry * keep * keep
            }
        }
    }
}

/// `amp * sin(rate * t + phase)` per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wobble {
    pub amp: Vec3,
    pub rate: Vec3,
    pub phase: Vec3,
}

impl Wobble {
    pub const NONE: Wobble = Wobble {
        amp: Vec3::ZERO,
        rate: Vec3::ZERO,
        phase: Vec3::ZERO,
    };

    pub fn sample(&self, t: f32) -> Vec3 {
        Vec3::new(
            self.amp.x * (self.rate.x * t + self.phase.x).sin(),
            self.amp.y * (self.rate.y * t + self.phase.y).sin(),
            self.amp.z * (self.rate.z * t + self.phase.z).sin(),
        )
    }
}

/// Circular orbit around the primary's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPath {
    pub primary: BodyId,
    pub radius: f32,
    pub rate: f32,
    pub bob_height: f32,
    pub bob_ratio: f32,
    pub depth_offset: f32,
}

impl OrbitPath {
    /// Offset from the primary; `reach` pulls the satellite in while it enters.
    pub fn offset(&self, elapsed: f32, reach: f32) -> Vec3 {
        let tau = elapsed * self.rate;
        Vec3::new(
            tau.cos() * self.radius * reach,
            (tau * self.bob_ratio).sin() * self.bob_height * reach,
            tau.sin() * self.radius * reach + self.depth_offset,
        )
    }
}

/// Scroll-driven travel over `[0, travel_end]` with a time wobble that
/// dies out as the travel completes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightPath {
    pub travel_end: f32,
    pub start: Vec3,
    pub travel: Vec3,
    pub wobble: Wobble,
    pub tilt_start: Vec3,
    pub tilt_travel: Vec3,
    pub tilt_wobble: Wobble,
}

impl FlightPath {
    pub fn travel_amount(&self, progress: f32) -> f32 {
        if self.travel_end <= 0.0 {
            return 1.0;
        }
        quintic_smoothstep((progress / self.travel_end).min(1.0))
    }

    /// Returns (position, tilt).
    pub fn evaluate(&self, progress: f32, elapsed: f32) -> (Vec3, Vec3) {
        let travel = self.travel_amount(progress);
        let damp = 1.0 - travel;
        let position = self.start + self.travel * travel + self.wobble.sample(elapsed) * damp;
        let tilt = self.tilt_start + self.tilt_travel * travel + self.tilt_wobble.sample(elapsed) * damp;
        (position, tilt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathShape {
    /// `start + slide * entry + exit_drift * exit` on the eased amounts.
    Slide {
        start: Vec3,
        slide: Vec3,
        exit_drift: Vec3,
    },
    Orbit(OrbitPath),
    Flight(FlightPath),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodySpec {
    pub id: BodyId,
    pub window: TimelineWindow,
    pub source: ScrollSource,
    pub path: PathShape,
    pub parked_at: Vec3,
    pub scale: f32,
    pub scale_curve: ScaleCurve,
    pub base_rotation: Vec3,
    pub spin: Vec3,
    pub parts: Vec<BodyPart>,
}

/// Generic evaluator for any [`BodySpec`].
#[derive(Clone, Debug)]
pub struct WindowedBody {
    spec: BodySpec,
    smoother: Option<SmoothedScroll>,
}

impl WindowedBody {
    pub fn new(spec: BodySpec) -> Self {
        let smoother = match spec.source {
            ScrollSource::Raw => None,
            ScrollSource::Smoothed(lerp) => Some(SmoothedScroll::new(0.0, lerp)),
        };
        Self { spec, smoother }
    }

    pub fn spec(&self) -> &BodySpec {
        &self.spec
    }

    pub fn window(&self) -> &TimelineWindow {
        &self.spec.window
    }

    pub(crate) fn set_window(&mut self, window: TimelineWindow) {
        self.spec.window = window;
    }

    /// Progress this body follows after its own smoothing, if any.
    pub fn followed_progress(&self, raw: f32) -> f32 {
        self.smoother.map_or(raw, |s| s.value())
    }

    fn rotation(&self, elapsed: f32) -> Vec3 {
        if !elapsed.is_finite() {
            return self.spec.base_rotation;
        }
        self.spec.base_rotation + self.spec.spin * elapsed
    }
}

impl CelestialBody for WindowedBody {
    fn id(&self) -> BodyId {
        self.spec.id
    }

    fn parts(&self) -> &[BodyPart] {
        &self.spec.parts
    }

    fn primary(&self) -> Option<BodyId> {
        match self.spec.path {
            PathShape::Orbit(orbit) => Some(orbit.primary),
            _ => None,
        }
    }

    fn parked(&self) -> BodyTransform {
        BodyTransform::parked(self.spec.parked_at, self.spec.base_rotation)
    }

    fn update(&mut self, input: &FrameInput, primary: Option<&BodyTransform>) -> BodyTransform {
        let progress = match self.smoother.as_mut() {
            Some(smoother) => smoother.tick(input.progress),
            None => input.progress,
        };
        let rotation = self.rotation(input.elapsed);
        let sample = self.spec.window.sample(progress);
        if !sample.visible() || !input.elapsed.is_finite() {
            return BodyTransform::parked(self.spec.parked_at, rotation);
        }
        let scale = self.spec.scale * self.spec.scale_curve.factor(&sample);
        match self.spec.path {
            PathShape::Slide {
                start,
                slide,
                exit_drift,
            } => {
                let position = start + slide * sample.entry + exit_drift * sample.exit;
                BodyTransform::uniform(position, scale, rotation)
            }
            PathShape::Orbit(orbit) => {
                let anchor = primary.map_or(Vec3::ZERO, |p| p.position);
                let reach = sample.entry_raw.min(1.0);
                let position = anchor + orbit.offset(input.elapsed, reach);
                BodyTransform::uniform(position, scale, rotation)
            }
            PathShape::Flight(flight) => {
                let (position, tilt) = flight.evaluate(progress, input.elapsed);
                BodyTransform::uniform(position, scale, rotation + tilt)
            }
        }
    }

    fn is_settled(&self, progress: f32) -> bool {
        self.smoother
            .map_or(true, |s| s.is_settled(progress, crate::constants::CONVERGENCE_EPSILON))
    }
}

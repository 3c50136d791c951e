//! Composition of every body into one per-tick frame.
//!
//! [`SceneComposition::update`] is a pure function of the registered bodies
//! and the [`FrameInput`]; the renderer only ever sees the resulting
//! [`SceneFrame`] through [`SceneRenderer`].

use crate::background::{galaxy_layers, nebula, star_layer, Meteor, METEORS};
use crate::body::{BodyId, BodySpec, BodyTransform, CelestialBody, WindowedBody};
use crate::catalog::windowed_bodies;
use crate::constants::CLOUD_SEED;
use crate::particles::{ExhaustPlume, PointVertex};
use crate::shading::{CloudId, GeometryRef, ShadingParams};
use crate::state::FrameInput;
use crate::viewport::QualitySettings;
use glam::Mat4;
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("{body:?} orbits {primary:?}, which is not registered")]
    MissingPrimary { body: BodyId, primary: BodyId },
    #[error("{0:?} registered twice")]
    DuplicateBody(BodyId),
}

/// Consumer of composed frames. Geometry and shading are opaque ids here;
/// buffers and pipelines belong to the implementor.
pub trait SceneRenderer {
    type Error;

    fn begin_frame(&mut self, input: &FrameInput);

    /// Replace the vertices of a streamed cloud for this frame.
    fn stream_points(&mut self, _cloud: CloudId, _points: &[PointVertex]) {}

    fn submit_body(&mut self, geometry: GeometryRef, shading: &ShadingParams, model: &Mat4);

    fn finish_frame(&mut self) -> Result<(), Self::Error>;
}

/// One drawable part of one body for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    pub body: BodyId,
    pub geometry: GeometryRef,
    pub shading: ShadingParams,
    pub transform: BodyTransform,
    pub model: Mat4,
}

impl RenderItem {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.transform.is_rendered() && self.model.is_finite()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneFrame {
    items: SmallVec<[RenderItem; 32]>,
}

impl SceneFrame {
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn visible(&self) -> impl Iterator<Item = &RenderItem> {
        self.items.iter().filter(|item| item.is_visible())
    }

    pub fn of(&self, body: BodyId) -> impl Iterator<Item = &RenderItem> {
        self.items.iter().filter(move |item| item.body == body)
    }
}

pub struct SceneComposition {
    quality: QualitySettings,
    // Primaries always precede their satellites.
    bodies: Vec<Box<dyn CelestialBody>>,
    primaries: Vec<Option<usize>>,
    transforms: Vec<BodyTransform>,
    plume: ExhaustPlume,
    input: FrameInput,
    frame: SceneFrame,
}

impl SceneComposition {
    /// The full scene for the given quality.
    pub fn new(quality: &QualitySettings) -> Result<Self, SceneError> {
        Self::with_bodies(windowed_bodies(quality), quality)
    }

    /// Backgrounds and meteorites for `quality` plus the given windowed
    /// bodies. Invalid windows are clamped with a warning.
    pub fn with_bodies(specs: Vec<BodySpec>, quality: &QualitySettings) -> Result<Self, SceneError> {
        let mut registered: Vec<Box<dyn CelestialBody>> = Vec::new();
        for layer in galaxy_layers() {
            registered.push(Box::new(layer));
        }
        if quality.nebula {
            registered.push(Box::new(nebula()));
        }
        let star_layers = if quality.deep_star_layer { 3 } else { 2 };
        for index in 0..star_layers {
            if let Some(layer) = star_layer(index) {
                registered.push(Box::new(layer));
            }
        }
        for (index, spec) in METEORS.iter().enumerate() {
            registered.push(Box::new(Meteor::new(index as u8, *spec)));
        }
        for spec in specs {
            let mut body = WindowedBody::new(spec);
            if let Err(e) = body.window().validate() {
                log::warn!("[scene] {:?}: {}, clamping window", body.id(), e);
                let clamped = body.window().sanitized();
                body.set_window(clamped);
            }
            registered.push(Box::new(body));
        }

        let (bodies, primaries) = order_by_primary(registered)?;
        log::info!(
            "[scene] composed {} bodies ({} parts)",
            bodies.len(),
            bodies.iter().map(|b| b.parts().len()).sum::<usize>()
        );
        let transforms = vec![BodyTransform::hidden(); bodies.len()];
        Ok(Self {
            quality: *quality,
            bodies,
            primaries,
            transforms,
            plume: ExhaustPlume::new(CLOUD_SEED ^ 0xF1A3),
            input: FrameInput::default(),
            frame: SceneFrame::default(),
        })
    }

    pub fn quality(&self) -> &QualitySettings {
        &self.quality
    }

    pub fn body_ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies.iter().map(|b| b.id())
    }

    pub fn transform_of(&self, id: BodyId) -> Option<BodyTransform> {
        let index = self.bodies.iter().position(|b| b.id() == id)?;
        self.transforms.get(index).copied()
    }

    pub fn frame(&self) -> &SceneFrame {
        &self.frame
    }

    pub fn plume(&self) -> &ExhaustPlume {
        &self.plume
    }

    /// Evaluate every body for this tick. Non-finite input parks every body
    /// off-stage for the tick without disturbing any body's smoothing.
    pub fn update(&mut self, input: &FrameInput) -> &SceneFrame {
        self.input = *input;
        self.frame.items.clear();
        let finite = input.is_finite();
        if finite {
            self.plume.step(input.delta);
        }
        for index in 0..self.bodies.len() {
            let transform = if finite {
                let primary = self.primaries[index].map(|p| self.transforms[p]);
                self.bodies[index].update(input, primary.as_ref())
            } else {
                self.bodies[index].parked()
            };
            self.transforms[index] = transform;

            let body = &self.bodies[index];
            let body_model = transform.model_matrix();
            let elapsed = if finite { input.elapsed } else { 0.0 };
            for part in body.parts() {
                self.frame.items.push(RenderItem {
                    body: body.id(),
                    geometry: part.geometry,
                    shading: part.shading,
                    transform,
                    model: body_model * part.local.matrix(elapsed),
                });
            }
        }
        &self.frame
    }

    /// Forward the last composed frame. Parked items are skipped.
    pub fn submit<R: SceneRenderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.begin_frame(&self.input);
        renderer.stream_points(CloudId::Flame, self.plume.flame());
        renderer.stream_points(CloudId::Smoke, self.plume.smoke());
        for item in self.frame.visible() {
            renderer.submit_body(item.geometry, &item.shading, &item.model);
        }
        renderer.finish_frame()
    }

    /// True once every body-level smoother has reached `progress`.
    pub fn is_settled(&self, progress: f32) -> bool {
        self.bodies.iter().all(|b| b.is_settled(progress))
    }
}

type Ordered = (Vec<Box<dyn CelestialBody>>, Vec<Option<usize>>);

fn order_by_primary(mut pending: Vec<Box<dyn CelestialBody>>) -> Result<Ordered, SceneError> {
    let mut seen: Vec<BodyId> = Vec::with_capacity(pending.len());
    for body in &pending {
        if seen.contains(&body.id()) {
            return Err(SceneError::DuplicateBody(body.id()));
        }
        seen.push(body.id());
    }

    let mut ordered: Vec<Box<dyn CelestialBody>> = Vec::with_capacity(pending.len());
    let mut primaries = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let ready = pending.iter().position(|body| match body.primary() {
            None => true,
            Some(p) => ordered.iter().any(|o| o.id() == p),
        });
        let Some(next) = ready else {
            let body = &pending[0];
            let primary = body.primary().unwrap_or(body.id());
            return Err(SceneError::MissingPrimary {
                body: body.id(),
                primary,
            });
        };
        let body = pending.remove(next);
        primaries.push(
            body.primary()
                .and_then(|p| ordered.iter().position(|o| o.id() == p)),
        );
        ordered.push(body);
    }
    Ok((ordered, primaries))
}

pub mod background;
pub mod body;
pub mod catalog;
pub mod constants;
pub mod geometry;
pub mod particles;
pub mod scene;
pub mod scheduler;
pub mod scroll;
pub mod shading;
pub mod smoothing;
pub mod state;
pub mod timeline;
pub mod viewport;

/// Lit instanced-sphere preview shader shared by the native viewer.
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use body::{BodyId, BodyTransform, CelestialBody};
pub use scene::{RenderItem, SceneComposition, SceneError, SceneFrame, SceneRenderer};
pub use scheduler::{FrameMode, RenderScheduler};
pub use scroll::{ScrollHost, ScrollTracker};
pub use shading::{BlendMode, CloudId, GeometryRef, ShadingParams, Surface};
pub use state::{Camera, FrameInput, SceneState};
pub use timeline::{TimelineError, TimelineSample, TimelineWindow};
pub use viewport::{QualitySettings, ViewportProfile, ViewportSignal};

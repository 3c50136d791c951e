//! Scene-side state shared by the frontends.
//!
//! These types avoid platform APIs so they can be driven from the DOM on the
//! web and from a virtual page on native. `SceneState` has a single writer
//! (the scroll tracker); everything else reads it through [`FrameInput`].

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, DEFAULT_SECTION};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// The fixed scene camera looking down -Z from the configured position.
    pub fn scene(aspect: f32) -> Self {
        let eye = crate::constants::camera_position_vec3();
        Self {
            eye,
            target: eye - Vec3::Z,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// One scroll measurement. Progress may go backwards between samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSample {
    pub progress: f32,
    pub raw_pixel_offset: f64,
    pub captured_at_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    scroll_progress: f32,
    active_section: &'static str,
    pub menu_open: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            scroll_progress: 0.0,
            active_section: DEFAULT_SECTION,
            menu_open: false,
        }
    }
}

impl SceneState {
    #[inline]
    pub fn scroll_progress(&self) -> f32 {
        self.scroll_progress
    }

    #[inline]
    pub fn active_section(&self) -> &'static str {
        self.active_section
    }

    /// Store a sample's progress, clamped into \[0, 1\]. Non-finite values
    /// are dropped.
    pub fn apply_sample(&mut self, sample: &ScrollSample) {
        if sample.progress.is_finite() {
            self.scroll_progress = sample.progress.clamp(0.0, 1.0);
        }
    }

    /// Returns true when the id actually changed.
    pub fn set_active_section(&mut self, id: &'static str) -> bool {
        if self.active_section == id {
            return false;
        }
        self.active_section = id;
        true
    }
}

/// Per-tick context handed to every body update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Raw scroll progress in \[0, 1\].
    pub progress: f32,
    /// Seconds since the scene started.
    pub elapsed: f32,
    /// Seconds since the previous tick.
    pub delta: f32,
}

impl FrameInput {
    pub fn new(progress: f32, elapsed: f32, delta: f32) -> Self {
        Self {
            progress,
            elapsed,
            delta,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.progress.is_finite() && self.elapsed.is_finite()
    }
}

use glam::Vec3;

// Shared scene tuning constants used by both web and native frontends.

// Scroll smoothing
pub const SCHEDULER_LERP_FACTOR: f32 = 0.08; // frame invalidator smoothing per tick
pub const PLANET_LERP_FACTOR: f32 = 0.06; // per-body smoothing for the outer planets
pub const CONVERGENCE_EPSILON: f32 = 1e-4; // below this the scheduler goes idle

// Viewport classification
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
pub const SCROLL_THROTTLE_MS_FULL: f64 = 16.0;
pub const SCROLL_THROTTLE_MS_CONSTRAINED: f64 = 32.0;

// Page sections in document order
pub const SECTION_IDS: [&str; 8] = [
    "hero",
    "about",
    "experience",
    "education",
    "projects",
    "services",
    "skills",
    "contact",
];
pub const DEFAULT_SECTION: &str = "hero";

// Camera
pub const CAMERA_POSITION: [f32; 3] = [0.0, 0.0, 25.0];
pub const CAMERA_FOV_DEG: f32 = 70.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 500.0;

// Lighting and background
pub const BACKGROUND_RGB: [f32; 3] = [0.012, 0.012, 0.031]; // #030308
pub const AMBIENT_INTENSITY: f32 = 0.15;
pub const KEY_LIGHT_POSITION: [f32; 3] = [15.0, 10.0, 10.0];
pub const KEY_LIGHT_INTENSITY: f32 = 0.8;
pub const RIM_LIGHT_POSITION: [f32; 3] = [-20.0, -15.0, -20.0];
pub const RIM_LIGHT_INTENSITY: f32 = 0.3;
pub const RIM_LIGHT_RGB: [f32; 3] = [0.267, 0.4, 0.667]; // #4466aa

// Post-processing
pub const BLOOM_STRENGTH: f32 = 0.3;
pub const BLOOM_THRESHOLD: f32 = 0.3;
pub const VIGNETTE_OFFSET: f32 = 0.4;
pub const VIGNETTE_DARKNESS: f32 = 0.6;

// Meteorites are only on stage between these progress values (exclusive)
pub const METEOR_GATE: (f32, f32) = (0.1, 0.9);
pub const METEOR_PERIOD: f32 = 30.0;

// Point cloud seed; every layer derives its own stream from it
pub const CLOUD_SEED: u64 = 0x5eed_c05a_0000_0001;

#[inline]
pub fn camera_position_vec3() -> Vec3 {
    Vec3::from_array(CAMERA_POSITION)
}

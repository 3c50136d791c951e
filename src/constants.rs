/// Web front-end tuning constants.
///
/// Scene tuning shared with the native preview lives in
/// `cosmos_core::constants`; this file only covers the page integration and
/// the WebGPU renderer.
// DOM hooks the page layer provides and reads
pub const CANVAS_ID: &str = "space-canvas";
pub const FALLBACK_CLASS: &str = "scene-fallback";
pub const PROGRESS_CSS_VAR: &str = "--scroll-progress";
pub const ACTIVE_SECTION_ATTR: &str = "data-active-section";
pub const COARSE_POINTER_QUERY: &str = "(pointer: coarse)";

// Frame pacing
pub const MAX_FRAME_DELTA_SEC: f32 = 0.1; // cap after idle periods and tab switches
pub const SLOW_FRAME_WARN_INTERVAL_MS: f64 = 2000.0; // at most one budget warning per interval

// Renderer
pub const MSAA_SAMPLES: u32 = 4;
pub const INITIAL_DRAW_CAPACITY: usize = 64;
pub const DRAW_UNIFORM_STRIDE: usize = 256; // dynamic uniform offset alignment
pub const BLOOM_BLUR_RADIUS_PX: f32 = 1.5;

// Progress is published with this many decimals
pub const PROGRESS_DECIMALS: usize = 4;

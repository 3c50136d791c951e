// Host-side tests for the web front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn dom_hooks_are_well_formed() {
    assert!(!CANVAS_ID.is_empty() && !CANVAS_ID.contains(' '));
    assert!(!FALLBACK_CLASS.contains(' '));
    // Custom properties must start with two dashes
    assert!(PROGRESS_CSS_VAR.starts_with("--"));
    assert!(ACTIVE_SECTION_ATTR.starts_with("data-"));
    assert!(COARSE_POINTER_QUERY.starts_with('(') && COARSE_POINTER_QUERY.ends_with(')'));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn pacing_limits_are_positive() {
    assert!(MAX_FRAME_DELTA_SEC > 0.0 && MAX_FRAME_DELTA_SEC <= 0.25);
    assert!(SLOW_FRAME_WARN_INTERVAL_MS >= 1000.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn renderer_limits_match_webgpu_requirements() {
    // WebGPU only guarantees 1 and 4 samples
    assert!(MSAA_SAMPLES == 1 || MSAA_SAMPLES == 4);
    // minUniformBufferOffsetAlignment default
    assert_eq!(DRAW_UNIFORM_STRIDE % 256, 0);
    assert!(INITIAL_DRAW_CAPACITY > 0);
    assert!(BLOOM_BLUR_RADIUS_PX > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn progress_precision_is_sub_percent() {
    assert!(PROGRESS_DECIMALS >= 3);
}

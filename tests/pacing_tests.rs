// Host-side tests for frame pacing and progress formatting.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod pacing {
    include!("../src/pacing.rs");
}

use constants::{MAX_FRAME_DELTA_SEC, SLOW_FRAME_WARN_INTERVAL_MS};
use pacing::*;

#[test]
fn first_tick_starts_the_clock_at_zero() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.tick(12_345.0), (0.0, 0.0));
}

#[test]
fn clock_reports_elapsed_and_delta() {
    let mut clock = FrameClock::default();
    clock.tick(1000.0);
    let (elapsed, delta) = clock.tick(1016.0);
    assert!((elapsed - 0.016).abs() < 1e-6);
    assert!((delta - 0.016).abs() < 1e-6);
}

#[test]
fn delta_is_capped_after_idle_periods() {
    let mut clock = FrameClock::default();
    clock.tick(0.0);
    let (elapsed, delta) = clock.tick(5000.0);
    // Elapsed keeps wall-clock time, only the step is capped
    assert!((elapsed - 5.0).abs() < 1e-6);
    assert_eq!(delta, MAX_FRAME_DELTA_SEC);
}

#[test]
fn clock_ignores_backwards_and_non_finite_timestamps() {
    let mut clock = FrameClock::default();
    clock.tick(100.0);
    clock.tick(200.0);
    let (_, delta) = clock.tick(150.0);
    assert_eq!(delta, 0.0);

    let (elapsed, delta) = clock.tick(f64::NAN);
    assert_eq!(delta, 0.0);
    assert!((elapsed - 0.1).abs() < 1e-6);

    let (elapsed, _) = clock.tick(f64::INFINITY);
    assert!(elapsed.is_finite());
}

#[test]
fn frames_within_budget_never_warn() {
    let mut monitor = BudgetMonitor::new(16.0);
    for i in 0..100 {
        assert_eq!(monitor.record(10.0, i as f64 * 16.0), None);
    }
    assert_eq!(monitor.record(16.0, 2000.0), None);
}

#[test]
fn first_slow_frame_warns_immediately() {
    let mut monitor = BudgetMonitor::new(33.0);
    assert_eq!(monitor.record(50.0, 0.0), Some(1));
}

#[test]
fn warnings_are_rate_limited_and_count_slow_frames() {
    let mut monitor = BudgetMonitor::new(16.0);
    assert_eq!(monitor.record(40.0, 0.0), Some(1));
    assert_eq!(monitor.record(40.0, 100.0), None);
    assert_eq!(monitor.record(40.0, 200.0), None);
    assert_eq!(monitor.record(10.0, 300.0), None);
    assert_eq!(
        monitor.record(40.0, SLOW_FRAME_WARN_INTERVAL_MS),
        Some(3)
    );
}

#[test]
fn budget_follows_the_profile() {
    let mut monitor = BudgetMonitor::new(16.0);
    monitor.set_budget_ms(33.0);
    assert_eq!(monitor.budget_ms(), 33.0);
    assert_eq!(monitor.record(20.0, 0.0), None);
}

#[test]
fn non_finite_frame_times_are_ignored() {
    let mut monitor = BudgetMonitor::new(16.0);
    assert_eq!(monitor.record(f64::NAN, 0.0), None);
    assert_eq!(monitor.record(f64::INFINITY, 0.0), None);
}

#[test]
fn progress_is_formatted_with_fixed_decimals() {
    assert_eq!(format_progress(0.0), "0.0000");
    assert_eq!(format_progress(0.5), "0.5000");
    assert_eq!(format_progress(1.0), "1.0000");
    assert_eq!(format_progress(0.12345), "0.1235");
}

#[test]
fn progress_formatting_clamps_bad_input() {
    assert_eq!(format_progress(-0.2), "0.0000");
    assert_eq!(format_progress(3.0), "1.0000");
    assert_eq!(format_progress(f32::NAN), "0.0000");
}

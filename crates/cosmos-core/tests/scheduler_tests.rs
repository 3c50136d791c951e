use cosmos_core::constants::{CONVERGENCE_EPSILON, SCHEDULER_LERP_FACTOR};
use cosmos_core::scheduler::{FrameMode, RenderScheduler};
use cosmos_core::smoothing::SmoothedScroll;

#[test]
fn smoothing_follows_the_exponential_curve() {
    let mut s = SmoothedScroll::new(0.0, SCHEDULER_LERP_FACTOR);
    for n in 1..=60 {
        s.tick(1.0);
        let expected = 1.0 - (1.0 - SCHEDULER_LERP_FACTOR as f64).powi(n);
        assert!(
            (s.value() as f64 - expected).abs() < 1e-4,
            "tick {n}: {} vs {expected}",
            s.value()
        );
    }
}

#[test]
fn smoothing_never_overshoots() {
    let mut s = SmoothedScroll::new(0.0, 0.06);
    let mut previous = s.value();
    for _ in 0..500 {
        let v = s.tick(1.0);
        assert!(v >= previous && v <= 1.0);
        previous = v;
    }
    assert!(s.is_settled(1.0, CONVERGENCE_EPSILON));
}

#[test]
fn smoothing_ignores_non_finite_targets() {
    let mut s = SmoothedScroll::new(0.4, 0.5);
    assert_eq!(s.tick(f32::NAN), 0.4);
    assert_eq!(s.tick(f32::INFINITY), 0.4);
    let bad = SmoothedScroll::new(f32::NAN, f32::NAN);
    assert_eq!(bad.value(), 0.0);
    assert_eq!(bad.lerp_factor(), 1.0);
}

#[test]
fn on_demand_goes_idle_after_convergence() {
    let mut scheduler = RenderScheduler::new(FrameMode::OnDemand, SCHEDULER_LERP_FACTOR);
    assert!(!scheduler.is_dirty());
    assert!(scheduler.set_target(1.0));

    let mut ticks = 0;
    while scheduler.tick() {
        ticks += 1;
        assert!(ticks < 1000, "scheduler never settled");
    }
    // |1 - 0.92^n| <= 1e-4 needs about 110 ticks
    assert!((100..130).contains(&ticks), "settled after {ticks} ticks");
    assert_eq!(scheduler.smoothed(), 1.0);
    assert!(!scheduler.is_dirty());

    // Further idle ticks keep requesting nothing
    assert!(!scheduler.tick());
    assert!(!scheduler.set_target(1.0));
}

#[test]
fn on_demand_resumes_when_the_target_moves() {
    let mut scheduler = RenderScheduler::new(FrameMode::OnDemand, SCHEDULER_LERP_FACTOR);
    scheduler.set_target(0.3);
    while scheduler.tick() {}
    assert!(scheduler.set_target(0.35));
    assert!(scheduler.tick());
    assert!(scheduler.smoothed() > 0.3 && scheduler.smoothed() < 0.35);
}

#[test]
fn continuous_always_requests_frames() {
    let mut scheduler = RenderScheduler::new(FrameMode::Continuous, SCHEDULER_LERP_FACTOR);
    assert!(scheduler.set_target(0.0));
    for _ in 0..200 {
        assert!(scheduler.tick());
    }
}

#[test]
fn non_finite_targets_do_not_wake_the_loop() {
    let mut scheduler = RenderScheduler::new(FrameMode::OnDemand, SCHEDULER_LERP_FACTOR);
    scheduler.set_target(0.5);
    assert!(!scheduler.set_target(f32::NAN));
    assert_eq!(scheduler.target(), 0.5);
}

#[test]
fn fast_scroll_is_still_catching_up_after_thirty_ticks() {
    let mut scheduler = RenderScheduler::new(FrameMode::OnDemand, SCHEDULER_LERP_FACTOR);
    scheduler.set_target(1.0);
    for _ in 0..30 {
        assert!(scheduler.tick());
    }
    let expected = 1.0 - 0.92f64.powi(30);
    assert!((scheduler.smoothed() as f64 - expected).abs() < 1e-3);
    assert!(scheduler.smoothed() < 1.0);
}

#[test]
fn custom_epsilon_settles_sooner() {
    let mut coarse = RenderScheduler::new(FrameMode::OnDemand, 0.5).with_epsilon(0.1);
    coarse.set_target(1.0);
    let mut ticks = 0;
    while coarse.tick() {
        ticks += 1;
    }
    // 0.5^4 = 0.0625 is the first distance within 0.1
    assert_eq!(ticks, 3);
    assert_eq!(coarse.smoothed(), 1.0);
}

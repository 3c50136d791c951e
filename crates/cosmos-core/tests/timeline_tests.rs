use cosmos_core::timeline::{quintic_smoothstep, TimelineError, TimelineSample, TimelineWindow};

fn earth_window() -> TimelineWindow {
    TimelineWindow::new(0.20, 0.25, 0.30, 0.36).unwrap()
}

fn grid(steps: usize) -> impl Iterator<Item = f32> {
    (0..=steps).map(move |i| i as f32 / steps as f32)
}

#[test]
fn smoothstep_endpoints_and_midpoint() {
    assert_eq!(quintic_smoothstep(0.0), 0.0);
    assert_eq!(quintic_smoothstep(1.0), 1.0);
    assert!((quintic_smoothstep(0.5) - 0.5).abs() < 1e-6);
    // Clamped outside the unit interval
    assert_eq!(quintic_smoothstep(-3.0), 0.0);
    assert_eq!(quintic_smoothstep(7.0), 1.0);
}

#[test]
fn smoothstep_is_flat_at_both_ends() {
    let h = 1e-3;
    let start_slope = (quintic_smoothstep(h) - quintic_smoothstep(0.0)) / h;
    let end_slope = (quintic_smoothstep(1.0) - quintic_smoothstep(1.0 - h)) / h;
    assert!(start_slope < 1e-3, "slope at 0 was {start_slope}");
    assert!(end_slope < 1e-3, "slope at 1 was {end_slope}");
}

#[test]
fn amounts_are_bounded_and_monotonic() {
    let window = earth_window();
    let mut previous = window.sample(0.0);
    for t in grid(10_000) {
        let s = window.sample(t);
        for v in [s.entry_raw, s.exit_raw, s.entry, s.exit] {
            assert!((0.0..=1.0).contains(&v), "amount {v} out of range at t={t}");
        }
        assert!(s.entry >= previous.entry, "entry decreased at t={t}");
        assert!(s.exit >= previous.exit, "exit decreased at t={t}");
        previous = s;
    }
}

#[test]
fn eased_amounts_are_continuous_across_breakpoints() {
    let window = earth_window();
    let eps = 1e-5;
    for b in [0.20f32, 0.25, 0.30, 0.36] {
        let before = window.sample(b - eps);
        let after = window.sample(b + eps);
        assert!((after.entry - before.entry).abs() < 1e-3, "entry jump at {b}");
        assert!((after.exit - before.exit).abs() < 1e-3, "exit jump at {b}");
    }
}

#[test]
fn visibility_flips_at_the_outer_breakpoints() {
    let window = earth_window();
    assert!(!window.sample(0.20 - 1e-4).visible());
    assert!(!window.sample(0.20).visible());
    assert!(window.sample(0.20 + 1e-4).visible());
    assert!(window.sample(0.28).visible());
    assert!(window.sample(0.36 - 1e-4).visible());
    assert!(!window.sample(0.36).visible());
    assert!(!window.sample(0.36 + 1e-4).visible());
    assert!(!window.sample(0.9).visible());
}

#[test]
fn peak_breakpoints_stay_visible() {
    let window = earth_window();
    for t in [0.25, 0.30] {
        for t_eps in [t - 1e-4, t, t + 1e-4] {
            assert!(window.sample(t_eps).visible(), "hidden at {t_eps}");
        }
    }
    let s = window.sample(0.25);
    assert_eq!((s.entry_raw, s.exit_raw), (1.0, 0.0));
    let s = window.sample(0.30);
    assert_eq!((s.entry_raw, s.exit_raw), (1.0, 0.0));
    let s = window.sample(0.36);
    assert_eq!((s.entry_raw, s.exit_raw), (1.0, 1.0));
}

#[test]
fn half_entry_at_middle_of_enter_phase() {
    let s = earth_window().sample(0.225);
    assert!((s.entry_raw - 0.5).abs() < 1e-5);
    assert!((s.entry - 0.5).abs() < 1e-5);
    assert_eq!(s.exit, 0.0);
    assert!(s.visible());
}

#[test]
fn zero_width_peak_is_fully_entered() {
    let window = TimelineWindow::new(0.2, 0.3, 0.3, 0.4).unwrap();
    let s = window.sample(0.3);
    assert_eq!(s.entry, 1.0);
    assert_eq!(s.exit, 0.0);
    assert!(s.visible());
}

#[test]
fn zero_width_phases_never_produce_nan() {
    let window = TimelineWindow {
        enter_start: 0.3,
        peak_start: 0.3,
        peak_end: 0.3,
        exit_end: Some(0.3),
    };
    for t in grid(1000) {
        let s = window.sample(t);
        assert!(s.entry.is_finite() && s.exit.is_finite(), "NaN at t={t}");
    }
    let at = window.sample(0.3);
    assert_eq!(at.entry, 1.0);
    assert_eq!(at.exit, 0.0);
}

#[test]
fn non_finite_progress_is_hidden() {
    let window = earth_window();
    assert_eq!(window.sample(f32::NAN), TimelineSample::HIDDEN);
    assert!(!window.sample(f32::INFINITY).visible());
}

#[test]
fn entry_only_window_stays_on_stage() {
    let window = TimelineWindow::entry_only(0.8, 1.0).unwrap();
    assert!(!window.sample(0.79).visible());
    assert!(window.sample(0.9).visible());
    let end = window.sample(1.0);
    assert_eq!(end.entry, 1.0);
    assert_eq!(end.exit, 0.0);
    assert!(end.visible());
}

#[test]
fn invalid_windows_are_rejected() {
    assert!(matches!(
        TimelineWindow::new(0.3, 0.2, 0.4, 0.5),
        Err(TimelineError::Misordered(_))
    ));
    assert!(matches!(
        TimelineWindow::new(0.1, 0.2, 0.5, 0.4),
        Err(TimelineError::Misordered(_))
    ));
    assert!(matches!(
        TimelineWindow::new(0.1, 0.2, 0.3, 1.5),
        Err(TimelineError::OutOfRange { name: "exit_end", .. })
    ));
    assert!(matches!(
        TimelineWindow::new(f32::NAN, 0.2, 0.3, 0.4),
        Err(TimelineError::NotFinite { name: "enter_start" })
    ));
}

#[test]
fn sanitized_window_is_ordered_and_safe() {
    let broken = TimelineWindow {
        enter_start: 0.5,
        peak_start: 0.2,
        peak_end: f32::NAN,
        exit_end: Some(-1.0),
    };
    let fixed = broken.sanitized();
    assert!(fixed.enter_start <= fixed.peak_start);
    assert!(fixed.peak_start <= fixed.peak_end);
    assert!(fixed.peak_end <= fixed.exit_end.unwrap());
    for t in grid(1000) {
        let s = fixed.sample(t);
        assert!(s.entry.is_finite() && s.exit.is_finite());
    }
}

#[test]
fn past_the_exit_the_body_is_gone() {
    let s = earth_window().sample(0.40);
    assert_eq!(s.entry, 1.0);
    assert_eq!(s.exit, 1.0);
    assert!(!s.visible());
}

#[test]
fn entry_only_window_before_entry_is_off_stage() {
    let s = TimelineWindow::entry_only(0.8, 1.0).unwrap().sample(0.5);
    assert_eq!(s.entry, 0.0);
    assert!(!s.visible());
}

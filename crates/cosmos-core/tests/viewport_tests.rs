use cosmos_core::scheduler::FrameMode;
use cosmos_core::viewport::{is_mobile_user_agent, PowerMode, ViewportProfile, ViewportSignal};

fn desktop() -> ViewportSignal {
    ViewportSignal {
        width_px: 1440.0,
        height_px: 900.0,
        ..Default::default()
    }
}

#[test]
fn wide_pointer_device_is_full() {
    assert_eq!(ViewportProfile::classify(&desktop()), ViewportProfile::Full);
}

#[test]
fn any_constrained_signal_reduces_the_tier() {
    let narrow = ViewportSignal {
        width_px: 767.0,
        ..desktop()
    };
    let touch = ViewportSignal {
        touch_capable: true,
        ..desktop()
    };
    let coarse = ViewportSignal {
        coarse_pointer: true,
        ..desktop()
    };
    let agent = ViewportSignal {
        mobile_user_agent: true,
        ..desktop()
    };
    for signal in [narrow, touch, coarse, agent] {
        assert_eq!(ViewportProfile::classify(&signal), ViewportProfile::Constrained);
    }
    let at_breakpoint = ViewportSignal {
        width_px: 768.0,
        ..desktop()
    };
    assert_eq!(ViewportProfile::classify(&at_breakpoint), ViewportProfile::Full);
}

#[test]
fn profile_drives_frame_mode_and_throttle() {
    assert_eq!(ViewportProfile::Constrained.frame_mode(), FrameMode::OnDemand);
    assert_eq!(ViewportProfile::Full.frame_mode(), FrameMode::Continuous);
    assert_eq!(ViewportProfile::Constrained.scroll_throttle_ms(), 32.0);
    assert_eq!(ViewportProfile::Full.scroll_throttle_ms(), 16.0);
    assert!(ViewportProfile::Constrained.frame_budget_ms() > ViewportProfile::Full.frame_budget_ms());
}

#[test]
fn constrained_quality_disables_expensive_layers() {
    let q = ViewportProfile::Constrained.quality();
    assert_eq!(q.sphere_segments, 32);
    assert_eq!(q.star_density, 0.3);
    assert!(!q.nebula && !q.clouds && !q.atmospheres && !q.deep_star_layer);
    assert!(!q.post_processing && !q.antialias && !q.rim_light);
    assert_eq!(q.max_pixel_ratio, 1.0);
    assert_eq!(q.power, PowerMode::LowPower);
}

#[test]
fn full_quality_enables_everything() {
    let q = ViewportProfile::Full.quality();
    assert_eq!(q.sphere_segments, 64);
    assert_eq!(q.ring_segments, 128);
    assert_eq!(q.star_density, 1.0);
    assert!(q.nebula && q.clouds && q.atmospheres && q.deep_star_layer);
    assert!(q.post_processing && q.antialias && q.rim_light);
    assert_eq!(q.max_pixel_ratio, 1.5);
    assert_eq!(q.power, PowerMode::HighPerformance);
}

#[test]
fn mobile_agents_are_detected() {
    assert!(is_mobile_user_agent(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
    ));
    assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
    assert!(is_mobile_user_agent("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
    assert!(!is_mobile_user_agent(
        "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
    ));
}

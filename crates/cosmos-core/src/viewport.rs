//! Device capability classification and the quality tier derived from it.

use crate::constants::{MOBILE_BREAKPOINT_PX, SCROLL_THROTTLE_MS_CONSTRAINED, SCROLL_THROTTLE_MS_FULL};
use crate::scheduler::FrameMode;

/// Raw signals sampled from the host at startup and on resize.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportSignal {
    pub width_px: f64,
    pub height_px: f64,
    pub touch_capable: bool,
    pub coarse_pointer: bool,
    pub mobile_user_agent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportProfile {
    Constrained,
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerMode {
    LowPower,
    HighPerformance,
}

/// Everything the composition and renderer scale by device class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualitySettings {
    pub sphere_segments: u32,
    pub shell_segments: u32, // clouds and atmospheres
    pub ring_segments: u32,
    pub star_density: f32,
    pub nebula: bool,
    pub clouds: bool,
    pub atmospheres: bool,
    pub deep_star_layer: bool,
    pub rim_light: bool,
    pub post_processing: bool,
    pub antialias: bool,
    pub max_pixel_ratio: f64,
    pub power: PowerMode,
}

impl ViewportProfile {
    /// Any one constrained signal is enough to pick the reduced tier.
    pub fn classify(signal: &ViewportSignal) -> Self {
        let narrow = signal.width_px.is_finite() && signal.width_px < MOBILE_BREAKPOINT_PX;
        if narrow || signal.touch_capable || signal.coarse_pointer || signal.mobile_user_agent {
            ViewportProfile::Constrained
        } else {
            ViewportProfile::Full
        }
    }

    pub fn frame_mode(self) -> FrameMode {
        match self {
            ViewportProfile::Constrained => FrameMode::OnDemand,
            ViewportProfile::Full => FrameMode::Continuous,
        }
    }

    pub fn scroll_throttle_ms(self) -> f64 {
        match self {
            ViewportProfile::Constrained => SCROLL_THROTTLE_MS_CONSTRAINED,
            ViewportProfile::Full => SCROLL_THROTTLE_MS_FULL,
        }
    }

    /// Frame budget used for slow-frame warnings.
    pub fn frame_budget_ms(self) -> f64 {
        match self {
            ViewportProfile::Constrained => 33.0,
            ViewportProfile::Full => 16.0,
        }
    }

    pub fn quality(self) -> QualitySettings {
        match self {
            ViewportProfile::Constrained => QualitySettings {
                sphere_segments: 32,
                shell_segments: 16,
                ring_segments: 64,
                star_density: 0.3,
                nebula: false,
                clouds: false,
                atmospheres: false,
                deep_star_layer: false,
                rim_light: false,
                post_processing: false,
                antialias: false,
                max_pixel_ratio: 1.0,
                power: PowerMode::LowPower,
            },
            ViewportProfile::Full => QualitySettings {
                sphere_segments: 64,
                shell_segments: 32,
                ring_segments: 128,
                star_density: 1.0,
                nebula: true,
                clouds: true,
                atmospheres: true,
                deep_star_layer: true,
                rim_light: true,
                post_processing: true,
                antialias: true,
                max_pixel_ratio: 1.5,
                power: PowerMode::HighPerformance,
            },
        }
    }
}

/// Substrings that mark a phone or tablet browser.
const MOBILE_AGENT_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_AGENT_MARKERS.iter().any(|m| ua.contains(m))
}

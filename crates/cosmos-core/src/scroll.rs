//! Scroll measurement, event throttling and active-section detection.
//!
//! The tracker itself is host-agnostic: the web frontend feeds it DOM
//! measurements through [`ScrollHost`], the native preview a virtual page.
//! Hosts call [`ScrollTracker::on_event`] for every raw scroll/resize event,
//! [`ScrollTracker::on_window_elapsed`] when the throttle timer fires, and
//! [`ScrollTracker::on_frame`] from the coalesced animation frame.

use crate::constants::SECTION_IDS;
use crate::state::{SceneState, ScrollSample};
use crate::viewport::ViewportProfile;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// Vertical extent of a section relative to the viewport top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub bottom: f64,
}

pub trait ScrollHost {
    fn metrics(&self) -> ScrollMetrics;
    fn section_bounds(&self, id: &str) -> Option<SectionBounds>;
    fn now_ms(&self) -> f64;
}

/// Normalized scroll progress. Documents no taller than the viewport and
/// non-finite measurements report 0.
pub fn scroll_progress(metrics: &ScrollMetrics) -> f32 {
    let scrollable = metrics.document_height - metrics.viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !metrics.scroll_y.is_finite() {
        return 0.0;
    }
    (metrics.scroll_y / scrollable).clamp(0.0, 1.0) as f32
}

/// First section (in list order) whose bounds straddle the viewport midline.
pub fn section_at_midline<'a, F>(ids: &[&'a str], viewport_height: f64, bounds: F) -> Option<&'a str>
where
    F: Fn(&str) -> Option<SectionBounds>,
{
    let mid = viewport_height / 2.0;
    ids.iter()
        .copied()
        .find(|id| bounds(id).is_some_and(|b| b.top <= mid && mid <= b.bottom))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Leading edge: run now and arm the window timer.
    Run,
    /// Inside an open window: a trailing run is pending.
    Deferred,
}

/// Leading and trailing edge throttle with externally supplied timestamps.
#[derive(Clone, Debug)]
pub struct EventThrottle {
    interval_ms: f64,
    window_open: bool,
    trailing: bool,
}

impl EventThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            window_open: false,
            trailing: false,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms.max(0.0);
    }

    pub fn on_event(&mut self) -> ThrottleDecision {
        if self.window_open {
            self.trailing = true;
            ThrottleDecision::Deferred
        } else {
            self.window_open = true;
            ThrottleDecision::Run
        }
    }

    /// The window timer fired. Returns true when a trailing run is due. The
    /// window closes either way, so the next event runs immediately.
    pub fn on_window_elapsed(&mut self) -> bool {
        self.window_open = false;
        std::mem::take(&mut self.trailing)
    }
}

/// Collapses bursts of requests into one per animation frame.
#[derive(Clone, Debug, Default)]
pub struct FrameCoalescer {
    pending: bool,
}

impl FrameCoalescer {
    /// Returns true if the caller must schedule a new animation frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn complete(&mut self) {
        self.pending = false;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// What the host has to do in response to an event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerAction {
    pub schedule_frame: bool,
    pub arm_timer_ms: Option<f64>,
}

/// Outcome of one coalesced measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackerUpdate {
    pub sample: ScrollSample,
    pub section_changed: bool,
}

/// Converts raw host scroll events into [`SceneState`] updates.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    throttle: EventThrottle,
    coalescer: FrameCoalescer,
    section_ids: &'static [&'static str],
}

impl ScrollTracker {
    pub fn new(profile: ViewportProfile) -> Self {
        Self::with_sections(profile, &SECTION_IDS)
    }

    pub fn with_sections(profile: ViewportProfile, section_ids: &'static [&'static str]) -> Self {
        Self {
            throttle: EventThrottle::new(profile.scroll_throttle_ms()),
            coalescer: FrameCoalescer::default(),
            section_ids,
        }
    }

    /// Re-derive the throttle interval after a resize reclassified the device.
    pub fn set_profile(&mut self, profile: ViewportProfile) {
        self.throttle.set_interval_ms(profile.scroll_throttle_ms());
    }

    #[inline]
    pub fn throttle_interval_ms(&self) -> f64 {
        self.throttle.interval_ms()
    }

    pub fn on_event(&mut self) -> TrackerAction {
        match self.throttle.on_event() {
            ThrottleDecision::Run => TrackerAction {
                schedule_frame: self.coalescer.request(),
                arm_timer_ms: Some(self.throttle.interval_ms()),
            },
            ThrottleDecision::Deferred => TrackerAction::default(),
        }
    }

    /// The throttle timer fired; returns true if a frame must be scheduled.
    pub fn on_window_elapsed(&mut self) -> bool {
        self.throttle.on_window_elapsed() && self.coalescer.request()
    }

    /// Run the coalesced measurement and publish it into `state`.
    pub fn on_frame<H: ScrollHost>(&mut self, host: &H, state: &mut SceneState) -> TrackerUpdate {
        self.coalescer.complete();
        self.measure(host, state)
    }

    /// Measure immediately, bypassing throttling. Used once at startup.
    pub fn measure<H: ScrollHost>(&self, host: &H, state: &mut SceneState) -> TrackerUpdate {
        let metrics = host.metrics();
        let sample = ScrollSample {
            progress: scroll_progress(&metrics),
            raw_pixel_offset: metrics.scroll_y,
            captured_at_ms: host.now_ms(),
        };
        state.apply_sample(&sample);
        let section_changed = section_at_midline(self.section_ids, metrics.viewport_height, |id| {
            host.section_bounds(id)
        })
        .is_some_and(|id| state.set_active_section(id));
        TrackerUpdate {
            sample,
            section_changed,
        }
    }
}

use cosmos_core::scroll::{
    scroll_progress, section_at_midline, EventThrottle, FrameCoalescer, ScrollHost, ScrollMetrics,
    ScrollTracker, SectionBounds, ThrottleDecision, TrackerAction,
};
use cosmos_core::state::SceneState;
use cosmos_core::viewport::ViewportProfile;

/// Stacked sections of equal height on a virtual page.
struct Page {
    scroll_y: f64,
    viewport_height: f64,
    sections: Vec<(&'static str, f64, f64)>,
}

impl Page {
    fn stacked(ids: &[&'static str], height: f64, viewport_height: f64) -> Self {
        let sections = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i as f64 * height, height))
            .collect();
        Self {
            scroll_y: 0.0,
            viewport_height,
            sections,
        }
    }
}

impl ScrollHost for Page {
    fn metrics(&self) -> ScrollMetrics {
        let document_height = self.sections.iter().map(|(_, top, h)| top + h).fold(0.0, f64::max);
        ScrollMetrics {
            scroll_y: self.scroll_y,
            viewport_height: self.viewport_height,
            document_height,
        }
    }

    fn section_bounds(&self, id: &str) -> Option<SectionBounds> {
        self.sections.iter().find(|(s, _, _)| *s == id).map(|(_, top, h)| SectionBounds {
            top: top - self.scroll_y,
            bottom: top + h - self.scroll_y,
        })
    }

    fn now_ms(&self) -> f64 {
        1234.0
    }
}

const IDS: [&str; 3] = ["hero", "about", "contact"];

#[test]
fn progress_is_normalized_and_clamped() {
    let m = |scroll_y| ScrollMetrics {
        scroll_y,
        viewport_height: 1000.0,
        document_height: 3000.0,
    };
    assert_eq!(scroll_progress(&m(0.0)), 0.0);
    assert_eq!(scroll_progress(&m(1000.0)), 0.5);
    assert_eq!(scroll_progress(&m(2000.0)), 1.0);
    assert_eq!(scroll_progress(&m(2500.0)), 1.0);
    assert_eq!(scroll_progress(&m(-50.0)), 0.0);
}

#[test]
fn degenerate_documents_report_zero() {
    let short = ScrollMetrics {
        scroll_y: 10.0,
        viewport_height: 1000.0,
        document_height: 800.0,
    };
    let exact = ScrollMetrics {
        document_height: 1000.0,
        ..short
    };
    let nan = ScrollMetrics {
        scroll_y: f64::NAN,
        viewport_height: 1000.0,
        document_height: 3000.0,
    };
    assert_eq!(scroll_progress(&short), 0.0);
    assert_eq!(scroll_progress(&exact), 0.0);
    assert_eq!(scroll_progress(&nan), 0.0);
}

#[test]
fn midline_picks_the_straddling_section() {
    let page = Page {
        scroll_y: 900.0,
        ..Page::stacked(&IDS, 1000.0, 800.0)
    };
    // Midline at 400px sits at document y=1300, inside "about"
    let hit = section_at_midline(&IDS, 800.0, |id| page.section_bounds(id));
    assert_eq!(hit, Some("about"));
}

#[test]
fn midline_prefers_list_order_on_overlap() {
    let bounds = |_: &str| {
        Some(SectionBounds {
            top: 0.0,
            bottom: 800.0,
        })
    };
    assert_eq!(section_at_midline(&IDS, 800.0, bounds), Some("hero"));
}

#[test]
fn midline_without_a_match_is_none() {
    let hit = section_at_midline(&IDS, 800.0, |_| {
        Some(SectionBounds {
            top: 500.0,
            bottom: 900.0,
        })
    });
    assert_eq!(hit, None);
}

#[test]
fn throttle_runs_leading_and_trailing_edges() {
    let mut throttle = EventThrottle::new(16.0);
    assert_eq!(throttle.on_event(), ThrottleDecision::Run);
    assert_eq!(throttle.on_event(), ThrottleDecision::Deferred);
    assert_eq!(throttle.on_event(), ThrottleDecision::Deferred);
    assert!(throttle.on_window_elapsed());
    // Nothing arrived since: no second trailing run
    assert!(!throttle.on_window_elapsed());
    assert_eq!(throttle.on_event(), ThrottleDecision::Run);
}

#[test]
fn throttle_without_followers_has_no_trailing_run() {
    let mut throttle = EventThrottle::new(32.0);
    assert_eq!(throttle.on_event(), ThrottleDecision::Run);
    assert!(!throttle.on_window_elapsed());
}

#[test]
fn coalescer_schedules_once_per_frame() {
    let mut c = FrameCoalescer::default();
    assert!(c.request());
    assert!(!c.request());
    assert!(c.is_pending());
    c.complete();
    assert!(c.request());
}

#[test]
fn tracker_throttle_interval_follows_profile() {
    let mut tracker = ScrollTracker::new(ViewportProfile::Full);
    assert_eq!(tracker.throttle_interval_ms(), 16.0);
    tracker.set_profile(ViewportProfile::Constrained);
    assert_eq!(tracker.throttle_interval_ms(), 32.0);
}

#[test]
fn tracker_burst_produces_leading_and_trailing_measurements() {
    static SECTIONS: [&str; 3] = IDS;
    let mut page = Page::stacked(&IDS, 1000.0, 1000.0);
    let mut state = SceneState::default();
    let mut tracker = ScrollTracker::with_sections(ViewportProfile::Full, &SECTIONS);

    let first = tracker.on_event();
    assert!(first.schedule_frame);
    assert_eq!(first.arm_timer_ms, Some(16.0));
    page.scroll_y = 500.0;
    tracker.on_frame(&page, &mut state);
    assert_eq!(state.scroll_progress(), 0.25);

    // Events inside the window are deferred
    page.scroll_y = 1500.0;
    assert_eq!(tracker.on_event(), TrackerAction::default());
    assert_eq!(tracker.on_event(), TrackerAction::default());
    assert!(tracker.on_window_elapsed());
    let update = tracker.on_frame(&page, &mut state);
    assert_eq!(state.scroll_progress(), 0.75);
    assert!(update.section_changed);
    assert_eq!(state.active_section(), "about");
    assert_eq!(update.sample.raw_pixel_offset, 1500.0);
    assert_eq!(update.sample.captured_at_ms, 1234.0);
}

#[test]
fn trailing_run_joins_a_pending_frame() {
    static SECTIONS: [&str; 3] = IDS;
    let mut tracker = ScrollTracker::with_sections(ViewportProfile::Full, &SECTIONS);
    assert!(tracker.on_event().schedule_frame);
    tracker.on_event();
    // The leading frame has not run yet, so no second frame is needed
    assert!(!tracker.on_window_elapsed());
}

#[test]
fn section_is_kept_when_nothing_straddles() {
    static SECTIONS: [&str; 3] = IDS;
    let mut page = Page::stacked(&IDS, 1000.0, 1000.0);
    let mut state = SceneState::default();
    let tracker = ScrollTracker::with_sections(ViewportProfile::Full, &SECTIONS);
    page.scroll_y = 1200.0;
    tracker.measure(&page, &mut state);
    assert_eq!(state.active_section(), "about");

    page.sections.clear();
    let update = tracker.measure(&page, &mut state);
    assert!(!update.section_changed);
    assert_eq!(state.active_section(), "about");
}

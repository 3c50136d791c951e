use cosmos_core::constants::SECTION_IDS;
use cosmos_core::scroll::{ScrollHost, ScrollMetrics, SectionBounds};
use std::time::Instant;

/// Stand-in for the web page: one viewport-tall section per id, stacked in
/// order, scrolled by wheel and keyboard input.
pub struct VirtualPage {
    scroll_y: f64,
    viewport_height: f64,
    started: Instant,
}

impl VirtualPage {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            viewport_height: viewport_height.max(1.0),
            started: Instant::now(),
        }
    }

    fn section_height(&self) -> f64 {
        self.viewport_height
    }

    fn document_height(&self) -> f64 {
        self.section_height() * SECTION_IDS.len() as f64
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Keeps the relative position when the window height changes.
    pub fn set_viewport_height(&mut self, height: f64) {
        let max_before = self.max_scroll();
        let ratio = if max_before > 0.0 { self.scroll_y / max_before } else { 0.0 };
        self.viewport_height = height.max(1.0);
        self.scroll_y = ratio * self.max_scroll();
    }

    pub fn scroll_by(&mut self, dy: f64) {
        if dy.is_finite() {
            self.scroll_y = (self.scroll_y + dy).clamp(0.0, self.max_scroll());
        }
    }

    pub fn scroll_to_start(&mut self) {
        self.scroll_y = 0.0;
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_y = self.max_scroll();
    }
}

impl ScrollHost for VirtualPage {
    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y: self.scroll_y,
            viewport_height: self.viewport_height,
            document_height: self.document_height(),
        }
    }

    fn section_bounds(&self, id: &str) -> Option<SectionBounds> {
        let index = SECTION_IDS.iter().position(|s| *s == id)?;
        let top = index as f64 * self.section_height() - self.scroll_y;
        Some(SectionBounds {
            top,
            bottom: top + self.section_height(),
        })
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

use crate::constants::{
    ACTIVE_SECTION_ATTR, COARSE_POINTER_QUERY, FALLBACK_CLASS, PROGRESS_CSS_VAR,
};
use cosmos_core::scroll::{ScrollHost, ScrollMetrics, SectionBounds};
use cosmos_core::viewport::is_mobile_user_agent;
use cosmos_core::ViewportSignal;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Size the canvas backing store to its CSS box times the device pixel
/// ratio, capped by the quality tier.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, max_pixel_ratio: f64) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio().min(max_pixel_ratio).max(0.5);
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

#[inline]
fn js_f64(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Sample the device signals used to pick a [`cosmos_core::ViewportProfile`].
pub fn viewport_signal(window: &web::Window) -> ViewportSignal {
    let navigator = window.navigator();
    let touch_event = js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart"))
        .unwrap_or(false);
    let coarse_pointer = window
        .match_media(COARSE_POINTER_QUERY)
        .ok()
        .flatten()
        .is_some_and(|m| m.matches());
    ViewportSignal {
        width_px: js_f64(window.inner_width()),
        height_px: js_f64(window.inner_height()),
        touch_capable: touch_event || navigator.max_touch_points() > 0,
        coarse_pointer,
        mobile_user_agent: navigator
            .user_agent()
            .map(|ua| is_mobile_user_agent(&ua))
            .unwrap_or(false),
    }
}

/// Live page measurements for the scroll tracker.
pub struct DomScrollHost {
    window: web::Window,
    document: web::Document,
}

impl DomScrollHost {
    pub fn new(window: web::Window, document: web::Document) -> Self {
        Self { window, document }
    }
}

impl ScrollHost for DomScrollHost {
    fn metrics(&self) -> ScrollMetrics {
        let document_height = self
            .document
            .document_element()
            .map(|el| el.scroll_height() as f64)
            .unwrap_or(0.0);
        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_height: js_f64(self.window.inner_height()),
            document_height,
        }
    }

    fn section_bounds(&self, id: &str) -> Option<SectionBounds> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some(SectionBounds {
            top: rect.top(),
            bottom: rect.bottom(),
        })
    }

    fn now_ms(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }
}

/// Expose progress and the active section to the page's styles and scripts.
pub fn publish_scroll_state(document: &web::Document, progress: f32, section: Option<&str>) {
    let Some(root) = document.document_element() else {
        return;
    };
    if let Some(html) = root.dyn_ref::<web::HtmlElement>() {
        _ = html
            .style()
            .set_property(PROGRESS_CSS_VAR, &crate::pacing::format_progress(progress));
    }
    if let Some(id) = section {
        _ = root.set_attribute(ACTIVE_SECTION_ATTR, id);
    }
}

/// Swap the canvas for the page's static placeholder.
pub fn show_fallback(canvas: &web::HtmlCanvasElement) {
    let container = canvas
        .parent_element()
        .unwrap_or_else(|| canvas.clone().unchecked_into());
    _ = container.class_list().add_1(FALLBACK_CLASS);
}

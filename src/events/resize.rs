use super::{EventShared, ListenerGuard};
use crate::dom;
use cosmos_core::ViewportProfile;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

pub(super) fn listen(shared: &Rc<EventShared>, window: &web::Window) -> anyhow::Result<ListenerGuard> {
    let weak = Rc::downgrade(shared);
    let closure = Closure::wrap(Box::new(move || {
        if let Some(shared) = weak.upgrade() {
            shared.on_resize();
        }
    }) as Box<dyn FnMut()>);
    ListenerGuard::passive(window, "resize", closure)
}

impl EventShared {
    /// Re-classify the device, resize the canvas and re-measure: the
    /// document height and section bounds usually move with the viewport.
    pub(super) fn on_resize(&self) {
        let profile = ViewportProfile::classify(&dom::viewport_signal(&self.window));
        {
            let mut ctx = self.ctx.borrow_mut();
            if profile != ctx.profile {
                // Geometry and pipelines stay at the session's quality tier;
                // only input pacing follows the new class.
                log::info!("[viewport] reclassified as {:?}", profile);
                ctx.set_profile(profile);
            }
            let max_ratio = ctx.scene.quality().max_pixel_ratio;
            dom::sync_canvas_backing_size(&ctx.canvas, max_ratio);
        }
        self.on_scroll_event();
        self.frame_loop.wake();
    }
}

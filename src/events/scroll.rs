use super::{EventShared, ListenerGuard};
use crate::dom;
use cosmos_core::scroll::TrackerUpdate;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub(super) fn listen(shared: &Rc<EventShared>, window: &web::Window) -> anyhow::Result<ListenerGuard> {
    let weak = Rc::downgrade(shared);
    let closure = Closure::wrap(Box::new(move || {
        if let Some(shared) = weak.upgrade() {
            shared.on_scroll_event();
        }
    }) as Box<dyn FnMut()>);
    ListenerGuard::passive(window, "scroll", closure)
}

impl EventShared {
    /// Raw scroll or resize event: throttle, then coalesce into one
    /// measurement per animation frame.
    pub(super) fn on_scroll_event(&self) {
        let action = self.ctx.borrow_mut().tracker.on_event();
        if action.schedule_frame {
            self.request_measure();
        }
        if let Some(ms) = action.arm_timer_ms {
            self.arm_timer(ms);
        }
    }

    fn request_measure(&self) {
        if self.measure_handle.get().is_some() {
            return;
        }
        let handle = self
            .window
            .request_animation_frame(self.measure_cb.as_ref().unchecked_ref())
            .ok();
        self.measure_handle.set(handle);
    }

    fn arm_timer(&self, ms: f64) {
        if let Some(previous) = self.timer_handle.take() {
            self.window.clear_timeout_with_handle(previous);
        }
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.timer_cb.as_ref().unchecked_ref(),
                ms.ceil() as i32,
            )
            .ok();
        self.timer_handle.set(handle);
    }

    /// The throttle window closed; run the trailing measurement if one is due.
    pub(super) fn on_timer(&self) {
        self.timer_handle.set(None);
        if self.ctx.borrow_mut().tracker.on_window_elapsed() {
            self.request_measure();
        }
    }

    pub(super) fn on_measure(&self) {
        self.measure_handle.set(None);
        let (update, wake) = {
            let mut ctx = self.ctx.borrow_mut();
            let ctx = &mut *ctx;
            let update = ctx.tracker.on_frame(&self.host, &mut ctx.state);
            let wake = ctx.scheduler.set_target(update.sample.progress);
            (update, wake)
        };
        self.publish(&update, false);
        if wake {
            self.frame_loop.wake();
        }
    }

    /// Unthrottled measurement used once at startup.
    pub(super) fn measure_now(&self) {
        let update = {
            let mut ctx = self.ctx.borrow_mut();
            let ctx = &mut *ctx;
            let update = ctx.tracker.measure(&self.host, &mut ctx.state);
            ctx.scheduler.set_target(update.sample.progress);
            update
        };
        self.publish(&update, true);
        self.frame_loop.wake();
    }

    fn publish(&self, update: &TrackerUpdate, always_section: bool) {
        let section = {
            let ctx = self.ctx.borrow();
            (always_section || update.section_changed).then(|| ctx.state.active_section())
        };
        if let (true, Some(id)) = (update.section_changed, section) {
            log::info!("[scroll] active section {id}");
        }
        dom::publish_scroll_state(&self.document, update.sample.progress, section);
    }
}

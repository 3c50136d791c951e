//! Page event wiring: scroll and resize listeners feeding the scroll tracker
//! and waking the frame loop.
//!
//! Every callback handed to the browser holds a `Weak` back-reference, and
//! every listener, timer and pending frame is released when [`PageEvents`] is
//! dropped.

pub mod resize;
pub mod scroll;

use crate::dom::DomScrollHost;
use crate::frame::{FrameContext, FrameLoop};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An event listener that unregisters itself on drop.
pub struct ListenerGuard {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl ListenerGuard {
    pub fn passive(
        target: &web::EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut()>,
    ) -> anyhow::Result<Self> {
        let options = web::AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| anyhow::anyhow!("add {kind} listener: {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// State shared by the page event callbacks.
pub(crate) struct EventShared {
    ctx: Rc<RefCell<FrameContext>>,
    frame_loop: Rc<FrameLoop>,
    window: web::Window,
    document: web::Document,
    host: DomScrollHost,
    measure_cb: Closure<dyn FnMut()>,
    timer_cb: Closure<dyn FnMut()>,
    measure_handle: Cell<Option<i32>>,
    timer_handle: Cell<Option<i32>>,
}

impl EventShared {
    fn new(
        ctx: Rc<RefCell<FrameContext>>,
        frame_loop: Rc<FrameLoop>,
        window: web::Window,
        document: web::Document,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let on_measure = weak.clone();
            let measure_cb = Closure::wrap(Box::new(move || {
                if let Some(shared) = on_measure.upgrade() {
                    shared.on_measure();
                }
            }) as Box<dyn FnMut()>);
            let on_timer = weak.clone();
            let timer_cb = Closure::wrap(Box::new(move || {
                if let Some(shared) = on_timer.upgrade() {
                    shared.on_timer();
                }
            }) as Box<dyn FnMut()>);
            Self {
                ctx,
                frame_loop,
                host: DomScrollHost::new(window.clone(), document.clone()),
                window,
                document,
                measure_cb,
                timer_cb,
                measure_handle: Cell::new(None),
                timer_handle: Cell::new(None),
            }
        })
    }
}

impl Drop for EventShared {
    fn drop(&mut self) {
        if let Some(handle) = self.measure_handle.take() {
            _ = self.window.cancel_animation_frame(handle);
        }
        if let Some(handle) = self.timer_handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Live scroll and resize wiring for one scene session.
pub struct PageEvents {
    // Listeners go first so no callback can run against a dropped state.
    _scroll: ListenerGuard,
    _resize: ListenerGuard,
    shared: Rc<EventShared>,
}

impl PageEvents {
    /// Register the listeners and take the initial measurement.
    pub fn wire(
        ctx: Rc<RefCell<FrameContext>>,
        frame_loop: Rc<FrameLoop>,
        window: &web::Window,
        document: &web::Document,
    ) -> anyhow::Result<Self> {
        let shared = EventShared::new(ctx, frame_loop, window.clone(), document.clone());
        let scroll = scroll::listen(&shared, window)?;
        let resize = resize::listen(&shared, window)?;
        shared.measure_now();
        Ok(Self {
            _scroll: scroll,
            _resize: resize,
            shared,
        })
    }

    /// The latest published progress and section.
    pub fn snapshot(&self) -> (f32, &'static str) {
        let ctx = self.shared.ctx.borrow();
        (ctx.state.scroll_progress(), ctx.state.active_section())
    }
}

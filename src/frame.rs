use crate::pacing::{BudgetMonitor, FrameClock};
use crate::render;
use cosmos_core::{
    FrameInput, FrameMode, RenderScheduler, SceneComposition, SceneState, ScrollTracker,
    ViewportProfile,
};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Everything one animation frame reads or writes.
pub struct FrameContext {
    pub state: SceneState,
    pub tracker: ScrollTracker,
    pub profile: ViewportProfile,
    pub scene: SceneComposition,
    pub scheduler: RenderScheduler,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'static>>,
    clock: FrameClock,
    budget: BudgetMonitor,
}

impl FrameContext {
    pub fn new(
        profile: ViewportProfile,
        scene: SceneComposition,
        canvas: web::HtmlCanvasElement,
        gpu: render::GpuState<'static>,
    ) -> Self {
        Self {
            state: SceneState::default(),
            tracker: ScrollTracker::new(profile),
            profile,
            scene,
            scheduler: RenderScheduler::new(
                profile.frame_mode(),
                cosmos_core::constants::SCHEDULER_LERP_FACTOR,
            ),
            canvas,
            gpu: Some(gpu),
            clock: FrameClock::default(),
            budget: BudgetMonitor::new(profile.frame_budget_ms()),
        }
    }

    /// Scroll pacing follows the device class; the frame mode is fixed for the
    /// session.
    pub fn set_profile(&mut self, profile: ViewportProfile) {
        self.profile = profile;
        self.tracker.set_profile(profile);
        self.budget.set_budget_ms(profile.frame_budget_ms());
    }

    /// Run one frame. Returns whether another frame should be requested.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let started = Instant::now();
        let (elapsed, delta) = self.clock.tick(timestamp_ms);
        let progress = self.state.scroll_progress();
        let scheduler_busy = self.scheduler.tick();

        let input = FrameInput::new(progress, elapsed, delta);
        self.scene.update(&input);
        let settled = self.scene.is_settled(progress);

        let Some(gpu) = self.gpu.as_mut() else {
            return false;
        };
        gpu.resize_if_needed(self.canvas.width(), self.canvas.height());
        let result = self.scene.submit(gpu);
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Skip this frame; the next one renders into the new swapchain
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[render] out of GPU memory, stopping the scene");
                self.gpu = None;
                return false;
            }
            Err(e) => log::warn!("[render] frame skipped: {:?}", e),
        }

        let frame_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Some(slow) = self.budget.record(frame_ms, timestamp_ms) {
            log::warn!(
                "[frame] {:.1} ms over the {:.0} ms budget ({} slow frames)",
                frame_ms,
                self.budget.budget_ms(),
                slow
            );
        }

        match self.scheduler.mode() {
            FrameMode::Continuous => true,
            FrameMode::OnDemand => scheduler_busy || !settled,
        }
    }
}

/// requestAnimationFrame driver for a [`FrameContext`].
///
/// Continuous sessions re-arm after every frame. On-demand sessions stop once
/// the scene has settled and are re-armed by [`FrameLoop::wake`].
pub struct FrameLoop {
    ctx: Rc<RefCell<FrameContext>>,
    window: web::Window,
    tick: Closure<dyn FnMut(f64)>,
    pending: Cell<Option<i32>>,
    stopped: Cell<bool>,
}

impl FrameLoop {
    pub fn new(ctx: Rc<RefCell<FrameContext>>, window: web::Window) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let this = weak.clone();
            let tick = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                if let Some(frame_loop) = this.upgrade() {
                    frame_loop.run(timestamp_ms);
                }
            }) as Box<dyn FnMut(f64)>);
            Self {
                ctx,
                window,
                tick,
                pending: Cell::new(None),
                stopped: Cell::new(false),
            }
        })
    }

    /// Request a frame unless one is already pending.
    pub fn wake(&self) {
        if self.stopped.get() || self.pending.get().is_some() {
            return;
        }
        let handle = self
            .window
            .request_animation_frame(self.tick.as_ref().unchecked_ref())
            .ok();
        self.pending.set(handle);
    }

    pub fn stop(&self) {
        self.stopped.set(true);
        if let Some(handle) = self.pending.take() {
            _ = self.window.cancel_animation_frame(handle);
        }
    }

    fn run(&self, timestamp_ms: f64) {
        self.pending.set(None);
        if self.stopped.get() {
            return;
        }
        let again = self.ctx.borrow_mut().frame(timestamp_ms);
        if again {
            self.wake();
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Create the surface and GPU state for `canvas`.
///
/// The surface needs a `'static` target, so each call leaks one canvas
/// handle. Restarting the scene with `start` leaks another; the handle is a
/// small JS reference and the element itself stays owned by the page.
pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    quality: &cosmos_core::QualitySettings,
) -> anyhow::Result<render::GpuState<'static>> {
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    render::GpuState::new(leaked_canvas, quality).await
}

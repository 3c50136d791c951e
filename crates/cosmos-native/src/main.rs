//! Desktop preview of the scroll scene.
//!
//! The page is simulated: mouse wheel and PageUp/PageDown/Home/End scroll a
//! stack of viewport-tall sections, and the same tracker, scheduler and
//! composition as the web build drive an impostor renderer.
//!
//! Flags: `--constrained` forces the reduced quality tier, `--on-demand`
//! forces on-demand frame scheduling.

mod page;
mod renderer;

use cosmos_core::constants::SCHEDULER_LERP_FACTOR;
use cosmos_core::{
    FrameInput, FrameMode, RenderScheduler, SceneComposition, SceneState, ScrollTracker,
    ViewportProfile, ViewportSignal,
};
use page::VirtualPage;
use renderer::NativeRenderer;
use std::time::{Duration, Instant};
use winit::event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

const MAX_FRAME_DELTA_SEC: f32 = 0.1;
const WHEEL_LINE_PX: f64 = 60.0;

struct Options {
    constrained: bool,
    on_demand: bool,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let has = |flag: &str| args.iter().any(|a| a == flag);
        Self {
            constrained: has("--constrained"),
            on_demand: has("--on-demand"),
        }
    }
}

/// Scroll handling outside the render path: throttle timer plus a pending
/// measurement flag standing in for the coalesced animation frame.
struct ScrollDriver {
    tracker: ScrollTracker,
    timer_deadline: Option<Instant>,
    measure_pending: bool,
}

impl ScrollDriver {
    fn new(profile: ViewportProfile) -> Self {
        Self {
            tracker: ScrollTracker::new(profile),
            timer_deadline: None,
            measure_pending: false,
        }
    }

    fn on_event(&mut self) {
        let action = self.tracker.on_event();
        self.measure_pending |= action.schedule_frame;
        if let Some(ms) = action.arm_timer_ms {
            self.timer_deadline = Some(Instant::now() + Duration::from_secs_f64(ms / 1000.0));
        }
    }

    /// Fire the throttle timer if it is due, then run a pending measurement.
    /// Returns the new progress when one was taken.
    fn poll(&mut self, page: &VirtualPage, state: &mut SceneState) -> Option<f32> {
        if self.timer_deadline.is_some_and(|d| Instant::now() >= d) {
            self.timer_deadline = None;
            self.measure_pending |= self.tracker.on_window_elapsed();
        }
        if !self.measure_pending {
            return None;
        }
        self.measure_pending = false;
        let update = self.tracker.on_frame(page, state);
        if update.section_changed {
            log::info!("[scroll] active section: {}", state.active_section());
        }
        Some(update.sample.progress)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();
    let options = Options::from_args();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Cosmos (native preview)")
        .build(&event_loop)?;
    let size = window.inner_size();

    let profile = if options.constrained {
        ViewportProfile::Constrained
    } else {
        ViewportProfile::classify(&ViewportSignal {
            width_px: size.width as f64,
            height_px: size.height as f64,
            ..ViewportSignal::default()
        })
    };
    let frame_mode = if options.on_demand {
        FrameMode::OnDemand
    } else {
        profile.frame_mode()
    };
    log::info!("[viewport] {:?}, {:?} frames", profile, frame_mode);

    let quality = profile.quality();
    let mut scene = SceneComposition::new(&quality)?;
    let mut renderer = pollster::block_on(NativeRenderer::new(&window, quality))?;
    let window = &window;
    let mut scheduler = RenderScheduler::new(frame_mode, SCHEDULER_LERP_FACTOR);
    let mut page = VirtualPage::new(size.height as f64);
    let mut scroll = ScrollDriver::new(profile);
    let mut state = SceneState::default();

    // Initial measurement
    let first = scroll.tracker.measure(&page, &mut state);
    scheduler.set_target(first.sample.progress);

    let start = Instant::now();
    let mut last_frame = start;
    let mut needs_frame = true;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => {
                renderer.resize(size);
                page.set_viewport_height(size.height as f64);
                scroll.on_event();
                needs_frame = true;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -(y as f64) * WHEEL_LINE_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y,
                };
                page.scroll_by(dy);
                scroll.on_event();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let page_px = page.viewport_height() * 0.9;
                match key {
                    NamedKey::PageDown | NamedKey::ArrowDown | NamedKey::Space => {
                        page.scroll_by(page_px)
                    }
                    NamedKey::PageUp | NamedKey::ArrowUp => page.scroll_by(-page_px),
                    NamedKey::Home => page.scroll_to_start(),
                    NamedKey::End => page.scroll_to_end(),
                    NamedKey::Escape => elwt.exit(),
                    _ => return,
                }
                scroll.on_event();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = (now - start).as_secs_f32();
                let delta = (now - last_frame).as_secs_f32().min(MAX_FRAME_DELTA_SEC);
                last_frame = now;

                let busy = scheduler.tick();
                let progress = state.scroll_progress();
                scene.update(&FrameInput::new(progress, elapsed, delta));
                let settled = scene.is_settled(progress);
                match scene.submit(&mut renderer) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[render] out of GPU memory");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("[render] frame skipped: {:?}", e),
                }
                needs_frame = match scheduler.mode() {
                    FrameMode::Continuous => true,
                    FrameMode::OnDemand => busy || !settled,
                };
            }
            _ => {}
        },
        Event::AboutToWait => {
            if let Some(progress) = scroll.poll(&page, &mut state) {
                window.set_title(&format!(
                    "Cosmos (native preview) - {} {:.0}%",
                    state.active_section(),
                    progress * 100.0
                ));
                needs_frame |= scheduler.set_target(progress);
            }
            if needs_frame {
                needs_frame = false;
                window.request_redraw();
            }
            match scroll.timer_deadline {
                Some(deadline) if !scroll.measure_pending => {
                    elwt.set_control_flow(ControlFlow::WaitUntil(deadline))
                }
                _ if scroll.measure_pending => elwt.set_control_flow(ControlFlow::Poll),
                _ => elwt.set_control_flow(ControlFlow::Wait),
            }
        }
        _ => {}
    })?;
    Ok(())
}

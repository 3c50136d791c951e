#![cfg(target_arch = "wasm32")]
use cosmos_core::{SceneComposition, ViewportProfile};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod camera;
mod constants;
mod dom;
mod events;
mod frame;
mod pacing;
mod render;

pub static BODIES_WGSL: &str = include_str!("../shaders/bodies.wgsl");
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

/// A running scene: page listeners, the frame loop and the state they share.
struct Session {
    events: events::PageEvents,
    frame_loop: Rc<frame::FrameLoop>,
    ctx: Rc<RefCell<frame::FrameContext>>,
}

thread_local! {
    static ACTIVE: RefCell<Option<Session>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cosmos-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let signal = dom::viewport_signal(&window);
    let profile = ViewportProfile::classify(&signal);
    log::info!(
        "[viewport] {:?} ({}x{} touch={} coarse={} mobile_ua={})",
        profile,
        signal.width_px,
        signal.height_px,
        signal.touch_capable,
        signal.coarse_pointer,
        signal.mobile_user_agent
    );

    let quality = profile.quality();
    dom::sync_canvas_backing_size(&canvas, quality.max_pixel_ratio);
    let scene = SceneComposition::new(&quality)?;

    let gpu = match frame::init_gpu(&canvas, &quality).await {
        Ok(gpu) => gpu,
        Err(e) => {
            // The page stays readable without the scene
            log::error!("[render] WebGPU unavailable: {:?}", e);
            dom::show_fallback(&canvas);
            return Ok(());
        }
    };

    let ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        profile, scene, canvas, gpu,
    )));
    let frame_loop = frame::FrameLoop::new(ctx.clone(), window.clone());
    let events = events::PageEvents::wire(ctx.clone(), frame_loop.clone(), &window, &document)?;
    frame_loop.wake();

    ACTIVE.with(|active| {
        // A second start replaces the previous session and tears it down.
        let previous = active.borrow_mut().replace(Session {
            events,
            frame_loop,
            ctx,
        });
        if let Some(previous) = previous {
            teardown(previous);
        }
    });
    Ok(())
}

fn teardown(session: Session) {
    let Session {
        events,
        frame_loop,
        ctx,
    } = session;
    frame_loop.stop();
    drop(events);
    if let Ok(mut ctx) = ctx.try_borrow_mut() {
        ctx.gpu = None;
    }
    log::info!("[scene] stopped");
}

/// Stop rendering and release every listener, timer and GPU resource.
#[wasm_bindgen]
pub fn stop_scene() {
    if let Some(session) = ACTIVE.with(|active| active.borrow_mut().take()) {
        teardown(session);
    }
}

/// Latest published scroll progress in [0, 1].
#[wasm_bindgen]
pub fn scroll_progress() -> f32 {
    ACTIVE.with(|active| {
        active
            .borrow()
            .as_ref()
            .map(|session| session.events.snapshot().0)
            .unwrap_or(0.0)
    })
}

/// Id of the section crossing the viewport midline.
#[wasm_bindgen]
pub fn active_section() -> String {
    ACTIVE.with(|active| {
        active
            .borrow()
            .as_ref()
            .map(|session| session.events.snapshot().1)
            .unwrap_or(cosmos_core::constants::SECTION_IDS[0])
            .to_string()
    })
}

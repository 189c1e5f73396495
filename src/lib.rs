#![cfg(target_arch = "wasm32")]
//! Browser shell for the droid folio: builds the core services, wires DOM
//! events and timers into them, and renders the lab with WebGPU.

use folio_core::audio::PlayOverrides;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod audio;
mod console;
mod constants;
mod device;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod storage;

use app::Services;
use constants::CANVAS_ID;

fn seed_from_clock() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64 ^ (js_sys::Date::now() as u64)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("folio-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let audio_ctx = match web::AudioContext::new() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            log::warn!("[audio] no WebAudio context ({:?}); running silent", e);
            None
        }
    };
    let services = Services::build(document, audio_ctx, seed_from_clock());
    services.flush();

    events::wire_resize(&services, &canvas);
    events::wire_global_keydown(services.clone());
    events::wire_pointer_handlers(&services);
    events::wire_idle_timer(&services);
    events::wire_clock_timer(&services);
    console::install(&services);

    // a visit that starts inside the night window should not wait a minute
    {
        let now = services.clock.now();
        let mut bus = services.bus.borrow_mut();
        services
            .eggs
            .borrow_mut()
            .refresh_clock(app::local_wall_time(), now, &mut bus);
    }
    services.flush();

    services
        .mixer
        .borrow_mut()
        .play("robot-boot", PlayOverrides::default());

    let tier = services.lod.borrow().tier();
    let caps = services.device.borrow().capabilities();
    let gpu = if caps.supports_graphics {
        frame::init_gpu(&canvas, tier).await
    } else {
        log::warn!("[device] no graphics context; running without the 3D lab");
        None
    };

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(services, canvas, gpu)));
    frame::start_loop(frame_ctx);
    Ok(())
}

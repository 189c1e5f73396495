use crate::app::{local_wall_time, Services};
use crate::constants::{CLOCK_TIMER_MS, IDLE_TIMER_MS};
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn set_interval(millis: i32, mut tick: impl FnMut() + 'static) {
    let closure = Closure::wrap(Box::new(move || tick()) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            millis,
        ) {
            log::error!("setInterval({}) failed: {:?}", millis, e);
        }
    }
    closure.forget();
}

/// Cursor idle accumulation for the cursor-hide egg.
pub fn wire_idle_timer(services: &Services) {
    let s = services.clone();
    set_interval(IDLE_TIMER_MS, move || {
        let now = s.clock.now();
        {
            let mut bus = s.bus.borrow_mut();
            s.eggs.borrow_mut().idle_tick(now, &mut bus);
        }
        s.flush();
    });
}

/// Wall clock refresh for the time-based egg and night mode.
pub fn wire_clock_timer(services: &Services) {
    let s = services.clone();
    set_interval(CLOCK_TIMER_MS, move || {
        let wall = local_wall_time();
        let now = s.clock.now();
        {
            let mut bus = s.bus.borrow_mut();
            s.eggs.borrow_mut().refresh_clock(wall, now, &mut bus);
        }
        s.flush();
        s.effects.borrow_mut().clock_changed(wall);
        s.sync_root_classes();
    });
}

/// Keeps the canvas backing store in step with its CSS size and schedules a
/// debounced capability refresh.
pub fn wire_resize(services: &Services, canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let s = services.clone();
    let canvas_resize = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
        s.device.borrow_mut().request_refresh(s.clock.now());
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

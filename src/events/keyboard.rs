use crate::app::Services;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Keys the page itself would otherwise act on (scrolling, form submit).
#[inline]
fn swallows_default(key: &str) -> bool {
    matches!(key, "ArrowUp" | "ArrowDown" | "Enter" | "?")
}

/// Feeds the key into the egg engine (by physical code, which is what the
/// Konami sequence is written in) and into zone navigation (by logical key).
pub fn handle_global_keydown(ev: &web::KeyboardEvent, services: &Services) {
    let key = ev.key();
    let now = services.clock.now();
    services.mixer.borrow().backend().resume_if_suspended();
    {
        let mut bus = services.bus.borrow_mut();
        services
            .eggs
            .borrow_mut()
            .record_key(&ev.code(), now, &mut bus);
    }
    let outcome = services.nav.borrow_mut().handle_key(&key);
    if let Some(outcome) = outcome {
        log::debug!("[keys] {} -> {:?}", key, outcome);
        services.apply_nav(outcome);
        if swallows_default(&key) {
            ev.prevent_default();
        }
    }
    services.flush();
}

pub fn wire_global_keydown(services: Services) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &services);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

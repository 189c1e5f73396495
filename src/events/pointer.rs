use crate::app::Services;
use folio_core::audio::PlayOverrides;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_pointer_handlers(services: &Services) {
    wire_pointermove(services);
    wire_click(services);
}

fn wire_pointermove(services: &Services) {
    let s = services.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        s.eggs.borrow_mut().pointer_moved();
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Every click anywhere on the page counts, not only clicks on the canvas.
fn wire_click(services: &Services) {
    let s = services.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
        let now = s.clock.now();
        {
            let mixer = s.mixer.borrow();
            mixer.backend().resume_if_suspended();
        }
        {
            let mut bus = s.bus.borrow_mut();
            s.eggs.borrow_mut().record_click(now, &mut bus);
        }
        s.personality
            .borrow_mut()
            .record_interaction(chrono::Utc::now());
        s.mixer.borrow_mut().play("click", PlayOverrides::default());
        s.flush();
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

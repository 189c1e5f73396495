//! `window.robot`: the developer console surface.

use crate::app::Services;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys as web;

fn method(target: &js_sys::Object, name: &str, services: &Services, command: &'static str) {
    let s = services.clone();
    let closure = Closure::wrap(Box::new(move || -> JsValue {
        match s.run_console(command) {
            Some(text) => JsValue::from_str(&text),
            None => JsValue::UNDEFINED,
        }
    }) as Box<dyn FnMut() -> JsValue>);
    if let Err(e) = js_sys::Reflect::set(target, &JsValue::from_str(name), closure.as_ref()) {
        log::error!("[console] could not install robot.{}: {:?}", name, e);
    }
    closure.forget();
}

pub fn install(services: &Services) {
    let Some(window) = web::window() else {
        return;
    };
    let robot = js_sys::Object::new();
    method(&robot, "dance", services, "robot.dance");
    method(&robot, "wave", services, "robot.wave");
    method(&robot, "stats", services, "robot.stats");
    method(&robot, "help", services, "help");
    match js_sys::Reflect::set(window.as_ref(), &JsValue::from_str("robot"), robot.as_ref()) {
        Ok(_) => log::info!("[console] robot commands ready; try robot.help()"),
        Err(e) => log::error!("[console] could not install window.robot: {:?}", e),
    }
}

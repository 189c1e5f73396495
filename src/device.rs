//! Capability probe: reads what the browser exposes and hands the raw values
//! to the core classifier.

use folio_core::device::DeviceProbe;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

// WEBGL_debug_renderer_info.UNMASKED_RENDERER_WEBGL
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

fn prop(target: &JsValue, name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn has_touch(window: &web::Window) -> bool {
    let navigator = window.navigator();
    let points = prop(navigator.as_ref(), "maxTouchPoints")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    points > 0.0
        || js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false)
}

/// Tries webgl2 then webgl on a throwaway canvas. Returns the unmasked GPU
/// renderer string when the debug extension is available.
fn probe_graphics(document: &web::Document) -> (bool, Option<String>) {
    let Some(canvas) = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        return (false, None);
    };
    let ctx = ["webgl2", "webgl"]
        .iter()
        .find_map(|kind| canvas.get_context(kind).ok().flatten());
    let Some(ctx) = ctx else {
        return (false, None);
    };
    let renderer = (|| {
        let get_extension: js_sys::Function = prop(ctx.as_ref(), "getExtension")?.dyn_into().ok()?;
        // the constant only resolves once the extension has been requested
        get_extension
            .call1(ctx.as_ref(), &JsValue::from_str("WEBGL_debug_renderer_info"))
            .ok()
            .filter(|v| !v.is_null())?;
        let get_parameter: js_sys::Function = prop(ctx.as_ref(), "getParameter")?.dyn_into().ok()?;
        get_parameter
            .call1(ctx.as_ref(), &JsValue::from(UNMASKED_RENDERER_WEBGL))
            .ok()?
            .as_string()
    })();
    (true, renderer)
}

fn has_audio_context(window: &web::Window) -> bool {
    prop(window.as_ref(), "AudioContext").is_some()
        || prop(window.as_ref(), "webkitAudioContext").is_some()
}

/// `None` only when there is no window at all (workers, tests).
pub fn probe() -> Option<DeviceProbe> {
    let window = web::window()?;
    let document = window.document()?;
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as u32;
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as u32;
    let navigator = window.navigator();
    let hardware_concurrency = prop(navigator.as_ref(), "hardwareConcurrency")
        .and_then(|v| v.as_f64())
        .map(|n| n as u32);
    let device_memory_gb = prop(navigator.as_ref(), "deviceMemory")
        .and_then(|v| v.as_f64())
        .map(|gb| gb as f32);
    let (graphics_context, gpu_renderer) = probe_graphics(&document);
    Some(DeviceProbe {
        width,
        height,
        touch: has_touch(&window),
        hardware_concurrency,
        device_memory_gb,
        graphics_context,
        gpu_renderer,
        audio_context: has_audio_context(&window),
    })
}

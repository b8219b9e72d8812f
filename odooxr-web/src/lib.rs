//! OdooXR WASM web runtime
//!
//! Shows a glTF model inside a skybox through WebXR: an inline session in
//! the page canvas (drag with the right mouse button or a finger to look
//! around) and an immersive-vr session behind the "Enter VR" button. The
//! session logic lives in `odooxr-core`; this crate binds it to `web-sys`
//! and the JavaScript renderer.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod input;
#[cfg(target_arch = "wasm32")]
mod runtime;
#[cfg(target_arch = "wasm32")]
mod scene;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod slot;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("OdooXR web runtime initialized");
}

/// Build the viewer from the page and start its inline session.
///
/// Called from the page's module script once the DOM is ready. The viewer
/// lives for the rest of the page; calling this again returns a handle to
/// the same viewer.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initXR)]
pub fn init_xr() -> Result<app::App, JsValue> {
    app::App::install()
}

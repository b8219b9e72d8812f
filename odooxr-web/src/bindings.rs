//! Imports from the JavaScript renderer, VR button and WebXR polyfill
//! modules that are served next to the generated bindings.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(raw_module = "./render/scenes/scene.js")]
extern "C" {
    pub type Scene;

    #[wasm_bindgen(constructor)]
    pub fn new() -> Scene;

    #[wasm_bindgen(method, js_name = addNode)]
    pub fn add_node(this: &Scene, node: &JsValue);

    #[wasm_bindgen(method, js_name = setRenderer)]
    pub fn set_renderer(this: &Scene, renderer: &Renderer);

    #[wasm_bindgen(method, js_name = startFrame)]
    pub fn start_frame(this: &Scene);

    #[wasm_bindgen(method, js_name = endFrame)]
    pub fn end_frame(this: &Scene);

    #[wasm_bindgen(method)]
    pub fn draw(
        this: &Scene,
        projection_matrix: &js_sys::Float32Array,
        view_transform: &web_sys::XrRigidTransform,
    );
}

#[wasm_bindgen(raw_module = "./render/core/renderer.js")]
extern "C" {
    pub type Renderer;

    #[wasm_bindgen(constructor)]
    pub fn new(gl: &JsValue) -> Renderer;

    /// Returns a WebGL context whose canvas is not yet in the document.
    #[wasm_bindgen(js_name = createWebGLContext)]
    pub fn create_webgl_context(attributes: &JsValue) -> JsValue;
}

#[wasm_bindgen(raw_module = "./render/nodes/gltf2.js")]
extern "C" {
    pub type Gltf2Node;

    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> Gltf2Node;
}

#[wasm_bindgen(raw_module = "./render/nodes/skybox.js")]
extern "C" {
    pub type SkyboxNode;

    #[wasm_bindgen(constructor)]
    pub fn new(options: &JsValue) -> SkyboxNode;
}

#[wasm_bindgen(raw_module = "./util/webxr-button.js")]
extern "C" {
    #[wasm_bindgen(js_name = WebXRButton)]
    pub type WebXrButton;

    #[wasm_bindgen(constructor, js_class = "WebXRButton")]
    pub fn new(options: &JsValue) -> WebXrButton;

    #[wasm_bindgen(method, getter, js_name = domElement)]
    pub fn dom_element(this: &WebXrButton) -> web_sys::HtmlElement;

    #[wasm_bindgen(method, setter)]
    pub fn set_enabled(this: &WebXrButton, enabled: bool);

    /// `null` puts the button back into its "Enter VR" state.
    #[wasm_bindgen(method, js_name = setSession)]
    pub fn set_session(this: &WebXrButton, session: &JsValue);
}

#[wasm_bindgen(raw_module = "./third-party/webxr-polyfill/build/webxr-polyfill.module.js")]
extern "C" {
    /// Installs itself as `navigator.xr` when constructed.
    #[wasm_bindgen(js_name = default)]
    pub type WebXrPolyfill;

    #[wasm_bindgen(constructor, js_class = "default")]
    pub fn new() -> WebXrPolyfill;
}

/// Build a plain `{key: value, ...}` options object.
pub fn options(entries: &[(&str, JsValue)]) -> Result<JsValue, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object.into())
}

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;
use web_sys::XrView;

use odooxr_core::platform::SceneRenderer;
use odooxr_core::ViewerConfig;

use crate::bindings::{options, Gltf2Node, Scene, SkyboxNode};

/// The glTF model inside a skybox, drawn by the JavaScript scene graph.
pub struct WebScene {
    scene: Scene,
}

impl WebScene {
    pub fn new(config: &ViewerConfig) -> Result<Self, JsValue> {
        let scene = Scene::new();
        let model = Gltf2Node::new(&options(&[("url", JsValue::from_str(&config.model_url))])?);
        scene.add_node(&model);
        let skybox = SkyboxNode::new(&options(&[("url", JsValue::from_str(&config.skybox_url))])?);
        scene.add_node(&skybox);
        log::info!("scene: model {} / skybox {}", config.model_url, config.skybox_url);
        Ok(Self { scene })
    }

    /// The scene graph the renderer is attached to once a surface exists.
    pub fn handle(&self) -> Scene {
        self.scene.clone()
    }
}

impl SceneRenderer<XrView> for WebScene {
    fn start_frame(&mut self) {
        self.scene.start_frame();
    }

    fn draw(&mut self, view: &XrView) {
        let projection = Float32Array::from(view.projection_matrix().as_slice());
        self.scene.draw(&projection, &view.transform());
    }

    fn end_frame(&mut self) {
        self.scene.end_frame();
    }
}

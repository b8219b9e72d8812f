use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{Document, UrlSearchParams, Window};

use odooxr_core::{InlineViewInput, SessionKind, ViewerConfig, XrError, XrViewer};

use crate::bindings::{options, WebXrButton, WebXrPolyfill};
use crate::host::WebHost;
use crate::runtime::{has_xr, to_js_error, WebRuntime, WebSession};
use crate::scene::WebScene;
use crate::slot::get_or_try_init;

type WebViewer = XrViewer<WebRuntime, WebHost, WebScene>;

const CONFIG_ATTRIBUTE: &str = "data-xr-config";
const POLYFILL_QUERY_ARG: &str = "usePolyfill";
const BUTTON_CSS: &str = "left: 50%;transform: translateX(-50%);";

/// Handlers the VR button calls back into. They reach the viewer through a
/// weak slot filled once the viewer exists.
struct ButtonCallbacks {
    on_request: Closure<dyn FnMut() -> Promise>,
    on_end: Closure<dyn FnMut(JsValue)>,
}

impl ButtonCallbacks {
    fn new(slot: Rc<RefCell<Weak<WebViewer>>>) -> Self {
        let request_slot = Rc::clone(&slot);
        let on_request = Closure::<dyn FnMut() -> Promise>::new(move || {
            match request_slot.borrow().upgrade() {
                Some(viewer) => enter_immersive(&viewer),
                None => Promise::reject(&JsValue::from_str("viewer is gone")),
            }
        });

        let on_end = Closure::<dyn FnMut(JsValue)>::new(move |session: JsValue| {
            let Some(viewer) = slot.borrow().upgrade() else {
                return;
            };
            match session.dyn_into::<web_sys::XrSession>() {
                Ok(session) => viewer.end_session(&WebSession::new(session, SessionKind::Immersive)),
                Err(value) => log::warn!("VR button passed a non-session value: {value:?}"),
            }
        });

        Self { on_request, on_end }
    }

    fn button_options(&self) -> Result<JsValue, JsValue> {
        options(&[
            ("onRequestSession", self.on_request.as_ref().clone()),
            ("onEndSession", self.on_end.as_ref().clone()),
        ])
    }
}

/// The request goes out synchronously so the button's click still counts as
/// user activation.
fn enter_immersive(viewer: &Rc<WebViewer>) -> Promise {
    let request = viewer.request_immersive();
    future_to_promise(async move {
        request.await.map_err(to_js_error)?;
        Ok(JsValue::UNDEFINED)
    })
}

fn load_config(window: &Window, document: &Document) -> Result<ViewerConfig, JsValue> {
    let attribute = document
        .query_selector(&format!("[{CONFIG_ATTRIBUTE}]"))?
        .and_then(|el| el.get_attribute(CONFIG_ATTRIBUTE));
    let config = match attribute {
        Some(json) => ViewerConfig::from_json(&json).map_err(to_js_error)?,
        None => ViewerConfig::default(),
    };

    let search = window.location().search()?;
    let query = UrlSearchParams::new_with_str(&search)?.get(POLYFILL_QUERY_ARG);
    Ok(config.with_polyfill_query(query.as_deref()))
}

/// The running viewer plus everything that must outlive it on the page.
struct Running {
    viewer: Rc<WebViewer>,
    _callbacks: ButtonCallbacks,
    _polyfill: Option<WebXrPolyfill>,
}

thread_local! {
    static RUNNING: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Handle to the page's viewer. Dropping or freeing it leaves the viewer
/// running; the module holds its own handle for the page's lifetime.
#[wasm_bindgen]
#[derive(Clone)]
pub struct App {
    running: Rc<Running>,
}

impl App {
    /// Build and start the viewer once per page.
    pub fn install() -> Result<App, JsValue> {
        get_or_try_init(&RUNNING, || {
            let app = App::new()?;
            app.start();
            Ok(app)
        })
    }

    fn new() -> Result<App, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let config = load_config(&window, &document)?;
        log::set_max_level(config.log_level());
        log::debug!("viewer config: {config:?}");

        let native_xr = has_xr(&window.navigator());
        let polyfill = config.polyfill.should_install(native_xr).then(|| {
            log::info!("installing WebXR polyfill (native XR: {native_xr})");
            WebXrPolyfill::new()
        });

        let container = document
            .query_selector(&config.container_selector)?
            .ok_or_else(|| {
                to_js_error(XrError::Dom(format!(
                    "container '{}' not found",
                    config.container_selector
                )))
            })?;

        let scene = WebScene::new(&config)?;

        let slot = Rc::new(RefCell::new(Weak::new()));
        let callbacks = ButtonCallbacks::new(Rc::clone(&slot));
        let button = WebXrButton::new(&callbacks.button_options()?);
        let button_element = button.dom_element();
        let style = button_element.style();
        let css = style.css_text();
        style.set_css_text(&format!("{css}{BUTTON_CSS}"));
        container.append_child(&button_element)?;

        let runtime = WebRuntime::new(&window.navigator());
        let host = WebHost::new(window, container, button, scene.handle());
        let viewer = Rc::new(XrViewer::new(
            runtime,
            host,
            scene,
            InlineViewInput::from_config(&config),
        ));
        *slot.borrow_mut() = Rc::downgrade(&viewer);

        Ok(App {
            running: Rc::new(Running {
                viewer,
                _callbacks: callbacks,
                _polyfill: polyfill,
            }),
        })
    }

    fn viewer(&self) -> &Rc<WebViewer> {
        &self.running.viewer
    }

    /// Kick off session setup in the background.
    fn start(&self) {
        let init = self.viewer().init();
        spawn_local(async move {
            if let Err(e) = init.await {
                log::error!("XR viewer failed to start: {e}");
            }
        });
    }
}

#[wasm_bindgen]
impl App {
    /// Inline view yaw in radians.
    #[wasm_bindgen(getter, js_name = lookYaw)]
    pub fn look_yaw(&self) -> f64 {
        self.viewer().look().yaw()
    }

    #[wasm_bindgen(getter, js_name = lookPitch)]
    pub fn look_pitch(&self) -> f64 {
        self.viewer().look().pitch()
    }

    /// Same as pressing the VR button. Must be called from a user gesture.
    #[wasm_bindgen(js_name = enterImmersive)]
    pub fn enter_immersive(&self) -> Promise {
        enter_immersive(self.viewer())
    }

    #[wasm_bindgen(js_name = isSurfaceReady)]
    pub fn is_surface_ready(&self) -> bool {
        self.viewer().is_surface_ready()
    }
}

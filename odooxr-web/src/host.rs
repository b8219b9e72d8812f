//! Page-side resources: the WebGL canvas, its XR layer binding and the
//! enter/exit VR button.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlCanvasElement, WebGl2RenderingContext, WebGlFramebuffer, WebGlRenderingContext,
    Window, XrRenderStateInit, XrView, XrWebGlLayer,
};

use odooxr_core::platform::{FrameTarget, ViewerHost};
use odooxr_core::{InlineViewInput, XrError};

use crate::bindings::{options, Renderer, Scene, WebXrButton};
use crate::input::InputListeners;
use crate::runtime::{js_error, WebSession};

const CANVAS_CSS: &str = "top: 0px;position: absolute;margin-left: auto;margin-right: auto;\
                          left: 0px;right: 0px;width: 100%;height: 100%;";

/// Whichever WebGL flavour the renderer handed back.
#[derive(Clone)]
pub enum GlContext {
    WebGl2(WebGl2RenderingContext),
    WebGl(WebGlRenderingContext),
}

impl GlContext {
    fn from_js(value: JsValue) -> Result<Self, XrError> {
        let value = match value.dyn_into::<WebGl2RenderingContext>() {
            Ok(gl) => return Ok(Self::WebGl2(gl)),
            Err(value) => value,
        };
        value
            .dyn_into::<WebGlRenderingContext>()
            .map(Self::WebGl)
            .map_err(|_| XrError::Surface("no WebGL context available".into()))
    }

    fn as_js(&self) -> &JsValue {
        match self {
            Self::WebGl2(gl) => gl.as_ref(),
            Self::WebGl(gl) => gl.as_ref(),
        }
    }

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        let canvas = match self {
            Self::WebGl2(gl) => gl.canvas(),
            Self::WebGl(gl) => gl.canvas(),
        };
        canvas.and_then(|c| c.dyn_into::<HtmlCanvasElement>().ok())
    }

    fn bind_framebuffer(&self, framebuffer: Option<&WebGlFramebuffer>) {
        match self {
            Self::WebGl2(gl) => gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, framebuffer),
            Self::WebGl(gl) => gl.bind_framebuffer(WebGlRenderingContext::FRAMEBUFFER, framebuffer),
        }
    }

    fn clear(&self) {
        match self {
            Self::WebGl2(gl) => gl.clear(
                WebGl2RenderingContext::COLOR_BUFFER_BIT | WebGl2RenderingContext::DEPTH_BUFFER_BIT,
            ),
            Self::WebGl(gl) => gl.clear(
                WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT,
            ),
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        match self {
            Self::WebGl2(gl) => gl.viewport(x, y, width, height),
            Self::WebGl(gl) => gl.viewport(x, y, width, height),
        }
    }

    fn make_layer(&self, session: &web_sys::XrSession) -> Result<XrWebGlLayer, JsValue> {
        match self {
            Self::WebGl2(gl) => XrWebGlLayer::new_with_web_gl2_rendering_context(session, gl),
            Self::WebGl(gl) => XrWebGlLayer::new_with_web_gl_rendering_context(session, gl),
        }
    }
}

/// Everything created on the first session start. Dropping it removes the
/// page listeners.
struct Surface {
    gl: GlContext,
    window: Window,
    _renderer: Renderer,
    on_resize: Closure<dyn FnMut()>,
    _input: InputListeners,
}

impl Drop for Surface {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) {
    let ratio = window.device_pixel_ratio();
    canvas.set_width((f64::from(canvas.client_width()) * ratio) as u32);
    canvas.set_height((f64::from(canvas.client_height()) * ratio) as u32);
}

pub struct WebHost {
    window: Window,
    container: Element,
    button: WebXrButton,
    scene: Scene,
    surface: Option<Surface>,
}

impl WebHost {
    pub fn new(window: Window, container: Element, button: WebXrButton, scene: Scene) -> Self {
        Self {
            window,
            container,
            button,
            scene,
            surface: None,
        }
    }

    fn gl(&self) -> Result<&GlContext, XrError> {
        self.surface
            .as_ref()
            .map(|s| &s.gl)
            .ok_or_else(|| XrError::Surface("render surface not created".into()))
    }

    fn build_surface(&self, input: Rc<RefCell<InlineViewInput>>) -> Result<Surface, JsValue> {
        let attributes = options(&[("xrCompatible", JsValue::TRUE)])?;
        let gl = GlContext::from_js(Renderer::create_webgl_context(&attributes))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let canvas = gl.canvas().ok_or("WebGL context has no canvas")?;

        let style = canvas.style();
        let css = style.css_text();
        style.set_css_text(&format!("{css}{CANVAS_CSS}"));
        self.container
            .insert_before(&canvas, self.container.first_child().as_ref())?;

        let on_resize = {
            let window = self.window.clone();
            let canvas = canvas.clone();
            Closure::<dyn FnMut()>::new(move || fit_canvas(&window, &canvas))
        };
        self.window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        fit_canvas(&self.window, &canvas);

        let input = InputListeners::attach(&canvas, input)?;

        let renderer = Renderer::new(gl.as_js());
        self.scene.set_renderer(&renderer);

        Ok(Surface {
            gl,
            window: self.window.clone(),
            _renderer: renderer,
            on_resize,
            _input: input,
        })
    }
}

impl ViewerHost for WebHost {
    type Session = WebSession;

    fn create_surface(&mut self, input: Rc<RefCell<InlineViewInput>>) -> Result<(), XrError> {
        let surface = self
            .build_surface(input)
            .map_err(|e| XrError::Surface(js_error(&e)))?;
        self.surface = Some(surface);
        Ok(())
    }

    fn attach_session(&mut self, session: &WebSession) -> Result<(), XrError> {
        let layer = self
            .gl()?
            .make_layer(session.inner())
            .map_err(|e| XrError::RenderTarget(js_error(&e)))?;
        let state = XrRenderStateInit::new();
        state.set_base_layer(Some(&layer));
        session.inner().update_render_state_with_state(&state);
        Ok(())
    }

    fn set_button_session(&mut self, session: Option<&WebSession>) {
        match session {
            Some(session) => self.button.set_session(session.inner().as_ref()),
            None => self.button.set_session(&JsValue::NULL),
        }
    }

    fn set_button_enabled(&mut self, enabled: bool) {
        self.button.set_enabled(enabled);
    }
}

impl FrameTarget<WebSession> for WebHost {
    fn begin_views(&mut self, session: &WebSession) -> Result<(), XrError> {
        let layer = session
            .base_layer()
            .ok_or_else(|| XrError::RenderTarget("session has no base layer".into()))?;
        let gl = self.gl()?;
        // A null framebuffer is the default one, which inline layers render to.
        gl.bind_framebuffer(layer.framebuffer().as_ref());
        gl.clear();
        Ok(())
    }

    fn set_viewport(&mut self, session: &WebSession, view: &XrView) {
        let Some(viewport) = session.base_layer().and_then(|layer| layer.get_viewport(view)) else {
            log::debug!("no viewport for {:?} eye", view.eye());
            return;
        };
        if let Ok(gl) = self.gl() {
            gl.viewport(viewport.x(), viewport.y(), viewport.width(), viewport.height());
        }
    }
}

//! WebXR platform over `web-sys`.

use std::future::ready;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    DomPointInit, Navigator, XrReferenceSpace, XrReferenceSpaceType, XrRigidTransform, XrSessionMode,
    XrView, XrWebGlLayer,
};

use odooxr_core::platform::{FrameCallback, LocalFuture, ReferenceSpace, XrFrame, XrRuntime, XrSession};
use odooxr_core::{ReferenceSpaceType, RigidTransform, SessionKind, XrError};

/// Best-effort text for a rejected promise or thrown value.
pub fn js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub fn to_js_error(error: XrError) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

/// Whether `navigator.xr` is present, natively or through the polyfill.
pub fn has_xr(navigator: &Navigator) -> bool {
    Reflect::get(navigator, &JsValue::from_str("xr"))
        .map(|xr| !xr.is_undefined() && !xr.is_null())
        .unwrap_or(false)
}

fn session_mode(kind: SessionKind) -> XrSessionMode {
    match kind {
        SessionKind::Immersive => XrSessionMode::ImmersiveVr,
        SessionKind::Inline => XrSessionMode::Inline,
    }
}

fn reference_space_type(space_type: ReferenceSpaceType) -> XrReferenceSpaceType {
    match space_type {
        ReferenceSpaceType::Local => XrReferenceSpaceType::Local,
        ReferenceSpaceType::Viewer => XrReferenceSpaceType::Viewer,
    }
}

fn dom_point(xyzw: [f64; 4]) -> DomPointInit {
    let point = DomPointInit::new();
    point.set_x(xyzw[0]);
    point.set_y(xyzw[1]);
    point.set_z(xyzw[2]);
    point.set_w(xyzw[3]);
    point
}

// ─── Reference space / frame ─────────────────────────────────────────

#[derive(Clone)]
pub struct WebSpace(pub XrReferenceSpace);

impl ReferenceSpace for WebSpace {
    fn offset(&self, transform: &RigidTransform) -> Result<Self, XrError> {
        let position = dom_point(transform.position_xyzw());
        let orientation = dom_point(transform.orientation_xyzw());
        let offset = XrRigidTransform::new_with_position_and_orientation(&position, &orientation)
            .map_err(|e| XrError::Transform(js_error(&e)))?;
        Ok(Self(self.0.get_offset_reference_space(&offset)))
    }
}

pub struct WebFrame(pub web_sys::XrFrame);

impl XrFrame for WebFrame {
    type Space = WebSpace;
    type View = XrView;

    fn viewer_views(&self, space: &WebSpace) -> Option<Vec<XrView>> {
        let pose = self.0.get_viewer_pose(&space.0)?;
        Some(
            pose.views()
                .iter()
                .map(|view| view.unchecked_into::<XrView>())
                .collect(),
        )
    }
}

// ─── Session ─────────────────────────────────────────────────────────

/// A platform session tagged with the kind it was requested as.
#[derive(Clone)]
pub struct WebSession {
    inner: web_sys::XrSession,
    kind: SessionKind,
}

impl WebSession {
    pub fn new(inner: web_sys::XrSession, kind: SessionKind) -> Self {
        Self { inner, kind }
    }

    pub fn inner(&self) -> &web_sys::XrSession {
        &self.inner
    }

    pub fn base_layer(&self) -> Option<XrWebGlLayer> {
        self.inner.render_state().base_layer()
    }
}

impl PartialEq for WebSession {
    fn eq(&self, other: &Self) -> bool {
        let this: &JsValue = self.inner.as_ref();
        let that: &JsValue = other.inner.as_ref();
        this == that
    }
}

impl XrSession for WebSession {
    type Space = WebSpace;
    type Frame = WebFrame;

    fn kind(&self) -> SessionKind {
        self.kind
    }

    fn request_reference_space(
        &self,
        space_type: ReferenceSpaceType,
    ) -> LocalFuture<Result<WebSpace, XrError>> {
        let promise = self.inner.request_reference_space(reference_space_type(space_type));
        Box::pin(async move {
            let fail = |reason: String| XrError::ReferenceSpace {
                space: space_type,
                reason,
            };
            let value = JsFuture::from(promise).await.map_err(|e| fail(js_error(&e)))?;
            value
                .dyn_into::<XrReferenceSpace>()
                .map(WebSpace)
                .map_err(|v| fail(format!("not an XRReferenceSpace: {v:?}")))
        })
    }

    fn request_animation_frame(&self, callback: FrameCallback<WebFrame>) {
        let callback = Closure::once_into_js(move |time: f64, frame: web_sys::XrFrame| {
            callback(time, WebFrame(frame));
        });
        self.inner.request_animation_frame(callback.unchecked_ref());
    }

    fn on_end(&self, callback: Box<dyn FnOnce()>) {
        let handler = Closure::once_into_js(move |_event: web_sys::XrSessionEvent| callback());
        self.inner.set_onend(Some(handler.unchecked_ref()));
    }

    fn end(&self) {
        let promise = self.inner.end();
        let kind = self.kind;
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("{kind} session did not end cleanly: {}", js_error(&e));
            }
        });
    }
}

// ─── Runtime ─────────────────────────────────────────────────────────

/// `navigator.xr`, if the page has one.
pub struct WebRuntime {
    xr: Option<web_sys::XrSystem>,
}

impl WebRuntime {
    pub fn new(navigator: &Navigator) -> Self {
        Self {
            xr: has_xr(navigator).then(|| navigator.xr()),
        }
    }
}

impl XrRuntime for WebRuntime {
    type Session = WebSession;

    fn is_available(&self) -> bool {
        self.xr.is_some()
    }

    fn is_session_supported(&self, kind: SessionKind) -> LocalFuture<bool> {
        let Some(xr) = &self.xr else {
            return Box::pin(ready(false));
        };
        let promise = xr.is_session_supported(session_mode(kind));
        Box::pin(async move {
            match JsFuture::from(promise).await {
                Ok(supported) => supported.as_bool().unwrap_or(false),
                Err(e) => {
                    log::warn!("isSessionSupported('{kind}') failed: {}", js_error(&e));
                    false
                }
            }
        })
    }

    fn request_session(&self, kind: SessionKind) -> LocalFuture<Result<WebSession, XrError>> {
        let Some(xr) = &self.xr else {
            return Box::pin(ready(Err(XrError::Unavailable)));
        };
        let promise = xr.request_session(session_mode(kind));
        Box::pin(async move {
            let fail = |reason: String| XrError::SessionRequest { kind, reason };
            let value = JsFuture::from(promise).await.map_err(|e| fail(js_error(&e)))?;
            let session = value
                .dyn_into::<web_sys::XrSession>()
                .map_err(|v| fail(format!("not an XRSession: {v:?}")))?;
            Ok(WebSession::new(session, kind))
        })
    }
}

//! Seams between the viewer logic and the page it runs in.
//!
//! The browser runtime implements these over `web-sys` WebXR, WebGL and DOM
//! types. Everything runs on the page's single UI thread, so none of the
//! traits require `Send` and callbacks are plain boxed closures.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::XrError;
use crate::input::InlineViewInput;
use crate::session::{ReferenceSpaceType, SessionKind};
use crate::transform::RigidTransform;

/// A single-threaded future that owns everything it touches.
pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// One-shot frame callback: display timestamp (ms) and the frame itself.
pub type FrameCallback<F> = Box<dyn FnOnce(f64, F)>;

/// The per-eye view type produced by a session's frames.
pub type ViewOf<S> = <<S as XrSession>::Frame as XrFrame>::View;

/// An immutable coordinate frame. Offsets derive a new space.
pub trait ReferenceSpace: Clone + 'static {
    fn offset(&self, transform: &RigidTransform) -> Result<Self, XrError>;
}

pub trait XrFrame: 'static {
    type Space: ReferenceSpace;
    type View;

    /// Views of the viewer pose relative to `space`, or `None` when the
    /// platform has no pose this frame (e.g. tracking loss).
    fn viewer_views(&self, space: &Self::Space) -> Option<Vec<Self::View>>;
}

pub trait XrSession: Clone + PartialEq + 'static {
    type Space: ReferenceSpace;
    type Frame: XrFrame<Space = Self::Space>;

    fn kind(&self) -> SessionKind;

    fn request_reference_space(
        &self,
        space_type: ReferenceSpaceType,
    ) -> LocalFuture<Result<Self::Space, XrError>>;

    /// Schedule `callback` for the session's next display refresh.
    fn request_animation_frame(&self, callback: FrameCallback<Self::Frame>);

    /// Register the handler run when the session ends, for whatever reason.
    fn on_end(&self, callback: Box<dyn FnOnce()>);

    /// Ask the platform to end the session. Completion is reported through
    /// the [`on_end`](Self::on_end) handler.
    fn end(&self);
}

pub trait XrRuntime: 'static {
    type Session: XrSession;

    /// Whether the page exposes an XR system at all (native or polyfilled).
    fn is_available(&self) -> bool;

    fn is_session_supported(&self, kind: SessionKind) -> LocalFuture<bool>;

    /// Issue a session request. Implementations must send the platform
    /// request before returning so a user gesture in progress still counts.
    fn request_session(&self, kind: SessionKind) -> LocalFuture<Result<Self::Session, XrError>>;
}

/// Page-side resources: the render surface and the enter/exit VR button.
pub trait ViewerHost: 'static {
    type Session: XrSession;

    /// Create the rendering context, put its canvas into the page and hook
    /// the inline-view input listeners up to `input`.
    fn create_surface(&mut self, input: Rc<RefCell<InlineViewInput>>) -> Result<(), XrError>;

    /// Point the session's render state at the surface.
    fn attach_session(&mut self, session: &Self::Session) -> Result<(), XrError>;

    fn set_button_session(&mut self, session: Option<&Self::Session>);

    fn set_button_enabled(&mut self, enabled: bool);
}

/// Render-target operations needed while drawing one XR frame.
pub trait FrameTarget<S: XrSession> {
    /// Bind the session's framebuffer and clear colour and depth.
    fn begin_views(&mut self, session: &S) -> Result<(), XrError>;

    fn set_viewport(&mut self, session: &S, view: &ViewOf<S>);
}

/// The external scene: frame lifecycle hooks plus one draw per view.
pub trait SceneRenderer<V> {
    fn start_frame(&mut self);
    fn draw(&mut self, view: &V);
    fn end_frame(&mut self);
}

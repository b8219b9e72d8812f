//! Session controller.
//!
//! [`XrViewer`] owns every piece of mutable viewer state: the tracked
//! sessions and their reference spaces, the inline look/touch input and the
//! one-time render surface. It lives behind an `Rc` and is only touched from
//! the page's UI thread; no `RefCell` borrow is held across an `.await`, so
//! input events and frame callbacks arriving between async steps always find
//! the state free.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::future::join;

use crate::error::XrError;
use crate::frame::{render_frame, resolve_space, FrameReport};
use crate::input::InlineViewInput;
use crate::look::LookState;
use crate::platform::{FrameTarget, LocalFuture, SceneRenderer, ViewOf, ViewerHost, XrRuntime, XrSession};
use crate::session::{SessionKind, SessionRegistry};

type FrameOf<R> = <<R as XrRuntime>::Session as XrSession>::Frame;

pub struct XrViewer<R: XrRuntime, H, C> {
    runtime: R,
    host: RefCell<H>,
    scene: RefCell<C>,
    input: Rc<RefCell<InlineViewInput>>,
    sessions: RefCell<SessionRegistry<R::Session>>,
    surface_ready: Cell<bool>,
}

impl<R, H, C> XrViewer<R, H, C>
where
    R: XrRuntime,
    H: ViewerHost<Session = R::Session> + FrameTarget<R::Session>,
    C: SceneRenderer<ViewOf<R::Session>> + 'static,
{
    pub fn new(runtime: R, host: H, scene: C, input: InlineViewInput) -> Self {
        Self {
            runtime,
            host: RefCell::new(host),
            scene: RefCell::new(scene),
            input: Rc::new(RefCell::new(input)),
            sessions: RefCell::new(SessionRegistry::new()),
            surface_ready: Cell::new(false),
        }
    }

    /// Input state shared with the canvas listeners.
    pub fn input(&self) -> &Rc<RefCell<InlineViewInput>> {
        &self.input
    }

    pub fn look(&self) -> LookState {
        *self.input.borrow().look()
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready.get()
    }

    pub fn active_session(&self, kind: SessionKind) -> Option<R::Session> {
        self.sessions.borrow().session(kind).cloned()
    }

    /// Enable the VR button according to immersive support and, alongside it,
    /// start the inline session that every XR-capable browser offers.
    pub fn init(self: &Rc<Self>) -> LocalFuture<Result<(), XrError>> {
        if !self.runtime.is_available() {
            log::warn!("WebXR is not available; immersive mode disabled");
            self.host.borrow_mut().set_button_enabled(false);
            return Box::pin(std::future::ready(Ok(())));
        }

        let supported = self.runtime.is_session_supported(SessionKind::Immersive);
        let inline = self.runtime.request_session(SessionKind::Inline);
        let viewer = Rc::clone(self);
        Box::pin(async move {
            let enable_button = async {
                let supported = supported.await;
                log::info!("immersive-vr supported: {supported}");
                viewer.host.borrow_mut().set_button_enabled(supported);
            };
            let start_inline = async {
                let session = inline.await?;
                viewer.start_session(session).await
            };
            // The inline session must not wait on a slow support probe.
            let ((), started) = join(enable_button, start_inline).await;
            started
        })
    }

    /// Enter immersive mode. The platform request goes out before this
    /// returns; a rejection is handed back to the caller untouched.
    pub fn request_immersive(self: &Rc<Self>) -> LocalFuture<Result<(), XrError>> {
        let request = self.runtime.request_session(SessionKind::Immersive);
        let viewer = Rc::clone(self);
        Box::pin(async move {
            let session = request.await.inspect_err(|e| log::warn!("{e}"))?;
            viewer.host.borrow_mut().set_button_session(Some(&session));
            viewer.start_session(session).await
        })
    }

    pub fn end_session(&self, session: &R::Session) {
        log::info!("ending {} session", session.kind());
        session.end();
    }

    /// Forget an ended session so no further frames are scheduled for it.
    /// Only the immersive session owns the VR button.
    pub fn on_session_ended(&self, session: &R::Session) {
        let kind = session.kind();
        let tracked = self.sessions.borrow_mut().remove(session);
        if kind.is_immersive() {
            self.host.borrow_mut().set_button_session(None);
        }
        log::info!("{kind} session ended (tracked: {tracked})");
    }

    /// Bring up a freshly granted session: surface (first time only), render
    /// target, reference space, then the first frame callback.
    pub fn start_session(self: &Rc<Self>, session: R::Session) -> LocalFuture<Result<(), XrError>> {
        let viewer = Rc::clone(self);
        Box::pin(async move {
            let kind = session.kind();
            log::info!("{kind} session started");

            let weak = Rc::downgrade(&viewer);
            let ended = session.clone();
            session.on_end(Box::new(move || {
                if let Some(viewer) = weak.upgrade() {
                    viewer.on_session_ended(&ended);
                }
            }));

            viewer.ensure_surface()?;
            viewer.host.borrow_mut().attach_session(&session)?;

            let replaced = viewer.sessions.borrow_mut().track(session.clone()).is_some();
            if replaced {
                log::warn!("a previous {kind} session was still tracked; replacing it");
            }

            let space_type = kind.reference_space_type();
            let space = session
                .request_reference_space(space_type)
                .await
                .inspect_err(|e| log::error!("{e}"))?;
            log::debug!("'{space_type}' reference space granted for {kind} session");

            if viewer.sessions.borrow_mut().set_space(&session, space) {
                viewer.schedule_frame(&session);
            } else {
                log::debug!("{kind} session ended before its reference space arrived");
            }
            Ok(())
        })
    }

    fn ensure_surface(&self) -> Result<(), XrError> {
        if self.surface_ready.get() {
            return Ok(());
        }
        self.host.borrow_mut().create_surface(Rc::clone(&self.input))?;
        self.surface_ready.set(true);
        log::info!("render surface created");
        Ok(())
    }

    fn schedule_frame(self: &Rc<Self>, session: &R::Session) {
        if !self.sessions.borrow().is_active(session) {
            return;
        }
        let weak = Rc::downgrade(self);
        let current = session.clone();
        session.request_animation_frame(Box::new(move |time, frame| {
            if let Some(viewer) = weak.upgrade() {
                viewer.on_frame(&current, time, frame);
            }
        }));
    }

    /// Frame callback. Returns `None` when the frame was dropped because the
    /// session is no longer active.
    pub fn on_frame(
        self: &Rc<Self>,
        session: &R::Session,
        time: f64,
        frame: FrameOf<R>,
    ) -> Option<FrameReport> {
        let kind = session.kind();
        let Some(base) = self.sessions.borrow().space_for(session).cloned() else {
            log::debug!("dropping {kind} frame at {time:.1}ms: session not active");
            return None;
        };

        let space = {
            let input = self.input.borrow();
            match resolve_space(kind, &base, input.look()) {
                Ok(space) => space,
                Err(e) => {
                    log::warn!("inline view adjustment failed, using viewer space: {e}");
                    base
                }
            }
        };

        let mut host = self.host.borrow_mut();
        let mut scene = self.scene.borrow_mut();
        let report = render_frame(session, &frame, &space, &mut *host, &mut *scene, || {
            self.schedule_frame(session)
        });
        log::trace!("{kind} frame at {time:.1}ms: {report:?}");
        Some(report)
    }
}

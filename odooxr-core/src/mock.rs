//! Recording doubles for the platform traits. Every call lands in a shared
//! event log so tests can assert on ordering.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::{pending, ready};
use std::ops::Deref;
use std::rc::Rc;

use crate::error::XrError;
use crate::input::InlineViewInput;
use crate::platform::{
    FrameCallback, FrameTarget, LocalFuture, ReferenceSpace, SceneRenderer, ViewerHost, XrFrame,
    XrRuntime, XrSession,
};
use crate::session::{ReferenceSpaceType, SessionKind};
use crate::transform::RigidTransform;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RequestSession(SessionKind),
    CreateSurface,
    AttachSession(u32),
    ButtonSession(Option<u32>),
    ButtonEnabled(bool),
    RequestSpace(u32, ReferenceSpaceType),
    RequestFrame(u32),
    EndRequested(u32),
    Pose(String),
    BeginViews(u32),
    Viewport(u32),
    StartFrame,
    Draw(u32),
    EndFrame,
    Scheduled,
}

#[derive(Default)]
pub struct WorldState {
    events: RefCell<Vec<Event>>,
    next_id: Cell<u32>,
    pending_frames: RefCell<Vec<(u32, FrameCallback<MockFrame>)>>,
    end_handlers: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
    seen_spaces: RefCell<Vec<MockSpace>>,
    pub fail_render_target: Cell<bool>,
    pub fail_reference_space: Cell<bool>,
}

/// Shared handle to the simulated platform.
#[derive(Clone, Default)]
pub struct MockWorld(Rc<WorldState>);

impl Deref for MockWorld {
    type Target = WorldState;

    fn deref(&self) -> &WorldState {
        &self.0
    }
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, kind: SessionKind) -> MockSession {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        MockSession {
            id,
            kind,
            world: self.clone(),
        }
    }

    pub fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending_frames.borrow().len()
    }

    /// Deliver every pending frame callback with the given pose. Returns the
    /// number of callbacks run.
    pub fn run_frames(&self, views: Option<Vec<MockView>>) -> usize {
        let pending = std::mem::take(&mut *self.pending_frames.borrow_mut());
        let count = pending.len();
        for (_, callback) in pending {
            callback(16.0, MockFrame::new(self, views.clone()));
        }
        count
    }

    /// Fire the end handler the platform would run once `session` is over.
    pub fn end(&self, session: &MockSession) -> bool {
        let handler = {
            let mut handlers = self.end_handlers.borrow_mut();
            let index = handlers.iter().position(|(id, _)| *id == session.id);
            index.map(|i| handlers.remove(i).1)
        };
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn seen_spaces(&self) -> Vec<MockSpace> {
        self.seen_spaces.borrow().clone()
    }
}

// ─── Reference space / frame ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MockSpace {
    pub name: String,
    pub offsets: Vec<RigidTransform>,
}

impl MockSpace {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            offsets: Vec::new(),
        }
    }

    pub fn label(&self) -> String {
        if self.offsets.is_empty() {
            self.name.clone()
        } else {
            format!("{}*{}", self.name, self.offsets.len())
        }
    }
}

impl ReferenceSpace for MockSpace {
    fn offset(&self, transform: &RigidTransform) -> Result<Self, XrError> {
        let mut derived = self.clone();
        derived.offsets.push(*transform);
        Ok(derived)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockView(pub u32);

pub struct MockFrame {
    world: MockWorld,
    views: Option<Vec<MockView>>,
}

impl MockFrame {
    pub fn new(world: &MockWorld, views: Option<Vec<MockView>>) -> Self {
        Self {
            world: world.clone(),
            views,
        }
    }
}

impl XrFrame for MockFrame {
    type Space = MockSpace;
    type View = MockView;

    fn viewer_views(&self, space: &MockSpace) -> Option<Vec<MockView>> {
        self.world.record(Event::Pose(space.label()));
        self.world.seen_spaces.borrow_mut().push(space.clone());
        self.views.clone()
    }
}

// ─── Session / runtime ───────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSession {
    pub id: u32,
    pub kind: SessionKind,
    world: MockWorld,
}

impl PartialEq for MockSession {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for MockSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSession")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl XrSession for MockSession {
    type Space = MockSpace;
    type Frame = MockFrame;

    fn kind(&self) -> SessionKind {
        self.kind
    }

    fn request_reference_space(
        &self,
        space_type: ReferenceSpaceType,
    ) -> LocalFuture<Result<MockSpace, XrError>> {
        self.world.record(Event::RequestSpace(self.id, space_type));
        let result = if self.world.fail_reference_space.get() {
            Err(XrError::ReferenceSpace {
                space: space_type,
                reason: "NotSupportedError".into(),
            })
        } else {
            Ok(MockSpace::named(space_type.as_str()))
        };
        Box::pin(ready(result))
    }

    fn request_animation_frame(&self, callback: FrameCallback<MockFrame>) {
        self.world.record(Event::RequestFrame(self.id));
        self.world.pending_frames.borrow_mut().push((self.id, callback));
    }

    fn on_end(&self, callback: Box<dyn FnOnce()>) {
        self.world.end_handlers.borrow_mut().push((self.id, callback));
    }

    fn end(&self) {
        self.world.record(Event::EndRequested(self.id));
    }
}

pub struct MockRuntime {
    world: MockWorld,
    pub available: bool,
    pub immersive_supported: bool,
    pub reject_immersive: bool,
    /// Leave `is_session_supported` unresolved forever.
    pub support_pending: bool,
}

impl MockRuntime {
    pub fn new(world: &MockWorld) -> Self {
        Self {
            world: world.clone(),
            available: true,
            immersive_supported: true,
            reject_immersive: false,
            support_pending: false,
        }
    }
}

impl XrRuntime for MockRuntime {
    type Session = MockSession;

    fn is_available(&self) -> bool {
        self.available
    }

    fn is_session_supported(&self, kind: SessionKind) -> LocalFuture<bool> {
        if self.support_pending {
            return Box::pin(pending());
        }
        Box::pin(ready(!kind.is_immersive() || self.immersive_supported))
    }

    fn request_session(&self, kind: SessionKind) -> LocalFuture<Result<MockSession, XrError>> {
        self.world.record(Event::RequestSession(kind));
        let result = if kind.is_immersive() && self.reject_immersive {
            Err(XrError::SessionRequest {
                kind,
                reason: "NotAllowedError".into(),
            })
        } else {
            Ok(self.world.session(kind))
        };
        Box::pin(ready(result))
    }
}

// ─── Host / scene ────────────────────────────────────────────────────

pub struct MockHost {
    world: MockWorld,
}

impl MockHost {
    pub fn new(world: &MockWorld) -> Self {
        Self {
            world: world.clone(),
        }
    }
}

impl ViewerHost for MockHost {
    type Session = MockSession;

    fn create_surface(&mut self, _input: Rc<RefCell<InlineViewInput>>) -> Result<(), XrError> {
        self.world.record(Event::CreateSurface);
        Ok(())
    }

    fn attach_session(&mut self, session: &MockSession) -> Result<(), XrError> {
        self.world.record(Event::AttachSession(session.id));
        Ok(())
    }

    fn set_button_session(&mut self, session: Option<&MockSession>) {
        self.world.record(Event::ButtonSession(session.map(|s| s.id)));
    }

    fn set_button_enabled(&mut self, enabled: bool) {
        self.world.record(Event::ButtonEnabled(enabled));
    }
}

impl FrameTarget<MockSession> for MockHost {
    fn begin_views(&mut self, session: &MockSession) -> Result<(), XrError> {
        if self.world.fail_render_target.get() {
            return Err(XrError::RenderTarget("context lost".into()));
        }
        self.world.record(Event::BeginViews(session.id));
        Ok(())
    }

    fn set_viewport(&mut self, _session: &MockSession, view: &MockView) {
        self.world.record(Event::Viewport(view.0));
    }
}

pub struct MockScene {
    world: MockWorld,
}

impl MockScene {
    pub fn new(world: &MockWorld) -> Self {
        Self {
            world: world.clone(),
        }
    }
}

impl SceneRenderer<MockView> for MockScene {
    fn start_frame(&mut self) {
        self.world.record(Event::StartFrame);
    }

    fn draw(&mut self, view: &MockView) {
        self.world.record(Event::Draw(view.0));
    }

    fn end_frame(&mut self) {
        self.world.record(Event::EndFrame);
    }
}

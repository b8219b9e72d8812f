use std::fmt;

use crate::platform::XrSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Head-mounted display, fully occupying the user's view.
    Immersive,
    /// Renders into a page element, steered by mouse or touch.
    Inline,
}

impl SessionKind {
    /// WebXR `XRSessionMode` string.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Immersive => "immersive-vr",
            Self::Inline => "inline",
        }
    }

    pub fn is_immersive(&self) -> bool {
        matches!(self, Self::Immersive)
    }

    /// Immersive sessions track the room (`local`); inline ones start from
    /// the viewer and get their orientation from drag input.
    pub fn reference_space_type(&self) -> ReferenceSpaceType {
        match self {
            Self::Immersive => ReferenceSpaceType::Local,
            Self::Inline => ReferenceSpaceType::Viewer,
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mode())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceType {
    Local,
    Viewer,
}

impl ReferenceSpaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ReferenceSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct TrackedSession<S: XrSession> {
    session: S,
    space: Option<S::Space>,
}

/// Sessions currently being driven, at most one per kind, each with the
/// reference space it renders against once that has been granted.
pub struct SessionRegistry<S: XrSession> {
    immersive: Option<TrackedSession<S>>,
    inline: Option<TrackedSession<S>>,
}

impl<S: XrSession> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            immersive: None,
            inline: None,
        }
    }

    fn slot(&self, kind: SessionKind) -> Option<&TrackedSession<S>> {
        match kind {
            SessionKind::Immersive => self.immersive.as_ref(),
            SessionKind::Inline => self.inline.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: SessionKind) -> &mut Option<TrackedSession<S>> {
        match kind {
            SessionKind::Immersive => &mut self.immersive,
            SessionKind::Inline => &mut self.inline,
        }
    }

    fn tracked_mut(&mut self, session: &S) -> Option<&mut TrackedSession<S>> {
        self.slot_mut(session.kind())
            .as_mut()
            .filter(|tracked| tracked.session == *session)
    }

    /// Start tracking `session`, returning whichever session of the same
    /// kind it displaced.
    pub fn track(&mut self, session: S) -> Option<S> {
        let slot = self.slot_mut(session.kind());
        let previous = slot.take().map(|tracked| tracked.session);
        *slot = Some(TrackedSession { session, space: None });
        previous
    }

    /// Store the granted reference space. Returns `false` if the session is
    /// no longer tracked (it ended while the request was in flight).
    pub fn set_space(&mut self, session: &S, space: S::Space) -> bool {
        match self.tracked_mut(session) {
            Some(tracked) => {
                tracked.space = Some(space);
                true
            }
            None => false,
        }
    }

    pub fn space_for(&self, session: &S) -> Option<&S::Space> {
        self.slot(session.kind())
            .filter(|tracked| tracked.session == *session)
            .and_then(|tracked| tracked.space.as_ref())
    }

    pub fn is_active(&self, session: &S) -> bool {
        self.slot(session.kind())
            .is_some_and(|tracked| tracked.session == *session)
    }

    pub fn session(&self, kind: SessionKind) -> Option<&S> {
        self.slot(kind).map(|tracked| &tracked.session)
    }

    /// Forget `session` and its space. Returns `false` if it was not tracked.
    pub fn remove(&mut self, session: &S) -> bool {
        let slot = self.slot_mut(session.kind());
        if slot.as_ref().is_some_and(|tracked| tracked.session == *session) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

impl<S: XrSession> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

//! OdooXR core
//!
//! Platform-independent half of the OdooXR viewer: look/touch state for inline
//! sessions, the reference-space adjustment math, per-session bookkeeping, the
//! per-frame render sequence and the session controller that ties them
//! together. The browser runtime (`odooxr-web`) implements the traits in
//! [`platform`] over `web-sys`; tests implement them with recording mocks.

pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod look;
pub mod platform;
pub mod session;
pub mod touch;
pub mod transform;
pub mod viewer;

#[cfg(test)]
mod mock;

pub use config::{PolyfillMode, ViewerConfig};
pub use error::XrError;
pub use input::InlineViewInput;
pub use look::{LookState, LOOK_SPEED};
pub use platform::{FrameTarget, ReferenceSpace, SceneRenderer, ViewerHost, XrFrame, XrRuntime, XrSession};
pub use session::{ReferenceSpaceType, SessionKind};
pub use touch::TouchPoint;
pub use transform::RigidTransform;
pub use viewer::XrViewer;

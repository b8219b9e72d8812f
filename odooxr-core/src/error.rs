use crate::session::{ReferenceSpaceType, SessionKind};

/// Errors surfaced by the viewer. Platform rejections are carried as their
/// debug text so they can cross the wasm boundary unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XrError {
    #[error("WebXR is not available on this platform")]
    Unavailable,

    #[error("{kind} session request failed: {reason}")]
    SessionRequest { kind: SessionKind, reason: String },

    #[error("'{space}' reference space request failed: {reason}")]
    ReferenceSpace { space: ReferenceSpaceType, reason: String },

    #[error("invalid rigid transform: {0}")]
    Transform(String),

    #[error("render target error: {0}")]
    RenderTarget(String),

    #[error("render surface error: {0}")]
    Surface(String),

    #[error("invalid viewer config: {0}")]
    Config(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

use std::f64::consts::FRAC_PI_2;

use glam::DQuat;

use crate::error::XrError;
use crate::platform::ReferenceSpace;
use crate::transform::RigidTransform;

/// Radians of rotation per pixel of drag.
pub const LOOK_SPEED: f64 = 0.0025;

/// Accumulated look direction for inline sessions.
///
/// Pitch stays within [-π/2, π/2]; yaw is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookState {
    yaw: f64,
    pitch: f64,
}

impl LookState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Apply a drag of `dx`/`dy` pixels at [`LOOK_SPEED`].
    pub fn rotate_view(&mut self, dx: f64, dy: f64) {
        self.rotate_view_scaled(dx, dy, LOOK_SPEED);
    }

    pub fn rotate_view_scaled(&mut self, dx: f64, dy: f64, speed: f64) {
        self.yaw += dx * speed;
        self.pitch = (self.pitch + dy * speed).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Inverse of the look orientation: identity, then -pitch about X, then
    /// -yaw about Y, each right-multiplied.
    pub fn inverse_orientation(&self) -> DQuat {
        DQuat::IDENTITY * DQuat::from_rotation_x(-self.pitch) * DQuat::from_rotation_y(-self.yaw)
    }

    /// Zero-translation offset to apply to the inline viewer space.
    pub fn offset_transform(&self) -> RigidTransform {
        RigidTransform::from_orientation(self.inverse_orientation())
    }
}

/// Derive the space an inline session renders against. `base` is left
/// untouched; reference spaces are immutable.
pub fn adjust_reference_space<S: ReferenceSpace>(base: &S, look: &LookState) -> Result<S, XrError> {
    base.offset(&look.offset_transform())
}

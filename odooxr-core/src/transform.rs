use glam::{DQuat, DVec3};

/// Translation plus unit orientation, the shape of an `XRRigidTransform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    /// A pure rotation about the origin.
    pub fn from_orientation(orientation: DQuat) -> Self {
        Self {
            position: DVec3::ZERO,
            orientation,
        }
    }

    /// Position as a homogeneous point `[x, y, z, 1]` (DOMPointInit layout).
    pub fn position_xyzw(&self) -> [f64; 4] {
        [self.position.x, self.position.y, self.position.z, 1.0]
    }

    pub fn orientation_xyzw(&self) -> [f64; 4] {
        self.orientation.to_array()
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

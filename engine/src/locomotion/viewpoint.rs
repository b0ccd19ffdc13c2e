//! Viewpoint Node
//!
//! The rig origin the locomotion core moves around: a position and a yaw.
//! Head tracking happens on top of this node, so pitch and roll belong to the
//! headset, not here.
//!
//! Yaw is in degrees, kept in [0, 360); positive yaw turns right (clockwise
//! seen from above, with -Z forward).

use glam::Vec3;

/// Position and heading of the controlled viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewpointNode {
    /// World position of the rig origin (floor level under the head)
    pub position: Vec3,
    /// Heading around the vertical axis, in degrees
    pub yaw_degrees: f32,
}

impl ViewpointNode {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw_degrees: 0.0,
        }
    }

    /// Turn by `degrees` around the vertical axis, keeping yaw in [0, 360).
    pub fn rotate(&mut self, degrees: f32) {
        self.yaw_degrees = (self.yaw_degrees + degrees).rem_euclid(360.0);
    }
}

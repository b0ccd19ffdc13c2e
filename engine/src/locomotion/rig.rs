//! Tracked Rig
//!
//! Snapshot of the tracked collaborators the controller reads: the head, and
//! per hand a pointer (aim ray) and a marker (where that pointer lands).
//! The owner refreshes it each frame from the XR runtime. Every part is
//! optional; the controller falls back when one is missing.

use glam::Vec3;

use crate::input::Hand;

/// Tracked head, relative to the viewpoint node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    /// Eye height above the viewpoint origin in meters
    pub height: f32,
    /// World-space look direction
    pub forward: Vec3,
}

/// A hand's aim ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPose {
    /// World-space aim direction
    pub forward: Vec3,
    /// Whether the pointer is currently aiming at a valid destination
    pub is_targeting: bool,
}

/// Pointer and marker for one hand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandRig {
    pub pointer: Option<PointerPose>,
    /// World position of the destination marker
    pub marker: Option<Vec3>,
}

impl HandRig {
    /// Destination for a move, when this hand has a marker and a pointer
    /// that is targeting.
    pub fn destination(&self) -> Option<Vec3> {
        match (self.marker, self.pointer) {
            (Some(marker), Some(pointer)) if pointer.is_targeting => Some(marker),
            _ => None,
        }
    }
}

/// Everything tracked around the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackedRig {
    pub head: Option<HeadPose>,
    pub left: HandRig,
    pub right: HandRig,
}

impl TrackedRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hand(&self, hand: Hand) -> &HandRig {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, hand: Hand) -> &mut HandRig {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Aim `hand` at `marker` with a targeting pointer.
    pub fn aim(&mut self, hand: Hand, marker: Vec3, pointer_forward: Vec3) {
        let rig = self.hand_mut(hand);
        rig.marker = Some(marker);
        rig.pointer = Some(PointerPose {
            forward: pointer_forward,
            is_targeting: true,
        });
    }

    /// Eye height, or `fallback` when no head is tracked.
    pub fn head_height_or(&self, fallback: f32) -> f32 {
        self.head.map_or(fallback, |head| head.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_requires_targeting_pointer() {
        let mut hand = HandRig {
            marker: Some(Vec3::new(0.0, 0.0, -5.0)),
            pointer: None,
        };
        assert_eq!(hand.destination(), None);

        hand.pointer = Some(PointerPose {
            forward: Vec3::NEG_Z,
            is_targeting: false,
        });
        assert_eq!(hand.destination(), None);

        hand.pointer = Some(PointerPose {
            forward: Vec3::NEG_Z,
            is_targeting: true,
        });
        assert_eq!(hand.destination(), Some(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_head_height_fallback() {
        let mut rig = TrackedRig::new();
        assert_eq!(rig.head_height_or(2.0), 2.0);
        rig.head = Some(HeadPose {
            height: 1.6,
            forward: Vec3::NEG_Z,
        });
        assert_eq!(rig.head_height_or(2.0), 1.6);
    }

    #[test]
    fn test_aim_sets_hand() {
        let mut rig = TrackedRig::new();
        rig.aim(Hand::Left, Vec3::ONE, Vec3::NEG_Z);
        assert_eq!(rig.hand(Hand::Left).destination(), Some(Vec3::ONE));
        assert_eq!(rig.hand(Hand::Right).destination(), None);
    }
}

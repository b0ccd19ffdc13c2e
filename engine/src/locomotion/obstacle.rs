//! Obstacle Policy
//!
//! Validates a candidate move with forward-looking ray casts before it is
//! committed. There is no contact resolution: a blocked move is a hard stop,
//! never a slide along the surface.
//!
//! # Checks
//!
//! - **Downward** (walking only): from the candidate at head height, straight
//!   down for `head_height + 0.1`, against the no-go layer. A hit means
//!   something sits below eye level at the destination.
//! - **Forward**: from the current position at head height, along the
//!   horizontal part of the displacement, for ten times its length, against
//!   the no-go layer. A hit means a wall ahead.
//! - **Ground probe**: from the candidate at head height, straight down for
//!   `head_height + 0.5`, against the ground layer. Walking snaps onto the
//!   hit; flying uses it to decide when to land.

use glam::Vec3;

use crate::physics::{CollisionLayer, CollisionQuery};

/// Extra length of the downward no-go check below the feet
pub const DOWN_CHECK_MARGIN: f32 = 0.1;

/// Extra length of the ground probe below the feet
pub const GROUND_PROBE_MARGIN: f32 = 0.5;

/// Forward check length as a multiple of the displacement length
pub const FORWARD_CHECK_SCALE: f32 = 10.0;

/// `snap_to_ground` probe starts this far above the viewpoint
pub const SNAP_PROBE_RISE: f32 = 1.0;

/// `snap_to_ground` probe length
pub const SNAP_PROBE_LENGTH: f32 = 2.0;

/// Which check stopped a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// No-go geometry below eye level at the destination
    Below,
    /// No-go geometry ahead
    Ahead,
}

/// Outcome of validating a candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Commit,
    Blocked(Blocker),
}

/// Ray-cast checks for one frame, at the current head height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstaclePolicy {
    head_height: f32,
}

impl ObstaclePolicy {
    pub fn new(head_height: f32) -> Self {
        Self { head_height }
    }

    pub fn head_height(&self) -> f32 {
        self.head_height
    }

    fn eye(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.head_height
    }

    /// Downward no-go check at the candidate position.
    pub fn blocked_below<Q: CollisionQuery + ?Sized>(&self, world: &Q, candidate: Vec3) -> bool {
        world.ray_test(
            self.eye(candidate),
            Vec3::NEG_Y,
            self.head_height + DOWN_CHECK_MARGIN,
            CollisionLayer::NoGo,
        )
    }

    /// Forward no-go check along the horizontal part of `displacement`.
    ///
    /// A purely vertical or zero displacement has nothing ahead of it.
    pub fn blocked_ahead<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        position: Vec3,
        displacement: Vec3,
    ) -> bool {
        let horizontal = Vec3::new(displacement.x, 0.0, displacement.z);
        if horizontal.length_squared() <= f32::EPSILON * f32::EPSILON {
            return false;
        }
        world.ray_test(
            self.eye(position),
            horizontal,
            displacement.length() * FORWARD_CHECK_SCALE,
            CollisionLayer::NoGo,
        )
    }

    /// Run the checks that apply to the current mode.
    ///
    /// Flying skips the downward check.
    pub fn evaluate<Q: CollisionQuery + ?Sized>(
        &self,
        world: &Q,
        position: Vec3,
        candidate: Vec3,
        displacement: Vec3,
        flying: bool,
    ) -> Verdict {
        if !flying && self.blocked_below(world, candidate) {
            return Verdict::Blocked(Blocker::Below);
        }
        if self.blocked_ahead(world, position, displacement) {
            return Verdict::Blocked(Blocker::Ahead);
        }
        Verdict::Commit
    }

    /// Height of walkable ground under `position`, if any is within reach.
    pub fn ground_height<Q: CollisionQuery + ?Sized>(&self, world: &Q, position: Vec3) -> Option<f32> {
        world
            .ray_cast(
                self.eye(position),
                Vec3::NEG_Y,
                self.head_height + GROUND_PROBE_MARGIN,
                CollisionLayer::Ground,
            )
            .map(|hit| hit.point.y)
    }
}

/// One-shot ground placement probe used by `snap_to_ground`.
pub fn snap_probe<Q: CollisionQuery + ?Sized>(world: &Q, position: Vec3) -> Option<Vec3> {
    world
        .ray_cast(
            position + Vec3::Y * SNAP_PROBE_RISE,
            Vec3::NEG_Y,
            SNAP_PROBE_LENGTH,
            CollisionLayer::Ground,
        )
        .map(|hit| hit.point)
}

//! Locomotion Module
//!
//! First-person movement of a head-mounted viewpoint.
//!
//! # Components
//!
//! - [`LocomotionController`] - Event-driven state machine (Idle, MovingToTarget, Flying)
//!   - Teleport behind a fade, or glide to a marker
//!   - Thumbstick walking with ground following, and flying with auto-landing
//! - [`LocomotionConfig`] - Tuning, loadable from JSON
//! - [`integrate`] - Velocity-acceleration-friction step
//! - [`ObstaclePolicy`] - Ray-cast validation of candidate moves
//! - [`FadeController`] - Opacity ramp that gates the teleport jump
//! - [`RotationSmoother`] - Damped turning
//! - [`TrackedRig`] - Head, pointer and marker poses read each frame

pub mod config;
pub mod controller;
pub mod fade;
pub mod motion;
pub mod obstacle;
pub mod rig;
pub mod rotation;
pub mod viewpoint;

pub use config::{ConfigError, LocomotionConfig, MovementDevice, MovementStyle};
pub use controller::{
    GLIDE_DAMPING, GLIDE_SPRING, LocomotionController, LocomotionMode, LocomotionNotice, ModeKind,
    Notify,
};
pub use fade::{FadeController, FadeOverlay, FadeState, FadeUniforms, FadeUpdate, FadeVisual};
pub use motion::{MotionParams, MotionState, candidate_position, integrate};
pub use obstacle::{Blocker, ObstaclePolicy, Verdict, snap_probe};
pub use rig::{HandRig, HeadPose, PointerPose, TrackedRig};
pub use rotation::RotationSmoother;
pub use viewpoint::ViewpointNode;

//! Motion Integrator
//!
//! Velocity-acceleration-friction integration for the viewpoint.
//!
//! # Physics Model
//!
//! Velocity is a per-frame displacement: the candidate position is simply
//! `position + velocity`. Each frame:
//!
//! ```text
//! dv       = acceleration * acceleration_factor * dt
//! friction = velocity * (0.5 + friction_factor)     * dt   (x, z)
//!            velocity * (0.5 + friction_factor / 2) * dt   (y)
//! velocity = clamp_length(velocity + dv - friction, max_speed)
//! ```
//!
//! Friction is kinetic (proportional to velocity), and the vertical axis damps
//! at a lower rate so ascent and descent stay controllable. The friction term
//! is capped at the current velocity, so a long frame can stop motion but
//! never reverse it.
//!
//! # Usage
//!
//! ```rust,ignore
//! let params = MotionParams::from_config(&config);
//! state = integrate(&state, &params, delta_time);
//! let candidate = candidate_position(node.position, state.velocity, params.max_flying_height);
//! ```

use glam::Vec3;

use super::config::LocomotionConfig;

/// Base kinetic friction rate per second
pub const BASE_FRICTION: f32 = 0.5;

/// Translational and angular motion of the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    /// Per-frame displacement in meters
    pub velocity: Vec3,
    /// Current push, set from input or from a glide target
    pub acceleration: Vec3,
    /// Degrees per frame around the vertical axis
    pub angular_velocity: f32,
    /// Current turn push
    pub angular_acceleration: f32,
    /// Extra damping on top of the base friction (brakes, glide damping)
    pub friction_factor: f32,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hard stop: zero velocity and acceleration.
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
    }

    /// Hard stop that also drops any extra damping.
    pub fn reset_translation(&mut self) {
        self.halt();
        self.friction_factor = 0.0;
    }

    /// Current speed (meters per frame).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Integration constants taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub acceleration_factor: f32,
    pub max_speed: f32,
    pub max_flying_height: f32,
}

impl MotionParams {
    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self {
            acceleration_factor: config.acceleration_factor,
            max_speed: config.max_speed,
            max_flying_height: config.max_flying_height,
        }
    }
}

/// Advance translational velocity by one frame.
///
/// Only `velocity` changes; the rest of the state is carried through.
/// Friction never reverses the direction of travel, even on long frames.
pub fn integrate(state: &MotionState, params: &MotionParams, dt: f32) -> MotionState {
    let dt = dt.max(0.0);

    let delta_velocity = state.acceleration * params.acceleration_factor * dt;

    let horizontal_damping = ((BASE_FRICTION + state.friction_factor) * dt).clamp(0.0, 1.0);
    let vertical_damping = ((BASE_FRICTION + state.friction_factor / 2.0) * dt).clamp(0.0, 1.0);
    let friction = state.velocity * Vec3::new(horizontal_damping, vertical_damping, horizontal_damping);

    let velocity = (state.velocity + delta_velocity - friction).clamp_length_max(params.max_speed);

    MotionState { velocity, ..*state }
}

/// Where the viewpoint would be after applying `velocity`, with height kept
/// inside [0, max_flying_height].
pub fn candidate_position(position: Vec3, velocity: Vec3, max_flying_height: f32) -> Vec3 {
    let mut candidate = position + velocity;
    candidate.y = candidate.y.clamp(0.0, max_flying_height);
    candidate
}

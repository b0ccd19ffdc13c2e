//! Rotation Smoother
//!
//! First-order damped turning from the thumbstick's horizontal axis:
//!
//! ```text
//! angular_velocity += angular_acceleration * dt * rotation_acceleration_factor
//!                   - angular_velocity * dt * rotation_friction_factor
//! yaw += angular_velocity        (degrees per frame)
//! ```
//!
//! The friction term is capped at the current angular velocity, so a long
//! frame stops a turn without reversing it. Runs on the same tick as
//! translation but never interacts with it.

use super::config::LocomotionConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationSmoother {
    acceleration_factor: f32,
    friction_factor: f32,
}

impl RotationSmoother {
    pub fn new(acceleration_factor: f32, friction_factor: f32) -> Self {
        Self {
            acceleration_factor,
            friction_factor,
        }
    }

    pub fn from_config(config: &LocomotionConfig) -> Self {
        Self::new(
            config.rotation_acceleration_factor,
            config.rotation_friction_factor,
        )
    }

    /// Next angular velocity after one frame.
    pub fn step(&self, angular_velocity: f32, angular_acceleration: f32, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        let decay = (angular_velocity * dt * self.friction_factor).clamp(
            -angular_velocity.abs(),
            angular_velocity.abs(),
        );
        angular_velocity + angular_acceleration * dt * self.acceleration_factor - decay
    }
}

impl Default for RotationSmoother {
    fn default() -> Self {
        Self::from_config(&LocomotionConfig::default())
    }
}

//! Locomotion Configuration
//!
//! Read-only tuning supplied when the controller is built. Loadable from JSON;
//! every field has a default, so a document only needs the values it changes.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = LocomotionConfig::from_json_str(r#"{"movement_style": "glide", "fade_duration": 1.0}"#)?;
//! ```

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::Hand;

/// Default acceleration multiplier
pub const ACCELERATION_FACTOR: f32 = 1.0;

/// Accepted range for the acceleration multiplier
pub const ACCELERATION_FACTOR_RANGE: (f32, f32) = (1.0, 5.0);

/// Maximum height above the world origin in meters
pub const MAX_FLYING_HEIGHT: f32 = 20.0;

/// Per-frame displacement clamp in meters
pub const MAX_SPEED: f32 = 0.05;

/// Angular velocity decay rate per second
pub const ROTATION_FRICTION_FACTOR: f32 = 0.5;

/// Angular acceleration multiplier
pub const ROTATION_ACCELERATION_FACTOR: f32 = 2.0;

/// Teleport fade duration in seconds (fade out + fade in)
pub const FADE_DURATION: f32 = 2.0;

/// Head height above the viewpoint origin when no head is tracked
pub const DEFAULT_HEAD_HEIGHT: f32 = 2.0;

/// Friction factor applied by the brakes
pub const BRAKE_FRICTION: f32 = 5.0;

/// Seconds after take-off before touching ground can end a flight
pub const FLYING_GRACE_PERIOD: f32 = 1.0;

/// Thumbstick values at or below this magnitude are neutral
pub const DEAD_ZONE: f32 = 0.5;

/// Translational acceleration from a full forward push
pub const FORWARD_ACCELERATION: f32 = 0.01;

/// Vertical acceleration from the height stick
pub const VERTICAL_ACCELERATION: f32 = 0.005;

/// Angular acceleration from a full turn push
pub const TURN_ACCELERATION: f32 = 0.1;

/// Distance below which a glide counts as arrived
pub const GLIDE_ARRIVAL_EPSILON: f32 = 0.001;

static_assertions::const_assert!(DEAD_ZONE < 1.0);
static_assertions::const_assert!(GLIDE_ARRIVAL_EPSILON < MAX_SPEED);

/// How a grip click on a valid marker moves the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStyle {
    /// Jump to the marker behind a screen fade.
    #[default]
    Teleport,
    /// Spring-damped travel to the marker.
    Glide,
}

impl MovementStyle {
    /// Map a selection index from a style picker.
    ///
    /// Index 0 is Glide; every other index is Teleport.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            MovementStyle::Glide
        } else {
            MovementStyle::Teleport
        }
    }
}

/// What "forward" means for thumbstick translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDevice {
    /// Move where the head is looking.
    Head,
    /// Move where the movement hand's pointer is aiming.
    #[default]
    Controller,
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A numeric field is outside its accepted range.
    InvalidValue { field: &'static str, value: f32 },
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON deserialization error.
    JsonError(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, value } => {
                write!(f, "invalid value for {field}: {value}")
            }
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::JsonError(e)
    }
}

/// Locomotion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Style used by grip clicks
    pub movement_style: MovementStyle,
    /// Hand whose thumbstick drives translation and turning
    pub movement_hand: Hand,
    /// Direction source for translation
    pub movement_device: MovementDevice,
    /// Let the other hand's thumbstick drive height
    pub other_thumbstick_for_height: bool,
    pub acceleration_factor: f32,
    pub max_flying_height: f32,
    pub max_speed: f32,
    pub rotation_friction_factor: f32,
    pub rotation_acceleration_factor: f32,
    pub fade_duration: f32,
    pub default_head_height: f32,
    pub brake_friction: f32,
    pub flying_grace_period: f32,
    pub dead_zone: f32,
    pub forward_acceleration: f32,
    pub vertical_acceleration: f32,
    pub turn_acceleration: f32,
    pub glide_arrival_epsilon: f32,
    /// Where `snap_to_ground` places the viewpoint when no ground is found
    pub spawn_point: Vec3,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_style: MovementStyle::Teleport,
            movement_hand: Hand::Right,
            movement_device: MovementDevice::Controller,
            other_thumbstick_for_height: true,
            acceleration_factor: ACCELERATION_FACTOR,
            max_flying_height: MAX_FLYING_HEIGHT,
            max_speed: MAX_SPEED,
            rotation_friction_factor: ROTATION_FRICTION_FACTOR,
            rotation_acceleration_factor: ROTATION_ACCELERATION_FACTOR,
            fade_duration: FADE_DURATION,
            default_head_height: DEFAULT_HEAD_HEIGHT,
            brake_friction: BRAKE_FRICTION,
            flying_grace_period: FLYING_GRACE_PERIOD,
            dead_zone: DEAD_ZONE,
            forward_acceleration: FORWARD_ACCELERATION,
            vertical_acceleration: VERTICAL_ACCELERATION,
            turn_acceleration: TURN_ACCELERATION,
            glide_arrival_epsilon: GLIDE_ARRIVAL_EPSILON,
            spawn_point: Vec3::ZERO,
        }
    }
}

impl LocomotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration, then sanitize it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: LocomotionConfig = serde_json::from_str(json)?;
        config.validate().map(Self::sanitized)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builder-style style override.
    pub fn with_style(mut self, style: MovementStyle) -> Self {
        self.movement_style = style;
        self
    }

    /// Builder-style movement hand override.
    pub fn with_movement_hand(mut self, hand: Hand) -> Self {
        self.movement_hand = hand;
        self
    }

    /// Builder-style movement device override.
    pub fn with_movement_device(mut self, device: MovementDevice) -> Self {
        self.movement_device = device;
        self
    }

    /// Bring every value the frame loop depends on into range.
    ///
    /// Non-finite values fall back to their defaults. Heights are floored at
    /// zero; durations, speeds and distances that must be positive fall back
    /// to their defaults when they are not.
    pub fn sanitized(mut self) -> Self {
        let (lo, hi) = ACCELERATION_FACTOR_RANGE;
        self.acceleration_factor = repaired(
            "acceleration_factor",
            self.acceleration_factor,
            ACCELERATION_FACTOR,
            |v| v.clamp(lo, hi),
        );
        self.max_flying_height = repaired(
            "max_flying_height",
            self.max_flying_height,
            MAX_FLYING_HEIGHT,
            |v| v.max(0.0),
        );
        self.fade_duration = repaired(
            "fade_duration",
            self.fade_duration,
            FADE_DURATION,
            positive_or(FADE_DURATION),
        );
        self.max_speed = repaired("max_speed", self.max_speed, MAX_SPEED, positive_or(MAX_SPEED));
        self.default_head_height = repaired(
            "default_head_height",
            self.default_head_height,
            DEFAULT_HEAD_HEIGHT,
            positive_or(DEFAULT_HEAD_HEIGHT),
        );
        self.glide_arrival_epsilon = repaired(
            "glide_arrival_epsilon",
            self.glide_arrival_epsilon,
            GLIDE_ARRIVAL_EPSILON,
            positive_or(GLIDE_ARRIVAL_EPSILON),
        );
        self.flying_grace_period = repaired(
            "flying_grace_period",
            self.flying_grace_period,
            FLYING_GRACE_PERIOD,
            |v| v.max(0.0),
        );
        self
    }

    /// Reject values the frame loop cannot work with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let positive = [
            ("fade_duration", self.fade_duration),
            ("max_speed", self.max_speed),
            ("default_head_height", self.default_head_height),
            ("glide_arrival_epsilon", self.glide_arrival_epsilon),
        ];
        let non_negative = [
            ("max_flying_height", self.max_flying_height),
            ("brake_friction", self.brake_friction),
            ("flying_grace_period", self.flying_grace_period),
            ("rotation_friction_factor", self.rotation_friction_factor),
            ("dead_zone", self.dead_zone),
        ];

        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        for (field, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(self)
    }

    /// The hand whose thumbstick drives height, if height control is enabled.
    pub fn height_hand(&self) -> Option<Hand> {
        self.other_thumbstick_for_height
            .then(|| self.movement_hand.other())
    }
}

/// Replace a non-finite `value` with `fallback`, otherwise apply `limit`.
/// Logs a warning when the value changes.
fn repaired(field: &str, value: f32, fallback: f32, limit: impl Fn(f32) -> f32) -> f32 {
    let result = if value.is_finite() { limit(value) } else { fallback };
    if result != value {
        log::warn!("{field} {value} out of range, using {result}");
    }
    result
}

fn positive_or(fallback: f32) -> impl Fn(f32) -> f32 {
    move |v| if v > 0.0 { v } else { fallback }
}

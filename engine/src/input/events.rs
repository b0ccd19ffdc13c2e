//! Device Events
//!
//! Tagged-variant device events as delivered by the XR runtime: a source
//! (which physical control), and an action carrying its payload.
//! Decoupled from any specific runtime so the locomotion core can be driven
//! from tests and recorded scripts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which hand a control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    #[default]
    Right,
}

impl Hand {
    /// The opposite hand.
    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

/// Physical control that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSource {
    LeftGrip,
    RightGrip,
    LeftThumbstick,
    RightThumbstick,
}

impl DeviceSource {
    /// The hand this control sits on.
    pub fn hand(self) -> Hand {
        match self {
            DeviceSource::LeftGrip | DeviceSource::LeftThumbstick => Hand::Left,
            DeviceSource::RightGrip | DeviceSource::RightThumbstick => Hand::Right,
        }
    }

    /// The grip on `hand`.
    pub fn grip(hand: Hand) -> Self {
        match hand {
            Hand::Left => DeviceSource::LeftGrip,
            Hand::Right => DeviceSource::RightGrip,
        }
    }

    /// The thumbstick on `hand`.
    pub fn thumbstick(hand: Hand) -> Self {
        match hand {
            Hand::Left => DeviceSource::LeftThumbstick,
            Hand::Right => DeviceSource::RightThumbstick,
        }
    }

    pub fn is_grip(self) -> bool {
        matches!(self, DeviceSource::LeftGrip | DeviceSource::RightGrip)
    }

    pub fn is_thumbstick(self) -> bool {
        matches!(self, DeviceSource::LeftThumbstick | DeviceSource::RightThumbstick)
    }
}

/// What happened on the control, with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceAction {
    /// Button-like control changed state (`true` = pressed).
    Click(bool),
    /// Two-axis control moved. Components are in [-1, 1].
    Move(Vec2),
}

/// A single discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub source: DeviceSource,
    pub action: DeviceAction,
}

impl DeviceEvent {
    pub fn new(source: DeviceSource, action: DeviceAction) -> Self {
        Self { source, action }
    }

    /// Grip click on `hand`.
    pub fn grip(hand: Hand, pressed: bool) -> Self {
        Self::new(DeviceSource::grip(hand), DeviceAction::Click(pressed))
    }

    /// Thumbstick move on `hand`. Components are clamped to [-1, 1].
    pub fn thumbstick(hand: Hand, x: f32, y: f32) -> Self {
        let axis = Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::ONE);
        Self::new(DeviceSource::thumbstick(hand), DeviceAction::Move(axis))
    }

    /// The click payload, if this is a click.
    pub fn click(&self) -> Option<bool> {
        match self.action {
            DeviceAction::Click(pressed) => Some(pressed),
            DeviceAction::Move(_) => None,
        }
    }

    /// The axis payload, if this is a move.
    pub fn axis(&self) -> Option<Vec2> {
        match self.action {
            DeviceAction::Move(axis) => Some(axis),
            DeviceAction::Click(_) => None,
        }
    }
}

/// Collapse an axis value to -1, 0 or 1.
///
/// Values with `|value| <= dead_zone` are neutral. The boundary itself is
/// inside the dead-zone.
pub fn dead_zone_sign(value: f32, dead_zone: f32) -> f32 {
    if value.abs() > dead_zone {
        value.signum()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_hand() {
        assert_eq!(DeviceSource::LeftGrip.hand(), Hand::Left);
        assert_eq!(DeviceSource::RightThumbstick.hand(), Hand::Right);
        assert_eq!(DeviceSource::thumbstick(Hand::Left), DeviceSource::LeftThumbstick);
        assert_eq!(Hand::Left.other(), Hand::Right);
    }

    #[test]
    fn test_dead_zone_boundary_is_neutral() {
        assert_eq!(dead_zone_sign(0.5, 0.5), 0.0);
        assert_eq!(dead_zone_sign(-0.5, 0.5), 0.0);
        assert_eq!(dead_zone_sign(0.2, 0.5), 0.0);
        assert_eq!(dead_zone_sign(0.51, 0.5), 1.0);
        assert_eq!(dead_zone_sign(-0.9, 0.5), -1.0);
    }

    #[test]
    fn test_thumbstick_payload_is_clamped() {
        let event = DeviceEvent::thumbstick(Hand::Right, 3.0, -2.0);
        assert_eq!(event.axis(), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(event.click(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{"source": "left_grip", "action": {"click": true}}"#;
        let event: DeviceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, DeviceEvent::grip(Hand::Left, true));
    }
}

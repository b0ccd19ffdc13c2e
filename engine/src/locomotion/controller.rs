//! Locomotion Controller
//!
//! Owns the viewpoint and turns device events into motion. Each frame:
//!
//! 1. Drain the event queue and update intents (target, push, flying, turn).
//! 2. Advance the current mode (teleport fade, glide spring).
//! 3. Integrate velocity, validate the candidate move, commit or stop.
//! 4. Integrate turning.
//!
//! # Modes
//!
//! - **Idle**: free walking from thumbstick pushes, following the ground.
//! - **MovingToTarget**: travelling to a marker, by teleport (behind a fade)
//!   or by glide (spring-damped).
//! - **Flying**: free vertical motion, no downward check, lands on ground
//!   after a grace period.
//!
//! # Usage
//!
//! ```rust,ignore
//! use xr_mover_engine::locomotion::{LocomotionConfig, LocomotionController};
//! use xr_mover_engine::physics::StaticScene;
//!
//! let mut controller = LocomotionController::new(LocomotionConfig::default(), scene);
//! let sender = controller.event_sender();
//!
//! // From the XR runtime callbacks:
//! sender.send(event);
//!
//! // Each frame:
//! *controller.rig_mut() = tracked_rig_from_runtime();
//! controller.step(delta_time);
//! camera_rig.set_position(controller.position());
//! ```

use glam::{Vec2, Vec3};

use super::config::{LocomotionConfig, MovementDevice, MovementStyle};
use super::fade::{FadeController, FadeVisual};
use super::motion::{MotionParams, MotionState, candidate_position, integrate};
use super::obstacle::{ObstaclePolicy, Verdict, snap_probe};
use super::rig::TrackedRig;
use super::rotation::RotationSmoother;
use super::viewpoint::ViewpointNode;
use crate::input::{DeviceEvent, EventQueue, EventSender, Hand, dead_zone_sign};
use crate::physics::CollisionQuery;

/// Spring stiffness pulling a glide toward its target
pub const GLIDE_SPRING: f32 = 0.1;

/// Glide damping numerator: friction factor is `GLIDE_DAMPING / (1 + distance)`
pub const GLIDE_DAMPING: f32 = 20.0;

/// High-level locomotion mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionMode {
    Idle,
    MovingToTarget { target: Vec3, style: MovementStyle },
    /// `since` is the controller clock at take-off
    Flying { since: f64 },
}

impl LocomotionMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            LocomotionMode::Idle => ModeKind::Idle,
            LocomotionMode::MovingToTarget {
                style: MovementStyle::Teleport,
                ..
            } => ModeKind::Teleport,
            LocomotionMode::MovingToTarget {
                style: MovementStyle::Glide,
                ..
            } => ModeKind::Glide,
            LocomotionMode::Flying { .. } => ModeKind::Flying,
        }
    }

    pub fn is_moving_to_target(&self) -> bool {
        matches!(self, LocomotionMode::MovingToTarget { .. })
    }
}

/// Payload-free mode tag, used in notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Teleport,
    Glide,
    Flying,
}

/// Whether a state-setting operation should emit a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Notify {
    #[default]
    Announce,
    Quietly,
}

/// Outgoing notifications for UI and other collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocomotionNotice {
    /// The user moved for the first time; onboarding UI can go. Sent once.
    FirstMovement,
    ModeChanged { from: ModeKind, to: ModeKind },
    StyleChanged(MovementStyle),
    TeleportCommitted(Vec3),
    BrakesApplied,
    /// A flight ended on walkable ground
    Landed,
}

/// First-person locomotion for one viewpoint against static geometry.
pub struct LocomotionController<Q: CollisionQuery> {
    config: LocomotionConfig,
    params: MotionParams,
    rotation: RotationSmoother,
    world: Q,
    queue: EventQueue,
    rig: TrackedRig,
    node: ViewpointNode,
    motion: MotionState,
    mode: LocomotionMode,
    style: MovementStyle,
    fade: FadeController,
    clock: f64,
    moved: bool,
    height_above_ground: Option<f32>,
    notices: Vec<LocomotionNotice>,
}

impl<Q: CollisionQuery> LocomotionController<Q> {
    /// Build a controller at the configured spawn point, standing on the
    /// ground if there is any. Teleports jump without a fade until a visual
    /// is attached with [`LocomotionController::with_fade_visual`].
    pub fn new(config: LocomotionConfig, world: Q) -> Self {
        let config = config.sanitized();
        let mut controller = Self {
            params: MotionParams::from_config(&config),
            rotation: RotationSmoother::from_config(&config),
            world,
            queue: EventQueue::new(),
            rig: TrackedRig::default(),
            node: ViewpointNode::new(config.spawn_point),
            motion: MotionState::new(),
            mode: LocomotionMode::Idle,
            style: config.movement_style,
            fade: FadeController::new(config.fade_duration, None),
            clock: 0.0,
            moved: false,
            height_above_ground: None,
            notices: Vec::new(),
            config,
        };
        controller.snap_to_ground();
        controller
    }

    /// Attach the overlay used to mask teleports. The visual starts hidden.
    pub fn with_fade_visual(mut self, visual: Box<dyn FadeVisual>) -> Self {
        self.fade = FadeController::new(self.config.fade_duration, Some(visual));
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn node(&self) -> &ViewpointNode {
        &self.node
    }

    pub fn position(&self) -> Vec3 {
        self.node.position
    }

    pub fn yaw_degrees(&self) -> f32 {
        self.node.yaw_degrees
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn velocity(&self) -> Vec3 {
        self.motion.velocity
    }

    pub fn acceleration(&self) -> Vec3 {
        self.motion.acceleration
    }

    /// Degrees per frame.
    pub fn angular_velocity(&self) -> f32 {
        self.motion.angular_velocity
    }

    pub fn friction_factor(&self) -> f32 {
        self.motion.friction_factor
    }

    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.mode, LocomotionMode::Flying { .. })
    }

    /// Style the next grip click will use.
    pub fn movement_style(&self) -> MovementStyle {
        self.style
    }

    pub fn fade(&self) -> &FadeController {
        &self.fade
    }

    /// Current fade overlay opacity.
    pub fn opacity(&self) -> f32 {
        self.fade.opacity()
    }

    /// Seconds of simulated time since construction.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether the first-movement notice has fired.
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Height above the ground found by the last ground probe, if it hit.
    pub fn height_above_ground(&self) -> Option<f32> {
        self.height_above_ground
    }

    pub fn rig(&self) -> &TrackedRig {
        &self.rig
    }

    /// Tracked poses, to be refreshed by the owner every frame.
    pub fn rig_mut(&mut self) -> &mut TrackedRig {
        &mut self.rig
    }

    pub fn set_rig(&mut self, rig: TrackedRig) {
        self.rig = rig;
    }

    pub fn world(&self) -> &Q {
        &self.world
    }

    /// A producer handle for device events.
    pub fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    /// Queue a device event for the next tick.
    pub fn queue_event(&self, event: DeviceEvent) {
        self.queue.push(event);
    }

    /// Take the notices produced since the last call.
    pub fn drain_notices(&mut self) -> Vec<LocomotionNotice> {
        std::mem::take(&mut self.notices)
    }

    // ------------------------------------------------------------------
    // Operations for external collaborators
    // ------------------------------------------------------------------

    /// Damp all translation hard without changing mode.
    ///
    /// Holds until the next intent that resets friction (a push, take-off,
    /// or a move to a target).
    pub fn apply_brakes(&mut self) {
        self.motion.friction_factor = self.config.brake_friction;
        self.notices.push(LocomotionNotice::BrakesApplied);
    }

    /// Pick the style from a selector index: 0 is Glide, anything else is
    /// Teleport. Takes effect on the next grip click.
    pub fn set_movement_style(&mut self, index: usize, notify: Notify) {
        self.set_style(MovementStyle::from_index(index), notify);
    }

    pub fn set_style(&mut self, style: MovementStyle, notify: Notify) {
        if self.style == style {
            return;
        }
        self.style = style;
        log::debug!("movement style set to {:?}", style);
        if notify == Notify::Announce {
            self.notices.push(LocomotionNotice::StyleChanged(style));
        }
    }

    /// Stand on the ground under the viewpoint, or return to the spawn point
    /// when there is none. Stops any translation.
    pub fn snap_to_ground(&mut self) {
        let position = match snap_probe(&self.world, self.node.position) {
            Some(point) => point,
            None => self.config.spawn_point,
        };
        self.node.position = self.clamp_height(position);
        self.motion.halt();
        log::info!("viewpoint placed at {:?}", self.node.position);
    }

    // ------------------------------------------------------------------
    // Frame step
    // ------------------------------------------------------------------

    /// Run one frame of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += f64::from(dt);

        for event in self.queue.drain() {
            self.handle_event(event);
        }

        self.advance_mode();
        self.integrate_translation(dt);
        self.integrate_rotation(dt);
    }

    fn advance_mode(&mut self) {
        let LocomotionMode::MovingToTarget { target, style } = self.mode else {
            return;
        };

        match style {
            MovementStyle::Teleport => {
                if self.fade.has_visual() {
                    let update = self.fade.update(self.clock);
                    if update.commit {
                        self.commit_teleport(target);
                    }
                    if update.finished {
                        self.set_mode(LocomotionMode::Idle);
                    }
                } else {
                    self.commit_teleport(target);
                    self.set_mode(LocomotionMode::Idle);
                }
                // Teleport overrides physical motion
                self.motion.reset_translation();
            }
            MovementStyle::Glide => {
                let offset = target - self.node.position;
                let distance = offset.length();
                if distance <= self.config.glide_arrival_epsilon {
                    self.node.position = target;
                    self.motion.reset_translation();
                    self.set_mode(LocomotionMode::Idle);
                } else {
                    self.motion.acceleration = offset * GLIDE_SPRING;
                    self.motion.friction_factor = GLIDE_DAMPING / (1.0 + distance);
                }
            }
        }
    }

    fn integrate_translation(&mut self, dt: f32) {
        self.motion = integrate(&self.motion, &self.params, dt);

        // A teleport fade owns the position until it finishes
        if let LocomotionMode::MovingToTarget {
            style: MovementStyle::Teleport,
            ..
        } = self.mode
        {
            return;
        }

        let position = self.node.position;
        let velocity = self.motion.velocity;
        let candidate = candidate_position(position, velocity, self.params.max_flying_height);
        let policy = ObstaclePolicy::new(self.rig.head_height_or(self.config.default_head_height));
        let flying = self.is_flying();

        if let Verdict::Blocked(blocker) =
            policy.evaluate(&self.world, position, candidate, velocity, flying)
        {
            log::trace!("move blocked ({:?}) at {:?}", blocker, position);
            self.motion.halt();
            return;
        }

        let ground = policy.ground_height(&self.world, candidate);
        self.height_above_ground = ground.map(|height| candidate.y - height);

        if let LocomotionMode::Flying { since } = self.mode {
            self.node.position = candidate;
            let airborne_for = self.clock - since;
            if ground.is_some() && airborne_for > f64::from(self.config.flying_grace_period) {
                self.set_mode(LocomotionMode::Idle);
                self.notices.push(LocomotionNotice::Landed);
            }
        } else {
            let mut committed = candidate;
            if let Some(height) = ground {
                committed.y = height;
            }
            self.node.position = self.clamp_height(committed);
        }
    }

    fn integrate_rotation(&mut self, dt: f32) {
        self.motion.angular_velocity = self.rotation.step(
            self.motion.angular_velocity,
            self.motion.angular_acceleration,
            dt,
        );
        self.node.rotate(self.motion.angular_velocity);
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    fn handle_event(&mut self, event: DeviceEvent) {
        let hand = event.source.hand();
        if event.source.is_grip() {
            if let Some(pressed) = event.click() {
                self.on_grip(hand, pressed);
            }
        } else if event.source.is_thumbstick() {
            if let Some(axis) = event.axis() {
                if hand == self.config.movement_hand {
                    self.on_movement_stick(axis);
                } else if self.config.height_hand() == Some(hand) {
                    self.on_height_stick(axis);
                }
            }
        }

        // Without a height stick, pushing toward the sky is how flight starts
        if self.config.height_hand().is_none()
            && self.mode == LocomotionMode::Idle
            && self.motion.acceleration.y > 0.0
        {
            self.take_off();
        }
    }

    fn on_grip(&mut self, hand: Hand, pressed: bool) {
        self.note_movement();
        if !pressed {
            return;
        }

        match self.rig.hand(hand).destination() {
            Some(marker) => self.move_to(marker),
            None => self.cancel_move_to_target(),
        }
    }

    fn on_movement_stick(&mut self, axis: Vec2) {
        self.note_movement();
        let dead_zone = self.config.dead_zone;

        self.motion.angular_acceleration =
            dead_zone_sign(axis.x, dead_zone) * self.config.turn_acceleration;

        let push = dead_zone_sign(axis.y, dead_zone);
        let height_owned = self.config.height_hand().is_some();

        if push == 0.0 {
            // Stop pushing; the height stick keeps its own axis
            let vertical = if height_owned {
                self.motion.acceleration.y
            } else {
                0.0
            };
            self.motion.acceleration = Vec3::new(0.0, vertical, 0.0);
            return;
        }

        let Some(forward) = self.movement_forward() else {
            return;
        };

        let mut acceleration = forward * push * self.config.forward_acceleration;
        if height_owned {
            acceleration.y = self.motion.acceleration.y;
        }
        self.motion.acceleration = acceleration;
        self.motion.friction_factor = 0.0;
        self.cancel_move_to_target();
    }

    fn on_height_stick(&mut self, axis: Vec2) {
        self.note_movement();
        let push = dead_zone_sign(axis.y, self.config.dead_zone);
        self.motion.acceleration.y = push * self.config.vertical_acceleration;
        if push > 0.0 {
            self.take_off();
        }
    }

    /// Direction a forward push moves in, from the head or the movement hand's pointer.
    fn movement_forward(&self) -> Option<Vec3> {
        let forward = match self.config.movement_device {
            MovementDevice::Head => self.rig.head.map(|head| head.forward),
            MovementDevice::Controller => self
                .rig
                .hand(self.config.movement_hand)
                .pointer
                .map(|pointer| pointer.forward),
        };
        forward.and_then(Vec3::try_normalize)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn move_to(&mut self, marker: Vec3) {
        let target = self.clamp_height(marker);
        let style = self.style;
        if style == MovementStyle::Teleport && self.fade.has_visual() {
            self.fade.begin(self.clock);
        } else {
            self.fade.cancel();
        }
        self.set_mode(LocomotionMode::MovingToTarget { target, style });
    }

    fn cancel_move_to_target(&mut self) {
        if self.mode.is_moving_to_target() {
            self.fade.cancel();
            self.set_mode(LocomotionMode::Idle);
        }
    }

    fn take_off(&mut self) {
        self.fade.cancel();
        self.motion.friction_factor = 0.0;
        self.set_mode(LocomotionMode::Flying { since: self.clock });
    }

    fn commit_teleport(&mut self, target: Vec3) {
        self.node.position = target;
        log::info!("teleported to {:?}", target);
        self.notices.push(LocomotionNotice::TeleportCommitted(target));
    }

    fn set_mode(&mut self, mode: LocomotionMode) {
        let from = self.mode.kind();
        let to = mode.kind();
        self.mode = mode;
        if from != to {
            log::debug!("locomotion mode {:?} -> {:?}", from, to);
            self.notices.push(LocomotionNotice::ModeChanged { from, to });
        }
    }

    fn note_movement(&mut self) {
        if !self.moved {
            self.moved = true;
            self.notices.push(LocomotionNotice::FirstMovement);
        }
    }

    fn clamp_height(&self, mut position: Vec3) -> Vec3 {
        position.y = position.y.clamp(0.0, self.params.max_flying_height);
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DeviceAction, DeviceSource};
    use crate::locomotion::fade::FadeOverlay;
    use crate::locomotion::rig::{HeadPose, PointerPose};
    use crate::physics::{CollisionLayer, EmptyWorld, SceneBox, StaticScene};

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> LocomotionController<EmptyWorld> {
        LocomotionController::new(LocomotionConfig::default(), EmptyWorld)
    }

    fn aim_right_pointer_forward<Q: CollisionQuery>(controller: &mut LocomotionController<Q>) {
        controller.rig_mut().right.pointer = Some(PointerPose {
            forward: Vec3::NEG_Z,
            is_targeting: false,
        });
    }

    #[test]
    fn test_starts_idle_at_spawn() {
        let controller = controller();
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert_eq!(controller.position(), Vec3::ZERO);
        assert_eq!(controller.opacity(), 0.0);
        assert!(!controller.has_moved());
    }

    #[test]
    fn test_starts_on_ground() {
        let scene = StaticScene::new().with_box(SceneBox::ground_slab(Vec3::ZERO, 10.0, 0.5));
        let controller = LocomotionController::new(LocomotionConfig::default(), scene);
        assert!((controller.position().y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_forward_push_moves_along_pointer() {
        let mut controller = controller();
        aim_right_pointer_forward(&mut controller);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        for _ in 0..60 {
            controller.step(DT);
        }
        assert!(controller.position().z < 0.0);
        assert!(controller.position().x.abs() < 1e-5);
    }

    #[test]
    fn test_push_without_pointer_is_ignored() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        controller.step(DT);
        assert_eq!(controller.acceleration(), Vec3::ZERO);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
    }

    #[test]
    fn test_dead_zone_produces_no_push() {
        let mut controller = controller();
        aim_right_pointer_forward(&mut controller);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.5, -0.5));
        controller.step(DT);
        assert_eq!(controller.acceleration(), Vec3::ZERO);
        assert_eq!(controller.motion().angular_acceleration, 0.0);
    }

    #[test]
    fn test_head_device_uses_head_forward() {
        let config = LocomotionConfig::default().with_movement_device(MovementDevice::Head);
        let mut controller = LocomotionController::new(config, EmptyWorld);
        controller.rig_mut().head = Some(HeadPose {
            height: 1.7,
            forward: Vec3::X,
        });
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 0.9));
        controller.step(DT);
        assert!(controller.acceleration().x > 0.0);
        assert_eq!(controller.acceleration().z, 0.0);
    }

    #[test]
    fn test_turning() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 1.0, 0.0));
        for _ in 0..30 {
            controller.step(DT);
        }
        assert!(controller.yaw_degrees() > 0.0);
        assert_eq!(controller.position(), Vec3::ZERO);
    }

    #[test]
    fn test_height_stick_takes_off() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 1.0));
        controller.step(DT);
        assert!(controller.is_flying());
        assert!(controller.acceleration().y > 0.0);
    }

    #[test]
    fn test_height_stick_dead_zone_clears_vertical_push() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 1.0));
        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 0.1));
        controller.step(DT);
        assert_eq!(controller.acceleration().y, 0.0);
    }

    #[test]
    fn test_forward_push_keeps_height_push() {
        let mut controller = controller();
        aim_right_pointer_forward(&mut controller);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 1.0));
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        controller.step(DT);
        assert!(controller.acceleration().y > 0.0);
        assert!(controller.acceleration().z < 0.0);
    }

    #[test]
    fn test_pitch_up_takes_off_without_height_stick() {
        let mut config = LocomotionConfig::default();
        config.other_thumbstick_for_height = false;
        let mut controller = LocomotionController::new(config, EmptyWorld);
        controller.rig_mut().right.pointer = Some(PointerPose {
            forward: Vec3::new(0.0, 1.0, -1.0),
            is_targeting: false,
        });
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        controller.step(DT);
        assert!(controller.is_flying());
    }

    #[test]
    fn test_left_movement_hand() {
        let config = LocomotionConfig::default().with_movement_hand(Hand::Left);
        let mut controller = LocomotionController::new(config, EmptyWorld);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        controller.step(DT);
        assert!(controller.is_flying());

        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, -1.0, 0.0));
        controller.step(DT);
        assert!(controller.motion().angular_acceleration < 0.0);
    }

    #[test]
    fn test_grip_without_marker_stays_idle() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::grip(Hand::Right, true));
        controller.step(DT);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert!(controller.has_moved());
    }

    #[test]
    fn test_grip_release_does_not_move() {
        let mut controller = controller();
        controller.rig_mut().aim(Hand::Right, Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        controller.queue_event(DeviceEvent::grip(Hand::Right, false));
        controller.step(DT);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
    }

    #[test]
    fn test_teleport_without_visual_is_immediate() {
        let mut controller = controller();
        let marker = Vec3::new(0.0, 0.0, -5.0);
        controller.rig_mut().aim(Hand::Left, marker, Vec3::NEG_Z);
        controller.queue_event(DeviceEvent::grip(Hand::Left, true));
        controller.step(DT);
        assert_eq!(controller.position(), marker);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert_eq!(controller.opacity(), 0.0);
    }

    #[test]
    fn test_push_cancels_teleport_fade() {
        let mut controller = controller().with_fade_visual(Box::new(FadeOverlay::default()));
        controller.rig_mut().aim(Hand::Right, Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        controller.queue_event(DeviceEvent::grip(Hand::Right, true));
        for _ in 0..10 {
            controller.step(DT);
        }
        assert!(controller.fade().is_active());

        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        controller.step(DT);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert!(!controller.fade().is_active());
        assert_eq!(controller.opacity(), 0.0);
    }

    #[test]
    fn test_teleport_holds_motion_at_zero() {
        let mut controller = controller().with_fade_visual(Box::new(FadeOverlay::default()));
        aim_right_pointer_forward(&mut controller);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        for _ in 0..30 {
            controller.step(DT);
        }
        assert!(controller.velocity().length() > 0.0);

        controller.rig_mut().aim(Hand::Left, Vec3::new(3.0, 0.0, 0.0), Vec3::X);
        controller.queue_event(DeviceEvent::grip(Hand::Left, true));
        controller.step(DT);
        assert_eq!(controller.velocity(), Vec3::ZERO);
        assert_eq!(controller.acceleration(), Vec3::ZERO);
    }

    #[test]
    fn test_brakes_raise_friction_without_mode_change() {
        let mut controller = controller();
        controller.apply_brakes();
        assert_eq!(controller.motion().friction_factor, 5.0);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert!(controller.drain_notices().contains(&LocomotionNotice::BrakesApplied));
    }

    #[test]
    fn test_set_movement_style_notice() {
        let mut controller = controller();
        controller.set_movement_style(0, Notify::Announce);
        assert_eq!(controller.movement_style(), MovementStyle::Glide);
        assert_eq!(
            controller.drain_notices(),
            vec![LocomotionNotice::StyleChanged(MovementStyle::Glide)]
        );

        controller.set_movement_style(1, Notify::Quietly);
        assert_eq!(controller.movement_style(), MovementStyle::Teleport);
        assert!(controller.drain_notices().is_empty());
    }

    #[test]
    fn test_first_movement_fires_once() {
        let mut controller = controller();
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 0.0));
        controller.queue_event(DeviceEvent::grip(Hand::Left, false));
        controller.step(DT);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 0.0));
        controller.step(DT);

        let firsts = controller
            .drain_notices()
            .into_iter()
            .filter(|notice| *notice == LocomotionNotice::FirstMovement)
            .count();
        assert_eq!(firsts, 1);
    }

    #[test]
    fn test_snap_to_ground_falls_back_to_spawn() {
        let mut config = LocomotionConfig::default();
        config.spawn_point = Vec3::new(1.0, 0.0, 2.0);
        let mut controller = LocomotionController::new(config, EmptyWorld);
        assert_eq!(controller.position(), Vec3::new(1.0, 0.0, 2.0));

        controller.queue_event(DeviceEvent::thumbstick(Hand::Left, 0.0, 1.0));
        for _ in 0..120 {
            controller.step(DT);
        }
        assert!(controller.position().y > 0.0);
        controller.snap_to_ground();
        assert_eq!(controller.position(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_out_of_range_config_is_repaired_on_construction() {
        let mut config = LocomotionConfig::default();
        config.max_flying_height = -1.0;
        config.fade_duration = 0.0;
        config.max_speed = f32::NAN;
        let mut controller =
            LocomotionController::new(config, EmptyWorld).with_fade_visual(Box::new(FadeOverlay::default()));
        assert_eq!(controller.config().max_flying_height, 0.0);
        assert_eq!(controller.position(), Vec3::ZERO);

        controller.rig_mut().aim(Hand::Right, Vec3::new(0.0, 3.0, -5.0), Vec3::NEG_Z);
        controller.queue_event(DeviceEvent::grip(Hand::Right, true));
        for _ in 0..180 {
            controller.step(DT);
            assert!(controller.opacity().is_finite());
            assert!(controller.velocity().length() <= 0.05 + 1e-6);
        }
        assert_eq!(controller.position(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(controller.mode(), LocomotionMode::Idle);
    }

    #[test]
    fn test_thumbstick_click_does_not_move() {
        let mut controller = controller();
        controller.rig_mut().aim(Hand::Right, Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
        controller.queue_event(DeviceEvent::new(
            DeviceSource::thumbstick(Hand::Right),
            DeviceAction::Click(true),
        ));
        controller.step(DT);
        assert_eq!(controller.mode(), LocomotionMode::Idle);
        assert_eq!(controller.position(), Vec3::ZERO);
    }

    #[test]
    fn test_walking_follows_ground_step() {
        let scene = StaticScene::new()
            .with_box(SceneBox::ground_slab(Vec3::ZERO, 50.0, 0.0))
            .with_box(SceneBox::new(
                CollisionLayer::Ground,
                Vec3::new(-5.0, 0.0, -20.0),
                Vec3::new(5.0, 0.2, -2.0),
            ));
        let mut controller = LocomotionController::new(LocomotionConfig::default(), scene);
        aim_right_pointer_forward(&mut controller);
        controller.queue_event(DeviceEvent::thumbstick(Hand::Right, 0.0, 1.0));
        for _ in 0..600 {
            controller.step(DT);
        }
        assert!(controller.position().z < -2.0);
        assert!((controller.position().y - 0.2).abs() < 1e-5);
    }
}

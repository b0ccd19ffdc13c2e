//! XR Mover Engine Library
//!
//! First-person locomotion for a head-mounted viewpoint: device events in,
//! a moving viewpoint out. Teleport behind a screen fade, glide to a marker,
//! walk and fly with ray-cast obstacle avoidance.
//!
//! # Modules
//!
//! - [`locomotion`] - Controller state machine, integrator, obstacle policy, fade and turning
//! - [`input`] - Tagged device events and the per-tick event queue
//! - [`physics`] - Collision layers, ray queries and a static box scene
//!
//! # Example
//!
//! ```ignore
//! use xr_mover_engine::input::{DeviceEvent, Hand};
//! use xr_mover_engine::locomotion::{FadeOverlay, LocomotionConfig, LocomotionController};
//! use xr_mover_engine::physics::{SceneBox, StaticScene, Vec3};
//!
//! let scene = StaticScene::new().with_box(SceneBox::ground_slab(Vec3::ZERO, 50.0, 0.0));
//! let mut controller = LocomotionController::new(LocomotionConfig::default(), scene)
//!     .with_fade_visual(Box::new(FadeOverlay::default()));
//!
//! controller.rig_mut().aim(Hand::Right, Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z);
//! controller.queue_event(DeviceEvent::grip(Hand::Right, true));
//!
//! for _ in 0..120 {
//!     controller.step(1.0 / 60.0);
//! }
//! ```

pub mod input;
pub mod locomotion;
pub mod physics;

// Re-export commonly used types
pub use input::{DeviceEvent, EventSender, Hand};
pub use locomotion::{LocomotionConfig, LocomotionController, LocomotionMode, LocomotionNotice};
pub use physics::{CollisionQuery, StaticScene};

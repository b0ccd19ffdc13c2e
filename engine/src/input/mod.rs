//! Input Module
//!
//! Platform-agnostic device input for the locomotion core. The XR runtime
//! (or a recorded script) produces [`DeviceEvent`]s through an
//! [`EventSender`]; the controller drains its [`EventQueue`] once per tick.
//!
//! # Example
//!
//! ```rust,ignore
//! use xr_mover_engine::input::{DeviceEvent, EventQueue, Hand};
//!
//! let queue = EventQueue::new();
//! let sender = queue.sender();
//!
//! // From the runtime callback:
//! sender.send(DeviceEvent::thumbstick(Hand::Right, 0.0, 0.9));
//!
//! // At the start of the frame:
//! for event in queue.drain() {
//!     // apply intent
//! }
//! ```

pub mod events;
pub mod queue;

pub use events::{DeviceAction, DeviceEvent, DeviceSource, Hand, dead_zone_sign};
pub use queue::{EventQueue, EventSender};

//! Event Intake Queue
//!
//! Device events arrive whenever the runtime delivers them, which is not in
//! step with the frame loop. Producers hold an [`EventSender`]; the
//! controller owns the [`EventQueue`] and drains it once at the start of each
//! tick, so every intent change lands before that frame's integration.

use std::sync::mpsc::{self, Receiver, Sender};

use super::events::DeviceEvent;

/// Producer handle for the intake queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<DeviceEvent>,
}

impl EventSender {
    /// Queue an event. Returns `false` once the owning queue is gone.
    pub fn send(&self, event: DeviceEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Consumer side of the intake queue.
#[derive(Debug)]
pub struct EventQueue {
    tx: Sender<DeviceEvent>,
    rx: Receiver<DeviceEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<DeviceEvent>();
        Self { tx, rx }
    }

    /// A new producer handle for this queue.
    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Queue an event from the owning side.
    pub fn push(&self, event: DeviceEvent) {
        // The receiver lives in `self`, so the channel cannot be disconnected here
        let _ = self.tx.send(event);
    }

    /// Take every event queued so far, in arrival order.
    pub fn drain(&self) -> Vec<DeviceEvent> {
        self.rx.try_iter().collect()
    }
}

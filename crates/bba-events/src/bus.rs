#![forbid(unsafe_code)]

use bba_abr::{AbrEvent, AbrSink};
use tokio::sync::broadcast;

/// Broadcast bus for controller events.
///
/// Hand a clone to each controller as its sink; every subscriber receives
/// every event from every controller sharing the bus.
///
/// `publish()` is a sync call, so controllers stay free of any runtime.
/// If there are no subscribers, events are silently dropped.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<AbrEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: AbrEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to all future events.
    ///
    /// Slow subscribers receive `RecvError::Lagged(n)` instead of blocking
    /// the controller.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AbrEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl AbrSink for EventBus {
    fn emit(&self, event: AbrEvent) {
        self.publish(event);
    }
}

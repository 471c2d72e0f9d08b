//! Configuration-change notification.
//!
//! The settings editor (external to this crate) publishes a [`ConfigEvent`]
//! whenever a bundle is saved; the sync worker subscribes and turns it into
//! a broadcast plus a local re-apply. Subscription is explicit; there is no
//! process-wide static event to hook.

use stats_core::ModTarget;
use tokio::sync::broadcast;

/// Events emitted when a configuration bundle changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigEvent {
    /// The named bundle was edited and saved locally.
    Saved(ModTarget),
}

/// Broadcast channel for configuration events.
///
/// Lagging subscribers lose old events; a dropped `Saved` only delays the
/// re-broadcast until the next edit, so best-effort delivery is acceptable.
pub struct ConfigBus {
    sender: broadcast::Sender<ConfigEvent>,
}

impl ConfigBus {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a configuration event to all subscribers.
    pub fn publish(&self, event: ConfigEvent) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.sender.send(event);
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigEvent> {
        self.sender.subscribe()
    }
}

impl Default for ConfigBus {
    fn default() -> Self {
        Self::new()
    }
}

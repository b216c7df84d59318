//! Event bus for dropboard using tokio::broadcast
//!
//! Publish-subscribe channel between the orchestrator and presentation.

use tokio::sync::broadcast;

/// Events emitted by the dashboard layer
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A fresh view model is available
    ViewUpdated,
    /// Carousel moved to the given slide index
    SlideChanged(usize),
    /// Reminder window visibility changed
    ReminderChanged(bool),
    /// A config load failed; the previous view is retained
    LoadFailed(String),
}

/// Event bus for broadcasting dashboard events
///
/// Uses tokio::broadcast for multi-consumer support; the CLI renderer
/// subscribes for redraw triggers.
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events)
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: DashboardEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

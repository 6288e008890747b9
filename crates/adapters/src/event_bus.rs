// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-process, `tokio::sync::broadcast`-backed event bus.

use kanban_core::{Event, EventBus, EventPublisher};
use tokio::sync::broadcast;

/// Default capacity of the broadcast channel. A subscriber that falls more
/// than this many events behind observes `RecvError::Lagged` on its next
/// receive rather than blocking the publisher.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for InProcessEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) {
        // No subscribers is a valid state (e.g. before `Start` subscribes);
        // a send error just means nobody is listening right now.
        let _ = self.sender.send(event);
    }
}

impl EventBus for InProcessEventBus {
    fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = InProcessEventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(Event::CircuitBreakerReset);
        assert_eq!(rx.recv().await.unwrap(), Event::CircuitBreakerReset);
    }

    #[test]
    fn publish_with_no_subscribers_is_a_silent_no_op() {
        let bus = InProcessEventBus::new();
        bus.publish(Event::CircuitBreakerReset);
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_receiver() {
        let bus = InProcessEventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        bus.publish(Event::WorkflowCompleted {
            workflow_id: "wf-1".into(),
            project_id: "default".into(),
        });
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out contracts.
//!
//! `EventPublisher` is the write-only per-project handle (may be absent —
//! the provider returns `None` and publishing becomes a silent no-op).
//! `EventBus` extends it with subscription and is what the engine's single
//! event-handler task reads from; it is the global bus.

use crate::Event;
use tokio::sync::broadcast;

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: Event);
}

pub trait EventBus: EventPublisher {
    /// Subscribe to the bus. Each subscriber gets its own receiver; slow
    /// subscribers may observe `RecvError::Lagged` if they fall behind the
    /// configured channel capacity.
    fn subscribe(&self) -> broadcast::Receiver<Event>;
}

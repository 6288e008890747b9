// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single execution slot — the engine's central safety invariant.
//!
//! At most one workflow may be recorded as executing at any instant. The
//! slot is a narrow `parking_lot::Mutex` around a small `Option<Slot>` so
//! readers never block on I/O; it is set by the dispatch path before the
//! executor starts and cleared only by the event handler (or by the
//! synchronous-failure path in dispatch), never by the tick loop directly.

use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub workflow_id: String,
    pub project_id: String,
}

#[derive(Default)]
pub struct ExecutionSlot {
    inner: Mutex<Option<Slot>>,
}

impl ExecutionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self) -> bool {
        self.inner.lock().is_some()
    }

    pub fn snapshot(&self) -> Option<Slot> {
        self.inner.lock().clone()
    }

    /// Occupy the slot. Returns `false` without mutating if it was already
    /// occupied — the caller must treat that as "someone beat us to it".
    pub fn try_occupy(&self, slot: Slot) -> bool {
        let mut guard = self.inner.lock();
        if guard.is_some() {
            return false;
        }
        *guard = Some(slot);
        true
    }

    /// Clear the slot only if it currently holds `workflow_id`. Returns
    /// `true` if it was cleared — `false` means an event arrived for a
    /// workflow that is not (or no longer) in the slot.
    pub fn clear_if_matches(&self, workflow_id: &str) -> bool {
        let mut guard = self.inner.lock();
        match guard.as_ref() {
            Some(slot) if slot.workflow_id == workflow_id => {
                *guard = None;
                true
            }
            _ => false,
        }
    }

    /// Unconditionally clear the slot, used by recovery at start-up before
    /// any tick or event has run.
    pub fn clear(&self) {
        *self.inner.lock() = None;
    }
}

#[cfg(test)]
#[path = "slot_tests.rs"]
mod tests;

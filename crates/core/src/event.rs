// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow lifecycle and kanban status events carried on the event bus.
//!
//! The core consumes `WorkflowCompleted` / `WorkflowFailed` and publishes the
//! `KanbanStatusChanged` / `CircuitBreakerTripped` / `CircuitBreakerReset`
//! variants. Any other event observed on the bus (from an executor's own
//! progress events, say) is represented by `Other` and is ignored by the
//! core — consumers downstream of the bus must tolerate events they don't
//! recognize, and must tolerate seeing the same terminal event twice if they
//! subscribe to both a per-project bus and the global bus (see `DESIGN.md`).
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// `workflow.completed`
    WorkflowCompleted { workflow_id: String, project_id: String },
    /// `workflow.failed`
    WorkflowFailed {
        workflow_id: String,
        project_id: String,
        #[serde(default)]
        error: Option<String>,
    },
    /// `kanban.status_changed`
    KanbanStatusChanged {
        project_id: Option<String>,
        enabled: bool,
    },
    /// `kanban.circuit_breaker_tripped`
    CircuitBreakerTripped {
        consecutive_failures: u32,
        threshold: u32,
    },
    /// `kanban.circuit_breaker_reset`
    CircuitBreakerReset,
    /// Any event kind the core doesn't model. Carries the raw tag for logging.
    #[serde(other)]
    Other,
}

impl Event {
    /// The `workflow_id` this event pertains to, if any.
    pub fn workflow_id(&self) -> Option<&str> {
        match self {
            Event::WorkflowCompleted { workflow_id, .. } => Some(workflow_id),
            Event::WorkflowFailed { workflow_id, .. } => Some(workflow_id),
            _ => None,
        }
    }
}

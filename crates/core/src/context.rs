// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project execution context handed to the workflow executor.
//!
//! Mirrors the source's "context carrying project-scoped values": rather
//! than Go's implicit `context.Value` bag, project-scoped data is an
//! explicit typed map plus a cancellation token the executor is expected to
//! honor on its own terms (the engine never cancels a running workflow on
//! `Disable`, per §5 of the design).
//!
//! The provider builds the project-scoped half of this context
//! (`project_id`, `cancellation`, arbitrary `values`) and may attach its own
//! per-project event publisher via [`ExecutionContext::with_project_bus`] —
//! resolved from [`crate::traits::ProjectStateProvider::get_project_event_bus`]
//! so per-project UIs can observe lifecycle events too. The engine's dispatch
//! path then layers the global event bus on top via
//! [`ExecutionContext::with_global_bus`] before handing the context to the
//! executor — the provider has no reason to know which bus instance the
//! engine subscribes to. An executor publishing a terminal event is expected
//! to send it to both, per §4.5's note that replays are harmless.

use crate::EventPublisher;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A per-project execution context, produced by
/// [`crate::traits::ProjectStateProvider::get_project_execution_context`]
/// and completed by the engine before the executor runs.
#[derive(Clone)]
pub struct ExecutionContext {
    pub project_id: String,
    pub cancellation: CancellationToken,
    values: HashMap<String, serde_json::Value>,
    global_event_bus: Option<Arc<dyn EventPublisher>>,
    project_event_bus: Option<Arc<dyn EventPublisher>>,
}

impl ExecutionContext {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            cancellation: CancellationToken::new(),
            values: HashMap::new(),
            global_event_bus: None,
            project_event_bus: None,
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Attach the global event bus the executor must publish terminal
    /// lifecycle events to.
    pub fn with_global_bus(mut self, bus: Arc<dyn EventPublisher>) -> Self {
        self.global_event_bus = Some(bus);
        self
    }

    pub fn global_event_bus(&self) -> Option<&Arc<dyn EventPublisher>> {
        self.global_event_bus.as_ref()
    }

    /// Attach the project's own event publisher, if the provider resolved
    /// one via `get_project_event_bus`. A project with no publisher
    /// configured simply never has this attached — publishing then only
    /// reaches the global bus.
    pub fn with_project_bus(mut self, bus: Arc<dyn EventPublisher>) -> Self {
        self.project_event_bus = Some(bus);
        self
    }

    pub fn project_event_bus(&self) -> Option<&Arc<dyn EventPublisher>> {
        self.project_event_bus.as_ref()
    }
}

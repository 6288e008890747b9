// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-project kanban state manager contract.

use crate::{EngineState, KanbanColumn, StateManagerError, Workflow};
use async_trait::async_trait;

/// Owns a project's workflow records and the engine's own persisted state.
///
/// All operations may fail with [`StateManagerError`]; the engine never
/// retries them — it logs and either skips (tick path) or surfaces the
/// error through a state snapshot (recovery path).
#[async_trait]
pub trait KanbanStateManager: Send + Sync {
    /// The next `todo` workflow by this store's own priority/ordering, or
    /// `None` when there isn't one.
    async fn get_next_kanban_workflow(&self) -> Result<Option<Workflow>, StateManagerError>;

    /// Atomically transition a workflow's column, optionally recording a
    /// human-readable error. Must be safe against concurrent readers.
    async fn update_kanban_status(
        &self,
        workflow_id: &str,
        column: KanbanColumn,
        last_error: Option<String>,
    ) -> Result<(), StateManagerError>;

    /// Re-read a workflow by id, e.g. to pick up PR/branch artifacts after
    /// a `completed` event.
    async fn load_by_id(&self, workflow_id: &str) -> Result<Option<Workflow>, StateManagerError>;

    /// Load the engine's own persisted operational state, if any has ever
    /// been saved for this project.
    async fn get_kanban_engine_state(&self) -> Result<Option<EngineState>, StateManagerError>;

    /// Persist the engine's operational state.
    async fn save_kanban_engine_state(&self, state: &EngineState) -> Result<(), StateManagerError>;
}

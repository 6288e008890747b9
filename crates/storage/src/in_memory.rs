// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pure in-memory `KanbanStateManager`, for tests and ephemeral/demo use.

use async_trait::async_trait;
use kanban_core::{EngineState, KanbanColumn, KanbanStateManager, StateManagerError, Workflow};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    workflows: HashMap<String, Workflow>,
    engine_state: Option<EngineState>,
}

/// A `KanbanStateManager` backed by a plain in-process map. No durability —
/// state is lost when the process exits.
#[derive(Default)]
pub struct InMemoryKanbanStateManager {
    inner: Mutex<Inner>,
}

impl InMemoryKanbanStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a workflow directly, bypassing the trait (test convenience).
    pub fn insert_workflow(&self, workflow: Workflow) {
        self.inner.lock().workflows.insert(workflow.workflow_id.clone(), workflow);
    }

    /// Snapshot a workflow by id (test convenience, infallible).
    pub fn get(&self, workflow_id: &str) -> Option<Workflow> {
        self.inner.lock().workflows.get(workflow_id).cloned()
    }
}

#[async_trait]
impl KanbanStateManager for InMemoryKanbanStateManager {
    async fn get_next_kanban_workflow(&self) -> Result<Option<Workflow>, StateManagerError> {
        let inner = self.inner.lock();
        let mut candidates: Vec<&Workflow> = inner
            .workflows
            .values()
            .filter(|w| w.kanban_column == KanbanColumn::Todo)
            .collect();
        candidates.sort_by_key(|w| (w.created_at_epoch_ms, w.workflow_id.clone()));
        Ok(candidates.first().map(|w| (*w).clone()))
    }

    async fn update_kanban_status(
        &self,
        workflow_id: &str,
        column: KanbanColumn,
        last_error: Option<String>,
    ) -> Result<(), StateManagerError> {
        let mut inner = self.inner.lock();
        let wf = inner
            .workflows
            .get_mut(workflow_id)
            .ok_or_else(|| StateManagerError::NotFound(workflow_id.to_string()))?;
        wf.kanban_column = column;
        wf.kanban_last_error = last_error;
        Ok(())
    }

    async fn load_by_id(&self, workflow_id: &str) -> Result<Option<Workflow>, StateManagerError> {
        Ok(self.inner.lock().workflows.get(workflow_id).cloned())
    }

    async fn get_kanban_engine_state(&self) -> Result<Option<EngineState>, StateManagerError> {
        Ok(self.inner.lock().engine_state.clone())
    }

    async fn save_kanban_engine_state(&self, state: &EngineState) -> Result<(), StateManagerError> {
        self.inner.lock().engine_state = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "in_memory_tests.rs"]
mod tests;

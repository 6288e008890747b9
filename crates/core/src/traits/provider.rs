// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The project state provider contract: enumerates projects and resolves
//! per-project collaborators.

use crate::{EventPublisher, ExecutionContext, KanbanStateManager, ProjectInfo, ProviderError};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ProjectStateProvider: Send + Sync {
    /// Every project the provider knows about. May cause lazy
    /// initialization (e.g. scanning disk) — only used at start-up for the
    /// recovery sweep.
    async fn list_active_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError>;

    /// Projects that are already loaded. Must **not** initialize new
    /// projects — this is what the tick loop calls every interval, and its
    /// cost must stay well below `list_active_projects`.
    async fn list_loaded_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError>;

    async fn get_project_state_manager(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn KanbanStateManager>>, ProviderError>;

    /// The project's own event publisher, if one is configured. `None` is
    /// a valid, expected answer — publishing to it is then a no-op.
    async fn get_project_event_bus(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn EventPublisher>>, ProviderError>;

    /// Build the execution context the executor will receive. Errors
    /// propagate to the dispatch path as a synchronous workflow failure.
    async fn get_project_execution_context(
        &self,
        project_id: &str,
    ) -> Result<ExecutionContext, ProviderError>;
}

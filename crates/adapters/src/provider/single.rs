// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reference single-project provider: wraps one state manager and one
//! event publisher, reporting a single project id (`"default"` unless
//! overridden).

use async_trait::async_trait;
use kanban_core::{
    EventPublisher, ExecutionContext, KanbanStateManager, ProjectInfo, ProjectStateProvider,
    ProviderError,
};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_PROJECT_ID: &str = "default";

pub struct SingleProjectProvider {
    project: ProjectInfo,
    state_manager: Arc<dyn KanbanStateManager>,
    event_bus: Option<Arc<dyn EventPublisher>>,
}

impl SingleProjectProvider {
    pub fn new(
        state_manager: Arc<dyn KanbanStateManager>,
        event_bus: Option<Arc<dyn EventPublisher>>,
    ) -> Self {
        Self::with_project(
            ProjectInfo {
                project_id: DEFAULT_PROJECT_ID.to_string(),
                name: DEFAULT_PROJECT_ID.to_string(),
                path: PathBuf::new(),
            },
            state_manager,
            event_bus,
        )
    }

    pub fn with_project(
        project: ProjectInfo,
        state_manager: Arc<dyn KanbanStateManager>,
        event_bus: Option<Arc<dyn EventPublisher>>,
    ) -> Self {
        Self {
            project,
            state_manager,
            event_bus,
        }
    }
}

#[async_trait]
impl ProjectStateProvider for SingleProjectProvider {
    async fn list_active_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError> {
        Ok(vec![self.project.clone()])
    }

    async fn list_loaded_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError> {
        Ok(vec![self.project.clone()])
    }

    async fn get_project_state_manager(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn KanbanStateManager>>, ProviderError> {
        if project_id == self.project.project_id {
            Ok(Some(self.state_manager.clone()))
        } else {
            Ok(None)
        }
    }

    async fn get_project_event_bus(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn EventPublisher>>, ProviderError> {
        if project_id == self.project.project_id {
            Ok(self.event_bus.clone())
        } else {
            Ok(None)
        }
    }

    async fn get_project_execution_context(
        &self,
        project_id: &str,
    ) -> Result<ExecutionContext, ProviderError> {
        if project_id != self.project.project_id {
            return Err(ProviderError::UnknownProject(project_id.to_string()));
        }
        Ok(ExecutionContext::new(project_id))
    }
}

#[cfg(test)]
#[path = "single_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A filesystem-backed, multi-project provider.
//!
//! `FsProjectDiscovery` enumerates the immediate subdirectories of a root
//! path as projects. `MultiProjectProvider` wraps it and lazily resolves a
//! [`kanban_core::KanbanStateManager`] (backed by
//! [`kanban_storage::FileKanbanStateManager`]) per project the first time
//! it's asked for one — caching the result so that `list_loaded_projects`
//! can return "only what's already resolved" without touching disk beyond
//! the cache, satisfying the tick-path cost requirement in §9 of the
//! design (`ListLoadedProjects` must be strictly cheaper than
//! `ListActiveProjects`).

use async_trait::async_trait;
use kanban_core::{
    EventPublisher, ExecutionContext, KanbanStateManager, ProjectInfo, ProjectStateProvider,
    ProviderError,
};
use kanban_storage::FileKanbanStateManager;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::event_bus::InProcessEventBus;

/// Lists immediate subdirectories of `root` as projects, keyed by directory
/// name. Pure filesystem enumeration — no caching of its own.
pub struct FsProjectDiscovery {
    root: PathBuf,
}

impl FsProjectDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn discover(&self) -> Result<Vec<ProjectInfo>, ProviderError> {
        let mut projects = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(projects),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let name = entry.file_name().to_string_lossy().to_string();
                projects.push(ProjectInfo {
                    project_id: name.clone(),
                    name,
                    path: entry.path(),
                });
            }
        }
        projects.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        Ok(projects)
    }
}

struct Cached {
    project: ProjectInfo,
    state_manager: Arc<dyn KanbanStateManager>,
    event_bus: Arc<InProcessEventBus>,
}

/// A multi-project provider over [`FsProjectDiscovery`], caching resolved
/// per-project state managers and event buses.
pub struct MultiProjectProvider {
    discovery: FsProjectDiscovery,
    state_subdir: String,
    cache: RwLock<HashMap<String, Cached>>,
}

impl MultiProjectProvider {
    /// `state_subdir` names the directory created inside each project for
    /// its `FileKanbanStateManager` data (e.g. `.kanban`).
    pub fn new(root: impl Into<PathBuf>, state_subdir: impl Into<String>) -> Self {
        Self {
            discovery: FsProjectDiscovery::new(root),
            state_subdir: state_subdir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn resolve(&self, project: &ProjectInfo) -> Result<(), ProviderError> {
        if self.cache.read().contains_key(&project.project_id) {
            return Ok(());
        }
        let data_dir = project.path.join(&self.state_subdir);
        let state_manager = FileKanbanStateManager::open(data_dir)
            .map_err(|e| ProviderError::Backend(e.to_string()))?;
        self.cache.write().insert(
            project.project_id.clone(),
            Cached {
                project: project.clone(),
                state_manager: Arc::new(state_manager),
                event_bus: Arc::new(InProcessEventBus::new()),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl ProjectStateProvider for MultiProjectProvider {
    async fn list_active_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError> {
        let projects = self.discovery.discover()?;
        for project in &projects {
            self.resolve(project)?;
        }
        Ok(projects)
    }

    async fn list_loaded_projects(&self) -> Result<Vec<ProjectInfo>, ProviderError> {
        let mut projects: Vec<ProjectInfo> =
            self.cache.read().values().map(|c| c.project.clone()).collect();
        projects.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        Ok(projects)
    }

    async fn get_project_state_manager(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn KanbanStateManager>>, ProviderError> {
        if let Some(cached) = self.cache.read().get(project_id) {
            return Ok(Some(cached.state_manager.clone()));
        }
        // Not yet resolved: consult discovery once, resolve if it still
        // exists. This path is only reached from recovery/explicit lookups,
        // never from the tick loop (which only iterates `list_loaded_projects`).
        let projects = self.discovery.discover()?;
        match projects.iter().find(|p| p.project_id == project_id) {
            Some(project) => {
                self.resolve(project)?;
                Ok(self
                    .cache
                    .read()
                    .get(project_id)
                    .map(|c| c.state_manager.clone()))
            }
            None => Ok(None),
        }
    }

    async fn get_project_event_bus(
        &self,
        project_id: &str,
    ) -> Result<Option<Arc<dyn EventPublisher>>, ProviderError> {
        Ok(self
            .cache
            .read()
            .get(project_id)
            .map(|c| c.event_bus.clone() as Arc<dyn EventPublisher>))
    }

    async fn get_project_execution_context(
        &self,
        project_id: &str,
    ) -> Result<ExecutionContext, ProviderError> {
        let cached = self
            .cache
            .read()
            .get(project_id)
            .map(|c| c.project.clone())
            .ok_or_else(|| ProviderError::UnknownProject(project_id.to_string()))?;
        Ok(ExecutionContext::new(project_id)
            .with_value("project_path", serde_json::json!(cached.path.to_string_lossy())))
    }
}

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;

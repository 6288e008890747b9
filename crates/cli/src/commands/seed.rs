// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kanbanctl seed` — insert a `todo` workflow into a project's state store.
//!
//! A real deployment's workflows are authored by whatever issue/PR-driven
//! process sits upstream of the engine (out of scope here, per §1 of the
//! design). This exists so an operator can exercise a `kanbanctl run`
//! against real file-backed storage without standing up that upstream.

use crate::output::{format_or_json, OutputFormat};
use anyhow::Result;
use kanban_core::{Clock, KanbanColumn, SystemClock, Workflow, WorkflowStatus};
use kanban_storage::FileKanbanStateManager;
use std::path::Path;

pub async fn seed(
    projects_root: &Path,
    state_subdir: &str,
    project_id: &str,
    workflow_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let data_dir = projects_root.join(project_id).join(state_subdir);
    let store = FileKanbanStateManager::open(data_dir)?;
    let now = SystemClock.epoch_ms();
    let workflow = Workflow {
        workflow_id: workflow_id.to_string(),
        status: WorkflowStatus::Pending,
        kanban_column: KanbanColumn::Todo,
        kanban_last_error: None,
        pr_url: None,
        pr_number: None,
        workflow_branch: None,
        created_at_epoch_ms: now,
        updated_at_epoch_ms: now,
    };
    store.seed_workflow(workflow.clone())?;
    format_or_json(format, &workflow, || {
        println!("seeded workflow {} into {} (todo)", workflow_id, project_id)
    })
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only helpers shared across crates. Gated behind `test-support` so
//! downstream crates can depend on `kanban-core` with the feature enabled
//! in `[dev-dependencies]` without pulling it into production builds.

use crate::{KanbanColumn, Workflow, WorkflowStatus};

/// Build a minimal `todo` workflow with the given id — the common case in
/// scheduler tests.
pub fn todo_workflow(workflow_id: impl Into<String>) -> Workflow {
    Workflow::builder()
        .workflow_id(workflow_id)
        .status(WorkflowStatus::Pending)
        .kanban_column(KanbanColumn::Todo)
        .build()
}

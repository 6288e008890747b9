// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow data model: status, kanban column, and the workflow record
//! the engine dispatches and mutates.

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a workflow as reported by its owning state manager.
///
/// The engine only ever *observes* this field — it never writes it directly
/// (that's the executor's and state manager's job via lifecycle events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

crate::simple_display! {
    WorkflowStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// A kanban column tag.
///
/// Only the engine-driven transitions are enforced here; human-driven
/// transitions (e.g. `ToVerify -> Done`) are out of scope for the core and
/// are never written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KanbanColumn {
    Todo,
    InProgress,
    ToVerify,
    Refinement,
    Done,
}

crate::simple_display! {
    KanbanColumn {
        Todo => "todo",
        InProgress => "in_progress",
        ToVerify => "to_verify",
        Refinement => "refinement",
        Done => "done",
    }
}

impl Default for KanbanColumn {
    fn default() -> Self {
        KanbanColumn::Todo
    }
}

impl KanbanColumn {
    /// Parse a raw column tag, treating an empty or unrecognized string as
    /// `todo` — legacy records may carry an empty `kanban_column` field.
    pub fn parse_or_todo(raw: &str) -> Self {
        match raw {
            "" => KanbanColumn::Todo,
            "todo" => KanbanColumn::Todo,
            "in_progress" => KanbanColumn::InProgress,
            "to_verify" => KanbanColumn::ToVerify,
            "refinement" => KanbanColumn::Refinement,
            "done" => KanbanColumn::Done,
            other => {
                tracing::warn!(column = other, "unrecognized kanban column, defaulting to todo");
                KanbanColumn::Todo
            }
        }
    }
}

/// Deserializes `kanban_column` through [`KanbanColumn::parse_or_todo`]
/// rather than the enum's own derived `Deserialize`, so a record written by
/// an older version of the store with an empty or unrecognized column tag
/// loads as `todo` instead of failing to parse.
fn deserialize_kanban_column<'de, D>(deserializer: D) -> Result<KanbanColumn, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(KanbanColumn::parse_or_todo(&raw))
}

/// A unit of work tracked through the kanban columns.
///
/// Ownership: the project's [`crate::traits::KanbanStateManager`] owns this
/// record. The engine mutates only `kanban_column` and `kanban_last_error`
/// (via `update_kanban_status`), and otherwise only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub workflow_id: String,
    pub status: WorkflowStatus,
    #[serde(default, deserialize_with = "deserialize_kanban_column")]
    pub kanban_column: KanbanColumn,
    #[serde(default)]
    pub kanban_last_error: Option<String>,
    #[serde(default)]
    pub pr_url: Option<String>,
    #[serde(default)]
    pub pr_number: Option<u64>,
    #[serde(default)]
    pub workflow_branch: Option<String>,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
}

crate::builder! {
    pub struct WorkflowBuilder => Workflow {
        into {
            workflow_id: String = "wf-test",
        }
        set {
            status: WorkflowStatus = WorkflowStatus::Pending,
            kanban_column: KanbanColumn = KanbanColumn::Todo,
            kanban_last_error: Option<String> = None,
            pr_url: Option<String> = None,
            pr_number: Option<u64> = None,
            workflow_branch: Option<String> = None,
            created_at_epoch_ms: u64 = 0,
            updated_at_epoch_ms: u64 = 0,
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default filesystem locations for the CLI's own state, independent of
//! the project workspaces the engine dispatches into.

use std::path::PathBuf;

/// Where the engine's own operational state (`{enabled, current_workflow_id,
/// consecutive_failures, ...}`) is persisted, distinct from any single
/// project's workflow log.
pub fn default_engine_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("kanban")
        .join("engine")
}

/// Root directory whose immediate subdirectories are treated as projects by
/// `MultiProjectProvider` (one `--state-subdir` directory per project).
pub fn default_projects_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("kanban-projects")
}

pub const DEFAULT_STATE_SUBDIR: &str = ".kanban";

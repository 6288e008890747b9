// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kanbanctl enable|disable|status|reset-circuit-breaker` — read and flip
//! the engine's persisted operational state directly against its state
//! store, without spinning up a running scheduler.
//!
//! These commands only take effect for the *next* `kanbanctl run` — an
//! already-running scheduler holds its `enabled` flag and circuit breaker
//! counters in memory and only reloads them via its own recovery path at
//! start-up (§4.5 of the design). That mirrors `systemctl enable` more than
//! a live toggle; it keeps the CLI free of any IPC channel to a running
//! process, which is out of scope here.

use crate::output::{format_or_json, OutputFormat};
use anyhow::Result;
use kanban_core::{EngineState, KanbanStateManager};
use kanban_storage::FileKanbanStateManager;
use std::path::Path;

fn open_store(engine_state_dir: &Path) -> Result<FileKanbanStateManager> {
    Ok(FileKanbanStateManager::open(engine_state_dir)?)
}

async fn load_or_default(store: &FileKanbanStateManager) -> Result<EngineState> {
    Ok(store.get_kanban_engine_state().await?.unwrap_or_default())
}

pub async fn enable(engine_state_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(engine_state_dir)?;
    let mut state = load_or_default(&store).await?;
    state.enabled = true;
    store.save_kanban_engine_state(&state).await?;
    format_or_json(format, &state, || println!("scheduler enabled (takes effect on next `kanbanctl run`)"))
}

pub async fn disable(engine_state_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(engine_state_dir)?;
    let mut state = load_or_default(&store).await?;
    state.enabled = false;
    store.save_kanban_engine_state(&state).await?;
    format_or_json(format, &state, || println!("scheduler disabled"))
}

pub async fn reset_circuit_breaker(engine_state_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(engine_state_dir)?;
    let mut state = load_or_default(&store).await?;
    state.consecutive_failures = 0;
    state.circuit_breaker_open = false;
    state.last_failure_at = None;
    store.save_kanban_engine_state(&state).await?;
    format_or_json(format, &state, || println!("circuit breaker reset"))
}

pub async fn status(engine_state_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = open_store(engine_state_dir)?;
    let state = load_or_default(&store).await?;
    format_or_json(format, &state, || {
        println!("enabled: {}", state.enabled);
        println!("circuit breaker open: {}", state.circuit_breaker_open);
        println!("consecutive failures: {}", state.consecutive_failures);
        match &state.current_workflow_id {
            Some(id) => println!(
                "current workflow: {} (project {})",
                id,
                state.current_project_id.as_deref().unwrap_or("?")
            ),
            None => println!("current workflow: none"),
        }
        if let Some(ts) = state.last_failure_at {
            println!("last failure at: {} (epoch ms)", ts);
        }
    })
}

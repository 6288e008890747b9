// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A file-backed `KanbanStateManager`.
//!
//! Workflows are persisted as a newline-delimited JSON append log
//! (`workflows.jsonl`) under a per-project data directory; the manager
//! replays the log into an in-memory, `RwLock`-guarded index on
//! construction and serves reads from that index. Every mutation appends a
//! full record rather than rewriting the file in place — the log compacts
//! itself (keeping only the latest record per workflow id) once it grows
//! past [`COMPACTION_THRESHOLD`] lines.
//!
//! The engine's own operational state is a single small JSON document
//! (`engine_state.json`), written atomically via a temp-file-then-rename.

use async_trait::async_trait;
use kanban_core::{
    Clock, EngineState, KanbanColumn, KanbanStateManager, StateManagerError, SystemClock, Workflow,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rewrite the workflow log once it accumulates this many appended lines.
const COMPACTION_THRESHOLD: usize = 256;

struct Index {
    workflows: HashMap<String, Workflow>,
}

/// A [`KanbanStateManager`] backed by a per-project directory on disk.
///
/// Generic over [`Clock`] so tests can control `updated_at_epoch_ms`
/// timestamps deterministically; production code uses [`SystemClock`].
pub struct FileKanbanStateManager<C: Clock = SystemClock> {
    data_dir: PathBuf,
    clock: C,
    index: RwLock<Index>,
    appended_since_compaction: AtomicUsize,
}

impl FileKanbanStateManager<SystemClock> {
    /// Open (creating if needed) a file-backed state manager at `data_dir`
    /// using the real system clock.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StateManagerError> {
        Self::open_with_clock(data_dir, SystemClock)
    }
}

impl<C: Clock> FileKanbanStateManager<C> {
    pub fn open_with_clock(data_dir: impl Into<PathBuf>, clock: C) -> Result<Self, StateManagerError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let workflows = replay_workflow_log(&workflows_log_path(&data_dir))?;
        Ok(Self {
            data_dir,
            clock,
            index: RwLock::new(Index { workflows }),
            appended_since_compaction: AtomicUsize::new(0),
        })
    }

    fn append_workflow_record(&self, workflow: &Workflow) -> Result<(), StateManagerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(workflows_log_path(&self.data_dir))?;
        writeln!(file, "{}", serde_json::to_string(workflow)?)?;
        if self.appended_since_compaction.fetch_add(1, Ordering::SeqCst) + 1 >= COMPACTION_THRESHOLD {
            self.compact()?;
        }
        Ok(())
    }

    /// Rewrite the log with exactly one record per known workflow id.
    fn compact(&self) -> Result<(), StateManagerError> {
        let snapshot: Vec<Workflow> = self.index.read().workflows.values().cloned().collect();
        let tmp_path = workflows_log_path(&self.data_dir).with_extension("jsonl.tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            for workflow in &snapshot {
                writeln!(tmp, "{}", serde_json::to_string(workflow)?)?;
            }
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, workflows_log_path(&self.data_dir))?;
        self.appended_since_compaction.store(0, Ordering::SeqCst);
        Ok(())
    }
}

fn workflows_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("workflows.jsonl")
}

fn engine_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("engine_state.json")
}

fn replay_workflow_log(path: &Path) -> Result<HashMap<String, Workflow>, StateManagerError> {
    let mut workflows = HashMap::new();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(workflows),
        Err(e) => return Err(e.into()),
    };
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let workflow: Workflow = serde_json::from_str(&line)?;
        workflows.insert(workflow.workflow_id.clone(), workflow);
    }
    Ok(workflows)
}

#[async_trait]
impl<C: Clock> KanbanStateManager for FileKanbanStateManager<C> {
    async fn get_next_kanban_workflow(&self) -> Result<Option<Workflow>, StateManagerError> {
        let index = self.index.read();
        let mut candidates: Vec<&Workflow> = index
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
        let updated = {
            let mut index = self.index.write();
            let workflow = index
                .workflows
                .get_mut(workflow_id)
                .ok_or_else(|| StateManagerError::NotFound(workflow_id.to_string()))?;
            workflow.kanban_column = column;
            workflow.kanban_last_error = last_error;
            workflow.updated_at_epoch_ms = self.clock.epoch_ms();
            workflow.clone()
        };
        self.append_workflow_record(&updated)
    }

    async fn load_by_id(&self, workflow_id: &str) -> Result<Option<Workflow>, StateManagerError> {
        Ok(self.index.read().workflows.get(workflow_id).cloned())
    }

    async fn get_kanban_engine_state(&self) -> Result<Option<EngineState>, StateManagerError> {
        let path = engine_state_path(&self.data_dir);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(EngineState::from_json(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_kanban_engine_state(&self, state: &EngineState) -> Result<(), StateManagerError> {
        let path = engine_state_path(&self.data_dir);
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(state.to_json()?.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl<C: Clock> FileKanbanStateManager<C> {
    /// Directly seed a workflow, bypassing the log (test/demo convenience —
    /// production code always goes through a prior `todo` insert performed
    /// by whatever authored the workflow in the first place, which is
    /// outside this crate's scope).
    pub fn seed_workflow(&self, workflow: Workflow) -> Result<(), StateManagerError> {
        self.index
            .write()
            .workflows
            .insert(workflow.workflow_id.clone(), workflow.clone());
        self.append_workflow_record(&workflow)
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;

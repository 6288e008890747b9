// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kanban-storage: concrete [`kanban_core::KanbanStateManager`] implementations.
//!
//! `FileKanbanStateManager` persists workflows as a newline-delimited JSON
//! log under a per-project data directory, with an in-process
//! `RwLock`-guarded materialized index rebuilt by replaying the log on
//! load. `InMemoryKanbanStateManager` is the same materialized index with
//! no backing file, for unit tests and ephemeral use.

pub mod file_store;
pub mod in_memory;

pub use file_store::FileKanbanStateManager;
pub use in_memory::InMemoryKanbanStateManager;

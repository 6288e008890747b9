// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's public error type.
//!
//! Tick-path failures (state manager / provider I/O) never reach here —
//! they're logged and skipped. This enum is reserved for failures of the
//! engine's own public operations (`Start`, `Stop`, `Enable`, `Disable`,
//! `ResetCircuitBreaker`), where the caller needs to know something didn't
//! take effect.

use kanban_core::{ProviderError, StateManagerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine already started")]
    AlreadyStarted,

    #[error("engine not started")]
    NotStarted,

    #[error("timed out waiting for the tick loop to drain")]
    StopTimedOut,

    #[error("state manager error: {0}")]
    StateManager(#[from] StateManagerError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the trait boundaries the engine consumes.
//!
//! These are *transient* in the taxonomy sense: the engine never retries
//! them in-line. The tick path logs and skips; the recovery path surfaces
//! them through the engine's state snapshot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateManagerError {
    #[error("workflow not found: {0}")]
    NotFound(String),
    #[error("state manager I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state manager serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("state manager backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown project: {0}")]
    UnknownProject(String),
    #[error("project provider I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("project provider backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("executor failed: {0}")]
    Failed(String),
}

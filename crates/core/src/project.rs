// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project metadata as seen by the engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A project workspace the engine can dispatch workflows into.
///
/// Lifecycle is independent of the engine: projects may appear or disappear
/// between ticks. The engine treats whatever [`crate::traits::ProjectStateProvider`]
/// returns as a snapshot valid for the duration of a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_id: String,
    pub name: String,
    pub path: PathBuf,
}

crate::builder! {
    pub struct ProjectInfoBuilder => ProjectInfo {
        into {
            project_id: String = "default",
            name: String = "default",
        }
        set {
            path: PathBuf = PathBuf::new(),
        }
    }
}

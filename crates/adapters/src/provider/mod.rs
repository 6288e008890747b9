// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete [`kanban_core::ProjectStateProvider`] implementations.

pub mod fs;
pub mod single;

pub use fs::{FsProjectDiscovery, MultiProjectProvider};
pub use single::{SingleProjectProvider, DEFAULT_PROJECT_ID};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kanban-adapters: reference implementations of the `kanban-core` seams —
//! an in-process event bus and single-/multi-project providers, a
//! fixed-delay demo executor for `kanbanctl run --demo` — plus, under
//! `test-support`, a scriptable fake executor used by the engine's and the
//! CLI's own test suites.

pub mod demo_executor;
pub mod event_bus;
pub mod provider;

#[cfg(any(test, feature = "test-support"))]
pub mod fake_executor;

pub use demo_executor::DemoExecutor;
pub use event_bus::InProcessEventBus;
pub use provider::{FsProjectDiscovery, MultiProjectProvider, SingleProjectProvider, DEFAULT_PROJECT_ID};

#[cfg(any(test, feature = "test-support"))]
pub use fake_executor::{fake_executor, FakeExecutor, Script};

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `kanbanctl run` — host the scheduler in the foreground until interrupted.
//!
//! Wires a [`kanban_adapters::MultiProjectProvider`] (one subdirectory of
//! `--projects-root` per project) and a dedicated [`FileKanbanStateManager`]
//! for the engine's own operational state, starts the [`Engine`], and waits
//! on Ctrl-C / `SIGTERM` before draining it. `--demo` substitutes
//! [`kanban_adapters::DemoExecutor`] for the real workflow executor, which
//! is out of scope for this crate — a production host wires in its own.

use crate::exit_error::ExitError;
use anyhow::Result;
use kanban_adapters::{DemoExecutor, InProcessEventBus, MultiProjectProvider};
use kanban_core::{ProjectStateProvider, WorkflowExecutor};
use kanban_engine::{Engine, EngineConfig};
use kanban_storage::FileKanbanStateManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct RunArgs {
    pub projects_root: PathBuf,
    pub state_subdir: String,
    pub engine_state_dir: PathBuf,
    pub tick_interval: Duration,
    pub circuit_breaker_threshold: u32,
    pub event_channel_capacity: usize,
    pub enable: bool,
    pub demo: bool,
    pub stop_drain_timeout: Duration,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let provider: Arc<dyn ProjectStateProvider> =
        Arc::new(MultiProjectProvider::new(&args.projects_root, &args.state_subdir));
    let state_store = Arc::new(FileKanbanStateManager::open(&args.engine_state_dir)?);

    let executor: Arc<dyn WorkflowExecutor> = if args.demo {
        Arc::new(DemoExecutor::default())
    } else {
        return Err(ExitError::new(
            2,
            "no workflow executor configured — kanbanctl ships no production executor \
             (it's an external collaborator per the design's scope); pass --demo to exercise \
             the scheduler with a fixed-delay stand-in, or embed kanban-engine as a library \
             with a real one",
        )
        .into());
    };

    let config = EngineConfig::builder()
        .tick_interval(args.tick_interval)
        .circuit_breaker_threshold(args.circuit_breaker_threshold)
        .event_channel_capacity(args.event_channel_capacity)
        .projects_root(args.projects_root.clone())
        .state_dir(args.engine_state_dir.clone())
        .build();
    let bus = Arc::new(InProcessEventBus::with_capacity(config.event_channel_capacity));

    let engine = Arc::new(
        Engine::new(config, provider, state_store, executor).with_global_bus(bus),
    );

    if args.enable {
        engine.enable().await?;
    }

    engine.start().await?;
    tracing::info!(
        projects_root = %args.projects_root.display(),
        enabled = engine.is_enabled(),
        "kanban engine started"
    );

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, draining");

    engine.stop(args.stop_drain_timeout).await?;
    Ok(())
}

#[cfg(unix)]
// Installing a signal handler only fails if the OS is out of resources to
// register one at all; there's no recovery path short of exiting anyway.
#[allow(clippy::expect_used)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    tokio::select! {
        _ = &mut ctrl_c => {},
        _ = term.recv() => {},
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

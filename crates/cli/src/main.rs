// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `kanbanctl` — operate the kanban workflow scheduler: host the tick loop
//! in the foreground, flip enable/disable, inspect persisted state, and
//! reset the circuit breaker.
//!
//! The scheduler core this wraps ([`kanban_engine::Engine`]) never ships a
//! workflow executor of its own — the thing that actually runs a workflow
//! (LLM calls, tool use, git operations) is an external collaborator per
//! the design's scope. `kanbanctl run` either takes `--demo` (a fixed-delay
//! stand-in, see [`kanban_adapters::DemoExecutor`]) or is meant to be
//! replaced by a host process that embeds `kanban-engine` with a real one.

mod commands;
mod exit_error;
mod output;
mod paths;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::OutputFormat;
use std::path::PathBuf;
use std::time::Duration;

/// Build information baked in at compile time by `build.rs`.
const GIT_HASH: &str = env!("BUILD_GIT_HASH");

#[derive(Parser)]
#[command(name = "kanbanctl", version, long_version = GIT_HASH, about = "Operate the kanban workflow scheduler")]
struct Cli {
    /// Root directory whose immediate subdirectories are treated as projects.
    #[arg(long, global = true)]
    projects_root: Option<PathBuf>,

    /// Directory name created inside each project for its workflow store.
    #[arg(long, global = true, default_value = ".kanban")]
    state_subdir: String,

    /// Directory the engine's own operational state is persisted under.
    #[arg(long, global = true)]
    engine_state_dir: Option<PathBuf>,

    /// Render output as JSON instead of text.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the scheduler and host its tick loop until Ctrl-C/SIGTERM.
    Run {
        /// Scheduling interval between tick attempts.
        #[arg(long, default_value = "5")]
        tick_interval_secs: u64,
        /// Consecutive failures before the circuit breaker opens.
        #[arg(long, default_value_t = kanban_core::circuit_breaker::DEFAULT_THRESHOLD)]
        circuit_breaker_threshold: u32,
        /// Terminal-event broadcast channel capacity; a subscriber lagging
        /// behind by more than this many events misses some on its next receive.
        #[arg(long, default_value_t = kanban_engine::config::DEFAULT_EVENT_CHANNEL_CAPACITY)]
        event_channel_capacity: usize,
        /// Enable dispatch immediately on start (otherwise use `kanbanctl enable`).
        #[arg(long)]
        enable: bool,
        /// Run with a fixed-delay demo executor instead of a real one.
        #[arg(long)]
        demo: bool,
        /// How long `Stop` waits for the tick/event tasks to drain.
        #[arg(long, default_value = "10")]
        stop_drain_timeout_secs: u64,
    },
    /// Print the engine's persisted operational state.
    Status,
    /// Persist `enabled = true` for the next `kanbanctl run`.
    Enable,
    /// Persist `enabled = false`.
    Disable,
    /// Clear the circuit breaker's failure counters.
    ResetCircuitBreaker,
    /// Insert a `todo` workflow into a project's state store (for local testing).
    Seed {
        /// Project id (matches a subdirectory of `--projects-root`).
        project_id: String,
        /// Workflow id to create; generated if omitted.
        #[arg(long)]
        workflow_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = dispatch(Cli::parse()).await {
        match e.downcast::<ExitError>() {
            Ok(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("{}", exit.message);
                }
                std::process::exit(exit.code);
            }
            Err(e) => {
                eprintln!("error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let projects_root = cli.projects_root.unwrap_or_else(paths::default_projects_root);
    let engine_state_dir = cli.engine_state_dir.unwrap_or_else(paths::default_engine_state_dir);
    let format = cli.output;

    match cli.command {
        Command::Run {
            tick_interval_secs,
            circuit_breaker_threshold,
            event_channel_capacity,
            enable,
            demo,
            stop_drain_timeout_secs,
        } => {
            commands::run::run(commands::run::RunArgs {
                projects_root,
                state_subdir: cli.state_subdir,
                engine_state_dir,
                tick_interval: Duration::from_secs(tick_interval_secs),
                circuit_breaker_threshold,
                event_channel_capacity,
                enable,
                demo,
                stop_drain_timeout: Duration::from_secs(stop_drain_timeout_secs),
            })
            .await
        }
        Command::Status => commands::control::status(&engine_state_dir, format).await,
        Command::Enable => commands::control::enable(&engine_state_dir, format).await,
        Command::Disable => commands::control::disable(&engine_state_dir, format).await,
        Command::ResetCircuitBreaker => {
            commands::control::reset_circuit_breaker(&engine_state_dir, format).await
        }
        Command::Seed { project_id, workflow_id } => {
            let workflow_id = workflow_id.unwrap_or_else(|| format!("wf-{}", uuid::Uuid::new_v4()));
            commands::seed::seed(&projects_root, &cli.state_subdir, &project_id, &workflow_id, format).await
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A trivial [`WorkflowExecutor`] that always succeeds after a fixed delay.
//!
//! The real executor — the thing that actually drives an LLM through a
//! workflow's tool calls and git operations — is deliberately out of scope
//! for this crate (see the design's §1). `DemoExecutor` exists so
//! `kanbanctl run --demo` can exercise the scheduler end to end (dispatch,
//! column transitions, circuit breaker) against real per-project storage
//! without a host process wiring in a real one. It is not meant to run
//! anything in production.

use async_trait::async_trait;
use kanban_core::{Event, ExecutionContext, ExecutorError, Workflow, WorkflowExecutor};
use std::time::Duration;

pub struct DemoExecutor {
    delay: Duration,
}

impl DemoExecutor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for DemoExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl WorkflowExecutor for DemoExecutor {
    async fn run(&self, ctx: ExecutionContext, workflow: Workflow) -> Result<(), ExecutorError> {
        tracing::info!(
            project_id = %ctx.project_id,
            workflow_id = %workflow.workflow_id,
            delay_secs = self.delay.as_secs(),
            "demo executor running workflow"
        );
        tokio::time::sleep(self.delay).await;
        let event = Event::WorkflowCompleted {
            workflow_id: workflow.workflow_id.clone(),
            project_id: ctx.project_id.clone(),
        };
        if let Some(bus) = ctx.global_event_bus() {
            bus.publish(event.clone());
        }
        if let Some(bus) = ctx.project_event_bus() {
            bus.publish(event);
        }
        Ok(())
    }
}

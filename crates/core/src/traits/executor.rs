// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workflow executor contract — the opaque collaborator that actually
//! runs a workflow (LLM calls, tool use, git operations). Out of scope for
//! this crate beyond the contract itself and a couple of reference/test
//! implementations in `kanban-adapters`.

use crate::{ExecutionContext, ExecutorError, Workflow};
use async_trait::async_trait;

/// Runs a single workflow to completion.
///
/// Must emit a terminal lifecycle event (`Event::WorkflowCompleted` or
/// `Event::WorkflowFailed`) on the event bus before returning. The engine
/// tolerates both a synchronous `Err` return (treated as a failure even if
/// no event was published) and purely event-driven completion.
#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    async fn run(&self, ctx: ExecutionContext, workflow: Workflow) -> Result<(), ExecutorError>;
}

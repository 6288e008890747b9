// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A controllable [`WorkflowExecutor`] for engine and CLI tests.
//!
//! Mirrors the reference provider/event-bus pair: a thin in-process stand-in
//! that lets a test script the outcome (succeed, fail, or hang until
//! released) and assert on what ran, without spinning up anything that
//! touches a real agent.

use async_trait::async_trait;
use kanban_core::{Event, EventPublisher, ExecutionContext, ExecutorError, Workflow, WorkflowExecutor};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// What [`FakeExecutor::run`] should do the next time it's invoked.
#[derive(Clone)]
pub enum Script {
    /// Publish `WorkflowCompleted` and return `Ok(())`.
    Succeed,
    /// Publish `WorkflowFailed` and return `Err(ExecutorError::Failed)`.
    Fail,
    /// Return `Err` without publishing anything, simulating an executor that
    /// crashed before it could emit its terminal event.
    FailSilently,
    /// Block until [`FakeExecutor::release`] is called, then succeed. Used to
    /// test the single-slot invariant and `Disable`-during-run behavior.
    HangUntilReleased,
}

struct Inner {
    script: Script,
    runs: Vec<(String, String)>,
}

/// A [`WorkflowExecutor`] whose behavior is fixed by a [`Script`] set ahead
/// of time, recording every `(project_id, workflow_id)` it was asked to run.
pub struct FakeExecutor {
    inner: Mutex<Inner>,
    release: Notify,
}

impl FakeExecutor {
    pub fn new(script: Script) -> Self {
        Self {
            inner: Mutex::new(Inner {
                script,
                runs: Vec::new(),
            }),
            release: Notify::new(),
        }
    }

    pub fn set_script(&self, script: Script) {
        self.inner.lock().script = script;
    }

    /// Wakes a run currently blocked on [`Script::HangUntilReleased`].
    pub fn release(&self) {
        self.release.notify_waiters();
    }

    pub fn runs(&self) -> Vec<(String, String)> {
        self.inner.lock().runs.clone()
    }

    pub fn run_count(&self) -> usize {
        self.inner.lock().runs.len()
    }
}

impl Default for FakeExecutor {
    fn default() -> Self {
        Self::new(Script::Succeed)
    }
}

#[async_trait]
impl WorkflowExecutor for FakeExecutor {
    async fn run(&self, ctx: ExecutionContext, workflow: Workflow) -> Result<(), ExecutorError> {
        let script = {
            let mut inner = self.inner.lock();
            inner
                .runs
                .push((ctx.project_id.clone(), workflow.workflow_id.clone()));
            inner.script.clone()
        };

        let global_bus = ctx.global_event_bus().cloned();
        let project_bus = ctx.project_event_bus().cloned();
        let publish = |event: Event| {
            if let Some(bus) = &global_bus {
                bus.publish(event.clone());
            }
            if let Some(bus) = &project_bus {
                bus.publish(event);
            }
        };

        match script {
            Script::Succeed => {
                publish(Event::WorkflowCompleted {
                    workflow_id: workflow.workflow_id.clone(),
                    project_id: ctx.project_id.clone(),
                });
                Ok(())
            }
            Script::Fail => {
                publish(Event::WorkflowFailed {
                    workflow_id: workflow.workflow_id.clone(),
                    project_id: ctx.project_id.clone(),
                    error: Some("scripted failure".into()),
                });
                Err(ExecutorError::Failed("scripted failure".into()))
            }
            Script::FailSilently => Err(ExecutorError::Failed(
                "executor crashed before emitting a terminal event".into(),
            )),
            Script::HangUntilReleased => {
                self.release.notified().await;
                publish(Event::WorkflowCompleted {
                    workflow_id: workflow.workflow_id.clone(),
                    project_id: ctx.project_id.clone(),
                });
                Ok(())
            }
        }
    }
}

/// Convenience constructor for tests that just need an `Arc`-wrapped executor.
pub fn fake_executor(script: Script) -> Arc<FakeExecutor> {
    Arc::new(FakeExecutor::new(script))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::test_support::todo_workflow;
    use std::time::Duration;

    struct Recorder(Mutex<Vec<Event>>);

    impl EventPublisher for Recorder {
        fn publish(&self, event: Event) {
            self.0.lock().push(event);
        }
    }

    #[tokio::test]
    async fn succeed_records_run_and_returns_ok() {
        let executor = FakeExecutor::new(Script::Succeed);
        let ctx = ExecutionContext::new("proj-1");
        executor.run(ctx, todo_workflow("wf-1")).await.unwrap();
        assert_eq!(executor.runs(), vec![("proj-1".to_string(), "wf-1".to_string())]);
    }

    #[tokio::test]
    async fn fail_returns_err() {
        let executor = FakeExecutor::new(Script::Fail);
        let ctx = ExecutionContext::new("proj-1");
        assert!(executor.run(ctx, todo_workflow("wf-1")).await.is_err());
    }

    #[tokio::test]
    async fn hang_until_released_blocks_then_completes() {
        let executor = Arc::new(FakeExecutor::new(Script::HangUntilReleased));
        let ctx = ExecutionContext::new("proj-1");
        let handle = {
            let executor = executor.clone();
            tokio::spawn(async move { executor.run(ctx, todo_workflow("wf-1")).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        executor.release();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn succeed_publishes_to_both_the_global_and_project_bus() {
        let executor = FakeExecutor::new(Script::Succeed);
        let global = Arc::new(Recorder(Mutex::new(Vec::new())));
        let project = Arc::new(Recorder(Mutex::new(Vec::new())));
        let ctx = ExecutionContext::new("proj-1")
            .with_global_bus(global.clone() as Arc<dyn EventPublisher>)
            .with_project_bus(project.clone() as Arc<dyn EventPublisher>);

        executor.run(ctx, todo_workflow("wf-1")).await.unwrap();

        assert_eq!(global.0.lock().len(), 1);
        assert_eq!(project.0.lock().len(), 1);
        assert!(matches!(&global.0.lock()[0], Event::WorkflowCompleted { workflow_id, .. } if workflow_id == "wf-1"));
        assert!(matches!(&project.0.lock()[0], Event::WorkflowCompleted { workflow_id, .. } if workflow_id == "wf-1"));
    }
}

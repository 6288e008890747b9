// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scheduler core: tick loop, single-slot dispatch, event handling,
//! crash recovery, and the enable/disable/reset public operations.
//!
//! Background work runs as two cooperative tokio tasks spawned from
//! [`Engine::start`] — the tick loop and the event subscription — both
//! honoring a shared [`CancellationToken`] so [`Engine::stop`] can drain
//! them within a deadline. Exactly one of those tasks ever clears the
//! execution slot; the tick loop only ever sets it, via [`Engine::dispatch`].

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::slot::{ExecutionSlot, Slot};
use kanban_core::{
    CircuitBreaker, Clock, EngineState, Event, EventBus, EventPublisher, KanbanColumn,
    KanbanStateManager, ProjectStateProvider, SystemClock, Workflow, WorkflowExecutor,
    WorkflowStatus,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Wraps an `Arc<dyn EventBus>` so it can be handed to executors as a
/// plain `Arc<dyn EventPublisher>` without requiring trait-object
/// upcasting — the wrapper's `publish` simply forwards to the bus.
struct BusPublisher(Arc<dyn EventBus>);

impl EventPublisher for BusPublisher {
    fn publish(&self, event: Event) {
        self.0.publish(event);
    }
}

struct EngineTasks {
    tick: JoinHandle<()>,
    events: Option<JoinHandle<()>>,
}

/// The scheduler. Generic over [`Clock`] so tests can control the
/// timestamps recorded on circuit-breaker failures; production code uses
/// [`SystemClock`].
pub struct Engine<C: Clock = SystemClock> {
    config: EngineConfig,
    provider: Arc<dyn ProjectStateProvider>,
    state_store: Arc<dyn KanbanStateManager>,
    executor: Arc<dyn WorkflowExecutor>,
    global_bus: Option<Arc<dyn EventBus>>,
    clock: C,
    slot: ExecutionSlot,
    breaker: CircuitBreaker,
    enabled: AtomicBool,
    shutdown: Mutex<Option<CancellationToken>>,
    tasks: Mutex<Option<EngineTasks>>,
}

impl Engine<SystemClock> {
    /// Build an engine against the real system clock. `global_bus` is
    /// optional — without one, publishing is a silent no-op and the
    /// engine relies solely on synchronous executor failures to clear the
    /// slot (fine for a single-executor-type deployment, but most real
    /// deployments want a bus so completions are observed too).
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn ProjectStateProvider>,
        state_store: Arc<dyn KanbanStateManager>,
        executor: Arc<dyn WorkflowExecutor>,
    ) -> Self {
        Self::new_with_clock(config, provider, state_store, executor, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    pub fn new_with_clock(
        config: EngineConfig,
        provider: Arc<dyn ProjectStateProvider>,
        state_store: Arc<dyn KanbanStateManager>,
        executor: Arc<dyn WorkflowExecutor>,
        clock: C,
    ) -> Self {
        let breaker = CircuitBreaker::new(config.circuit_breaker_threshold);
        Self {
            config,
            provider,
            state_store,
            executor,
            global_bus: None,
            clock,
            slot: ExecutionSlot::new(),
            breaker,
            enabled: AtomicBool::new(false),
            shutdown: Mutex::new(None),
            tasks: Mutex::new(None),
        }
    }

    pub fn with_global_bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.global_bus = Some(bus);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn current_project_id(&self) -> Option<String> {
        self.slot.snapshot().map(|s| s.project_id)
    }

    pub fn get_state(&self) -> EngineState {
        self.state_snapshot()
    }

    fn state_snapshot(&self) -> EngineState {
        let slot = self.slot.snapshot();
        EngineState {
            enabled: self.is_enabled(),
            current_workflow_id: slot.as_ref().map(|s| s.workflow_id.clone()),
            current_project_id: slot.as_ref().map(|s| s.project_id.clone()),
            consecutive_failures: self.breaker.consecutive_failures(),
            circuit_breaker_open: self.breaker.is_open(),
            last_failure_at: self.breaker.last_failure_at(),
        }
    }

    async fn persist_state(&self) -> Result<(), EngineError> {
        let state = self.state_snapshot();
        self.state_store
            .save_kanban_engine_state(&state)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to persist engine state");
                EngineError::StateManager(e)
            })
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.global_bus {
            bus.publish(event);
        }
    }

    /// Block until the currently-slotted workflow's terminal event is
    /// observed, or until `timeout` elapses. Used by tests (and by callers
    /// wanting a best-effort drain before `stop`) to synchronize with
    /// background dispatch without polling.
    pub async fn wait_for_slot_clear(&self, timeout: Duration) -> bool {
        let Some(slot) = self.slot.snapshot() else {
            return true;
        };
        let Some(bus) = &self.global_bus else {
            return self.poll_slot_clear(timeout).await;
        };
        let mut rx = bus.subscribe();
        let sleep = tokio::time::sleep(timeout);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return !self.slot.is_occupied(),
                event = rx.recv() => match event {
                    Ok(event) if event.workflow_id() == Some(slot.workflow_id.as_str()) => return true,
                    Ok(_) => continue,
                    Err(_) => return !self.slot.is_occupied(),
                }
            }
        }
    }

    async fn poll_slot_clear(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if !self.slot.is_occupied() {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl<C: Clock> Engine<C> {
    /// Load persisted state, reconcile any workflow left mid-flight by a
    /// prior crash, and leave the slot empty — ready for `start` to
    /// subscribe and begin ticking.
    async fn recover(&self) {
        let persisted = match self.state_store.get_kanban_engine_state().await {
            Ok(Some(state)) => state,
            Ok(None) => EngineState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted engine state, starting with defaults");
                EngineState::default()
            }
        };

        self.enabled.store(persisted.enabled, Ordering::SeqCst);
        self.breaker
            .restore(persisted.consecutive_failures, persisted.last_failure_at);

        let Some(workflow_id) = persisted.current_workflow_id else {
            return;
        };

        if let Err(e) = self.reconcile_interrupted_workflow(&workflow_id).await {
            tracing::warn!(workflow_id = %workflow_id, error = %e, "failed to reconcile interrupted workflow during recovery");
        }

        self.slot.clear();
        if let Err(e) = self.persist_state().await {
            tracing::error!(error = %e, "failed to persist engine state after recovery");
        }
    }

    async fn reconcile_interrupted_workflow(&self, workflow_id: &str) -> Result<(), EngineError> {
        let projects = self.provider.list_active_projects().await?;
        for project in projects {
            let Some(manager) = self
                .provider
                .get_project_state_manager(&project.project_id)
                .await?
            else {
                continue;
            };
            let Some(workflow) = manager.load_by_id(workflow_id).await? else {
                continue;
            };
            self.reconcile_workflow_record(&manager, &workflow).await;
            return Ok(());
        }
        tracing::warn!(workflow_id, "interrupted workflow not found in any active project");
        Ok(())
    }

    async fn reconcile_workflow_record(
        &self,
        manager: &Arc<dyn KanbanStateManager>,
        workflow: &Workflow,
    ) {
        let result = match workflow.status {
            WorkflowStatus::Completed => {
                manager
                    .update_kanban_status(&workflow.workflow_id, KanbanColumn::ToVerify, None)
                    .await
            }
            WorkflowStatus::Failed => {
                let error = workflow
                    .kanban_last_error
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "interrupted during execution".to_string());
                manager
                    .update_kanban_status(&workflow.workflow_id, KanbanColumn::Refinement, Some(error))
                    .await
            }
            WorkflowStatus::Running | WorkflowStatus::Pending => {
                self.breaker.record_failure(self.clock.epoch_ms());
                manager
                    .update_kanban_status(
                        &workflow.workflow_id,
                        KanbanColumn::Refinement,
                        Some("interrupted during execution".to_string()),
                    )
                    .await
            }
        };
        if let Err(e) = result {
            tracing::warn!(workflow_id = %workflow.workflow_id, error = %e, "failed to reconcile recovered workflow's column");
        }
    }

    async fn tick(self: &Arc<Self>) {
        if !self.is_enabled() || self.breaker.is_open() || self.slot.is_occupied() {
            return;
        }

        let projects = match self.provider.list_loaded_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list loaded projects, skipping tick");
                return;
            }
        };

        for project in projects {
            let manager = match self
                .provider
                .get_project_state_manager(&project.project_id)
                .await
            {
                Ok(Some(manager)) => manager,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(project_id = %project.project_id, error = %e, "failed to resolve state manager, skipping project");
                    continue;
                }
            };

            let workflow = match manager.get_next_kanban_workflow().await {
                Ok(Some(workflow)) => workflow,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(project_id = %project.project_id, error = %e, "failed to query next workflow, skipping project");
                    continue;
                }
            };

            if self.dispatch(&project.project_id, manager, workflow).await {
                return;
            }
        }
    }

    /// `startExecutionForProject`: claim the workflow, occupy the slot,
    /// and launch the executor in a detached task. Returns `true` once a
    /// claim attempt has been made (successful or not) — the tick loop
    /// stops scanning further projects either way, since a slot occupied
    /// by a synchronous-failure path is still "this tick is spent".
    async fn dispatch(
        self: &Arc<Self>,
        project_id: &str,
        manager: Arc<dyn KanbanStateManager>,
        workflow: Workflow,
    ) -> bool {
        if let Err(e) = manager
            .update_kanban_status(&workflow.workflow_id, KanbanColumn::InProgress, None)
            .await
        {
            tracing::warn!(project_id, workflow_id = %workflow.workflow_id, error = %e, "failed to move workflow to in_progress, aborting dispatch");
            return false;
        }

        let slot = Slot {
            workflow_id: workflow.workflow_id.clone(),
            project_id: project_id.to_string(),
        };
        if !self.slot.try_occupy(slot) {
            tracing::warn!(project_id, workflow_id = %workflow.workflow_id, "slot occupied after claim, skipping dispatch this tick");
            return true;
        }
        if let Err(e) = self.persist_state().await {
            tracing::error!(error = %e, "failed to persist engine state after claiming slot");
        }

        let ctx = match self.provider.get_project_execution_context(project_id).await {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "failed to build execution context, treating as synchronous failure");
                self.handle_failure(&workflow.workflow_id, &e.to_string()).await;
                return true;
            }
        };
        let ctx = match &self.global_bus {
            Some(bus) => ctx.with_global_bus(Arc::new(BusPublisher(bus.clone()))),
            None => ctx,
        };
        let ctx = match self.provider.get_project_event_bus(project_id).await {
            Ok(Some(bus)) => ctx.with_project_bus(bus),
            Ok(None) => ctx,
            Err(e) => {
                tracing::warn!(project_id, error = %e, "failed to resolve per-project event bus, continuing without it");
                ctx
            }
        };

        let engine = self.clone();
        let executor = self.executor.clone();
        let workflow_id = workflow.workflow_id.clone();
        let project_id = project_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = executor.run(ctx, workflow).await {
                tracing::warn!(project_id, workflow_id, error = %e, "executor returned error, treating as failure");
                engine.handle_failure(&workflow_id, &e.to_string()).await;
            }
        });

        true
    }

    async fn handle_event(self: &Arc<Self>, event: Event) {
        match event {
            Event::WorkflowCompleted { workflow_id, .. } => {
                self.handle_completion(&workflow_id).await
            }
            Event::WorkflowFailed {
                workflow_id, error, ..
            } => {
                let reason = error
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "workflow failed".to_string());
                self.handle_failure(&workflow_id, &reason).await;
            }
            _ => {}
        }
    }

    async fn handle_completion(self: &Arc<Self>, workflow_id: &str) {
        let Some(slot) = self.slot.snapshot() else {
            return;
        };
        if slot.workflow_id != workflow_id {
            return;
        }

        match self.provider.get_project_state_manager(&slot.project_id).await {
            Ok(Some(manager)) => {
                // Re-read for PR/branch artifacts; a failure here still
                // proceeds with the column transition on empty artifacts.
                match manager.load_by_id(workflow_id).await {
                    Ok(Some(workflow)) => tracing::info!(
                        workflow_id,
                        pr_url = workflow.pr_url.as_deref(),
                        pr_number = workflow.pr_number,
                        workflow_branch = workflow.workflow_branch.as_deref(),
                        "workflow completed"
                    ),
                    Ok(None) => tracing::warn!(workflow_id, "completed workflow vanished on reload"),
                    Err(e) => tracing::warn!(workflow_id, error = %e, "failed to reload completed workflow for artifacts"),
                }
                if let Err(e) = manager
                    .update_kanban_status(workflow_id, KanbanColumn::ToVerify, None)
                    .await
                {
                    tracing::warn!(workflow_id, error = %e, "failed to move completed workflow to to_verify");
                }
            }
            Ok(None) => tracing::warn!(workflow_id, project_id = %slot.project_id, "state manager vanished while completing workflow"),
            Err(e) => tracing::warn!(workflow_id, error = %e, "failed to resolve state manager while completing workflow"),
        }

        self.breaker.record_success();
        self.slot.clear_if_matches(workflow_id);
        if let Err(e) = self.persist_state().await {
            tracing::error!(error = %e, "failed to persist engine state after completion");
        }
    }

    async fn handle_failure(self: &Arc<Self>, workflow_id: &str, reason: &str) {
        let Some(slot) = self.slot.snapshot() else {
            return;
        };
        if slot.workflow_id != workflow_id {
            return;
        }

        match self.provider.get_project_state_manager(&slot.project_id).await {
            Ok(Some(manager)) => {
                if let Err(e) = manager
                    .update_kanban_status(workflow_id, KanbanColumn::Refinement, Some(reason.to_string()))
                    .await
                {
                    tracing::warn!(workflow_id, error = %e, "failed to move failed workflow to refinement");
                }
            }
            Ok(None) => tracing::warn!(workflow_id, project_id = %slot.project_id, "state manager vanished while failing workflow"),
            Err(e) => tracing::warn!(workflow_id, error = %e, "failed to resolve state manager while failing workflow"),
        }

        self.breaker.record_failure(self.clock.epoch_ms());
        self.slot.clear_if_matches(workflow_id);

        if self.breaker.is_open() {
            self.publish(Event::CircuitBreakerTripped {
                consecutive_failures: self.breaker.consecutive_failures(),
                threshold: self.breaker.threshold(),
            });
            tracing::warn!(
                consecutive_failures = self.breaker.consecutive_failures(),
                "circuit breaker open, dispatch halted until reset"
            );
        }

        if let Err(e) = self.persist_state().await {
            tracing::error!(error = %e, "failed to persist engine state after failure");
        }
    }
}

impl<C: Clock> Engine<C> {
    /// Load persisted state, reconcile any crash-interrupted workflow,
    /// subscribe to the event bus, and start the tick loop. Fails if
    /// already started.
    pub async fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        {
            let mut guard = self.shutdown.lock();
            if guard.is_some() {
                return Err(EngineError::AlreadyStarted);
            }
            *guard = Some(CancellationToken::new());
        }

        self.recover().await;

        // The lock above just set this to `Some`; no other path clears it
        // before this read.
        #[allow(clippy::expect_used)]
        let token = self
            .shutdown
            .lock()
            .clone()
            .expect("shutdown token was just set");

        let events = self.global_bus.clone().map(|bus| {
            let engine = self.clone();
            let token = token.clone();
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        received = rx.recv() => match received {
                            Ok(event) => engine.handle_event(event).await,
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "event subscriber lagged behind the bus");
                            }
                            Err(RecvError::Closed) => break,
                        }
                    }
                }
            })
        });

        let tick = {
            let engine = self.clone();
            let token = token.clone();
            let tick_interval = self.config.tick_interval;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(tick_interval);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = interval.tick() => engine.tick().await,
                    }
                }
            })
        };

        *self.tasks.lock() = Some(EngineTasks { tick, events });
        Ok(())
    }

    /// Signal shutdown and wait for the tick and event tasks to drain,
    /// honoring `drain_timeout` as a deadline. Does not cancel an
    /// in-flight executor.
    pub async fn stop(self: &Arc<Self>, drain_timeout: Duration) -> Result<(), EngineError> {
        let token = {
            let guard = self.shutdown.lock();
            guard.clone().ok_or(EngineError::NotStarted)?
        };
        token.cancel();

        if let Some(tasks) = self.tasks.lock().take() {
            let drain = async move {
                let _ = tasks.tick.await;
                if let Some(events) = tasks.events {
                    let _ = events.await;
                }
            };
            if tokio::time::timeout(drain_timeout, drain).await.is_err() {
                *self.shutdown.lock() = None;
                return Err(EngineError::StopTimedOut);
            }
        }

        *self.shutdown.lock() = None;
        Ok(())
    }

    pub async fn enable(&self) -> Result<(), EngineError> {
        self.enabled.store(true, Ordering::SeqCst);
        self.publish(Event::KanbanStatusChanged {
            project_id: None,
            enabled: true,
        });
        self.persist_state().await
    }

    pub async fn disable(&self) -> Result<(), EngineError> {
        self.enabled.store(false, Ordering::SeqCst);
        self.publish(Event::KanbanStatusChanged {
            project_id: None,
            enabled: false,
        });
        self.persist_state().await
    }

    pub async fn reset_circuit_breaker(&self) -> Result<(), EngineError> {
        self.breaker.reset();
        self.publish(Event::CircuitBreakerReset);
        self.persist_state().await
    }
}

// Test-only accessor so engine_tests.rs can drive the dispatch/tick/event
// machinery directly without going through `start`'s real interval timer.
#[cfg(test)]
impl<C: Clock> Engine<C> {
    pub(crate) async fn tick_once(self: &Arc<Self>) {
        self.tick().await;
    }

    pub(crate) async fn handle_event_for_test(self: &Arc<Self>, event: Event) {
        self.handle_event(event).await;
    }

    pub(crate) async fn recover_for_test(&self) {
        self.recover().await;
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

//! Runs the scheduler against real `FileKanbanStateManager` storage and a
//! `MultiProjectProvider` over a temp directory, re-opening fresh state
//! manager handles afterward to confirm what landed on disk rather than
//! trusting an in-memory cache. `kanban-engine`'s own suite covers the same
//! scenarios against in-memory storage; this is the file-backed, restart
//! counterpart.

use crate::prelude::*;
use kanban_adapters::{fake_executor, InProcessEventBus, MultiProjectProvider, Script};
use kanban_core::{
    EngineState, KanbanColumn, KanbanStateManager, ProjectStateProvider, Workflow, WorkflowBuilder,
    WorkflowStatus,
};
use kanban_engine::{Engine, EngineConfig};
use kanban_storage::FileKanbanStateManager;
use std::sync::Arc;
use std::time::Duration;

fn test_config() -> EngineConfig {
    EngineConfig::builder()
        .tick_interval(Duration::from_millis(10))
        .build()
}

#[tokio::test]
async fn todo_workflow_reaches_to_verify_and_survives_a_fresh_store_handle() {
    let project = Project::empty();
    let proj_dir = project.project("proj-1");

    {
        let seed_store = FileKanbanStateManager::open(proj_dir.join(".kanban")).unwrap();
        seed_store
            .seed_workflow(Workflow {
                workflow_id: "wf-1".to_string(),
                status: WorkflowStatus::Pending,
                kanban_column: KanbanColumn::Todo,
                kanban_last_error: None,
                pr_url: None,
                pr_number: None,
                workflow_branch: None,
                created_at_epoch_ms: 1,
                updated_at_epoch_ms: 1,
            })
            .unwrap();
    }

    let provider: Arc<dyn ProjectStateProvider> =
        Arc::new(MultiProjectProvider::new(project.projects_root(), ".kanban"));
    let engine_state_store = Arc::new(FileKanbanStateManager::open(project.engine_state_dir()).unwrap());
    let bus = Arc::new(InProcessEventBus::new());
    let executor = fake_executor(Script::Succeed);

    let engine = Arc::new(
        Engine::new(test_config(), provider, engine_state_store.clone() as Arc<dyn KanbanStateManager>, executor)
            .with_global_bus(bus),
    );
    engine.enable().await.unwrap();
    engine.start().await.unwrap();

    assert!(engine.wait_for_slot_clear(Duration::from_secs(2)).await);
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.stop(Duration::from_secs(1)).await.unwrap();

    // Re-open handles onto the same directories — this is what a restarted
    // process would do — and confirm the completion actually hit disk.
    let reopened = FileKanbanStateManager::open(proj_dir.join(".kanban")).unwrap();
    let workflow = reopened.load_by_id("wf-1").await.unwrap().expect("workflow persisted");
    assert_eq!(workflow.kanban_column, KanbanColumn::ToVerify);

    let reopened_engine_state =
        FileKanbanStateManager::open(project.engine_state_dir()).unwrap();
    let state = reopened_engine_state.get_kanban_engine_state().await.unwrap().unwrap();
    assert_eq!(state.current_workflow_id, None);
    assert_eq!(state.consecutive_failures, 0);
}

#[tokio::test]
async fn restart_after_a_crash_moves_the_interrupted_workflow_to_refinement() {
    let project = Project::empty();
    let proj_dir = project.project("proj-1");

    // Simulate the crashed process: a workflow left mid-flight, and the
    // engine's own persisted state still pointing at it.
    {
        let store = FileKanbanStateManager::open(proj_dir.join(".kanban")).unwrap();
        store
            .seed_workflow(
                WorkflowBuilder::default()
                    .workflow_id("wf-x")
                    .status(WorkflowStatus::Running)
                    .kanban_column(KanbanColumn::InProgress)
                    .build(),
            )
            .unwrap();
    }
    {
        let engine_store = FileKanbanStateManager::open(project.engine_state_dir()).unwrap();
        engine_store
            .save_kanban_engine_state(&EngineState {
                enabled: true,
                current_workflow_id: Some("wf-x".to_string()),
                current_project_id: Some("proj-1".to_string()),
                consecutive_failures: 0,
                circuit_breaker_open: false,
                last_failure_at: None,
            })
            .await
            .unwrap();
    }

    // "Restart": brand new state manager and provider handles opened
    // against the same on-disk directories.
    let provider: Arc<dyn ProjectStateProvider> =
        Arc::new(MultiProjectProvider::new(project.projects_root(), ".kanban"));
    let engine_state_store = Arc::new(FileKanbanStateManager::open(project.engine_state_dir()).unwrap());
    let executor = fake_executor(Script::HangUntilReleased);

    let engine = Arc::new(Engine::new(
        test_config(),
        provider,
        engine_state_store as Arc<dyn KanbanStateManager>,
        executor,
    ));
    engine.start().await.unwrap();
    // Recovery runs synchronously inside `start`, before the tick loop's
    // first interval fires.
    engine.stop(Duration::from_secs(1)).await.unwrap();

    let reopened = FileKanbanStateManager::open(proj_dir.join(".kanban")).unwrap();
    let workflow = reopened.load_by_id("wf-x").await.unwrap().expect("workflow persisted");
    assert_eq!(workflow.kanban_column, KanbanColumn::Refinement);
    assert_eq!(workflow.kanban_last_error.as_deref(), Some("interrupted during execution"));

    let reopened_engine_state =
        FileKanbanStateManager::open(project.engine_state_dir()).unwrap();
    let state = reopened_engine_state.get_kanban_engine_state().await.unwrap().unwrap();
    similar_asserts::assert_eq!(
        state,
        EngineState {
            enabled: true,
            current_workflow_id: None,
            current_project_id: None,
            consecutive_failures: 1,
            circuit_breaker_open: false,
            last_failure_at: state.last_failure_at,
        }
    );
}

//! `kanbanctl enable|disable|status|reset-circuit-breaker` against a real
//! file-backed engine state directory, driven through the compiled binary
//! rather than the command functions directly.

use crate::prelude::*;
use kanban_core::EngineState;

#[test]
fn status_on_a_fresh_project_reports_defaults() {
    let project = Project::empty();
    project
        .kanbanctl()
        .args(["status"])
        .run()
        .passes()
        .stdout_has("enabled: false")
        .stdout_has("current workflow: none");
}

#[test]
fn enable_then_status_reports_enabled() {
    let project = Project::empty();
    project.kanbanctl().args(["enable"]).run().passes();
    project
        .kanbanctl()
        .args(["status"])
        .run()
        .passes()
        .stdout_has("enabled: true");
}

#[test]
fn disable_after_enable_reports_disabled_again() {
    let project = Project::empty();
    project.kanbanctl().args(["enable"]).run().passes();
    project.kanbanctl().args(["disable"]).run().passes();
    project
        .kanbanctl()
        .args(["status"])
        .run()
        .passes()
        .stdout_has("enabled: false");
}

#[test]
fn enable_persists_across_separate_invocations() {
    let project = Project::empty();
    project.kanbanctl().args(["enable"]).run().passes();

    // A second, unrelated invocation must see what the first persisted —
    // this is the whole point of `enable`/`disable` operating on-disk
    // rather than against a live process.
    let ran = project.kanbanctl().args(["status", "--output", "json"]).run().passes();
    let state: EngineState = serde_json::from_str(ran.stdout()).unwrap();
    assert!(state.enabled);
}

#[test]
fn reset_circuit_breaker_clears_a_tripped_breaker() {
    let project = Project::empty();
    project.kanbanctl().args(["enable"]).run().passes();

    // Nothing has actually tripped the breaker yet, but reset must still
    // succeed and report a clean state either way.
    project
        .kanbanctl()
        .args(["reset-circuit-breaker"])
        .run()
        .passes()
        .stdout_has("circuit breaker reset");

    project
        .kanbanctl()
        .args(["status"])
        .run()
        .passes()
        .stdout_has("circuit breaker open: false")
        .stdout_has("consecutive failures: 0");
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn make_projects(root: &std::path::Path, names: &[&str]) {
    for name in names {
        fs::create_dir_all(root.join(name)).unwrap();
    }
}

#[test]
fn discovery_lists_immediate_subdirectories_sorted() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["b", "a"]);
    let discovery = FsProjectDiscovery::new(dir.path());
    let projects = discovery.discover().unwrap();
    let ids: Vec<&str> = projects.iter().map(|p| p.project_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn discovery_of_missing_root_is_empty() {
    let discovery = FsProjectDiscovery::new("/does/not/exist/kanban-root");
    assert_eq!(discovery.discover().unwrap(), vec![]);
}

#[tokio::test]
async fn list_loaded_projects_is_empty_before_any_resolution() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["p1"]);
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    assert!(provider.list_loaded_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_active_projects_resolves_and_populates_loaded() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["p1", "p2"]);
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    let active = provider.list_active_projects().await.unwrap();
    assert_eq!(active.len(), 2);
    let loaded = provider.list_loaded_projects().await.unwrap();
    assert_eq!(loaded.len(), 2);
}

#[tokio::test]
async fn get_project_state_manager_resolves_on_demand() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["p1"]);
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    assert!(provider.list_loaded_projects().await.unwrap().is_empty());
    let mgr = provider.get_project_state_manager("p1").await.unwrap();
    assert!(mgr.is_some());
    assert_eq!(provider.list_loaded_projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_project_state_manager_is_none() {
    let dir = tempdir().unwrap();
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    assert!(provider
        .get_project_state_manager("ghost")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn project_event_bus_is_available_once_resolved() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["p1"]);
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    assert!(provider.get_project_event_bus("p1").await.unwrap().is_none());
    provider.list_active_projects().await.unwrap();
    assert!(provider.get_project_event_bus("p1").await.unwrap().is_some());
}

#[tokio::test]
async fn execution_context_fails_before_resolution() {
    let dir = tempdir().unwrap();
    make_projects(dir.path(), &["p1"]);
    let provider = MultiProjectProvider::new(dir.path(), ".kanban");
    assert!(provider.get_project_execution_context("p1").await.is_err());
    provider.list_active_projects().await.unwrap();
    assert!(provider.get_project_execution_context("p1").await.is_ok());
}

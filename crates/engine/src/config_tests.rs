// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_match_spec() {
    let config = EngineConfig::default();
    assert_eq!(config.tick_interval, Duration::from_secs(5));
    assert_eq!(config.circuit_breaker_threshold, 3);
}

#[test]
fn builder_overrides_defaults() {
    let config = EngineConfig::builder()
        .tick_interval(Duration::from_secs(1))
        .circuit_breaker_threshold(10)
        .projects_root("/tmp/projects")
        .build();
    assert_eq!(config.tick_interval, Duration::from_secs(1));
    assert_eq!(config.circuit_breaker_threshold, 10);
    assert_eq!(config.projects_root, Some(PathBuf::from("/tmp/projects")));
}

#[test]
fn from_toml_fills_in_missing_fields_with_defaults() {
    let config = EngineConfig::from_toml("circuit_breaker_threshold = 7").unwrap();
    assert_eq!(config.circuit_breaker_threshold, 7);
    assert_eq!(config.tick_interval, DEFAULT_TICK_INTERVAL);
}

#[test]
fn from_toml_reads_all_fields() {
    let toml = r#"
        tick_interval_secs = 30
        circuit_breaker_threshold = 5
        event_channel_capacity = 64
        projects_root = "/srv/projects"
        state_dir = "/srv/state"
    "#;
    let config = EngineConfig::from_toml(toml).unwrap();
    assert_eq!(config.tick_interval, Duration::from_secs(30));
    assert_eq!(config.circuit_breaker_threshold, 5);
    assert_eq!(config.event_channel_capacity, 64);
    assert_eq!(config.projects_root, Some(PathBuf::from("/srv/projects")));
    assert_eq!(config.state_dir, Some(PathBuf::from("/srv/state")));
}

#[test]
fn from_toml_rejects_zero_tick_interval() {
    let err = EngineConfig::from_toml("tick_interval_secs = 0").unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

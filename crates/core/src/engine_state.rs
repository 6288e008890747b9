// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's own persisted operational state.
//!
//! Saved on every state-changing transition (enable, disable, slot set/clear,
//! circuit breaker trip/reset) and loaded once at start-up. Missing fields
//! decode as defaults so the format never needs a version tag.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub current_workflow_id: Option<String>,
    #[serde(default)]
    pub current_project_id: Option<String>,
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default)]
    pub circuit_breaker_open: bool,
    #[serde(default)]
    pub last_failure_at: Option<u64>,
}

impl EngineState {
    /// Round-trip through JSON, the wire format used by
    /// [`crate::traits::KanbanStateManager::save_kanban_engine_state`].
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_engine_state() -> impl Strategy<Value = EngineState> {
        (
            any::<bool>(),
            proptest::option::of(".*"),
            proptest::option::of(".*"),
            any::<u32>(),
            any::<bool>(),
            proptest::option::of(any::<u64>()),
        )
            .prop_map(
                |(
                    enabled,
                    current_workflow_id,
                    current_project_id,
                    consecutive_failures,
                    circuit_breaker_open,
                    last_failure_at,
                )| EngineState {
                    enabled,
                    current_workflow_id,
                    current_project_id,
                    consecutive_failures,
                    circuit_breaker_open,
                    last_failure_at,
                },
            )
    }

    proptest! {
        #[test]
        fn engine_state_json_roundtrips_for_any_field_combination(state in arb_engine_state()) {
            let json = state.to_json().expect("encode");
            let decoded = EngineState::from_json(&json).expect("decode");
            prop_assert_eq!(decoded, state);
        }
    }

    #[test]
    fn missing_state_decodes_as_defaults() {
        let state: EngineState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, EngineState::default());
        assert!(!state.enabled);
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.current_workflow_id, None);
    }

    #[test]
    fn round_trips_through_json() {
        let state = EngineState {
            enabled: true,
            current_workflow_id: Some("wf-1".into()),
            current_project_id: Some("default".into()),
            consecutive_failures: 2,
            circuit_breaker_open: false,
            last_failure_at: Some(123),
        };
        let json = state.to_json().unwrap();
        let back = EngineState::from_json(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"enabled": true, "future_field": 42}"#;
        let state = EngineState::from_json(json).unwrap();
        assert!(state.enabled);
    }
}

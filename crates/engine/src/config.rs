// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tuning knobs: tick cadence, circuit-breaker threshold, and the
//! terminal-event channel capacity. Populated either by a builder (CLI
//! flags) or by deserializing a TOML config file on disk.

use crate::error::EngineError;
use kanban_core::circuit_breaker::DEFAULT_THRESHOLD;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Engine-wide configuration. Not `Deserialize` directly — use
/// [`EngineConfig::from_toml`], which goes through [`EngineConfigFile`] so
/// the on-disk format can use plain seconds instead of a `Duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub circuit_breaker_threshold: u32,
    pub event_channel_capacity: usize,
    pub projects_root: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            circuit_breaker_threshold: DEFAULT_THRESHOLD,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            projects_root: None,
            state_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse a TOML config file's contents. Missing keys fall back to
    /// [`EngineConfig::default`]'s values.
    pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
        let file: EngineConfigFile =
            toml::from_str(contents).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        if file.tick_interval_secs == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_interval_secs must be greater than zero".into(),
            ));
        }
        Ok(Self {
            tick_interval: Duration::from_secs(file.tick_interval_secs),
            circuit_breaker_threshold: file.circuit_breaker_threshold,
            event_channel_capacity: file.event_channel_capacity,
            projects_root: file.projects_root,
            state_dir: file.state_dir,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EngineConfigFile {
    tick_interval_secs: u64,
    circuit_breaker_threshold: u32,
    event_channel_capacity: usize,
    projects_root: Option<PathBuf>,
    state_dir: Option<PathBuf>,
}

impl Default for EngineConfigFile {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            tick_interval_secs: defaults.tick_interval.as_secs(),
            circuit_breaker_threshold: defaults.circuit_breaker_threshold,
            event_channel_capacity: defaults.event_channel_capacity,
            projects_root: None,
            state_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    tick_interval: Duration,
    circuit_breaker_threshold: u32,
    event_channel_capacity: usize,
    projects_root: Option<PathBuf>,
    state_dir: Option<PathBuf>,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            tick_interval: defaults.tick_interval,
            circuit_breaker_threshold: defaults.circuit_breaker_threshold,
            event_channel_capacity: defaults.event_channel_capacity,
            projects_root: None,
            state_dir: None,
        }
    }
}

impl EngineConfigBuilder {
    kanban_core::setters! {
        set {
            tick_interval: Duration,
            circuit_breaker_threshold: u32,
            event_channel_capacity: usize,
        }
        option {
            projects_root: PathBuf,
            state_dir: PathBuf,
        }
    }

    pub fn build(self) -> EngineConfig {
        EngineConfig {
            tick_interval: self.tick_interval,
            circuit_breaker_threshold: self.circuit_breaker_threshold,
            event_channel_capacity: self.event_channel_capacity,
            projects_root: self.projects_root,
            state_dir: self.state_dir,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

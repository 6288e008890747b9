// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A pure, in-memory failure-count gate.
//!
//! The breaker itself does no persistence — the engine is responsible for
//! saving and restoring `consecutive_failures` / `last_failure_at` across
//! restarts via [`crate::EngineState`] and [`CircuitBreaker::restore`].

use parking_lot::Mutex;

/// Default number of consecutive failures before the breaker opens.
pub const DEFAULT_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    consecutive_failures: u32,
    last_failure_at: Option<u64>,
}

/// Counts consecutive workflow failures and exposes an open/closed predicate.
///
/// There is no time-based half-open recovery: once open, only an explicit
/// [`CircuitBreaker::reset`] (surfaced by the engine as `ResetCircuitBreaker`)
/// re-closes it. Repeated failures usually indicate a systemic problem
/// (credentials, quota) that wall-clock backoff would only mask.
pub struct CircuitBreaker {
    threshold: u32,
    counters: Mutex<Counters>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Record a workflow failure at the given wall-clock time.
    pub fn record_failure(&self, now_epoch_ms: u64) {
        let mut c = self.counters.lock();
        c.consecutive_failures += 1;
        c.last_failure_at = Some(now_epoch_ms);
    }

    /// Record a successful completion: resets the counter and clears the
    /// last-failure timestamp.
    pub fn record_success(&self) {
        let mut c = self.counters.lock();
        c.consecutive_failures = 0;
        c.last_failure_at = None;
    }

    /// Manually reset the breaker (the `ResetCircuitBreaker` operation).
    pub fn reset(&self) {
        self.record_success();
    }

    /// Restore persisted counters on start-up, bypassing the usual
    /// increment-by-one semantics of `record_failure`.
    pub fn restore(&self, consecutive_failures: u32, last_failure_at: Option<u64>) {
        let mut c = self.counters.lock();
        c.consecutive_failures = consecutive_failures;
        c.last_failure_at = last_failure_at;
    }

    pub fn is_open(&self) -> bool {
        self.counters.lock().consecutive_failures >= self.threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.counters.lock().consecutive_failures
    }

    pub fn last_failure_at(&self) -> Option<u64> {
        self.counters.lock().last_failure_at
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;

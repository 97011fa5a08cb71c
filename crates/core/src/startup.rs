// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup outcome tracking shared between the controller and status readers.
//!
//! The tracker is the single writer-facing handle for [`StartupState`]. It is
//! cheap to clone; all clones observe the same record. Every transition runs
//! inside one lock section, so readers never see a half-applied update such as
//! `last_error` set while `in_progress` is still true.
//!
//! State is held in memory only. A fresh tracker always starts empty.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Last known outcome of a gateway startup attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupState {
    /// An attempt has begun and not yet reached success or failure
    pub in_progress: bool,
    /// Message of the most recent completed attempt, if it failed
    pub last_error: Option<String>,
    /// Epoch ms at which `last_error` was recorded
    pub last_error_at_ms: Option<u64>,
    /// Consecutive failures since the last success
    pub failure_count: u32,
}

impl StartupState {
    /// Whether the most recent completed attempt failed
    pub fn is_failed(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Shared, lock-protected handle to a [`StartupState`]
#[derive(Clone, Default)]
pub struct StartupTracker {
    inner: Arc<Mutex<StartupState>>,
}

impl StartupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an attempt has started.
    ///
    /// Leaves `last_error` untouched: it still describes the previous
    /// completed attempt until this one finishes.
    pub fn mark_in_progress(&self) {
        self.inner.lock().in_progress = true;
    }

    /// Record a successful attempt, clearing any previous failure.
    pub fn mark_success(&self) {
        let mut state = self.inner.lock();
        state.in_progress = false;
        state.last_error = None;
        state.last_error_at_ms = None;
        state.failure_count = 0;
    }

    /// Record a failed attempt.
    pub fn mark_failed(&self, message: impl Into<String>, at_ms: u64) {
        let mut state = self.inner.lock();
        state.in_progress = false;
        state.last_error = Some(message.into());
        state.last_error_at_ms = Some(at_ms);
        state.failure_count = state.failure_count.saturating_add(1);
    }

    /// Point-in-time copy of the current state
    pub fn snapshot(&self) -> StartupState {
        self.inner.lock().clone()
    }
}

impl std::fmt::Debug for StartupTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StartupTracker").field(&self.snapshot()).finish()
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;

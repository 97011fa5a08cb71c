// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake storage adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::StorageAdapter;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded mount call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    pub env: Vec<(String, String)>,
}

struct FakeStorageState {
    calls: Vec<MountCall>,
}

/// Fake storage adapter for testing
#[derive(Clone)]
pub struct FakeStorageAdapter {
    inner: Arc<Mutex<FakeStorageState>>,
}

impl Default for FakeStorageAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeStorageState { calls: Vec::new() })),
        }
    }
}

impl FakeStorageAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded mounts
    pub fn calls(&self) -> Vec<MountCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl StorageAdapter for FakeStorageAdapter {
    async fn mount(&self, env: &[(String, String)]) {
        self.inner.lock().calls.push(MountCall { env: env.to_vec() });
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

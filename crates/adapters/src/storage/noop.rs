// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op storage adapter for when no mount is configured.

use super::StorageAdapter;
use async_trait::async_trait;

/// Storage adapter that mounts nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpStorageAdapter;

impl NoOpStorageAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StorageAdapter for NoOpStorageAdapter {
    async fn mount(&self, _env: &[(String, String)]) {}
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;

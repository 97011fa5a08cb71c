// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage mount adapters

mod command;
mod noop;

pub use command::SandboxMountAdapter;
pub use noop::NoOpStorageAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStorageAdapter, MountCall};

use async_trait::async_trait;

/// Adapter that makes persistent storage available to the gateway.
///
/// Mounting is best-effort: implementations log their own failures and
/// never fail the caller.
#[async_trait]
pub trait StorageAdapter: Clone + Send + Sync + 'static {
    /// Mount storage using the given launch environment
    async fn mount(&self, env: &[(String, String)]);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the sandbox backend and storage mounting

mod env;
pub mod sandbox;
pub mod storage;
pub mod subprocess;
pub mod traced;

pub use sandbox::{LocalSandbox, SandboxAdapter, SandboxError, StartOptions};
pub use storage::{NoOpStorageAdapter, SandboxMountAdapter, StorageAdapter};
pub use traced::TracedSandbox;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use sandbox::{FakeSandboxAdapter, SandboxCall};
#[cfg(any(test, feature = "test-support"))]
pub use storage::FakeStorageAdapter;

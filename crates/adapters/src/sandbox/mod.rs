// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sandbox backend adapters

mod local;

pub use local::LocalSandbox;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcess, FakeSandboxAdapter, SandboxCall};

use async_trait::async_trait;
use gw_core::{ManagedProcess, ProcessId, ProcessLogs};
use std::time::Duration;
use thiserror::Error;

/// Errors from sandbox operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SandboxError {
    #[error("process not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("process exited: {0}")]
    Exited(String),
}

/// Options for starting a process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Environment overrides. `None` inherits the sandbox's default environment.
    pub env: Option<Vec<(String, String)>>,
}

impl StartOptions {
    /// Build options from an env mapping; an empty mapping means no override.
    pub fn with_env(vars: Vec<(String, String)>) -> Self {
        Self {
            env: (!vars.is_empty()).then_some(vars),
        }
    }
}

/// Adapter for the execution sandbox that hosts the gateway.
///
/// Every per-process operation is keyed by the [`ProcessId`] returned from
/// [`list_processes`](SandboxAdapter::list_processes) or
/// [`start_process`](SandboxAdapter::start_process).
#[async_trait]
pub trait SandboxAdapter: Clone + Send + Sync + 'static {
    /// List processes currently known to the sandbox, in backend order
    async fn list_processes(&self) -> Result<Vec<ManagedProcess>, SandboxError>;

    /// Start a shell command line
    async fn start_process(
        &self,
        command: &str,
        options: StartOptions,
    ) -> Result<ManagedProcess, SandboxError>;

    /// Block until a TCP connection to `port` succeeds or `timeout` elapses
    async fn wait_for_port(
        &self,
        id: &ProcessId,
        port: u16,
        timeout: Duration,
    ) -> Result<(), SandboxError>;

    /// Block until the process exits, returning its exit code if it has one
    async fn wait_for_exit(
        &self,
        id: &ProcessId,
        timeout: Duration,
    ) -> Result<Option<i32>, SandboxError>;

    /// Captured output of a process started through this sandbox
    async fn logs(&self, id: &ProcessId) -> Result<ProcessLogs, SandboxError>;

    /// Request termination of a process
    async fn kill(&self, id: &ProcessId) -> Result<(), SandboxError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

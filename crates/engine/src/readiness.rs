// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waiting for the gateway port to accept connections

use gw_adapters::{SandboxAdapter, SandboxError};
use gw_core::ManagedProcess;
use std::time::Duration;
use thiserror::Error;

/// Slack on top of the backend's own timeout
const OUTER_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Errors from waiting on the gateway port
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("gateway port {port} not ready within {timeout_ms}ms")]
    Timeout { port: u16, timeout_ms: u64 },
    #[error("readiness check failed: {0}")]
    Failed(String),
}

/// Wait for `process` to accept TCP connections on `port`.
///
/// The full `timeout` is always handed to the backend, also for processes
/// that already report running. Nothing is killed here.
pub async fn wait_ready<S: SandboxAdapter>(
    sandbox: &S,
    process: &ManagedProcess,
    port: u16,
    timeout: Duration,
) -> Result<(), ReadinessError> {
    let timeout_ms = timeout.as_millis() as u64;
    let wait = sandbox.wait_for_port(&process.id, port, timeout);

    match tokio::time::timeout(timeout + OUTER_TIMEOUT_SLACK, wait).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(SandboxError::Timeout(_))) | Err(_) => {
            Err(ReadinessError::Timeout { port, timeout_ms })
        }
        Ok(Err(e)) => Err(ReadinessError::Failed(e.to_string())),
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;

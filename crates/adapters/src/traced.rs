// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::sandbox::{SandboxAdapter, SandboxError, StartOptions};
use async_trait::async_trait;
use gw_core::{ManagedProcess, ProcessId, ProcessLogs};
use std::time::Duration;
use tracing::Instrument;

/// Wrapper that adds tracing to any SandboxAdapter
#[derive(Clone)]
pub struct TracedSandbox<S> {
    inner: S,
}

impl<S> TracedSandbox<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SandboxAdapter> SandboxAdapter for TracedSandbox<S> {
    async fn list_processes(&self) -> Result<Vec<ManagedProcess>, SandboxError> {
        let result = self.inner.list_processes().await;
        tracing::info_span!("sandbox.list").in_scope(|| match &result {
            Ok(list) => tracing::debug!(count = list.len(), "listed"),
            Err(e) => tracing::warn!(error = %e, "list failed"),
        });
        result
    }

    async fn start_process(
        &self,
        command: &str,
        options: StartOptions,
    ) -> Result<ManagedProcess, SandboxError> {
        let env_count = options.env.as_ref().map_or(0, |e| e.len());
        async {
            tracing::info!(command, env_count, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.start_process(command, options).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(p) => tracing::info!(process_id = %p.id, elapsed_ms, "process started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("sandbox.start"))
        .await
    }

    async fn wait_for_port(
        &self,
        id: &ProcessId,
        port: u16,
        timeout: Duration,
    ) -> Result<(), SandboxError> {
        let timeout_ms = timeout.as_millis() as u64;
        async {
            tracing::info!(timeout_ms, "waiting for port");
            let start = std::time::Instant::now();
            let result = self.inner.wait_for_port(id, port, timeout).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "port reachable"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "port wait failed"),
            }
            result
        }
        .instrument(tracing::info_span!("sandbox.wait_for_port", %id, port))
        .await
    }

    async fn wait_for_exit(
        &self,
        id: &ProcessId,
        timeout: Duration,
    ) -> Result<Option<i32>, SandboxError> {
        let result = self.inner.wait_for_exit(id, timeout).await;
        tracing::info_span!("sandbox.wait_for_exit", %id).in_scope(|| match &result {
            Ok(code) => tracing::debug!(exit_code = ?code, "exited"),
            Err(e) => tracing::warn!(error = %e, "exit wait failed"),
        });
        result
    }

    async fn logs(&self, id: &ProcessId) -> Result<ProcessLogs, SandboxError> {
        let result = self.inner.logs(id).await;
        tracing::info_span!("sandbox.logs", %id).in_scope(|| {
            tracing::debug!(
                stdout_len = result.as_ref().map(|l| l.stdout.len()).ok(),
                "captured"
            )
        });
        result
    }

    async fn kill(&self, id: &ProcessId) -> Result<(), SandboxError> {
        let result = self.inner.kill(id).await;
        tracing::info_span!("sandbox.kill", %id).in_scope(|| match &result {
            Ok(()) => tracing::info!("killed"),
            Err(e) => tracing::warn!(error = %e, "kill failed (may be expected)"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;

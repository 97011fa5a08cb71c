// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage adapter that runs a mount command inside the sandbox.

use super::StorageAdapter;
use crate::env::mount_timeout;
use crate::sandbox::{SandboxAdapter, StartOptions};
use async_trait::async_trait;

/// Runs a configured shell command in the sandbox to mount storage.
///
/// The command receives the launch environment, is bounded by the mount
/// timeout, and any failure is logged and swallowed.
#[derive(Clone)]
pub struct SandboxMountAdapter<S> {
    sandbox: S,
    command: String,
}

impl<S: SandboxAdapter> SandboxMountAdapter<S> {
    pub fn new(sandbox: S, command: impl Into<String>) -> Self {
        Self {
            sandbox,
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl<S: SandboxAdapter> StorageAdapter for SandboxMountAdapter<S> {
    async fn mount(&self, env: &[(String, String)]) {
        let options = StartOptions::with_env(env.to_vec());
        let process = match self.sandbox.start_process(&self.command, options).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "storage mount failed to start");
                return;
            }
        };

        let timeout = mount_timeout();
        match self.sandbox.wait_for_exit(&process.id, timeout).await {
            Ok(Some(0)) => tracing::info!(command = %self.command, "storage mounted"),
            Ok(code) => {
                let stderr = self
                    .sandbox
                    .logs(&process.id)
                    .await
                    .map(|l| l.stderr.trim().to_string())
                    .unwrap_or_default();
                tracing::warn!(
                    command = %self.command,
                    exit_code = ?code,
                    stderr,
                    "storage mount exited with failure"
                );
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "storage mount did not finish");
                if let Err(e) = self.sandbox.kill(&process.id).await {
                    tracing::debug!(error = %e, "failed to kill mount command");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway lifecycle: reuse a healthy gateway or start a fresh one

use crate::config::GatewayConfig;
use crate::discovery::{find_gateway_process, Discovery};
use crate::error::GatewayError;
use crate::launch_env::EnvBuilder;
use crate::readiness::wait_ready;
use crate::startup_logs::{read_startup_logs, StartupLogs};
use gw_adapters::{SandboxAdapter, StartOptions, StorageAdapter};
use gw_core::{Clock, ManagedProcess, ProcessStatus, StartupTracker};

/// Ensures exactly one reachable gateway is running in the sandbox.
///
/// Every [`ensure_gateway`](Self::ensure_gateway) call records its outcome in
/// the shared [`StartupTracker`].
pub struct GatewayController<S, M, E, C> {
    sandbox: S,
    storage: M,
    env: E,
    clock: C,
    tracker: StartupTracker,
    config: GatewayConfig,
}

impl<S, M, E, C> GatewayController<S, M, E, C>
where
    S: SandboxAdapter,
    M: StorageAdapter,
    E: EnvBuilder,
    C: Clock,
{
    pub fn new(
        sandbox: S,
        storage: M,
        env: E,
        clock: C,
        tracker: StartupTracker,
        config: GatewayConfig,
    ) -> Self {
        Self {
            sandbox,
            storage,
            env,
            clock,
            tracker,
            config,
        }
    }

    pub fn tracker(&self) -> &StartupTracker {
        &self.tracker
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Return a reachable gateway, starting one if needed.
    pub async fn ensure_gateway(&self) -> Result<ManagedProcess, GatewayError> {
        self.tracker.mark_in_progress();

        let env = self.env.build();
        self.storage.mount(&env).await;

        match find_gateway_process(&self.sandbox).await {
            Discovery::Found(process) => {
                if let Some(ready) = self.try_reuse(process).await {
                    self.tracker.mark_success();
                    return Ok(ready);
                }
            }
            Discovery::Absent => tracing::info!("no gateway process found"),
            Discovery::Unknown(reason) => {
                tracing::warn!(%reason, "process listing failed, treating gateway as absent")
            }
        }

        self.fresh_start(env).await
    }

    /// Current contents of the startup log
    pub async fn startup_logs(&self) -> StartupLogs {
        read_startup_logs(&self.sandbox, &self.config.log_path).await
    }

    /// Wait on an existing gateway; kill it if it never becomes reachable.
    async fn try_reuse(&self, process: ManagedProcess) -> Option<ManagedProcess> {
        tracing::info!(
            process_id = %process.id,
            status = %process.status,
            "found existing gateway"
        );

        match wait_ready(
            &self.sandbox,
            &process,
            self.config.port,
            self.config.startup_timeout,
        )
        .await
        {
            Ok(()) => {
                tracing::info!(process_id = %process.id, "reusing gateway");
                Some(ManagedProcess {
                    status: ProcessStatus::Running,
                    ..process
                })
            }
            Err(e) => {
                tracing::warn!(process_id = %process.id, error = %e, "existing gateway not reachable, restarting");
                if let Err(e) = self.sandbox.kill(&process.id).await {
                    tracing::warn!(process_id = %process.id, error = %e, "failed to kill stuck gateway");
                }
                None
            }
        }
    }

    async fn fresh_start(&self, env: Vec<(String, String)>) -> Result<ManagedProcess, GatewayError> {
        let command = self.config.startup_command();
        tracing::info!(command, env_count = env.len(), "starting gateway");

        let process = match self
            .sandbox
            .start_process(&command, StartOptions::with_env(env))
            .await
        {
            Ok(p) => p,
            Err(e) => return Err(self.fail(e.to_string())),
        };

        match wait_ready(
            &self.sandbox,
            &process,
            self.config.port,
            self.config.startup_timeout,
        )
        .await
        {
            Ok(()) => {
                if let Some(text) = self.startup_logs().await.text() {
                    tracing::debug!(logs = text, "gateway startup output");
                }
                self.tracker.mark_success();
                tracing::info!(process_id = %process.id, "gateway ready");
                Ok(ManagedProcess {
                    status: ProcessStatus::Running,
                    ..process
                })
            }
            Err(e) => {
                let logs = self.startup_logs().await;
                if let StartupLogs::Unavailable(ref reason) = logs {
                    tracing::debug!(%reason, "startup log unavailable");
                }
                let message = match logs.text() {
                    Some(text) => text.to_string(),
                    None => e.to_string(),
                };
                Err(self.fail(message))
            }
        }
    }

    fn fail(&self, message: String) -> GatewayError {
        tracing::error!(error = %message, "gateway startup failed");
        self.tracker.mark_failed(message.clone(), self.clock.epoch_ms());
        GatewayError::StartupFailed(message)
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use fs2::FileExt;
use gw_adapters::{
    LocalSandbox, NoOpStorageAdapter, SandboxMountAdapter, StorageAdapter, TracedSandbox,
};
use gw_core::{StartupTracker, SystemClock};
use gw_engine::launch_env::gateway_env_path;
use gw_engine::{ForwardedEnv, GatewayConfig, GatewayController};
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::env::{mount_command, state_dir};
use crate::protocol::PROTOCOL_VERSION;

/// Sandbox backend used by the daemon
pub type DaemonSandbox = TracedSandbox<LocalSandbox>;

/// Controller with concrete adapter types (wrapped with tracing)
pub type DaemonController =
    GatewayController<DaemonSandbox, DaemonStorage, ForwardedEnv, SystemClock>;

/// Storage mounting selected at startup
#[derive(Clone)]
pub enum DaemonStorage {
    NoOp(NoOpStorageAdapter),
    Mount(SandboxMountAdapter<DaemonSandbox>),
}

impl DaemonStorage {
    fn from_command(sandbox: &DaemonSandbox, command: Option<String>) -> Self {
        match command {
            Some(cmd) => DaemonStorage::Mount(SandboxMountAdapter::new(sandbox.clone(), cmd)),
            None => DaemonStorage::NoOp(NoOpStorageAdapter::new()),
        }
    }
}

#[async_trait]
impl StorageAdapter for DaemonStorage {
    async fn mount(&self, env: &[(String, String)]) {
        match self {
            DaemonStorage::NoOp(s) => s.mount(env).await,
            DaemonStorage::Mount(s) => s.mount(env).await,
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/gw)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Dotenv file layered into the gateway environment
    pub gateway_env_path: PathBuf,
    /// Shell command mounting storage before each ensure
    pub mount_command: Option<String>,
    /// Gateway launch settings
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Uses fixed paths under `~/.local/state/gw/` (or `$XDG_STATE_HOME/gw/`).
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::for_state_dir(state_dir()?);
        config.mount_command = mount_command();
        config.gateway = GatewayConfig::from_env();
        Ok(config)
    }

    /// Configuration rooted at `state_dir` with default gateway settings
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            socket_path: state_dir.join("daemon.sock"),
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            gateway_env_path: gateway_env_path(&state_dir),
            mount_command: None,
            gateway: GatewayConfig::default(),
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Gateway controller (shared with the listener)
    pub controller: Arc<DaemonController>,
    /// When daemon started
    pub start_time: Instant,
}

/// Result of daemon startup - the daemon state and the socket to serve.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: UnixListener,
}

impl DaemonState {
    /// Shutdown the daemon, removing its runtime files.
    ///
    /// A running gateway is left alone; the next daemon reuses it.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        for path in [
            &self.config.socket_path,
            &self.config.lock_path,
            &self.config.version_path,
        ] {
            remove_if_exists(path);
        }
        info!("Daemon shutdown complete");
        Ok(())
    }
}

fn remove_if_exists(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove file");
        }
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon: take the lock, bind the socket, build the controller.
///
/// On failure, files created by this attempt are removed unless another
/// daemon holds the lock.
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Acquire the lock before touching anything another daemon may own
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    std::fs::write(&config.version_path, PROTOCOL_VERSION)?;

    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))?;

    let sandbox = TracedSandbox::new(LocalSandbox::new());
    let storage = DaemonStorage::from_command(&sandbox, config.mount_command.clone());
    let env = ForwardedEnv::from_host().with_env_file(&config.gateway_env_path);
    let controller = GatewayController::new(
        sandbox,
        storage,
        env,
        SystemClock,
        StartupTracker::new(),
        config.gateway.clone(),
    );

    info!(
        port = config.gateway.port,
        mount = config.mount_command.is_some(),
        "Daemon started"
    );

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            lock_file,
            controller: Arc::new(controller),
            start_time: Instant::now(),
        },
        listener,
    })
}

fn cleanup_on_failure(config: &Config) {
    let _ = std::fs::remove_file(&config.socket_path);
    let _ = std::fs::remove_file(&config.version_path);
    let _ = std::fs::remove_file(&config.lock_path);
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

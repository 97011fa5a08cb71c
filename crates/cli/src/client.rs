// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use gw_core::{ManagedProcess, StartupState};
use gw_daemon::protocol::{self, ProtocolError};
use gw_daemon::{Request, Response, PROTOCOL_VERSION};
use gw_engine::GatewayConfig;
use thiserror::Error;
use tokio::net::UnixStream;

use crate::daemon_process::{
    cleanup_stale_socket, daemon_socket, probe_socket, read_startup_error,
    start_daemon_background, stop_daemon_sync, version_path, wrap_with_startup_error,
};

/// Timeout for short IPC requests (ping, hello, status, logs, shutdown)
pub fn timeout_ipc() -> Duration {
    crate::env::timeout_ipc_ms().unwrap_or(Duration::from_secs(5))
}

/// Timeout for an ensure round trip.
///
/// An ensure may wait out the full gateway startup timeout, so the default
/// leaves 30s of slack on top of the configured value.
pub fn timeout_ensure() -> Duration {
    crate::env::timeout_ensure_ms()
        .unwrap_or_else(|| GatewayConfig::from_env().startup_timeout + Duration::from_secs(30))
}

/// Timeout for waiting for the daemon to start
pub fn timeout_connect() -> Duration {
    crate::env::timeout_connect_ms().unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for the daemon process to exit
pub fn timeout_exit() -> Duration {
    crate::env::timeout_exit_ms().unwrap_or(Duration::from_secs(2))
}

/// Polling interval for connection retries
pub fn poll_interval() -> Duration {
    crate::env::connect_poll_ms().unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

impl ClientError {
    /// Whether the error means nothing is listening on the socket
    pub fn is_not_running(&self) -> bool {
        match self {
            ClientError::DaemonNotRunning => true,
            ClientError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionRefused | std::io::ErrorKind::NotFound
            ),
            _ => false,
        }
    }
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to existing daemon (no auto-start)
    pub fn connect() -> Result<Self, ClientError> {
        Self::at(daemon_socket()?)
    }

    /// Client for the socket at `socket_path`, which must already exist
    pub fn at(socket_path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let socket_path = socket_path.into();
        if !socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self { socket_path })
    }

    /// Connect to daemon, auto-starting if not running.
    ///
    /// A daemon built from a different version is stopped and replaced.
    pub fn connect_or_start() -> Result<Self, ClientError> {
        if let Ok(daemon_version) = std::fs::read_to_string(version_path()?) {
            if daemon_version.trim() != PROTOCOL_VERSION {
                eprintln!(
                    "warn: daemon version {} does not match cli version {}, restarting daemon",
                    daemon_version.trim(),
                    PROTOCOL_VERSION
                );
                stop_daemon_sync();
            }
        }

        match Self::connect() {
            Ok(client) if probe_socket(&client.socket_path) => Ok(client),
            Ok(_) => {
                cleanup_stale_socket()?;
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    fn connect_with_retry(
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Ok(Some(status)) = child.try_wait() {
                // Exited before the socket appeared; the log may lag behind
                let poll_start = Instant::now();
                while poll_start.elapsed() < timeout_exit() {
                    if let Some(err) = read_startup_error() {
                        return Err(ClientError::DaemonStartFailed(err));
                    }
                    std::thread::sleep(poll_interval());
                }
                return Err(ClientError::DaemonStartFailed(format!(
                    "exited with {}",
                    status
                )));
            }

            match Self::connect() {
                Ok(client) if probe_socket(&client.socket_path) => return Ok(client),
                Ok(_) | Err(ClientError::DaemonNotRunning) => {
                    std::thread::sleep(poll_interval());
                }
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }

        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    /// Path of the socket this client talks to
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and wait up to `timeout` for each direction
    async fn send_with_timeout(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_request(&mut writer, request, timeout_ipc()).await?;
        let response = protocol::read_response(&mut reader, timeout).await?;
        Ok(response)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc()).await
    }

    /// Health check
    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Version handshake; returns the daemon's version
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello {
            version: PROTOCOL_VERSION.to_string(),
        };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Err(unexpected(other)),
        }
    }

    /// Daemon uptime in seconds and the gateway startup state
    pub async fn status(&self) -> Result<(u64, StartupState), ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status {
                uptime_secs,
                startup,
            } => Ok((uptime_secs, startup)),
            other => Err(unexpected(other)),
        }
    }

    /// Ask the daemon to make sure a gateway is running
    pub async fn ensure(&self) -> Result<ManagedProcess, ClientError> {
        match self
            .send_with_timeout(&Request::Ensure, timeout_ensure())
            .await?
        {
            Response::Gateway { process } => Ok(process),
            other => Err(unexpected(other)),
        }
    }

    /// Contents of the gateway startup log, if any
    pub async fn startup_logs(&self) -> Result<Option<String>, ClientError> {
        match self.send(&Request::StartupLogs).await? {
            Response::StartupLogs { content } => Ok(content),
            other => Err(unexpected(other)),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ClientError {
    match response {
        Response::Error { message } => ClientError::Rejected(message),
        _ => ClientError::UnexpectedResponse,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

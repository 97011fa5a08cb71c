// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and handling
//! each one in its own task. Concurrent `Ensure` requests therefore run
//! concurrently against the shared controller.

use std::sync::Arc;
use std::time::Instant;

use gw_adapters::{SandboxAdapter, StorageAdapter};
use gw_core::Clock;
use gw_engine::{EnvBuilder, GatewayController};
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Listener task for accepting socket connections.
pub struct Listener<S, M, E, C> {
    socket: UnixListener,
    ctx: Arc<ListenCtx<S, M, E, C>>,
}

/// State shared by every connection
pub struct ListenCtx<S, M, E, C> {
    pub controller: Arc<GatewayController<S, M, E, C>>,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl<S, M, E, C> Listener<S, M, E, C>
where
    S: SandboxAdapter,
    M: StorageAdapter,
    E: EnvBuilder,
    C: Clock,
{
    pub fn new(socket: UnixListener, ctx: ListenCtx<S, M, E, C>) -> Self {
        Self {
            socket,
            ctx: Arc::new(ctx),
        }
    }

    /// Run the listener loop, spawning a task for each connection.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(
                                    protocol::ProtocolError::ConnectionClosed,
                                ) => debug!("Client disconnected"),
                                ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
                                    warn!("Connection timeout")
                                }
                                _ => error!("Connection error: {}", e),
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection<S, M, E, C>(
    stream: UnixStream,
    ctx: &ListenCtx<S, M, E, C>,
) -> Result<(), ConnectionError>
where
    S: SandboxAdapter,
    M: StorageAdapter,
    E: EnvBuilder,
    C: Clock,
{
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;

    // Status polling is frequent; keep it out of info logs
    if matches!(request, Request::Status | Request::Ping) {
        debug!(request = ?request, "received request");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx).await;
    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

/// Handle a single request and return a response.
pub(crate) async fn handle_request<S, M, E, C>(
    request: Request,
    ctx: &ListenCtx<S, M, E, C>,
) -> Response
where
    S: SandboxAdapter,
    M: StorageAdapter,
    E: EnvBuilder,
    C: Clock,
{
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Status => Response::Status {
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            startup: ctx.controller.tracker().snapshot(),
        },

        Request::Ensure => match ctx.controller.ensure_gateway().await {
            Ok(process) => Response::Gateway { process },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::StartupLogs => Response::StartupLogs {
            content: ctx.controller.startup_logs().await.text().map(String::from),
        },

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway Daemon (gwd)
//!
//! Background process that keeps the gateway alive and reports its
//! startup state.
//!
//! Architecture:
//! - Listener Task: Spawned task handling socket I/O, one task per connection
//! - Main Task: Waits for a shutdown request or signal

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod env;
mod lifecycle;
mod listener;
mod protocol;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::lifecycle::{Config, LifecycleError, StartupResult};
use crate::listener::{ListenCtx, Listener};
use crate::protocol::PROTOCOL_VERSION;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Info flags are answered before touching the state dir or lock
    match std::env::args().nth(1).as_deref() {
        None => {}
        Some("--version" | "-V" | "-v") => {
            println!("gwd {PROTOCOL_VERSION}");
            return Ok(());
        }
        Some("--help" | "-h" | "help") => {
            print!("{}", help_text());
            return Ok(());
        }
        Some(other) => {
            eprintln!("error: unexpected argument '{other}'");
            eprintln!("Usage: gwd [--help | --version]");
            std::process::exit(1);
        }
    }

    let config = Config::load()?;

    rotate_log_if_needed(&config.log_path);

    // Write startup marker to log (before tracing setup, so CLI can find it)
    write_startup_marker(&config)?;

    let log_guard = setup_logging(&config)?;

    info!("Starting gateway daemon");

    let StartupResult {
        mut daemon,
        listener: unix_listener,
    } = match lifecycle::startup(&config).await {
        Ok(r) => r,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("gwd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let shutdown_notify = Arc::new(Notify::new());

    let listener = Listener::new(
        unix_listener,
        ListenCtx {
            controller: Arc::clone(&daemon.controller),
            start_time: daemon.start_time,
            shutdown: Arc::clone(&shutdown_notify),
        },
    );
    tokio::spawn(listener.run());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        "Daemon ready, listening on {}",
        config.socket_path.display()
    );

    // Signal ready for parent process (e.g., systemd, CLI waiting for startup)
    println!("READY");

    if env::ensure_on_start() {
        let controller = Arc::clone(&daemon.controller);
        tokio::spawn(async move {
            match controller.ensure_gateway().await {
                Ok(process) => info!(process_id = %process.id, "gateway ensured at startup"),
                Err(e) => warn!(error = %e, "gateway ensure at startup failed"),
            }
        });
    }

    tokio::select! {
        _ = shutdown_notify.notified() => info!("Shutdown requested via command"),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    daemon.shutdown()?;
    info!("Daemon stopped");
    Ok(())
}

/// Rotate the daemon log once it exceeds this size (10 MB)
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rotated logs kept (`daemon.log.1` .. `daemon.log.3`)
const MAX_ROTATIONS: u32 = 3;

fn rotated_path(log_path: &Path, n: u32) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Rotate the log at startup when it has grown past [`MAX_LOG_SIZE`].
///
/// Best-effort: rename failures leave the log in place.
fn rotate_log_if_needed(log_path: &Path) {
    let Ok(meta) = std::fs::metadata(log_path) else {
        return;
    };
    if meta.len() <= MAX_LOG_SIZE {
        return;
    }

    for n in (1..MAX_ROTATIONS).rev() {
        let from = rotated_path(log_path, n);
        if from.exists() {
            let _ = std::fs::rename(&from, rotated_path(log_path, n + 1));
        }
    }
    let _ = std::fs::rename(log_path, rotated_path(log_path, 1));
}

fn help_text() -> String {
    format!(
        "gwd {PROTOCOL_VERSION}
Gateway Daemon - keeps the gateway running and reports its startup state

USAGE:
    gwd

Started on demand by `gw`; serves requests on a Unix socket in the state
directory (GW_STATE_DIR, default ~/.local/state/gw).

OPTIONS:
    -h, --help       Print help information
    -v, --version    Print version information
"
    )
}

/// Startup marker prefix written to log before anything else.
/// CLI uses this to find where the current startup attempt begins.
/// Full format: "--- gwd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- gwd: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
/// This ensures the error is visible to the CLI even if the process exits quickly.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

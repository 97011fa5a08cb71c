// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw daemon` - Daemon management commands

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use gw_core::format_elapsed;
use std::process::Command;

use crate::client::{timeout_exit, ClientError, DaemonClient};
use crate::daemon_process::{
    cleanup_stale_pid, daemon_dir, find_gwd_binary, force_kill_daemon, process_exists,
    read_daemon_pid, wait_for_exit,
};
use crate::output::{not_running_json, print_json, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon (foreground or background)
    Start {
        /// Run in foreground (useful for debugging)
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

pub async fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start { foreground } => start(foreground).await,
        DaemonCommand::Stop => stop().await,
        DaemonCommand::Status => status(format).await,
    }
}

async fn start(foreground: bool) -> Result<()> {
    if foreground {
        let status = Command::new(find_gwd_binary()).status()?;
        if !status.success() {
            return Err(anyhow!("Daemon exited with status: {}", status));
        }
        return Ok(());
    }

    if let Ok(client) = DaemonClient::connect() {
        if let Ok((uptime, _)) = client.status().await {
            println!("Daemon already running (uptime: {})", format_elapsed(uptime));
            return Ok(());
        }
    }

    let client = DaemonClient::connect_or_start()?;
    client.ping().await?;
    println!("Daemon started");
    Ok(())
}

async fn stop() -> Result<()> {
    match daemon_stop().await {
        Ok(true) => println!("Daemon stopped"),
        Ok(false) => println!("Daemon not running"),
        Err(e) => return Err(anyhow!("Failed to stop daemon: {}", e)),
    }
    Ok(())
}

/// Stop the daemon (graceful first, then forceful).
///
/// Returns false if the daemon wasn't running.
async fn daemon_stop() -> Result<bool, ClientError> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => {
            cleanup_stale_pid(&daemon_dir()?);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let shutdown = client.shutdown().await;
    if let Err(e) = &shutdown {
        if e.is_not_running() && read_daemon_pid()?.is_none() {
            let _ = std::fs::remove_file(client.socket_path());
            return Ok(false);
        }
    }

    if let Some(pid) = read_daemon_pid()? {
        if shutdown.is_ok() {
            wait_for_exit(pid, timeout_exit()).await;
        }
        if process_exists(pid) {
            force_kill_daemon(pid);
            wait_for_exit(pid, timeout_exit()).await;
        }
    }

    cleanup_stale_pid(&daemon_dir()?);
    Ok(true)
}

async fn status(format: OutputFormat) -> Result<()> {
    let not_running = || -> Result<()> {
        match format {
            OutputFormat::Text => println!("Daemon not running"),
            OutputFormat::Json => print_json(&not_running_json())?,
        }
        Ok(())
    };

    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(_) => return not_running(),
    };

    let (uptime, _) = match client.status().await {
        Ok(result) => result,
        Err(e) if e.is_not_running() => return not_running(),
        Err(e) => return Err(e.into()),
    };
    let version = client
        .hello()
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    let pid = read_daemon_pid().ok().flatten();

    match format {
        OutputFormat::Text => {
            println!("Status: running");
            println!("Version: {}", version);
            println!("Uptime: {}", format_elapsed(uptime));
            if let Some(pid) = pid {
                println!("PID: {}", pid);
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "running",
            "version": version,
            "uptime_secs": uptime,
            "pid": pid,
        }))?,
    }
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::client::ClientError;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

// --- State directory ---

/// Resolve state directory: GW_STATE_DIR > XDG_STATE_HOME/gw > ~/.local/state/gw
pub fn state_dir() -> Result<PathBuf, ClientError> {
    if let Some(dir) = non_empty("GW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("gw"));
    }
    let home = dirs::home_dir().ok_or(ClientError::NoStateDir)?;
    Ok(home.join(".local/state/gw"))
}

// --- Daemon binary ---

pub fn daemon_binary() -> Option<String> {
    non_empty("GW_DAEMON_BINARY")
}

// --- Timeouts ---

pub fn timeout_ipc_ms() -> Option<Duration> {
    parse_duration_ms("GW_TIMEOUT_IPC_MS")
}
pub fn timeout_ensure_ms() -> Option<Duration> {
    parse_duration_ms("GW_TIMEOUT_ENSURE_MS")
}
pub fn timeout_connect_ms() -> Option<Duration> {
    parse_duration_ms("GW_TIMEOUT_CONNECT_MS")
}
pub fn timeout_exit_ms() -> Option<Duration> {
    parse_duration_ms("GW_TIMEOUT_EXIT_MS")
}
pub fn connect_poll_ms() -> Option<Duration> {
    parse_duration_ms("GW_CONNECT_POLL_MS")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

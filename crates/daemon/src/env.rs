// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Resolve state directory: GW_STATE_DIR > XDG_STATE_HOME/gw > ~/.local/state/gw
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = non_empty("GW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("gw"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/gw"))
}

/// Shell command that mounts storage before each ensure (`GW_MOUNT_COMMAND`)
pub fn mount_command() -> Option<String> {
    non_empty("GW_MOUNT_COMMAND")
}

/// Whether to ensure the gateway right after startup (`GW_ENSURE_ON_START`)
pub fn ensure_on_start() -> bool {
    matches!(
        non_empty("GW_ENSURE_ON_START").as_deref().map(str::trim),
        Some("1") | Some("true") | Some("yes")
    )
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

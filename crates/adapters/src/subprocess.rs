// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived helper commands (`ps`, `kill`) run by the local sandbox

use std::time::Duration;
use tokio::process::Command;

use crate::sandbox::SandboxError;

/// Timeout for `ps` process listing.
pub const PS_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for delivering a termination signal via `kill`.
pub const KILL_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `cmd` to completion and return its stdout.
///
/// The child is killed if `timeout` elapses. A non-zero exit becomes
/// `CommandFailed` carrying the trimmed stderr.
pub async fn run_checked(
    mut cmd: Command,
    timeout: Duration,
    what: &str,
) -> Result<String, SandboxError> {
    cmd.kill_on_drop(true);
    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(SandboxError::CommandFailed(format!("{}: {}", what, e))),
        Err(_) => {
            return Err(SandboxError::Timeout(format!(
                "{} after {}ms",
                what,
                timeout.as_millis()
            )))
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SandboxError::CommandFailed(format!(
            "{}: {}",
            what,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;

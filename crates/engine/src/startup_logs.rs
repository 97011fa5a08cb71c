// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reading the gateway startup log back out of the sandbox

use crate::config::{shell_quote, LOG_READ_TIMEOUT};
use gw_adapters::{SandboxAdapter, StartOptions};

/// Upper bound on retained log text, keeping the most recent output
pub const MAX_LOG_BYTES: usize = 8 * 1024;

/// Outcome of reading the startup log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupLogs {
    Captured(String),
    Empty,
    /// The log could not be read; the reason is for diagnostics only
    Unavailable(String),
}

impl StartupLogs {
    /// Log content, if any was captured
    pub fn text(&self) -> Option<&str> {
        match self {
            StartupLogs::Captured(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Read the startup log by running `cat` in the sandbox.
///
/// Never fails: every error is folded into [`StartupLogs::Unavailable`].
/// Works after the gateway has exited since it reads the file, not the
/// gateway's own output.
pub async fn read_startup_logs<S: SandboxAdapter>(sandbox: &S, path: &str) -> StartupLogs {
    let command = format!("cat {}", shell_quote(path));
    let process = match sandbox.start_process(&command, StartOptions::default()).await {
        Ok(p) => p,
        Err(e) => return StartupLogs::Unavailable(e.to_string()),
    };

    match sandbox.wait_for_exit(&process.id, LOG_READ_TIMEOUT).await {
        Ok(Some(0)) => {}
        Ok(code) => {
            let stderr = sandbox
                .logs(&process.id)
                .await
                .map(|l| l.stderr.trim().to_string())
                .unwrap_or_default();
            return StartupLogs::Unavailable(format!(
                "cat exited with {:?}: {}",
                code, stderr
            ));
        }
        Err(e) => {
            if let Err(kill_err) = sandbox.kill(&process.id).await {
                tracing::debug!(error = %kill_err, "failed to kill log reader");
            }
            return StartupLogs::Unavailable(e.to_string());
        }
    }

    match sandbox.logs(&process.id).await {
        Ok(logs) => {
            let text = tail(logs.stdout.trim_end(), MAX_LOG_BYTES);
            if text.is_empty() {
                StartupLogs::Empty
            } else {
                StartupLogs::Captured(text.to_string())
            }
        }
        Err(e) => StartupLogs::Unavailable(e.to_string()),
    }
}

/// Last `max` bytes of `s`, moved forward to a char boundary
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

#[cfg(test)]
#[path = "startup_logs_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw status` - gateway startup state as seen by the daemon.

use std::fmt::Write;

use anyhow::Result;
use gw_core::{format_age, format_elapsed, StartupState};

use crate::client::DaemonClient;
use crate::output::{not_running_json, now_ms, print_json, OutputFormat};

pub async fn handle(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(c) => c,
        Err(e) if e.is_not_running() => return not_running(format),
        Err(e) => return Err(e.into()),
    };

    let (uptime_secs, startup) = match client.status().await {
        Ok(result) => result,
        Err(e) if e.is_not_running() => return not_running(format),
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Text => print!("{}", format_text(uptime_secs, &startup, now_ms())),
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "running",
            "uptime_secs": uptime_secs,
            "startup": startup,
        }))?,
    }
    Ok(())
}

fn not_running(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("Daemon not running"),
        OutputFormat::Json => print_json(&not_running_json())?,
    }
    Ok(())
}

/// One-word summary of the startup state
pub(crate) fn gateway_label(startup: &StartupState) -> &'static str {
    if startup.in_progress {
        "starting"
    } else if startup.is_failed() {
        "failed"
    } else {
        "ok"
    }
}

/// Render the text form of `gw status`.
pub(crate) fn format_text(uptime_secs: u64, startup: &StartupState, now_ms: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daemon: running ({})", format_elapsed(uptime_secs));
    let _ = writeln!(out, "Gateway: {}", gateway_label(startup));
    if startup.failure_count > 0 {
        let _ = writeln!(out, "Failures: {}", startup.failure_count);
    }
    if let Some(error) = &startup.last_error {
        match startup.last_error_at_ms {
            Some(at) => {
                let _ = writeln!(out, "Last error ({}):", format_age(now_ms, at));
            }
            None => {
                let _ = writeln!(out, "Last error:");
            }
        }
        for line in error.lines() {
            let _ = writeln!(out, "  {}", line);
        }
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;

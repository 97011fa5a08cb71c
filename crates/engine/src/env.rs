// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

fn parse_duration_ms(var: &str) -> Option<Duration> {
    non_empty(var)
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Gateway port override (`GW_GATEWAY_PORT`)
pub fn gateway_port() -> Option<u16> {
    non_empty("GW_GATEWAY_PORT").and_then(|s| s.trim().parse().ok())
}

/// Startup timeout override (`GW_STARTUP_TIMEOUT_MS`)
pub fn startup_timeout() -> Option<Duration> {
    parse_duration_ms("GW_STARTUP_TIMEOUT_MS")
}

/// Startup log path override (`GW_STARTUP_LOG`)
pub fn startup_log() -> Option<String> {
    non_empty("GW_STARTUP_LOG")
}

/// Startup script override (`GW_STARTUP_SCRIPT`)
pub fn startup_script() -> Option<String> {
    non_empty("GW_STARTUP_SCRIPT")
}

/// Names of host variables forwarded to the gateway (`GW_FORWARD_ENV`, comma separated)
pub fn forward_env_names() -> Vec<String> {
    non_empty("GW_FORWARD_ENV")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Interval between TCP connect attempts while waiting for a port (default: 250ms).
pub fn port_poll_interval() -> Duration {
    parse_duration_ms("GW_PORT_POLL_MS").unwrap_or(Duration::from_millis(250))
}

/// Timeout for the storage mount command (default: 30s).
pub fn mount_timeout() -> Duration {
    parse_duration_ms("GW_MOUNT_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

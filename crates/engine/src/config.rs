// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gateway launch configuration

use crate::env;
use shell_escape::escape;
use std::borrow::Cow;
use std::time::Duration;

/// TCP port the gateway listens on
pub const GATEWAY_PORT: u16 = 18789;

/// How long a gateway may take to open its port (3 minutes)
pub const STARTUP_TIMEOUT: Duration = Duration::from_millis(180_000);

/// File receiving the combined stdout/stderr of a fresh start
pub const STARTUP_LOG_PATH: &str = "/tmp/gateway-startup.log";

/// Script that launches the gateway
pub const STARTUP_SCRIPT: &str = "/usr/local/bin/start-gateway.sh";

/// Bound on reading the startup log back (not configurable)
pub const LOG_READ_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Where and how the gateway is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub port: u16,
    pub startup_timeout: Duration,
    pub log_path: String,
    pub startup_script: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: GATEWAY_PORT,
            startup_timeout: STARTUP_TIMEOUT,
            log_path: STARTUP_LOG_PATH.to_string(),
            startup_script: STARTUP_SCRIPT.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Defaults with `GW_*` environment overrides applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::gateway_port().unwrap_or(defaults.port),
            startup_timeout: env::startup_timeout().unwrap_or(defaults.startup_timeout),
            log_path: env::startup_log().unwrap_or(defaults.log_path),
            startup_script: env::startup_script().unwrap_or(defaults.startup_script),
        }
    }

    /// Shell command for a fresh start, sending all output to the startup log.
    ///
    /// The sandbox already runs commands through a shell; `exec` replaces that
    /// shell so the started process is the script itself.
    pub fn startup_command(&self) -> String {
        format!(
            "exec {} > {} 2>&1",
            shell_quote(&self.startup_script),
            shell_quote(&self.log_path)
        )
    }
}

/// Quote `s` for interpolation into a `sh -c` command line.
pub(crate) fn shell_quote(s: &str) -> Cow<'_, str> {
    escape(Cow::Borrowed(s))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

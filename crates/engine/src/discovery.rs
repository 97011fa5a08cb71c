// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finding an already-running gateway in the sandbox

use gw_adapters::SandboxAdapter;
use gw_core::ManagedProcess;

/// Command fragments that identify a gateway process
const GATEWAY_MARKERS: &[&str] = &["start-gateway.sh", "gwbot gateway"];

/// Command fragments of short-lived CLI invocations that mention the gateway
const CLI_MARKERS: &[&str] = &["gwbot devices", "gwbot --version"];

/// What a process command line looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    Gateway,
    Cli,
    Other,
}

/// Classify a process by its command line.
///
/// CLI invocations are never gateways, even when they also contain a
/// gateway marker.
pub fn classify(command: &str) -> ProcessKind {
    if CLI_MARKERS.iter().any(|m| command.contains(m)) {
        ProcessKind::Cli
    } else if GATEWAY_MARKERS.iter().any(|m| command.contains(m)) {
        ProcessKind::Gateway
    } else {
        ProcessKind::Other
    }
}

/// Outcome of looking for a gateway process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(ManagedProcess),
    Absent,
    /// The process listing failed; treated as absent
    Unknown(String),
}

impl Discovery {
    pub fn into_process(self) -> Option<ManagedProcess> {
        match self {
            Discovery::Found(p) => Some(p),
            Discovery::Absent | Discovery::Unknown(_) => None,
        }
    }
}

/// Whether a listed process is a gateway that may be reused
pub fn is_reusable_gateway(process: &ManagedProcess) -> bool {
    classify(&process.command) == ProcessKind::Gateway && process.status.is_live()
}

/// Find the first starting or running gateway, in listing order
pub async fn find_gateway_process<S: SandboxAdapter>(sandbox: &S) -> Discovery {
    let processes = match sandbox.list_processes().await {
        Ok(list) => list,
        Err(e) => return Discovery::Unknown(e.to_string()),
    };

    match processes.into_iter().find(is_reusable_gateway) {
        Some(p) => Discovery::Found(p),
        None => Discovery::Absent,
    }
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handles to processes running inside the sandbox

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sandbox-assigned process identifier.
///
/// For the local backend this is the OS pid rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub String);

impl ProcessId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for an OS process
    pub fn from_pid(pid: u32) -> Self {
        Self(pid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as an OS pid, when the backend uses pids
    pub fn pid(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProcessId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProcessId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for ProcessId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for ProcessId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Lifecycle status reported by the sandbox for a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Starting,
    Running,
    Exited,
    Failed,
    Unknown,
}

impl ProcessStatus {
    /// Whether the process is still alive (starting or running)
    pub fn is_live(self) -> bool {
        matches!(self, ProcessStatus::Starting | ProcessStatus::Running)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessStatus::Starting => "starting",
            ProcessStatus::Running => "running",
            ProcessStatus::Exited => "exited",
            ProcessStatus::Failed => "failed",
            ProcessStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown process status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ProcessStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starting" => Ok(ProcessStatus::Starting),
            "running" => Ok(ProcessStatus::Running),
            "exited" => Ok(ProcessStatus::Exited),
            "failed" => Ok(ProcessStatus::Failed),
            "unknown" => Ok(ProcessStatus::Unknown),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Reference to a process owned by the sandbox backend.
///
/// This is a snapshot: `status` reflects the moment the handle was produced
/// by a list or start call. Control operations go through the sandbox
/// adapter, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedProcess {
    pub id: ProcessId,
    pub command: String,
    pub status: ProcessStatus,
}

impl ManagedProcess {
    pub fn new(id: impl Into<ProcessId>, command: impl Into<String>, status: ProcessStatus) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
            status,
        }
    }
}

/// Output captured by the sandbox for a process it started
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessLogs {
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;

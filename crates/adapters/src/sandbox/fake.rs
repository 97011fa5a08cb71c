// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake sandbox adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SandboxAdapter, SandboxError, StartOptions};
use async_trait::async_trait;
use gw_core::{ManagedProcess, ProcessId, ProcessLogs, ProcessStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Recorded sandbox call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxCall {
    ListProcesses,
    StartProcess {
        command: String,
        env: Option<Vec<(String, String)>>,
    },
    WaitForPort {
        id: ProcessId,
        port: u16,
        timeout: Duration,
    },
    WaitForExit {
        id: ProcessId,
        timeout: Duration,
    },
    Logs {
        id: ProcessId,
    },
    Kill {
        id: ProcessId,
    },
}

/// Fake process state
#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub command: String,
    pub status: ProcessStatus,
    pub env: Option<Vec<(String, String)>>,
    /// Whether `wait_for_port` succeeds for this process
    pub ready: bool,
    pub logs: ProcessLogs,
    pub exit_code: Option<i32>,
}

struct FakeSandboxState {
    /// Insertion-ordered so listing order is deterministic
    processes: Vec<(ProcessId, FakeProcess)>,
    files: HashMap<String, String>,
    calls: Vec<SandboxCall>,
    next_id: u64,
    list_error: Option<String>,
    spawn_error: Option<String>,
    kill_error: Option<String>,
    ready_on_start: bool,
    file_reads_hang: bool,
}

impl FakeSandboxState {
    fn process_mut(&mut self, id: &ProcessId) -> Option<&mut FakeProcess> {
        self.processes
            .iter_mut()
            .find(|(pid, _)| pid == id)
            .map(|(_, p)| p)
    }

    fn next_process_id(&mut self) -> ProcessId {
        self.next_id += 1;
        ProcessId::new(format!("fake-{}", self.next_id))
    }
}

/// Fake sandbox adapter for testing.
///
/// Newly started processes become ready immediately unless
/// [`set_ready_on_start(false)`](Self::set_ready_on_start) is used. Commands
/// of the form `cat <path>` are answered from the in-memory file table.
#[derive(Clone)]
pub struct FakeSandboxAdapter {
    inner: Arc<Mutex<FakeSandboxState>>,
}

impl Default for FakeSandboxAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSandboxState {
                processes: Vec::new(),
                files: HashMap::new(),
                calls: Vec::new(),
                next_id: 0,
                list_error: None,
                spawn_error: None,
                kill_error: None,
                ready_on_start: true,
                file_reads_hang: false,
            })),
        }
    }
}

impl FakeSandboxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SandboxCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of kill calls recorded
    pub fn kill_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SandboxCall::Kill { .. }))
            .count()
    }

    /// Commands passed to `start_process`, in order
    pub fn started_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SandboxCall::StartProcess { command, .. } => Some(command),
                _ => None,
            })
            .collect()
    }

    /// Timeouts passed to `wait_for_port`, in order
    pub fn port_wait_timeouts(&self) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SandboxCall::WaitForPort { timeout, .. } => Some(timeout),
                _ => None,
            })
            .collect()
    }

    /// Get a process by ID
    pub fn get_process(&self, id: &ProcessId) -> Option<FakeProcess> {
        self.inner.lock().process_mut(id).map(|p| p.clone())
    }

    /// Add a pre-existing process (appended to the listing order)
    pub fn add_process(&self, command: &str, status: ProcessStatus, ready: bool) -> ProcessId {
        let mut inner = self.inner.lock();
        let id = inner.next_process_id();
        inner.processes.push((
            id.clone(),
            FakeProcess {
                command: command.to_string(),
                status,
                env: None,
                ready,
                logs: ProcessLogs::default(),
                exit_code: None,
            },
        ));
        id
    }

    /// Set whether a process's port becomes reachable
    pub fn set_ready(&self, id: &ProcessId, ready: bool) {
        if let Some(p) = self.inner.lock().process_mut(id) {
            p.ready = ready;
        }
    }

    /// Mark a process as exited
    pub fn set_exited(&self, id: &ProcessId, exit_code: i32) {
        if let Some(p) = self.inner.lock().process_mut(id) {
            p.status = ProcessStatus::Exited;
            p.ready = false;
            p.exit_code = Some(exit_code);
        }
    }

    /// Whether processes started from now on become ready
    pub fn set_ready_on_start(&self, ready: bool) {
        self.inner.lock().ready_on_start = ready;
    }

    /// Place a file in the sandbox filesystem
    pub fn set_file(&self, path: &str, content: &str) {
        self.inner
            .lock()
            .files
            .insert(path.to_string(), content.to_string());
    }

    /// Make `cat` processes never exit
    pub fn set_file_reads_hang(&self, hang: bool) {
        self.inner.lock().file_reads_hang = hang;
    }

    /// Make `list_processes` fail
    pub fn fail_list(&self, message: &str) {
        self.inner.lock().list_error = Some(message.to_string());
    }

    /// Make `start_process` fail
    pub fn fail_spawn(&self, message: &str) {
        self.inner.lock().spawn_error = Some(message.to_string());
    }

    /// Make `kill` fail
    pub fn fail_kill(&self, message: &str) {
        self.inner.lock().kill_error = Some(message.to_string());
    }
}

#[async_trait]
impl SandboxAdapter for FakeSandboxAdapter {
    async fn list_processes(&self) -> Result<Vec<ManagedProcess>, SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::ListProcesses);

        if let Some(ref message) = inner.list_error {
            return Err(SandboxError::CommandFailed(message.clone()));
        }

        Ok(inner
            .processes
            .iter()
            .map(|(id, p)| ManagedProcess::new(id.clone(), p.command.clone(), p.status))
            .collect())
    }

    async fn start_process(
        &self,
        command: &str,
        options: StartOptions,
    ) -> Result<ManagedProcess, SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::StartProcess {
            command: command.to_string(),
            env: options.env.clone(),
        });

        if let Some(ref message) = inner.spawn_error {
            return Err(SandboxError::SpawnFailed(message.clone()));
        }

        let id = inner.next_process_id();
        let mut process = FakeProcess {
            command: command.to_string(),
            status: ProcessStatus::Starting,
            env: options.env,
            ready: inner.ready_on_start,
            logs: ProcessLogs::default(),
            exit_code: None,
        };

        if let Some(path) = command.strip_prefix("cat ") {
            process.ready = false;
            if !inner.file_reads_hang {
                match inner.files.get(path.trim()) {
                    Some(content) => {
                        process.logs.stdout = content.clone();
                        process.exit_code = Some(0);
                    }
                    None => {
                        process.logs.stderr = format!("cat: {}: No such file or directory\n", path);
                        process.exit_code = Some(1);
                    }
                }
                process.status = ProcessStatus::Exited;
            }
        }

        let handle = ManagedProcess::new(id.clone(), command, process.status);
        inner.processes.push((id, process));
        Ok(handle)
    }

    async fn wait_for_port(
        &self,
        id: &ProcessId,
        port: u16,
        timeout: Duration,
    ) -> Result<(), SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::WaitForPort {
            id: id.clone(),
            port,
            timeout,
        });

        let process = inner
            .process_mut(id)
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;
        if process.ready {
            process.status = ProcessStatus::Running;
            Ok(())
        } else {
            Err(SandboxError::Timeout(format!(
                "port {} not reachable within {}ms",
                port,
                timeout.as_millis()
            )))
        }
    }

    async fn wait_for_exit(
        &self,
        id: &ProcessId,
        timeout: Duration,
    ) -> Result<Option<i32>, SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::WaitForExit {
            id: id.clone(),
            timeout,
        });

        let process = inner
            .process_mut(id)
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;
        if process.status.is_live() {
            return Err(SandboxError::Timeout(format!(
                "process {} still running after {}ms",
                id,
                timeout.as_millis()
            )));
        }
        Ok(process.exit_code)
    }

    async fn logs(&self, id: &ProcessId) -> Result<ProcessLogs, SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::Logs { id: id.clone() });

        inner
            .process_mut(id)
            .map(|p| p.logs.clone())
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))
    }

    async fn kill(&self, id: &ProcessId) -> Result<(), SandboxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SandboxCall::Kill { id: id.clone() });

        if let Some(ref message) = inner.kill_error {
            return Err(SandboxError::CommandFailed(message.clone()));
        }

        let process = inner
            .process_mut(id)
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;
        process.status = ProcessStatus::Exited;
        process.ready = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

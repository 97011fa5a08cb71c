// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-process sandbox backend.
//!
//! Runs commands through `sh -c` on the local machine, lists processes with
//! `ps`, and probes readiness by connecting to the loopback interface.
//!
//! Each started command leads its own process group, so `kill` takes down the
//! whole tree it spawned.

use super::{SandboxAdapter, SandboxError, StartOptions};
use crate::env::port_poll_interval;
use crate::subprocess::{run_checked, KILL_TIMEOUT, PS_TIMEOUT};
use async_trait::async_trait;
use gw_core::{ManagedProcess, ProcessId, ProcessLogs, ProcessStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::sync::watch;

const LOOPBACK: &str = "127.0.0.1";

/// Per-stream cap on captured output; later bytes are dropped.
const MAX_CAPTURE_BYTES: usize = 1024 * 1024;

/// Exited entries are pruned once this many processes are tracked.
const MAX_TRACKED: usize = 64;

/// How long to keep draining output pipes after the process exits.
const CAPTURE_DRAIN: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Exited(Option<i32>),
}

/// A process started by this backend
struct Tracked {
    ready: bool,
    stdout: Arc<Mutex<Vec<u8>>>,
    stderr: Arc<Mutex<Vec<u8>>>,
    state: watch::Receiver<RunState>,
}

impl Tracked {
    fn run_state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Started processes report `starting` until a port check succeeds.
    fn status(&self) -> ProcessStatus {
        match self.run_state() {
            RunState::Running if self.ready => ProcessStatus::Running,
            RunState::Running => ProcessStatus::Starting,
            RunState::Exited(Some(0)) => ProcessStatus::Exited,
            RunState::Exited(_) => ProcessStatus::Failed,
        }
    }
}

/// Sandbox backed by processes on the local host
#[derive(Clone, Default)]
pub struct LocalSandbox {
    tracked: Arc<Mutex<HashMap<ProcessId, Tracked>>>,
}

impl LocalSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn exit_watch(&self, id: &ProcessId) -> Option<watch::Receiver<RunState>> {
        self.tracked.lock().get(id).map(|t| t.state.clone())
    }
}

#[async_trait]
impl SandboxAdapter for LocalSandbox {
    async fn list_processes(&self) -> Result<Vec<ManagedProcess>, SandboxError> {
        let mut cmd = Command::new("ps");
        cmd.args(["-eo", "pid=,stat=,args="]);
        let text = run_checked(cmd, PS_TIMEOUT, "ps").await?;
        let tracked = self.tracked.lock();
        let processes = text
            .lines()
            .filter_map(parse_ps_line)
            .map(|entry| {
                let id = ProcessId::from_pid(entry.pid);
                let status = match tracked.get(&id) {
                    Some(t) if t.run_state() == RunState::Running => t.status(),
                    _ => status_from_stat(entry.stat),
                };
                ManagedProcess::new(id, entry.args, status)
            })
            .collect();
        Ok(processes)
    }

    async fn start_process(
        &self,
        command: &str,
        options: StartOptions,
    ) -> Result<ManagedProcess, SandboxError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .process_group(0)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(env) = &options.env {
            cmd.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| SandboxError::SpawnFailed(e.to_string()))?;
        let pid = child.id().ok_or_else(|| {
            SandboxError::SpawnFailed("process exited before reporting a pid".to_string())
        })?;

        let stdout = Arc::new(Mutex::new(Vec::new()));
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let drains = [
            child
                .stdout
                .take()
                .map(|out| tokio::spawn(capture(out, Arc::clone(&stdout)))),
            child
                .stderr
                .take()
                .map(|err| tokio::spawn(capture(err, Arc::clone(&stderr)))),
        ];

        let (state_tx, state_rx) = watch::channel(RunState::Running);
        tokio::spawn(async move {
            let code = child.wait().await.ok().and_then(|status| status.code());
            for drain in drains.into_iter().flatten() {
                let _ = tokio::time::timeout(CAPTURE_DRAIN, drain).await;
            }
            let _ = state_tx.send(RunState::Exited(code));
        });

        let id = ProcessId::from_pid(pid);
        {
            let mut tracked = self.tracked.lock();
            if tracked.len() >= MAX_TRACKED {
                tracked.retain(|_, t| t.run_state() == RunState::Running);
            }
            tracked.insert(
                id.clone(),
                Tracked {
                    ready: false,
                    stdout,
                    stderr,
                    state: state_rx,
                },
            );
        }

        Ok(ManagedProcess::new(id, command, ProcessStatus::Starting))
    }

    async fn wait_for_port(
        &self,
        id: &ProcessId,
        port: u16,
        timeout: Duration,
    ) -> Result<(), SandboxError> {
        let state = self.exit_watch(id);
        let poll = port_poll_interval();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let attempt = tokio::time::timeout(poll, TcpStream::connect((LOOPBACK, port))).await;
            if matches!(attempt, Ok(Ok(_))) {
                if let Some(t) = self.tracked.lock().get_mut(id) {
                    t.ready = true;
                }
                return Ok(());
            }

            if let Some(RunState::Exited(code)) = state.as_ref().map(|rx| *rx.borrow()) {
                return Err(SandboxError::Exited(format!(
                    "{} exited with {} before port {} opened",
                    id,
                    describe_exit(code),
                    port
                )));
            }

            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(SandboxError::Timeout(format!(
                    "port {} not reachable within {}ms",
                    port,
                    timeout.as_millis()
                )));
            }
            tokio::time::sleep(poll.min(deadline - now)).await;
        }
    }

    async fn wait_for_exit(
        &self,
        id: &ProcessId,
        timeout: Duration,
    ) -> Result<Option<i32>, SandboxError> {
        let Some(mut state) = self.exit_watch(id) else {
            return Err(SandboxError::NotFound(id.to_string()));
        };

        let waited = tokio::time::timeout(
            timeout,
            state.wait_for(|s| matches!(s, RunState::Exited(_))),
        )
        .await;
        match waited {
            Ok(Ok(s)) => match *s {
                RunState::Exited(code) => Ok(code),
                RunState::Running => Ok(None),
            },
            Ok(Err(_)) => Err(SandboxError::CommandFailed(format!(
                "lost track of process {}",
                id
            ))),
            Err(_) => Err(SandboxError::Timeout(format!(
                "process {} still running after {}ms",
                id,
                timeout.as_millis()
            ))),
        }
    }

    async fn logs(&self, id: &ProcessId) -> Result<ProcessLogs, SandboxError> {
        let tracked = self.tracked.lock();
        let t = tracked
            .get(id)
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;
        let stdout = String::from_utf8_lossy(&t.stdout.lock()).into_owned();
        let stderr = String::from_utf8_lossy(&t.stderr.lock()).into_owned();
        Ok(ProcessLogs { stdout, stderr })
    }

    async fn kill(&self, id: &ProcessId) -> Result<(), SandboxError> {
        let pid = id
            .pid()
            .ok_or_else(|| SandboxError::NotFound(id.to_string()))?;

        let mut group = Command::new("kill");
        group.args(["-TERM", "--", &format!("-{}", pid)]);
        match run_checked(group, KILL_TIMEOUT, "kill").await {
            Ok(_) => Ok(()),
            // Not a group leader (a process this backend did not start)
            Err(SandboxError::CommandFailed(reason)) => {
                tracing::debug!(pid, %reason, "group kill failed, signalling process only");
                let mut single = Command::new("kill");
                single.args(["-TERM", &pid.to_string()]);
                run_checked(single, KILL_TIMEOUT, "kill").await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

async fn capture<R: AsyncRead + Unpin>(mut reader: R, sink: Arc<Mutex<Vec<u8>>>) {
    let mut buf = [0u8; 4096];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut out = sink.lock();
                let room = MAX_CAPTURE_BYTES.saturating_sub(out.len());
                out.extend_from_slice(&buf[..n.min(room)]);
            }
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// One row of `ps -eo pid=,stat=,args=` output
#[derive(Debug, PartialEq, Eq)]
struct PsEntry<'a> {
    pid: u32,
    stat: &'a str,
    args: &'a str,
}

fn parse_ps_line(line: &str) -> Option<PsEntry<'_>> {
    let line = line.trim_start();
    let (pid, rest) = line.split_once(char::is_whitespace)?;
    let pid = pid.parse().ok()?;
    let rest = rest.trim_start();
    let (stat, args) = match rest.split_once(char::is_whitespace) {
        Some((stat, args)) => (stat, args.trim()),
        None => (rest, ""),
    };
    if stat.is_empty() {
        return None;
    }
    Some(PsEntry { pid, stat, args })
}

fn status_from_stat(stat: &str) -> ProcessStatus {
    match stat.chars().next() {
        Some('Z') | Some('X') => ProcessStatus::Exited,
        Some('T') | Some('t') | None => ProcessStatus::Unknown,
        Some(_) => ProcessStatus::Running,
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::sandbox::FakeSandboxAdapter;
use gw_core::ProcessStatus;
use serial_test::{parallel, serial};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

/// Assert that captured logs contain the expected substring
fn assert_log(logs: &str, label: &str, expected: &str) {
    assert!(logs.contains(expected), "Should log {label}. Logs:\n{logs}",);
}

#[test]
#[serial(tracing)]
fn start_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSandbox::new(FakeSandboxAdapter::new());
        traced
            .start_process("start-gateway.sh", StartOptions::default())
            .await
    });

    assert!(result.is_ok(), "start should succeed: {:?}", result);
    assert_log(&logs, "span name", "sandbox.start");
    assert_log(&logs, "entry message", "starting");
    assert_log(&logs, "command", "start-gateway.sh");
    assert_log(&logs, "completion", "process started");
    assert_log(&logs, "timing", "elapsed_ms");
}

#[test]
#[serial(tracing)]
fn start_failure_logs_error() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSandboxAdapter::new();
        fake.fail_spawn("disk full");
        TracedSandbox::new(fake)
            .start_process("run", StartOptions::default())
            .await
    });

    assert!(result.is_err());
    assert_log(&logs, "failure", "start failed");
    assert_log(&logs, "cause", "disk full");
}

#[test]
#[serial(tracing)]
fn port_wait_logs_port_and_outcome() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSandboxAdapter::new();
        let id = fake.add_process("gateway", ProcessStatus::Running, false);
        TracedSandbox::new(fake)
            .wait_for_port(&id, 18789, Duration::from_millis(50))
            .await
    });

    assert!(result.is_err());
    assert_log(&logs, "span name", "sandbox.wait_for_port");
    assert_log(&logs, "port", "18789");
    assert_log(&logs, "failure", "port wait failed");
}

#[test]
#[serial(tracing)]
fn kill_failure_is_a_warning() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSandboxAdapter::new();
        let id = fake.add_process("gateway", ProcessStatus::Running, true);
        fake.fail_kill("permission denied");
        TracedSandbox::new(fake).kill(&id).await
    });

    assert!(result.is_err());
    assert_log(&logs, "span name", "sandbox.kill");
    assert_log(&logs, "warning level", "WARN");
    assert_log(&logs, "message", "kill failed");
}

#[test]
#[serial(tracing)]
fn list_logs_count() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSandboxAdapter::new();
        fake.add_process("a", ProcessStatus::Running, false);
        fake.add_process("b", ProcessStatus::Running, false);
        TracedSandbox::new(fake).list_processes().await
    });

    assert_eq!(result.unwrap().len(), 2);
    assert_log(&logs, "span name", "sandbox.list");
    assert_log(&logs, "count", "count=2");
}

#[tokio::test]
#[parallel(tracing)]
async fn delegates_to_inner_adapter() {
    let fake = FakeSandboxAdapter::new();
    fake.set_file("/tmp/log", "boot ok");
    let traced = TracedSandbox::new(fake.clone());

    let process = traced
        .start_process("cat /tmp/log", StartOptions::default())
        .await
        .unwrap();
    let code = traced
        .wait_for_exit(&process.id, Duration::from_secs(1))
        .await
        .unwrap();
    let logs = traced.logs(&process.id).await.unwrap();

    assert_eq!(code, Some(0));
    assert_eq!(logs.stdout, "boot ok");
    assert_eq!(fake.started_commands(), vec!["cat /tmp/log".to_string()]);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gw_adapters::FakeSandboxAdapter;
use gw_core::ProcessStatus;
use yare::parameterized;

#[parameterized(
    startup_script = { "/bin/sh /usr/local/bin/start-gateway.sh", ProcessKind::Gateway },
    wrapped_script = { "sh -c '/usr/local/bin/start-gateway.sh > /tmp/gateway-startup.log 2>&1'", ProcessKind::Gateway },
    exec_script = { "sh -c exec /usr/local/bin/start-gateway.sh > /tmp/gateway-startup.log 2>&1", ProcessKind::Gateway },
    subcommand = { "node /opt/gwbot gateway --port 18789", ProcessKind::Gateway },
    device_listing = { "gwbot devices list", ProcessKind::Cli },
    version_query = { "gwbot --version", ProcessKind::Cli },
    cli_with_gateway_marker = { "start-gateway.sh && gwbot devices", ProcessKind::Cli },
    unrelated = { "nginx: master process", ProcessKind::Other },
    empty = { "", ProcessKind::Other },
)]
fn classify_commands(command: &str, expected: ProcessKind) {
    assert_eq!(classify(command), expected);
}

#[parameterized(
    starting = { ProcessStatus::Starting, true },
    running = { ProcessStatus::Running, true },
    exited = { ProcessStatus::Exited, false },
    failed = { ProcessStatus::Failed, false },
    unknown = { ProcessStatus::Unknown, false },
)]
fn only_live_gateways_are_reusable(status: ProcessStatus, expected: bool) {
    let process = ManagedProcess::new("p1", "start-gateway.sh", status);
    assert_eq!(is_reusable_gateway(&process), expected);
}

#[tokio::test]
async fn empty_listing_is_absent() {
    let sandbox = FakeSandboxAdapter::new();
    assert_eq!(find_gateway_process(&sandbox).await, Discovery::Absent);
}

#[tokio::test]
async fn cli_process_is_never_found() {
    let sandbox = FakeSandboxAdapter::new();
    sandbox.add_process("gwbot devices", ProcessStatus::Running, true);
    sandbox.add_process("gwbot --version", ProcessStatus::Running, true);

    assert_eq!(find_gateway_process(&sandbox).await, Discovery::Absent);
}

#[tokio::test]
async fn dead_gateways_are_skipped() {
    let sandbox = FakeSandboxAdapter::new();
    sandbox.add_process("start-gateway.sh", ProcessStatus::Exited, false);
    sandbox.add_process("gwbot gateway", ProcessStatus::Failed, false);

    assert_eq!(find_gateway_process(&sandbox).await, Discovery::Absent);
}

#[tokio::test]
async fn first_qualifying_process_wins() {
    let sandbox = FakeSandboxAdapter::new();
    sandbox.add_process("gwbot devices", ProcessStatus::Running, true);
    sandbox.add_process("start-gateway.sh", ProcessStatus::Exited, false);
    let first = sandbox.add_process("gwbot gateway", ProcessStatus::Starting, false);
    sandbox.add_process("start-gateway.sh", ProcessStatus::Running, true);

    let found = find_gateway_process(&sandbox).await.into_process().unwrap();
    assert_eq!(found.id, first);
    assert_eq!(found.status, ProcessStatus::Starting);
}

#[tokio::test]
async fn listing_failure_is_unknown() {
    let sandbox = FakeSandboxAdapter::new();
    sandbox.fail_list("backend offline");

    let discovery = find_gateway_process(&sandbox).await;
    match &discovery {
        Discovery::Unknown(reason) => assert!(reason.contains("backend offline")),
        other => panic!("expected Unknown, got {other:?}"),
    }
    assert_eq!(discovery.into_process(), None);
}

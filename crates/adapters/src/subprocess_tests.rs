// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sh(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", script]);
    cmd
}

#[tokio::test]
async fn stdout_is_returned() {
    let out = run_checked(sh("echo 1 Ss sh"), PS_TIMEOUT, "ps").await.unwrap();
    assert_eq!(out, "1 Ss sh\n");
}

#[tokio::test]
async fn non_zero_exit_carries_stderr() {
    let err = run_checked(sh("echo 'no such process' >&2; exit 1"), KILL_TIMEOUT, "kill")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SandboxError::CommandFailed("kill: no such process".to_string())
    );
}

#[tokio::test]
async fn missing_binary_is_command_failure() {
    let err = run_checked(Command::new("/nonexistent/ps"), PS_TIMEOUT, "ps")
        .await
        .unwrap_err();
    assert!(
        matches!(&err, SandboxError::CommandFailed(msg) if msg.starts_with("ps: ")),
        "got: {err}"
    );
}

#[tokio::test]
async fn slow_command_times_out() {
    let err = run_checked(sh("sleep 10"), Duration::from_millis(100), "ps")
        .await
        .unwrap_err();
    assert_eq!(err, SandboxError::Timeout("ps after 100ms".to_string()));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn failed(message: &str, at_ms: u64, count: u32) -> StartupState {
    StartupState {
        in_progress: false,
        last_error: Some(message.to_string()),
        last_error_at_ms: Some(at_ms),
        failure_count: count,
    }
}

#[parameterized(
    fresh = { StartupState::default(), "ok" },
    starting = { StartupState { in_progress: true, ..Default::default() }, "starting" },
    failed = { super::failed("boom", 0, 1), "failed" },
    retrying_after_failure = {
        StartupState { in_progress: true, ..super::failed("boom", 0, 1) },
        "starting"
    },
)]
fn label(state: StartupState, expected: &str) {
    assert_eq!(gateway_label(&state), expected);
}

#[test]
fn healthy_status_has_no_error_section() {
    let text = format_text(90, &StartupState::default(), 0);
    assert_eq!(text, "Daemon: running (1m)\nGateway: ok\n");
}

#[test]
fn failed_status_shows_count_age_and_message() {
    let state = failed("port 18789 closed\nscript exited 1", 1_000, 3);
    let text = format_text(5, &state, 181_000);

    assert_eq!(
        text,
        "Daemon: running (5s)\n\
         Gateway: failed\n\
         Failures: 3\n\
         Last error (3m ago):\n  \
         port 18789 closed\n  \
         script exited 1\n"
    );
}

#[test]
fn in_progress_keeps_previous_error_visible() {
    let state = StartupState {
        in_progress: true,
        ..failed("boom", 10_000, 1)
    };
    let text = format_text(0, &state, 10_000);

    assert!(text.contains("Gateway: starting\n"));
    assert!(text.contains("Last error (just now):\n  boom\n"));
}

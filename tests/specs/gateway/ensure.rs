//! Gateway ensure
//!
//! Drive a real daemon against a startup script that never opens its port.

use crate::prelude::*;

#[test]
fn failed_startup_surfaces_script_output() {
    let warden = Warden::new();
    warden.script("echo 'config invalid: missing token'\nexit 3");

    warden
        .gw()
        .args(&["ensure"])
        .fails()
        .stderr_has("gateway failed to start")
        .stderr_has("config invalid: missing token");

    warden
        .gw()
        .args(&["status"])
        .passes()
        .stdout_has("Gateway: failed")
        .stdout_has("Failures: 1")
        .stdout_has("config invalid: missing token");
}

#[test]
fn failures_accumulate_across_attempts() {
    let warden = Warden::new();
    warden.script("echo 'still broken'\nexit 1");

    warden.gw().args(&["ensure"]).fails();
    warden.gw().args(&["ensure"]).fails();

    let run = warden.gw().args(&["-o", "json", "status"]).passes();
    let startup = &run.json()["startup"];
    assert_eq!(startup["failure_count"], 2);
    assert_eq!(startup["in_progress"], false);
    assert_eq!(startup["last_error"], "still broken");
}

#[test]
fn silent_failure_reports_readiness_error() {
    let warden = Warden::new();
    warden.script("exit 1");

    warden
        .gw()
        .args(&["ensure"])
        .fails()
        .stderr_has("gateway failed to start")
        .stderr_has("readiness check failed");
}

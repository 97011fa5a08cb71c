//! CLI error output
//!
//! Verify commands degrade cleanly when the daemon is absent.

use crate::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    cli()
        .args(&["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn status_without_daemon_reports_not_running() {
    let warden = Warden::new();
    warden
        .gw()
        .args(&["status"])
        .passes()
        .stdout_eq("Daemon not running\n");
}

#[test]
fn status_json_without_daemon() {
    let warden = Warden::new();
    let run = warden.gw().args(&["-o", "json", "status"]).passes();
    assert_eq!(run.json()["status"], "not_running");
}

#[test]
fn logs_without_daemon_fails() {
    let warden = Warden::new();
    warden
        .gw()
        .args(&["logs"])
        .fails()
        .stderr_has("Daemon not running");
}

#[test]
fn daemon_start_reports_missing_binary() {
    let warden = Warden::new();
    warden
        .gw()
        .env("GW_DAEMON_BINARY", "/nonexistent/gwd")
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("Failed to start daemon");
}

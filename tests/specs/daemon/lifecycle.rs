//! Daemon lifecycle
//!
//! Verify daemon start/stop/status and the files it leaves behind.

use crate::prelude::*;

#[test]
fn start_status_stop() {
    let warden = Warden::new();

    warden
        .gw()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon started");
    assert!(warden.state_path().join("daemon.sock").exists());

    warden
        .gw()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running")
        .stdout_has("Version: 0.1");

    warden
        .gw()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");

    warden
        .gw()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn second_start_is_a_no_op() {
    let warden = Warden::new();
    warden.gw().args(&["daemon", "start"]).passes();

    warden
        .gw()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon already running");
}

#[test]
fn stop_without_daemon_is_not_an_error() {
    let warden = Warden::new();
    warden
        .gw()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn fresh_daemon_reports_no_failures() {
    let warden = Warden::new();
    warden.gw().args(&["daemon", "start"]).passes();

    let run = warden.gw().args(&["-o", "json", "status"]).passes();
    let startup = &run.json()["startup"];
    assert_eq!(startup["in_progress"], false);
    assert_eq!(startup["failure_count"], 0);
    assert!(startup["last_error"].is_null());
}

#[test]
fn daemon_writes_startup_marker_and_cleans_up() {
    let warden = Warden::new();
    warden.gw().args(&["daemon", "start"]).passes();
    assert!(
        warden.daemon_log().contains("--- gwd: starting (pid: "),
        "daemon log: {}",
        warden.daemon_log()
    );

    warden.gw().args(&["daemon", "stop"]).passes();
    let state = warden.state_path().to_path_buf();
    assert!(wait_for(WAIT_MAX_MS, || !state.join("daemon.sock").exists()));
}

//! Gateway startup log

use crate::prelude::*;

#[test]
fn logs_show_startup_log_contents() {
    let warden = Warden::new();
    std::fs::write(warden.startup_log(), "booting\nlistening\n").unwrap();
    warden.gw().args(&["daemon", "start"]).passes();

    warden
        .gw()
        .args(&["logs"])
        .passes()
        .stdout_eq("booting\nlistening\n");
}

#[test]
fn missing_log_is_reported_as_unavailable() {
    let warden = Warden::new();
    warden.gw().args(&["daemon", "start"]).passes();

    warden
        .gw()
        .args(&["logs"])
        .passes()
        .stdout_has("No startup log available");

    let run = warden.gw().args(&["-o", "json", "logs"]).passes();
    assert!(run.json()["content"].is_null());
}

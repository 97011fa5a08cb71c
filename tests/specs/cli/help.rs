//! CLI help output
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn gw_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn gw_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("status")
        .stdout_has("ensure")
        .stdout_has("logs")
        .stdout_has("daemon");
}

#[test]
fn gw_daemon_help_shows_subcommands() {
    cli()
        .args(&["daemon", "--help"])
        .passes()
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("status");
}

#[test]
fn gw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn gwd_version_shows_version() {
    let output = std::process::Command::new(gwd_binary())
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("gwd 0.1"));
}

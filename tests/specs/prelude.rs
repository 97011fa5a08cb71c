//! Helpers for the black-box CLI tests.
//!
//! Provides a small DSL for running gw against an isolated state directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timeouts for fast tests.
const GW_TIMEOUT_CONNECT_MS: &str = "2000";
const GW_TIMEOUT_EXIT_MS: &str = "500";
const GW_TIMEOUT_IPC_MS: &str = "500";
const GW_CONNECT_POLL_MS: &str = "5";
const GW_PORT_POLL_MS: &str = "20";
const GW_STARTUP_TIMEOUT_MS: &str = "2000";

// Polling limits for condition waits
pub const POLL_INTERVAL_MS: u64 = 10;
pub const WAIT_MAX_MS: u64 = 2000;

/// Path to a workspace binary, falling back to the test binary's target dir.
fn binary_path(name: &str) -> PathBuf {
    if let Ok(path) = assert_cmd::cargo::cargo_bin(name).canonicalize() {
        return path;
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }
    manifest_dir.join("target/debug").join(name)
}

pub fn gw_binary() -> PathBuf {
    binary_path("gw")
}

pub fn gwd_binary() -> PathBuf {
    binary_path("gwd")
}

/// Create a CLI builder for gw commands
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: vec![
                (
                    "GW_DAEMON_BINARY".into(),
                    gwd_binary().to_string_lossy().into(),
                ),
                ("GW_TIMEOUT_CONNECT_MS".into(), GW_TIMEOUT_CONNECT_MS.into()),
                ("GW_TIMEOUT_EXIT_MS".into(), GW_TIMEOUT_EXIT_MS.into()),
                ("GW_TIMEOUT_IPC_MS".into(), GW_TIMEOUT_IPC_MS.into()),
                ("GW_CONNECT_POLL_MS".into(), GW_CONNECT_POLL_MS.into()),
                ("GW_PORT_POLL_MS".into(), GW_PORT_POLL_MS.into()),
                ("GW_STARTUP_TIMEOUT_MS".into(), GW_STARTUP_TIMEOUT_MS.into()),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(gw_binary());
        cmd.args(&self.args);

        // Keep the caller's gateway settings out of the test daemon
        for var in [
            "GW_STATE_DIR",
            "GW_GATEWAY_PORT",
            "GW_STARTUP_LOG",
            "GW_STARTUP_SCRIPT",
            "GW_MOUNT_COMMAND",
            "GW_ENSURE_ON_START",
            "GW_FORWARD_ENV",
        ] {
            cmd.env_remove(var);
        }

        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    /// Assert stdout contains substring.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Parse stdout as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be JSON")
    }
}

/// Poll a condition until it returns true or timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// A loopback port nothing is listening on.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
    listener.local_addr().unwrap().port()
}

/// Isolated daemon state plus a scratch directory for gateway fixtures.
pub struct Warden {
    state_dir: tempfile::TempDir,
    scratch: tempfile::TempDir,
    port: u16,
}

impl Warden {
    pub fn new() -> Self {
        Self {
            state_dir: tempfile::tempdir().unwrap(),
            scratch: tempfile::tempdir().unwrap(),
            port: free_port(),
        }
    }

    pub fn state_path(&self) -> &Path {
        self.state_dir.path()
    }

    /// Path of the gateway startup log used by this warden
    pub fn startup_log(&self) -> PathBuf {
        self.scratch.path().join("gateway-startup.log")
    }

    /// Write an executable gateway startup script and return its path.
    pub fn script(&self, body: &str) -> PathBuf {
        let path = self.scratch.path().join("launch-gateway.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Run gw against this warden's state directory and gateway settings
    pub fn gw(&self) -> CliBuilder {
        cli()
            .env("GW_STATE_DIR", self.state_path())
            .env("GW_STARTUP_LOG", self.startup_log())
            .env("GW_STARTUP_SCRIPT", self.scratch.path().join("launch-gateway.sh"))
            .env("GW_GATEWAY_PORT", self.port.to_string())
    }

    /// Read the daemon log file contents (for debugging test failures)
    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_path().join("daemon.log"))
            .unwrap_or_else(|_| "(no daemon log)".to_string())
    }
}

impl Drop for Warden {
    fn drop(&mut self) {
        let mut cmd = self.gw().args(&["daemon", "stop"]).command();
        cmd.stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        let _ = cmd.status();
    }
}

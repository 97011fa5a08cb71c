// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment handed to the gateway and the storage mount.
//!
//! Variables come from an allowlist of host variables, optionally layered
//! with a dotenv-style file (`KEY=value` per line).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Produces the environment for a gateway launch
pub trait EnvBuilder: Send + Sync + 'static {
    fn build(&self) -> Vec<(String, String)>;
}

/// Fixed environment mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnv(pub Vec<(String, String)>);

impl EnvBuilder for StaticEnv {
    fn build(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

/// Resolve the path to the gateway env file.
pub fn gateway_env_path(state_dir: &Path) -> PathBuf {
    state_dir.join("gateway.env")
}

/// Forwards allowlisted variables from a source map, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ForwardedEnv {
    names: Vec<String>,
    source: BTreeMap<String, String>,
    env_file: Option<PathBuf>,
}

impl ForwardedEnv {
    pub fn new(names: Vec<String>, source: BTreeMap<String, String>) -> Self {
        Self {
            names,
            source,
            env_file: None,
        }
    }

    /// Forward from the current process environment
    pub fn from_process_env(names: Vec<String>) -> Self {
        Self::new(names, std::env::vars().collect())
    }

    /// Forward the host variables named in `GW_FORWARD_ENV`
    pub fn from_host() -> Self {
        Self::from_process_env(crate::env::forward_env_names())
    }

    /// Layer a dotenv file over the forwarded variables.
    ///
    /// File entries win, and `KEY=` sets an empty value rather than dropping it.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }
}

impl EnvBuilder for ForwardedEnv {
    fn build(&self) -> Vec<(String, String)> {
        let mut vars: BTreeMap<String, String> = self
            .names
            .iter()
            .filter_map(|name| {
                self.source
                    .get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect();

        if let Some(ref path) = self.env_file {
            match read_env_file(path) {
                Ok(file_vars) => vars.extend(file_vars),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable env file")
                }
            }
        }

        vars.into_iter().collect()
    }
}

/// Parse a dotenv-style file into ordered key-value pairs.
/// Returns an empty map if the file doesn't exist.
pub fn read_env_file(path: &Path) -> std::io::Result<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e),
    };
    Ok(parse_env(&content))
}

fn parse_env(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "launch_env_tests.rs"]
mod tests;

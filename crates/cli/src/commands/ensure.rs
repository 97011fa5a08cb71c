// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw ensure` - make sure a reachable gateway is running.

use anyhow::Result;
use gw_core::ManagedProcess;

use crate::client::DaemonClient;
use crate::output::{print_json, OutputFormat};

pub async fn handle(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect_or_start()?;
    let process = client.ensure().await?;

    match format {
        OutputFormat::Text => println!("{}", format_gateway(&process)),
        OutputFormat::Json => print_json(&process)?,
    }
    Ok(())
}

pub(crate) fn format_gateway(process: &ManagedProcess) -> String {
    format!(
        "Gateway {} ({}): {}",
        process.status, process.id, process.command
    )
}

#[cfg(test)]
#[path = "ensure_tests.rs"]
mod tests;

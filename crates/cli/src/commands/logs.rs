// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `gw logs` - show the gateway startup log.

use anyhow::Result;

use crate::client::DaemonClient;
use crate::output::{print_json, OutputFormat};

pub async fn handle(format: OutputFormat) -> Result<()> {
    let client = DaemonClient::connect()?;
    let content = client.startup_logs().await?;

    match format {
        OutputFormat::Text => match content {
            Some(text) => println!("{}", text),
            None => println!("No startup log available"),
        },
        OutputFormat::Json => print_json(&serde_json::json!({ "content": content }))?,
    }
    Ok(())
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gw - gateway warden CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod daemon_process;
mod env;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use commands::{daemon, ensure, logs, status};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "gw",
    version,
    about = "Gateway warden - keeps the gateway running and reports why it didn't start"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the gateway startup state
    Status,
    /// Start the gateway unless a reachable one is already running
    Ensure,
    /// Show the gateway startup log
    Logs,
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Render an error with its causes, dropping causes the message already includes.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let extra: Vec<String> = err
        .chain()
        .skip(1)
        .map(|cause| cause.to_string())
        .filter(|cause| !top.contains(cause.as_str()))
        .collect();
    if extra.is_empty() {
        return top;
    }

    let mut buf = top;
    buf.push_str("\n\nCaused by:");
    for (i, cause) in extra.iter().enumerate() {
        buf.push_str(&format!("\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Status => status::handle(format).await,
        Commands::Ensure => ensure::handle(format).await,
        Commands::Logs => logs::handle(format).await,
        Commands::Daemon(args) => daemon::daemon(args, format).await,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

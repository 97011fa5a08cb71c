// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Gateway lifecycle engine: discovery, readiness, startup logs, and the
//! controller tying them together

pub mod config;
mod controller;
pub mod discovery;
mod env;
mod error;
pub mod launch_env;
pub mod readiness;
pub mod startup_logs;

pub use config::GatewayConfig;
pub use controller::GatewayController;
pub use discovery::{classify, find_gateway_process, Discovery, ProcessKind};
pub use error::GatewayError;
pub use launch_env::{EnvBuilder, ForwardedEnv, StaticEnv};
pub use readiness::{wait_ready, ReadinessError};
pub use startup_logs::{read_startup_logs, StartupLogs};


// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the gateway controller

use thiserror::Error;

/// Errors surfaced by [`GatewayController`](crate::GatewayController)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway failed to start: {0}")]
    StartupFailed(String),
}

impl GatewayError {
    /// The failure message, identical to the tracker's `last_error`
    pub fn message(&self) -> &str {
        match self {
            GatewayError::StartupFailed(msg) => msg,
        }
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gw-core: shared value types for the gateway warden

pub mod clock;
pub mod process;
pub mod startup;
pub mod time_fmt;

pub use clock::{Clock, SystemClock};
pub use process::{ManagedProcess, ParseStatusError, ProcessId, ProcessLogs, ProcessStatus};
pub use startup::{StartupState, StartupTracker};
pub use time_fmt::{format_age, format_elapsed, format_elapsed_ms};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;

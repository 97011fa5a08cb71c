// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction so timestamps are controllable in tests

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Source of monotonic and wall-clock time
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic instant, for measuring elapsed time
    fn now(&self) -> Instant;

    /// Wall-clock time as milliseconds since the Unix epoch
    fn epoch_ms(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{Clock, Duration, Instant};
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct FakeClockState {
        now: Instant,
        epoch_ms: u64,
    }

    /// Manually advanced clock for tests
    #[derive(Clone)]
    pub struct FakeClock {
        inner: Arc<Mutex<FakeClockState>>,
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeClockState {
                    now: Instant::now(),
                    epoch_ms: 1_700_000_000_000,
                })),
            }
        }
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self::default()
        }

        /// Move both the monotonic and wall clocks forward
        pub fn advance(&self, by: Duration) {
            let mut inner = self.inner.lock();
            inner.now += by;
            inner.epoch_ms += by.as_millis() as u64;
        }

        pub fn set_epoch_ms(&self, epoch_ms: u64) {
            self.inner.lock().epoch_ms = epoch_ms;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.inner.lock().now
        }

        fn epoch_ms(&self) -> u64 {
            self.inner.lock().epoch_ms
        }
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;

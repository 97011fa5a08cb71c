// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{format_age, format_elapsed, format_elapsed_ms};

#[yare::parameterized(
    zero_seconds     = { 0,      "0s" },
    max_seconds      = { 59,     "59s" },
    one_minute       = { 60,     "1m" },
    max_minutes      = { 3599,   "59m" },
    one_hour         = { 3600,   "1h" },
    hour_and_minutes = { 3660,   "1h1m" },
    almost_a_day     = { 86399,  "23h59m" },
    two_days         = { 172800, "2d" },
)]
fn elapsed(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}

#[test]
fn elapsed_ms_truncates_to_seconds() {
    assert_eq!(format_elapsed_ms(180_999), "3m");
}

#[yare::parameterized(
    past     = { 10_000, 4_000,  "6s ago" },
    equal    = { 10_000, 10_000, "just now" },
    future   = { 10_000, 12_000, "just now" },
)]
fn age(now_ms: u64, then_ms: u64, expected: &str) {
    assert_eq!(format_age(now_ms, then_ms), expected);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable duration formatting for status output.

/// Format seconds as a short duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86399 => {
            let (h, m) = (secs / 3600, (secs % 3600) / 60);
            if m > 0 {
                format!("{}h{}m", h, m)
            } else {
                format!("{}h", h)
            }
        }
        _ => format!("{}d", secs / 86400),
    }
}

/// Format milliseconds as a short duration.
pub fn format_elapsed_ms(ms: u64) -> String {
    format_elapsed(ms / 1000)
}

/// Age of an epoch-ms timestamp relative to `now_ms`, e.g. `"3m ago"`.
///
/// Timestamps in the future render as `"just now"`.
pub fn format_age(now_ms: u64, then_ms: u64) -> String {
    if then_ms >= now_ms {
        return "just now".to_string();
    }
    format!("{} ago", format_elapsed_ms(now_ms - then_ms))
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;

//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;
pub mod retry;

use chrono::{DateTime, Local, TimeZone};

/// Format a millisecond duration as `mm:ss` (or `h:mm:ss` past one hour)
pub fn format_duration_ms(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Format a unix timestamp (seconds) in the local time zone
///
/// Out-of-range timestamps fall back to the raw number.
pub fn format_timestamp(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(time) => format_datetime(&time),
        None => timestamp.to_string(),
    }
}

fn format_datetime(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a large count with a 万 (10k) suffix, matching Bilibili's display
pub fn format_count(count: u64) -> String {
    if count >= 100_000_000 {
        format!("{:.1}亿", count as f64 / 100_000_000.0)
    } else if count >= 10_000 {
        format!("{:.1}万", count as f64 / 10_000.0)
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(0), "00:00");
        assert_eq!(format_duration_ms(1_420_000), "23:40");
        assert_eq!(format_duration_ms(3_725_000), "1:02:05");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(9_999), "9999");
        assert_eq!(format_count(12_345), "1.2万");
        assert_eq!(format_count(250_000_000), "2.5亿");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}

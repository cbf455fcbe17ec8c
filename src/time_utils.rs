// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp as full month name and unpadded day, e.g. "April 14".
pub fn format_month_day(date: DateTime<Utc>) -> String {
    date.format("%B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_month_day() {
        let date = Utc.with_ymd_and_hms(2026, 4, 4, 23, 59, 0).unwrap();
        assert_eq!(format_month_day(date), "April 4");
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 5).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-10-19T08:00:05Z");
    }
}

//! Run date formatting.
//!
//! Run dates are displayed and stored in filenames as
//! `YYYY-MM-DD-HH:MM:SS` (UTC), matching the historical flat-file layout.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Display format for run dates.
pub const RUN_DATE_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Format a timestamp in the run-date layout.
pub fn format_run_date(date: DateTime<Utc>) -> String {
    date.format(RUN_DATE_FORMAT).to_string()
}

/// Parse a run-date string back into a UTC timestamp.
pub fn parse_run_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, RUN_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_parse_round_trip() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 15, 42, 9).unwrap();
        let text = format_run_date(date);
        assert_eq!(text, "2024-03-07-15:42:09");
        assert_eq!(parse_run_date(&text), Some(date));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_run_date("not-a-date"), None);
        assert_eq!(parse_run_date("2024-03-07"), None);
    }
}

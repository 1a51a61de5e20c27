//! Timestamp decoding for SnooNotes exports
//!
//! Exports written over the years use `2022-09-24T18:46:14.15Z`,
//! `2022-09-24T18:46:14Z` and `2022-09-24T18:46:14+00:00`. All three are
//! RFC 3339, so a single RFC 3339 parse covers them.

use chrono::{DateTime, ParseError, Utc};

/// Parse an export timestamp and normalize it to UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(value.trim()).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_fractional_seconds_zulu() {
        let ts = parse_timestamp("2022-09-24T18:46:14.15Z").unwrap();
        assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2022, 9, 24, 18, 46, 14).unwrap().timestamp());
        assert_eq!(ts.nanosecond(), 150_000_000);
    }

    #[test]
    fn test_whole_seconds_zulu() {
        let ts = parse_timestamp("2022-09-24T18:46:14Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2022, 9, 24, 18, 46, 14).unwrap());
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let ts = parse_timestamp("2022-09-24T20:46:14+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2022, 9, 24, 18, 46, 14).unwrap());
    }

    #[test]
    fn test_unrecognized_formats_fail() {
        assert!(parse_timestamp("09/24/2022 18:46").is_err());
        assert!(parse_timestamp("2022-09-24").is_err());
        assert!(parse_timestamp("").is_err());
    }
}

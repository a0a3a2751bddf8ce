//! Timestamp parsing for event dates and listing bounds.
//!
//! Accepted forms: RFC 3339 (`2024-05-01T14:30:00Z`), a naive date-time as
//! sent by `datetime-local` inputs (`2024-05-01T14:30` or with seconds), and a
//! bare `YYYY-MM-DD`. Naive values are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp. A bare date resolves to the start of that day.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    parse_date_time(value).or_else(|| {
        parse_date(value)?
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
    })
}

fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.and_utc())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-02-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_local_input() {
        let parsed = parse_timestamp("2024-05-01T14:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_bare_date_is_start_of_day() {
        let parsed = parse_timestamp(" 2024-01-15 ").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-01").is_none());
    }
}

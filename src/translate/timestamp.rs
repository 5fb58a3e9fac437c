//! Jira timestamp parsing
//!
//! Exports write dates as `Mon, 2 Jan 2006 15:04:05 -0700`, which is RFC 2822.

use chrono::{DateTime, Duration, Utc};

/// Explicit form of the export format, for values RFC 2822 parsing rejects
const JIRA_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Parse an export timestamp; `None` for empty or unparsable text
pub fn parse_jira_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_str(text, JIRA_FORMAT))
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| tracing::debug!(value = %text, error = %e, "Unparsable Jira timestamp"))
        .ok()
}

/// Parse an export timestamp shifted by a number of days
pub fn parse_jira_timestamp_with_delta(text: &str, days: i64) -> Option<DateTime<Utc>> {
    parse_jira_timestamp(text).map(|t| t + Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_export_format() {
        let parsed = parse_jira_timestamp("Mon, 2 Jan 2006 15:04:05 -0700").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_two_digit_day() {
        let parsed = parse_jira_timestamp("Thu, 12 Mar 2020 09:30:00 +0100").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 12, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_empty_and_garbage() {
        assert_eq!(parse_jira_timestamp(""), None);
        assert_eq!(parse_jira_timestamp("   "), None);
        assert_eq!(parse_jira_timestamp("yesterday"), None);
    }

    #[test]
    fn test_delta() {
        let parsed =
            parse_jira_timestamp_with_delta("Fri, 6 Jan 2006 09:00:00 +0000", -1).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 5, 9, 0, 0).unwrap());
        assert_eq!(parse_jira_timestamp_with_delta("", -1), None);
    }
}

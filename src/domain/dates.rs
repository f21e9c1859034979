//! Dates - Lenient date parsing for gateway payloads
//!
//! The backend serializes `LocalDate` as `2025-03-14` and `LocalDateTime`
//! as `2025-03-14T09:30:00` (sometimes with fractional seconds or an offset).
//! Anything else parses to `None` rather than failing the whole record.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a timestamp in any of the accepted shapes
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Offsets name an instant; buckets are computed in local days
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a calendar day, truncating any time-of-day component (midnight normalization)
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|dt| dt.date())
}

/// Serde helper: optional timestamp that degrades to `None` when unreadable
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}

/// Serde helper: keep the raw date string, accept `null`/missing/non-string
pub fn lenient_raw<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) if !raw.trim().is_empty() => Some(raw),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepted_shapes() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date");
        assert_eq!(parse_day("2025-03-14"), Some(day));
        assert_eq!(parse_day("2025-03-14T23:59:59"), Some(day));
        assert_eq!(parse_day("2025-03-14T08:00:00.123"), Some(day));
        assert_eq!(parse_day("2025-03-14 08:00:00"), Some(day));
    }

    #[test]
    fn test_offset_timestamps_land_on_local_day() {
        let utc = parse_timestamp("2025-03-14T23:30:00Z").expect("rfc3339");
        let shifted = parse_timestamp("2025-03-15T01:30:00+02:00").expect("rfc3339");
        assert_eq!(utc, shifted);

        let expected = DateTime::parse_from_rfc3339("2025-03-14T23:30:00Z")
            .expect("rfc3339")
            .with_timezone(&Local)
            .date_naive();
        assert_eq!(parse_day("2025-03-15T01:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_day("invalid-date"), None);
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("2025-13-01"), None);
    }
}

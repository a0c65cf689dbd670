use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
#[error("unparseable event boundary {raw:?}: {source}")]
pub struct BoundaryParseError {
    pub raw: String,
    #[source]
    source: chrono::ParseError,
}

/// Parse one event boundary as Google sends it. Three shapes occur:
/// a date-time with a literal `Z` suffix, a date-time with an explicit
/// numeric offset, or a bare date for all-day events (midnight UTC).
pub fn parse_event_boundary(raw: &str) -> Result<DateTime<Utc>, BoundaryParseError> {
    let parsed = if raw.contains('T') {
        if raw.ends_with('Z') {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%SZ").map(|dt| dt.and_utc())
        } else {
            DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%:z")
                .map(|dt| dt.with_timezone(&Utc))
        }
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN).and_utc())
    };
    parsed.map_err(|source| BoundaryParseError {
        raw: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_suffix_parses_as_utc() {
        let parsed = parse_event_boundary("2025-06-01T10:00:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn numeric_offset_converts_to_utc() {
        let parsed = parse_event_boundary("2025-06-01T10:00:00-05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap());
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let parsed = parse_event_boundary("2025-06-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_event_boundary("tomorrow-ish").is_err());
        assert!(parse_event_boundary("2025-06-01T10:00:00").is_err());
    }
}

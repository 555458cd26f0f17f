//! Timestamp formats used by the delayed-delivery extensions.
//!
//! XEP-0082 profiles (`2002-09-10T23:08:25Z`, optional fraction and offset) for
//! XEP-0203 `delay`, and the fixed `yyyyMMddThh:mm:ss` UTC pattern for the
//! legacy XEP-0091 `x` element.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};

const LEGACY_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Parses an XEP-0082 date-time, normalising to UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats as XEP-0082 in UTC; milliseconds are only written when non-zero.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    let format = if dt.nanosecond() / 1_000_000 == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Millis
    };
    dt.to_rfc3339_opts(format, true)
}

pub fn parse_legacy_datetime(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), LEGACY_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_legacy_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(LEGACY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_with_offset_and_fraction() {
        let expected = Utc.with_ymd_and_hms(2002, 9, 10, 23, 8, 25).unwrap();
        assert_eq!(parse_datetime("2002-09-10T23:08:25Z"), Some(expected));
        assert_eq!(parse_datetime("2002-09-11T01:08:25+02:00"), Some(expected));

        let fractional = parse_datetime("2002-09-10T23:08:25.123Z").unwrap();
        assert_eq!(fractional.timestamp_subsec_millis(), 123);
        assert_eq!(format_datetime(&fractional), "2002-09-10T23:08:25.123Z");
    }

    #[test]
    fn test_format_omits_zero_millis() {
        let dt = Utc.with_ymd_and_hms(2010, 6, 29, 8, 23, 6).unwrap();
        assert_eq!(format_datetime(&dt), "2010-06-29T08:23:06Z");
    }

    #[test]
    fn test_legacy_round_trip() {
        let dt = parse_legacy_datetime("20020910T23:08:25").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2002, 9, 10, 23, 8, 25).unwrap());
        assert_eq!(format_legacy_datetime(&dt), "20020910T23:08:25");
    }

    #[test]
    fn test_malformed_values() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_legacy_datetime("2002-09-10T23:08:25Z"), None);
    }
}

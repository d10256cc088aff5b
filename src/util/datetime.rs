use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseResult, TimeZone, Utc};

/// The format of calendar dates in Spotify responses, for example a user's birthdate.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The format of timestamps in Spotify responses, for example when a track was added to a playlist. It is an ISO 8601
/// UTC timestamp with a zero offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses a calendar date in the [DATE_FORMAT].
pub fn parse_date(date: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
}

/// Parses a UTC timestamp in the [TIMESTAMP_FORMAT].
pub fn parse_timestamp(timestamp: &str) -> ParseResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Formats a UTC timestamp in the [TIMESTAMP_FORMAT].
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_date() {
        let date = parse_date("2012-11-16").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2012, 11, 16));
    }

    #[test]
    fn rejects_partial_date() {
        assert!(parse_date("2012-11").is_err());
    }

    #[test]
    fn parses_timestamp() {
        let timestamp = parse_timestamp("2021-04-06T17:15:58Z").unwrap();

        assert_eq!(timestamp, Utc.with_ymd_and_hms(2021, 4, 6, 17, 15, 58).unwrap());
        assert_eq!(timestamp.hour(), 17);
    }

    #[test]
    fn rejects_timestamp_with_offset() {
        assert!(parse_timestamp("2021-04-06T17:15:58+02:00").is_err());
    }

    #[test]
    fn timestamp_format_round_trips() {
        let raw = "1999-12-31T23:59:59Z";
        assert_eq!(format_timestamp(&parse_timestamp(raw).unwrap()), raw);
    }
}

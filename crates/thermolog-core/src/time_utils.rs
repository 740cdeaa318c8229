use chrono::{Datelike, NaiveDate, NaiveTime};

/// Minutes in a calendar day; the cap applied to an interval still open at
/// the end of a day.
pub const MINUTES_PER_DAY: i64 = 1440;

// ── Date-time splitting ───────────────────────────────────────────────────────

/// Split a combined `"YYYY-MM-DD HH:MM:SS"` value into its date and time
/// halves. A `T` separator is accepted as well.
///
/// Returns `None` when there is no separator.
pub fn split_datetime(value: &str) -> Option<(&str, &str)> {
    let trimmed = value.trim();
    let idx = trimmed.find(|c: char| c == ' ' || c == 'T')?;
    let (date, rest) = trimmed.split_at(idx);
    let time = rest[1..].trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    Some((date, time))
}

/// Parse an ISO calendar date (`%Y-%m-%d`).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a clock value written as `HH:MM:SS` or `HH:MM`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Parse a combined date-time value into its date and time parts.
pub fn parse_datetime(value: &str) -> Option<(NaiveDate, NaiveTime)> {
    let (date, time) = split_datetime(value)?;
    Some((parse_date(date)?, parse_clock(time)?))
}

// ── Calendar ordinal ──────────────────────────────────────────────────────────

/// Proleptic Gregorian ordinal of `date`, where 0001-01-01 is day 1.
///
/// Only used to group same-day rows inside a single report; the merged series
/// carries its own [`crate::models::DayOrdinal`].
pub fn calendar_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_datetime_space() {
        assert_eq!(
            split_datetime("2019-01-01 00:05:00"),
            Some(("2019-01-01", "00:05:00"))
        );
    }

    #[test]
    fn test_split_datetime_iso_t() {
        assert_eq!(
            split_datetime("2019-01-01T13:45:00"),
            Some(("2019-01-01", "13:45:00"))
        );
    }

    #[test]
    fn test_split_datetime_without_time() {
        assert!(split_datetime("2019-01-01").is_none());
        assert!(split_datetime("").is_none());
    }

    #[test]
    fn test_parse_clock_both_forms() {
        assert_eq!(parse_clock("07:30:00"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(parse_clock("07:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert!(parse_clock("25:00").is_none());
    }

    #[test]
    fn test_parse_datetime() {
        let (date, time) = parse_datetime("2019-03-10 23:55:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 3, 10).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(23, 55, 0).unwrap());
        assert!(parse_datetime("not a date").is_none());
    }

    #[test]
    fn test_calendar_ordinal_epoch() {
        let first = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        assert_eq!(calendar_ordinal(first), 1);
        // 2019-01-01 is ordinal 737060 in the proleptic Gregorian calendar.
        let jan1 = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        assert_eq!(calendar_ordinal(jan1), 737060);
    }

    #[test]
    fn test_calendar_ordinal_gap() {
        let a = NaiveDate::from_ymd_opt(2019, 2, 27).unwrap();
        let b = NaiveDate::from_ymd_opt(2019, 3, 2).unwrap();
        assert_eq!(calendar_ordinal(b) - calendar_ordinal(a), 3);
    }
}

//! Wall-clock helpers: minute-of-day arithmetic and per-day keys.
//!
//! Everything here is timezone-naive. Callers pass in local wall-clock values
//! (`chrono::Local::now().naive_local()` or a plain `NaiveDate`) and get back
//! minutes since midnight or a `YYYY-MM-DD` key that sorts lexicographically.

use chrono::{Datelike, NaiveDate, Timelike};

use crate::error::ValidationError;

/// Minutes in one day; the exclusive upper bound for a minute-of-day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Minutes since midnight of a wall-clock time, in `0..1440`.
pub fn minutes_of_day<T: Timelike>(time: &T) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Canonical `YYYY-MM-DD` key for the calendar day of `date`.
pub fn date_key(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key back into a calendar date.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDateKey(key.to_string()))
}

/// Whether two values fall on the same calendar day.
pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// Whether `date` is the calendar day of `now`.
pub fn is_today<D: Datelike>(date: &D, now: &chrono::NaiveDateTime) -> bool {
    is_same_day(date, now)
}

/// Zero-padded 24-hour `HH:MM`.
///
/// `minutes` must be in `0..1440`; callers clamp before formatting.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse `HH:MM` into minutes since midnight. `24:00` is the day's end.
pub fn parse_clock(text: &str) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidClock(text.to_string());
    let (h, m) = text.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;
    match (hours, minutes) {
        (24, 0) => Ok(MINUTES_PER_DAY),
        (0..=23, 0..=59) => Ok(hours * 60 + minutes),
        _ => Err(invalid()),
    }
}

/// Short human label such as `20 FEB`.
pub fn display_date(date: &NaiveDate) -> String {
    date.format("%-d %b").to_string().to_uppercase()
}

/// Minutes left before midnight.
pub fn remaining_minutes(now_minute: u32) -> u32 {
    MINUTES_PER_DAY.saturating_sub(now_minute)
}

/// `Xh Ym` rendering of a minute total.
pub fn format_hours_minutes(total: u32) -> String {
    format!("{}h {}m", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn minutes_of_day_uses_wall_clock() {
        let t = NaiveTime::from_hms_opt(8, 30, 59).unwrap();
        assert_eq!(minutes_of_day(&t), 510);
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(minutes_of_day(&midnight), 0);
        let last = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        assert_eq!(minutes_of_day(&last), 1439);
    }

    #[test]
    fn date_keys_are_zero_padded_and_sortable() {
        let a = NaiveDate::from_ymd_opt(2024, 5, 9).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(date_key(&a), "2024-05-09");
        assert!(date_key(&a) < date_key(&b));
        assert_eq!(parse_date_key("2024-05-09").unwrap(), a);
        assert!(parse_date_key("09/05/2024").is_err());
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        let night = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert!(is_same_day(&morning, &night));
        assert!(is_today(&morning.date(), &night));
        assert!(!is_today(&NaiveDate::from_ymd_opt(2024, 5, 19).unwrap(), &night));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(510), "08:30");
        assert_eq!(format_clock(1439), "23:59");
        assert_eq!(parse_clock("08:30").unwrap(), 510);
        assert_eq!(parse_clock(" 23:59 ").unwrap(), 1439);
        assert_eq!(parse_clock("24:00").unwrap(), 1440);
        assert!(parse_clock("24:01").is_err());
        assert!(parse_clock("8h30").is_err());
    }

    #[test]
    fn display_helpers() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(display_date(&d), "20 FEB");
        assert_eq!(display_date(&NaiveDate::from_ymd_opt(2024, 5, 9).unwrap()), "9 MAY");
        assert_eq!(remaining_minutes(1200), 240);
        assert_eq!(format_hours_minutes(125), "2h 5m");
    }
}

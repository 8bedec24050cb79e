use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches `Date(y,m,d[,h,mi,s[,ms]])` as emitted by the query endpoint
static PSEUDO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*Date\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*(?:,\s*(\d+)\s*)?(?:,\s*(\d+)\s*)?(?:,\s*(\d+)\s*)?(?:,\s*(\d+)\s*)?\)\s*$",
    )
    .expect("pseudo-date pattern is valid")
});

const DISPLAY_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

const DISPLAY_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Format written back into date cells
pub const SHEET_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Format used for terminal output
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse the endpoint's `Date(year, monthZeroBased, day, ...)` encoding
///
/// The month component is zero-based: `Date(2024,0,15)` is 15 January 2024.
/// Missing time components default to zero. Returns `None` for anything
/// that is not a pseudo-date or names an impossible calendar date.
pub fn parse_pseudo_date(value: &str) -> Option<NaiveDateTime> {
    let caps = PSEUDO_DATE.captures(value)?;
    let part = |i: usize| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = part(2)?.checked_add(1)?;
    let day = part(3)?;
    let hour = part(4)?;
    let minute = part(5)?;
    let second = part(6)?;
    let millis = part(7)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some(date.and_time(time))
}

/// Parse a human-formatted date as it appears in formatted cell values
pub fn parse_display_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    for format in DISPLAY_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in DISPLAY_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Parse any date representation a sheet cell may hold
pub fn parse_sheet_date(value: &str) -> Option<NaiveDateTime> {
    parse_pseudo_date(value).or_else(|| parse_display_date(value))
}

pub fn format_sheet_datetime(value: NaiveDateTime) -> String {
    value.format(SHEET_DATETIME_FORMAT).to_string()
}

pub fn format_display_date(value: NaiveDateTime) -> String {
    value.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_pseudo_date_month_is_zero_based() {
        let dt = parse_pseudo_date("Date(2024,0,15)").unwrap();
        assert_eq!(dt, ymd_hms(2024, 1, 15, 0, 0, 0));

        let dt = parse_pseudo_date("Date(2023,11,31)").unwrap();
        assert_eq!(dt.month(), 12);
        assert_eq!(dt.day(), 31);
    }

    #[test]
    fn test_pseudo_date_with_time() {
        let dt = parse_pseudo_date("Date(2024,2,5,14,30,15)").unwrap();
        assert_eq!(dt, ymd_hms(2024, 3, 5, 14, 30, 15));

        let dt = parse_pseudo_date("Date( 2024 , 2 , 5 , 9 , 5 , 0 , 250 )").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_pseudo_date_rejects_invalid() {
        assert!(parse_pseudo_date("Date(2024,12,1)").is_none()); // month 13
        assert!(parse_pseudo_date("Date(2023,1,29)").is_none()); // 29 Feb 2023
        assert!(parse_pseudo_date("Date(2024,0,1,24,0,0)").is_none());
        assert!(parse_pseudo_date("2024-01-15").is_none());
        assert!(parse_pseudo_date("Date()").is_none());
        assert!(parse_pseudo_date("").is_none());
    }

    #[test]
    fn test_pseudo_date_oversized_components() {
        assert!(parse_pseudo_date("Date(2024,4294967295,1)").is_none());
        assert!(parse_pseudo_date("Date(2024,0,99999999999)").is_none());
        assert!(parse_pseudo_date("Date(99999999999,0,1)").is_none());
    }

    #[test]
    fn test_display_dates() {
        assert_eq!(
            parse_display_date("15/01/2024").unwrap(),
            ymd_hms(2024, 1, 15, 0, 0, 0)
        );
        assert_eq!(
            parse_display_date("15/01/2024 10:45:00").unwrap(),
            ymd_hms(2024, 1, 15, 10, 45, 0)
        );
        assert_eq!(
            parse_display_date("2024-01-15T10:45:00.000Z").unwrap(),
            ymd_hms(2024, 1, 15, 10, 45, 0)
        );
        assert!(parse_display_date("not a date").is_none());
        assert!(parse_display_date("   ").is_none());
    }

    #[test]
    fn test_parse_sheet_date_prefers_pseudo_date() {
        assert_eq!(
            parse_sheet_date("Date(2024,5,1,8,0,0)").unwrap(),
            ymd_hms(2024, 6, 1, 8, 0, 0)
        );
        assert_eq!(
            parse_sheet_date("01/06/2024").unwrap(),
            ymd_hms(2024, 6, 1, 0, 0, 0)
        );
    }

    #[test]
    fn test_sheet_format_parses_back() {
        let dt = ymd_hms(2024, 7, 9, 16, 5, 30);
        let written = format_sheet_datetime(dt);
        assert_eq!(written, "09/07/2024 16:05:30");
        assert_eq!(parse_sheet_date(&written), Some(dt));
        assert_eq!(format_display_date(dt), "09/07/2024");
    }
}

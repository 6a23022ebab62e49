//! # Timestamp Policy
//! Lenient parsing of the dataset's `Time` column.
//!
//! A value that matches none of the accepted layouts yields `None` and the
//! row is dropped from every count by the aggregation engine. That drop is
//! the policy, not a failure: callers never see an error for a bad cell.
//!
//! Accepted layouts, tried in order:
//! 1. RFC 3339 (`2023-01-05T10:00:00Z`, `2023-01-05T10:00:00+02:00`); the
//!    wall-clock date in the stated offset is kept.
//! 2. Date-times with an offset and a space separator
//!    (`2023-01-05 10:00:00+00:00`).
//! 3. Naive date-times (`2023-01-05 10:00:00`, `2023-01-05T10:00:00.123`,
//!    `2023-01-05 10:00`, `2023/01/05 10:00:00`).
//! 4. Dates (`2023-01-05`, `2023/01/05`, `01/05/2023`, `20230105`), also
//!    with month names (`Jan 5, 2023`, `January 5, 2023`, `5 Jan 2023`).
//! 5. Year-month (`2023-01`), read as the first day of that month.
//! 6. A bare four-digit year (`2023`), read as January 1st.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a raw `Time` cell into a naive (wall-clock) date-time.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar year of a raw `Time` cell, or `None` when it does not parse.
pub fn parse_year(raw: &str) -> Option<i32> {
    parse_datetime(raw).map(|dt| dt.year())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Some(d) = parse_year_month(s) {
        return Some(d);
    }

    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.len() {
        // %Y is greedy in chrono, so compact dates are split by hand.
        8 => {
            let y = s[0..4].parse().ok()?;
            let m = s[4..6].parse().ok()?;
            let d = s[6..8].parse().ok()?;
            NaiveDate::from_ymd_opt(y, m, d)
        }
        4 => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        _ => None,
    }
}

/// `YYYY-MM` (or `YYYY-M`), as the first day of the month.
fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (y, m) = s.split_once('-')?;
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if y.len() != 4 || m.len() > 2 || !digits(y) || !digits(m) {
        return None;
    }
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)
}

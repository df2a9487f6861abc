//! Date utilities: parsing YYYY-MM-DD, weekday alignment, weekly stepping.

use chrono::{Datelike, Days, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Weekday index of a date with Monday = 0 .. Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// First date on or after `from` whose weekday index equals `weekday`.
/// `offset = (weekday - from.weekday()) mod 7`, so an aligned `from` is
/// returned unchanged.
pub fn first_on_or_after(from: NaiveDate, weekday: u8) -> NaiveDate {
    let offset = (i64::from(weekday) - i64::from(weekday_index(from))).rem_euclid(7);
    from + Days::new(offset as u64)
}

/// All dates with the given weekday index in `[from, until]` (inclusive),
/// ascending. Empty when `until` precedes the first aligned date.
pub fn aligned_dates(from: NaiveDate, until: NaiveDate, weekday: u8) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = first_on_or_after(from, weekday);
    while d <= until {
        out.push(d);
        d = d + Days::new(7);
    }
    out
}

//! Calendar helpers for month ends and dekads.
//!
//! A dekad is a third of a calendar month. The first two always close on the
//! 10th and the 20th, the third closes on the last day of the month, so it is
//! 8 to 11 days long.

use chrono::{Datelike, NaiveDate};

/// Returns the last day of the given month, `None` outside chrono's range.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Returns the dekad (1, 2 or 3) the date falls into.
pub fn dekad_of(date: NaiveDate) -> u32 {
    match date.day() {
        1..=10 => 1,
        11..=20 => 2,
        _ => 3,
    }
}

/// Returns the closing day of a dekad, `None` for an invalid month or dekad.
pub fn dekad_end(year: i32, month: u32, dekad: u32) -> Option<NaiveDate> {
    match dekad {
        1 => NaiveDate::from_ymd_opt(year, month, 10),
        2 => NaiveDate::from_ymd_opt(year, month, 20),
        3 => last_day_of_month(year, month),
        _ => None,
    }
}

/// Returns the first day of the month following `date`.
pub(crate) fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}

// -- Tests -------------------------------------------------------------------

//! Reference date sequences for each publication interval.
//!
//! [`generate`] is deterministic: the same interval and range always produce
//! the same sequence, so any caller can rebuild it instead of storing it.

use chrono::{Datelike, Days, NaiveDate};

use crate::{
    dekad::{dekad_end, last_day_of_month, next_month_start},
    error::IndexError,
    interval::IntervalKind,
};

/// Returns the ordered reference dates a source publishes on within the
/// inclusive range `[begin, end]`.
pub fn generate(
    kind: IntervalKind,
    begin: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<NaiveDate>, IndexError> {
    let kind = kind.validate()?;
    if begin > end {
        return Err(IndexError::InvalidRange { begin, end });
    }

    let dates = match kind {
        IntervalKind::Day => stepped(begin, end, 1),
        IntervalKind::Week => match first_sunday(begin) {
            Some(sunday) if sunday <= end => stepped(sunday, end, 7),
            _ => Vec::new(),
        },
        IntervalKind::Month => month_ends(begin, end),
        IntervalKind::Dekad => dekad_index(begin, end),
        IntervalKind::NDay(n) => stepped(begin, end, u64::from(n)),
    };

    Ok(dates)
}

/// Closing days of every dekad inside `[begin, end]`.
///
/// Partial months at either end keep only the dekads whose closing day lies in
/// the range, so a range starting on the 15th skips the first dekad of that
/// month and a range ending on the 15th keeps only the first.
pub fn dekad_index(begin: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut month = begin.with_day(1);

    while let Some(first) = month {
        for dekad in 1..=3 {
            let Some(closing) = dekad_end(first.year(), first.month(), dekad) else {
                return dates;
            };
            if closing > end {
                return dates;
            }
            if closing >= begin {
                dates.push(closing);
            }
        }
        month = next_month_start(first);
    }

    dates
}

fn month_ends(begin: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut month = begin.with_day(1);

    while let Some(first) = month {
        let Some(last) = last_day_of_month(first.year(), first.month()) else {
            break;
        };
        if last > end {
            break;
        }
        if last >= begin {
            dates.push(last);
        }
        month = next_month_start(first);
    }

    dates
}

fn first_sunday(date: NaiveDate) -> Option<NaiveDate> {
    let offset = (7 - date.weekday().num_days_from_sunday()) % 7;
    date.checked_add_days(Days::new(u64::from(offset)))
}

fn stepped(begin: NaiveDate, end: NaiveDate, step: u64) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = Some(begin);

    while let Some(date) = current {
        if date > end {
            break;
        }
        dates.push(date);
        current = date.checked_add_days(Days::new(step));
    }

    dates
}

// -- Tests -------------------------------------------------------------------

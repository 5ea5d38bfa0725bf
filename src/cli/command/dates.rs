use anyhow::Result;
use chrono::NaiveDate;
use geosync::{generate, IntervalKind};

use super::today;

/// Prints the reference dates of `interval` between `begin` and `end`.
pub fn dates(interval: IntervalKind, begin: NaiveDate, end: Option<NaiveDate>) -> Result<usize> {
    let end = end.unwrap_or_else(today);
    let dates = generate(interval, begin, end)?;

    for date in &dates {
        println!("{}", date);
    }

    Ok(dates.len())
}

//! Property tests for the reference date index.
//!
//! Uses proptest to verify, for every interval kind:
//! 1. Sequences are strictly increasing and stay inside the requested range
//! 2. Every date sits on the boundary the interval publishes on
//! 3. A single-day daily range is that day
//! 4. Reversed ranges are rejected

use chrono::{Datelike, Days, NaiveDate, Weekday};
use geosync::{dekad::last_day_of_month, generate, IndexError, IntervalKind};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 1950-01-01 plus up to ~100 years.
    (0u64..36_500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1950, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn arb_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (arb_date(), 0u64..800).prop_map(|(begin, span)| {
        (begin, begin.checked_add_days(Days::new(span)).unwrap())
    })
}

fn arb_kind() -> impl Strategy<Value = IntervalKind> {
    prop_oneof![
        Just(IntervalKind::Day),
        Just(IntervalKind::Week),
        Just(IntervalKind::Month),
        Just(IntervalKind::Dekad),
        (2u32..40).prop_map(IntervalKind::NDay),
    ]
}

fn on_boundary(kind: IntervalKind, date: NaiveDate) -> bool {
    match kind {
        IntervalKind::Day | IntervalKind::NDay(_) => true,
        IntervalKind::Week => date.weekday() == Weekday::Sun,
        IntervalKind::Month => last_day_of_month(date.year(), date.month()) == Some(date),
        IntervalKind::Dekad => {
            date.day() == 10
                || date.day() == 20
                || last_day_of_month(date.year(), date.month()) == Some(date)
        }
    }
}

// ── 1. Ordering and bounds ───────────────────────────────────────────

proptest! {
    #[test]
    fn sequence_is_strictly_increasing_within_range(kind in arb_kind(), (begin, end) in arb_range()) {
        let dates = generate(kind, begin, end).unwrap();

        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(dates.iter().all(|d| *d >= begin && *d <= end));
    }
}

// ── 2. Boundaries ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_date_is_a_period_boundary(kind in arb_kind(), (begin, end) in arb_range()) {
        let dates = generate(kind, begin, end).unwrap();

        prop_assert!(dates.iter().all(|d| on_boundary(kind, *d)));
    }

    #[test]
    fn no_boundary_in_range_is_skipped(kind in arb_kind(), (begin, end) in arb_range()) {
        prop_assume!(!matches!(kind, IntervalKind::NDay(_)));
        let dates = generate(kind, begin, end).unwrap();
        let expected = begin
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| on_boundary(kind, *d))
            .count();

        prop_assert_eq!(dates.len(), expected);
    }

    #[test]
    fn n_day_sequence_starts_at_begin(n in 1u32..40, (begin, end) in arb_range()) {
        let dates = generate(IntervalKind::NDay(n), begin, end).unwrap();

        prop_assert_eq!(dates[0], begin);
        prop_assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == i64::from(n)));
    }
}

// ── 3. Single day ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn single_day_range_is_that_day(d in arb_date()) {
        prop_assert_eq!(generate(IntervalKind::Day, d, d).unwrap(), vec![d]);
    }
}

// ── 4. Reversed ranges ───────────────────────────────────────────────

proptest! {
    #[test]
    fn reversed_range_is_rejected(kind in arb_kind(), (begin, end) in arb_range()) {
        prop_assume!(begin < end);
        let result = generate(kind, end, begin);

        prop_assert_eq!(result, Err(IndexError::InvalidRange { begin: end, end: begin }));
    }
}

//! Generation of the fixed yearly day grid: January 1st of the current year
//! through today, padded with filler cells up to a minimum size.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

/// 18 rows of 5 cells: the smallest grid the yearly overview renders, so the
/// layout keeps a stable shape early in the year.
pub const MINIMUM_GRID_SIZE: usize = 18 * 5;

/// Every calendar day from January 1st of `today`'s year through `today`
/// inclusive, in ascending order.
pub fn year_days_until(today: NaiveDate) -> Vec<NaiveDate> {
    let jan_first =
        NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("january 1st exists in every year");
    jan_first.iter_days().take_while(|day| *day <= today).collect()
}

/// [`year_days_until`] evaluated against the local calendar day. Recompute
/// per render pass; the result changes at most once per day and there is
/// deliberately no process-wide cache that could go stale across a rollover.
pub fn year_days() -> Vec<NaiveDate> {
    year_days_until(Local::now().date_naive())
}

/// How many filler cells must follow `days_generated` real cells to reach
/// [`MINIMUM_GRID_SIZE`].
pub fn filler_count(days_generated: usize) -> usize {
    MINIMUM_GRID_SIZE.saturating_sub(days_generated)
}

/// A date is past once the end of its calendar day (23:59:59.999 wall clock
/// in `now`'s zone) lies strictly before `now`. Past days are read-only for
/// completion purposes.
pub fn is_past_date<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> bool {
    let end_of_day = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is a valid wall-clock time");
    end_of_day < now.naive_local()
}

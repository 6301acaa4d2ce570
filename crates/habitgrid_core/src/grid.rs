//! Reconciliation of the generated day sequence with the sparse server
//! summary into the per-cell view model the yearly grid renders.

use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use habitgrid_client::DaySummary;
use serde::Serialize;

use crate::calendar::filler_count;

/// Aggregate habit counts carried by a grid cell that has a summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub available: u32,
    pub completed: u32,
}

impl DayCounts {
    pub fn progress(&self) -> u8 {
        progress_percentage(self.available, self.completed)
    }
}

/// One cell of the yearly overview. `Day` cells carry a date and, when the
/// server reported habits for that day, the aggregate counts; `Filler` cells
/// only pad the grid to its minimum visual size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GridCell {
    Day {
        date: NaiveDate,
        counts: Option<DayCounts>,
    },
    Filler,
}

/// Completion percentage in `[0, 100]`, rounded half-up. Shared by the grid
/// cells and the single-day progress bar; `available == 0` yields 0 so an
/// empty day never divides by zero.
pub fn progress_percentage(available: u32, completed: u32) -> u8 {
    if available == 0 {
        return 0;
    }
    ((f64::from(completed) * 100.0) / f64::from(available)).round() as u8
}

/// Merge `days` (in order) with the sparse `summaries`. A summary matches a
/// day when its instant falls on that calendar day in `tz`, independent of
/// time-of-day. Summaries are indexed by day key up front so the merge stays
/// linear instead of scanning the summary list per cell.
pub fn build_grid<Tz: TimeZone>(
    days: &[NaiveDate],
    summaries: &[DaySummary],
    tz: &Tz,
) -> Vec<GridCell> {
    let by_day: HashMap<NaiveDate, &DaySummary> = summaries
        .iter()
        .map(|summary| (local_day(&summary.date, tz), summary))
        .collect();

    let mut cells = Vec::with_capacity(days.len().max(crate::calendar::MINIMUM_GRID_SIZE));
    for day in days {
        let counts = by_day.get(day).map(|summary| DayCounts {
            available: summary.available,
            completed: summary.completed,
        });
        cells.push(GridCell::Day { date: *day, counts });
    }
    for _ in 0..filler_count(days.len()) {
        cells.push(GridCell::Filler);
    }
    cells
}

/// [`build_grid`] against the system's local zone, the reference zone for
/// calendar-day equality.
pub fn build_local_grid(days: &[NaiveDate], summaries: &[DaySummary]) -> Vec<GridCell> {
    build_grid(days, summaries, &Local)
}

fn local_day<Tz: TimeZone>(instant: &DateTime<chrono::Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::year_days_until;
    use chrono::{FixedOffset, TimeZone, Utc};
    use habitgrid_client::DaySummary;

    fn summary(id: &str, date: DateTime<chrono::Utc>, available: u32, completed: u32) -> DaySummary {
        DaySummary {
            id: id.into(),
            date,
            available,
            completed,
        }
    }

    #[test]
    fn progress_percentage_rounds_half_up() {
        assert_eq!(progress_percentage(0, 0), 0);
        assert_eq!(progress_percentage(4, 2), 50);
        assert_eq!(progress_percentage(3, 1), 33);
        assert_eq!(progress_percentage(3, 2), 67);
        assert_eq!(progress_percentage(5, 5), 100);
    }

    #[test]
    fn grid_has_at_least_minimum_size_and_preserves_day_order() {
        let days = year_days_until(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let cells = build_grid(&days, &[], &Utc);

        assert_eq!(cells.len(), 90);
        for (cell, day) in cells.iter().zip(&days) {
            assert_eq!(
                *cell,
                GridCell::Day {
                    date: *day,
                    counts: None
                }
            );
        }
        assert!(cells[days.len()..].iter().all(|c| *c == GridCell::Filler));
    }

    #[test]
    fn grid_grows_past_minimum_without_fillers() {
        let days = year_days_until(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert!(days.len() > 90);
        let cells = build_grid(&days, &[], &Utc);
        assert_eq!(cells.len(), days.len());
        assert!(!cells.contains(&GridCell::Filler));
    }

    #[test]
    fn summary_counts_land_on_the_matching_day() {
        let days = year_days_until(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        let summaries = vec![
            summary("s1", Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap(), 4, 2),
            summary("s2", Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap(), 2, 0),
        ];
        let cells = build_grid(&days, &summaries, &Utc);

        assert_eq!(
            cells[2],
            GridCell::Day {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                counts: Some(DayCounts {
                    available: 4,
                    completed: 2
                })
            }
        );
        assert_eq!(
            cells[6],
            GridCell::Day {
                date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
                counts: Some(DayCounts {
                    available: 2,
                    completed: 0
                })
            }
        );
        // Days without a summary still render, just without counts.
        assert_eq!(
            cells[0],
            GridCell::Day {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                counts: None
            }
        );
    }

    #[test]
    fn matching_is_zone_aware_near_utc_day_boundaries() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 23, 0, 0).unwrap();
        let summaries = vec![summary("s1", instant, 3, 1)];
        let days = year_days_until(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());

        // In UTC-3 the instant is still 20:00 on March 10th.
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let cells = build_grid(&days, &summaries, &brt);
        let march_10 = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            cells[days.iter().position(|d| *d == march_10).unwrap()],
            GridCell::Day {
                date: march_10,
                counts: Some(DayCounts {
                    available: 3,
                    completed: 1
                })
            }
        );

        // In UTC+2 the same instant is already 01:00 on March 11th.
        let eet = FixedOffset::east_opt(2 * 3600).unwrap();
        let cells = build_grid(&days, &summaries, &eet);
        let march_11 = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(
            cells[days.iter().position(|d| *d == march_10).unwrap()],
            GridCell::Day {
                date: march_10,
                counts: None
            }
        );
        assert_eq!(
            cells[days.iter().position(|d| *d == march_11).unwrap()],
            GridCell::Day {
                date: march_11,
                counts: Some(DayCounts {
                    available: 3,
                    completed: 1
                })
            }
        );
    }
}

//! Core logic of the habit tracker: yearly day-grid generation, summary
//! reconciliation into grid cells, and the per-day completion session.
//!
//! The remote boundary lives in `habitgrid_client`; everything here is
//! either pure (calendar and grid) or owns exactly one date's mutable state
//! (the session).

pub mod calendar;
pub mod error;
pub mod grid;
pub mod session;

mod test_utils;

pub use calendar::{MINIMUM_GRID_SIZE, filler_count, is_past_date, year_days, year_days_until};
pub use error::{SessionError, SessionResult};
pub use grid::{DayCounts, GridCell, build_grid, build_local_grid, progress_percentage};
pub use session::{DayDetail, DaySession, DayState};

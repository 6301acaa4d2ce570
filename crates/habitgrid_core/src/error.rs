//! Error types surfaced by a day-completion session.

use chrono::NaiveDate;
use habitgrid_client::HabitsError;
use thiserror::Error;

/// Day-session errors. Every variant is recoverable: the caller surfaces a
/// notice to the user and may retry by re-invoking the operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not load habits for the day: {0}")]
    Fetch(#[source] HabitsError),

    #[error("could not update habit status: {0}")]
    Toggle(#[source] HabitsError),

    #[error("habits on {0} can no longer be changed")]
    PastDate(NaiveDate),

    #[error("a toggle for habit {0} is already in flight")]
    ToggleInFlight(String),

    #[error("habit {0} is not scheduled on this day")]
    UnknownHabit(String),

    #[error("day habits have not been loaded yet")]
    NotLoaded,

    #[error("the day session was closed")]
    Closed,
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

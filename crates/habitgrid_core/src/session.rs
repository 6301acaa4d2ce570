//! Per-day habit completion: one `DaySession` owns the completion state for
//! exactly one selected date, fetched lazily when that date is opened.
//!
//! The session enforces the rules the presentation layer must not be trusted
//! with: past dates are read-only, a habit with an outstanding toggle rejects
//! a second toggle, and a closed session never applies a stale response.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use habitgrid_client::{DayHabits, HabitRef, HabitsClient};
use tokio::sync::{Mutex, watch};

use crate::calendar::is_past_date;
use crate::error::{SessionError, SessionResult};
use crate::grid::progress_percentage;

/// Habits scheduled for one date plus the ids completed on it.
///
/// `completed` is always a subset of the `available` ids: wire payloads are
/// filtered on construction and toggles only ever flip known ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayDetail {
    available: Vec<HabitRef>,
    completed: BTreeSet<String>,
}

impl DayDetail {
    pub(crate) fn from_wire(wire: DayHabits) -> Self {
        let completed = wire
            .completed
            .into_iter()
            .filter(|id| wire.available.iter().any(|habit| habit.id == *id))
            .collect();
        Self {
            available: wire.available,
            completed,
        }
    }

    /// Habits scheduled for the day, in server order.
    pub fn available(&self) -> &[HabitRef] {
        &self.available
    }

    pub fn is_completed(&self, habit_id: &str) -> bool {
        self.completed.contains(habit_id)
    }

    /// Ids of the completed habits, in lexicographic order.
    pub fn completed(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// Completion percentage for the day's progress bar.
    pub fn progress(&self) -> u8 {
        progress_percentage(self.available.len() as u32, self.completed.len() as u32)
    }

    fn toggle(&mut self, habit_id: &str) {
        if !self.completed.remove(habit_id) {
            self.completed.insert(habit_id.to_string());
        }
    }
}

/// Lifecycle of a day session. `Loading -> Failed` is recoverable by calling
/// [`DaySession::load`] again; there is no automatic retry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DayState {
    #[default]
    Idle,
    Loading,
    Ready(DayDetail),
    Failed,
}

/// Completion state for a single selected date.
///
/// Open a new session when the user opens a date; drop it (after
/// [`close`](Self::close)) when they navigate away. Nothing is cached across
/// dates.
pub struct DaySession {
    client: Arc<dyn HabitsClient>,
    date: NaiveDate,
    state: Mutex<DayState>,
    inflight: Mutex<BTreeSet<String>>,
    cancel: watch::Sender<bool>,
}

impl DaySession {
    pub fn open(client: Arc<dyn HabitsClient>, date: NaiveDate) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            client,
            date,
            state: Mutex::new(DayState::Idle),
            inflight: Mutex::new(BTreeSet::new()),
            cancel,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Snapshot of the current state for rendering.
    pub async fn state(&self) -> DayState {
        self.state.lock().await.clone()
    }

    /// Completion percentage of the loaded day, 0 while not ready.
    pub async fn progress(&self) -> u8 {
        match &*self.state.lock().await {
            DayState::Ready(detail) => detail.progress(),
            _ => 0,
        }
    }

    /// Abandon the session. In-flight requests are dropped and any response
    /// that still arrives is discarded instead of mutating stale state.
    pub fn close(&self) {
        // send_replace stores the value even when no request is currently
        // subscribed, so closing an idle session still sticks.
        self.cancel.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Fetch the habits scheduled for this session's date. Transitions
    /// `Loading -> Ready` on success and `Loading -> Failed` on error;
    /// calling again after a failure retries.
    pub async fn load(&self) -> SessionResult<DayDetail> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        *self.state.lock().await = DayState::Loading;

        let mut cancelled = self.cancel.subscribe();
        let fetched = tokio::select! {
            biased;
            _ = cancelled.changed() => return Err(SessionError::Closed),
            res = self.client.get_day(self.date) => res,
        };

        match fetched {
            Ok(wire) => {
                let detail = DayDetail::from_wire(wire);
                let mut state = self.state.lock().await;
                if self.is_closed() {
                    return Err(SessionError::Closed);
                }
                *state = DayState::Ready(detail.clone());
                Ok(detail)
            }
            Err(err) => {
                tracing::warn!(date = %self.date, error = %err, "failed to load habits for day");
                *self.state.lock().await = DayState::Failed;
                Err(SessionError::Fetch(err))
            }
        }
    }

    /// Flip completion of `habit_id` for this date.
    ///
    /// The remote toggle is issued first and local state changes only once
    /// the server confirmed, so a failed request leaves the session exactly
    /// as it was. A second toggle for the same habit while one is
    /// outstanding is rejected with [`SessionError::ToggleInFlight`].
    pub async fn toggle(&self, habit_id: &str) -> SessionResult<DayDetail> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        if is_past_date(self.date, &Local::now()) {
            return Err(SessionError::PastDate(self.date));
        }
        {
            let state = self.state.lock().await;
            let DayState::Ready(detail) = &*state else {
                return Err(SessionError::NotLoaded);
            };
            if !detail.available.iter().any(|habit| habit.id == habit_id) {
                return Err(SessionError::UnknownHabit(habit_id.to_string()));
            }
        }
        {
            let mut inflight = self.inflight.lock().await;
            if !inflight.insert(habit_id.to_string()) {
                return Err(SessionError::ToggleInFlight(habit_id.to_string()));
            }
        }

        let mut cancelled = self.cancel.subscribe();
        let outcome = tokio::select! {
            biased;
            _ = cancelled.changed() => Err(SessionError::Closed),
            res = self.client.toggle_habit(habit_id) => {
                res.map_err(|err| {
                    tracing::warn!(date = %self.date, habit_id, error = %err, "failed to toggle habit");
                    SessionError::Toggle(err)
                })
            }
        };
        self.inflight.lock().await.remove(habit_id);
        outcome?;

        let mut state = self.state.lock().await;
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let DayState::Ready(detail) = &mut *state else {
            return Err(SessionError::NotLoaded);
        };
        detail.toggle(habit_id);
        Ok(detail.clone())
    }
}

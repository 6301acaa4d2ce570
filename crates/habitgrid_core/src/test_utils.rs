//! Shared mock `HabitsClient` implementations used by session unit tests.
#![cfg(test)]

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use habitgrid_client::{DayHabits, DaySummary, HabitRef, HabitsClient, HabitsError, NewHabit};
use tokio::sync::{Semaphore, watch};

fn fixture_day() -> DayHabits {
    DayHabits {
        available: vec![
            HabitRef {
                id: "a".into(),
                title: "Read".into(),
            },
            HabitRef {
                id: "b".into(),
                title: "Run".into(),
            },
        ],
        completed: vec!["a".into()],
    }
}

fn server_error() -> HabitsError {
    HabitsError::Status {
        status: 500,
        body: "mock failure".into(),
    }
}

/// Serves the two-habit fixture (`a` completed, `b` open) and counts toggle
/// requests; optionally fails every toggle.
#[derive(Default)]
pub struct MockClient {
    toggles: AtomicU32,
    fail_toggle: bool,
}

impl MockClient {
    pub fn failing_toggle() -> Self {
        Self {
            toggles: AtomicU32::new(0),
            fail_toggle: true,
        }
    }

    pub fn toggle_calls(&self) -> u32 {
        self.toggles.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HabitsClient for MockClient {
    async fn get_summary(&self) -> Result<Vec<DaySummary>, HabitsError> {
        Ok(vec![])
    }

    async fn get_day(&self, _date: NaiveDate) -> Result<DayHabits, HabitsError> {
        Ok(fixture_day())
    }

    async fn toggle_habit(&self, _habit_id: &str) -> Result<(), HabitsError> {
        self.toggles.fetch_add(1, Ordering::SeqCst);
        if self.fail_toggle {
            return Err(server_error());
        }
        Ok(())
    }

    async fn create_habit(&self, _habit: &NewHabit) -> Result<(), HabitsError> {
        Ok(())
    }
}

/// Every client call fails with a server error.
pub struct FailingClient;

#[async_trait]
impl HabitsClient for FailingClient {
    async fn get_summary(&self) -> Result<Vec<DaySummary>, HabitsError> {
        Err(server_error())
    }

    async fn get_day(&self, _date: NaiveDate) -> Result<DayHabits, HabitsError> {
        Err(server_error())
    }

    async fn toggle_habit(&self, _habit_id: &str) -> Result<(), HabitsError> {
        Err(server_error())
    }

    async fn create_habit(&self, _habit: &NewHabit) -> Result<(), HabitsError> {
        Err(server_error())
    }
}

/// Like [`MockClient`], but toggle requests park until [`release`] hands out
/// a permit, so tests can hold a toggle in flight deliberately.
/// [`parked`] lets a test await the moment a toggle reaches the gate instead
/// of sleeping and hoping.
///
/// [`release`]: GatedToggleClient::release
/// [`parked`]: GatedToggleClient::parked
pub struct GatedToggleClient {
    gate: Semaphore,
    toggles: watch::Sender<u32>,
}

impl Default for GatedToggleClient {
    fn default() -> Self {
        let (toggles, _) = watch::channel(0);
        Self {
            gate: Semaphore::new(0),
            toggles,
        }
    }
}

impl GatedToggleClient {
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn toggle_calls(&self) -> u32 {
        *self.toggles.borrow()
    }

    /// Wait until at least `count` toggle requests have reached the gate.
    pub async fn parked(&self, count: u32) {
        let mut seen = self.toggles.subscribe();
        while *seen.borrow_and_update() < count {
            seen.changed().await.expect("sender lives in self");
        }
    }
}

#[async_trait]
impl HabitsClient for GatedToggleClient {
    async fn get_summary(&self) -> Result<Vec<DaySummary>, HabitsError> {
        Ok(vec![])
    }

    async fn get_day(&self, _date: NaiveDate) -> Result<DayHabits, HabitsError> {
        Ok(fixture_day())
    }

    async fn toggle_habit(&self, _habit_id: &str) -> Result<(), HabitsError> {
        self.toggles.send_modify(|calls| *calls += 1);
        let permit = self.gate.acquire().await.expect("gate never closes");
        permit.forget();
        Ok(())
    }

    async fn create_habit(&self, _habit: &NewHabit) -> Result<(), HabitsError> {
        Ok(())
    }
}

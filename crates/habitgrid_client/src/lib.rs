//! `HabitsClient` trait, wire types and a reqwest-based implementation for
//! the habits API.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;

#[derive(Debug, Error)]
pub enum HabitsError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// A habit scheduled on a given day.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct HabitRef {
    pub id: String,
    pub title: String,
}

/// Response of `GET day`: habits scheduled for one date plus the ids
/// already completed on it.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DayHabits {
    pub available: Vec<HabitRef>,
    #[serde(default)]
    pub completed: Vec<String>,
}

/// One element of the `GET summary` response: aggregate counts for a date
/// that has at least one habit scheduled.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DaySummary {
    pub id: String,
    #[serde(deserialize_with = "deserialize_day_instant")]
    pub date: DateTime<Utc>,
    pub available: u32,
    pub completed: u32,
}

/// Body of `POST habits`. Weekday indices follow the server convention:
/// 0 = Sunday through 6 = Saturday.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewHabit {
    pub title: String,
    pub weekdays: Vec<u8>,
}

impl NewHabit {
    /// Check the creation preconditions enforced client-side. A failing
    /// habit must never reach the wire.
    pub fn validate(&self) -> Result<(), HabitsError> {
        if self.title.trim().is_empty() {
            return Err(HabitsError::Validation(
                "habit title must not be empty".into(),
            ));
        }
        if self.weekdays.is_empty() {
            return Err(HabitsError::Validation(
                "at least one weekday must be selected".into(),
            ));
        }
        if let Some(bad) = self.weekdays.iter().find(|w| **w > 6) {
            return Err(HabitsError::Validation(format!(
                "weekday index out of range: {bad}"
            )));
        }
        Ok(())
    }
}

/// The server nominally returns ISO dates, but historical summaries carry
/// full RFC 3339 timestamps. Accept both; a bare date means midnight UTC.
fn deserialize_day_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw = String::deserialize(deserializer)?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    Err(D::Error::custom(format!(
        "expected RFC 3339 instant or YYYY-MM-DD date, got {raw}"
    )))
}

#[async_trait]
pub trait HabitsClient: Send + Sync + 'static {
    /// Fetch the sparse per-day summary for the yearly overview grid.
    async fn get_summary(&self) -> Result<Vec<DaySummary>, HabitsError>;
    /// Fetch the habits scheduled for `date` and the ids completed on it.
    async fn get_day(&self, date: NaiveDate) -> Result<DayHabits, HabitsError>;
    /// Flip the completion status of one habit for the given day.
    async fn toggle_habit(&self, habit_id: &str) -> Result<(), HabitsError>;
    /// Create a new recurring habit. Fails locally with
    /// [`HabitsError::Validation`] before any request when the habit does
    /// not pass [`NewHabit::validate`].
    async fn create_habit(&self, habit: &NewHabit) -> Result<(), HabitsError>;
}

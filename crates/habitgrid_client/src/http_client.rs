//! HTTP client implementation for the habits API.
//!
//! This module provides a reqwest-based implementation of the
//! [`HabitsClient`](crate::HabitsClient) trait.

use crate::{DayHabits, DaySummary, HabitsClient, HabitsError, NewHabit};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Client for the habits API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestHabitsClient {
    base_url: String,
    client: reqwest::Client,
}

impl ReqwestHabitsClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the habits API (e.g., "http://localhost:3333")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, HabitsError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Execute a request with no expected response body.
    async fn execute_empty(&self, request: reqwest::RequestBuilder) -> Result<(), HabitsError> {
        let resp = request.send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp).await);
        }
        Ok(())
    }

    /// Extract error information from a failed response.
    async fn error_from_response(resp: reqwest::Response) -> HabitsError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();
        HabitsError::Status {
            status,
            body: body_snippet,
        }
    }
}

#[async_trait]
impl HabitsClient for ReqwestHabitsClient {
    async fn get_summary(&self) -> Result<Vec<DaySummary>, HabitsError> {
        let url = format!("{}/summary", self.base_url);
        self.execute_json(self.client.get(&url)).await
    }

    async fn get_day(&self, date: NaiveDate) -> Result<DayHabits, HabitsError> {
        let url = format!("{}/day", self.base_url);
        tracing::debug!(%date, "fetching habits for day");
        let qp = [("date", date.format("%Y-%m-%d").to_string())];
        self.execute_json(self.client.get(&url).query(&qp)).await
    }

    async fn toggle_habit(&self, habit_id: &str) -> Result<(), HabitsError> {
        if habit_id.trim().is_empty() {
            return Err(HabitsError::Validation("habit id must not be empty".into()));
        }
        let url = format!("{}/habits/{}/toggle", self.base_url, habit_id);
        self.execute_empty(self.client.patch(&url)).await
    }

    async fn create_habit(&self, habit: &NewHabit) -> Result<(), HabitsError> {
        habit.validate()?;
        let url = format!("{}/habits", self.base_url);
        self.execute_empty(self.client.post(&url).json(habit)).await
    }
}

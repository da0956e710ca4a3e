//! HTTP client for the task API.

use crate::config::ClientSettings;
use crate::store::{CreateTaskRequest, Priority, TaskStatus};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

/// A task as the client sees it. Kept separate from the server entity on
/// purpose: the due date is optional here, so a record without one still
/// renders (it sorts as the minimum date).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskView {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Past-due and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.due_date, Some(due) if due < today) && !self.is_completed()
    }
}

/// Error body the server sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ServerError {
    message: String,
}

/// API client for the task endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/tasks", settings.api_base_url.trim_end_matches('/')),
        })
    }

    /// Fetches all tasks in server order.
    pub async fn fetch_tasks(&self) -> Result<Vec<TaskView>> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status().is_success() {
            response.json().await.context("Failed to parse response")
        } else {
            Err(api_error(response, "Failed to load tasks").await)
        }
    }

    /// Creates a task and returns the stored record.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<TaskView> {
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status().is_success() {
            response.json().await.context("Failed to parse response")
        } else {
            Err(api_error(response, "Something went wrong while creating the task.").await)
        }
    }

    /// Sets a task's status and returns the updated record.
    pub async fn update_status(&self, id: Uuid, status: TaskStatus) -> Result<TaskView> {
        let url = format!("{}/{id}", self.base_url);
        let response = self
            .client
            .put(&url)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await
            .context("Failed to send request")?;

        if response.status().is_success() {
            response.json().await.context("Failed to parse response")
        } else {
            Err(api_error(response, "Please try again.").await)
        }
    }

    /// Deletes a task.
    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        let url = format!("{}/{id}", self.base_url);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response, "Please try again.").await)
        }
    }
}

/// Surface the server's message when the body carries one, otherwise the
/// caller's fallback.
async fn api_error(response: reqwest::Response, fallback: &str) -> anyhow::Error {
    match response.json::<ServerError>().await {
        Ok(body) => anyhow::anyhow!(body.message),
        Err(_) => anyhow::anyhow!("{fallback}"),
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ── Entity types ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Parse a wire value. The update endpoint takes status as free text so
    /// anything outside the known set can be answered with a 400.
    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value {
            "Pending" => Some(TaskStatus::Pending),
            "Completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// A task — the one tracked entity.
///
/// `status` is the only field that changes after creation. Everything else
/// is fixed at create time; ids are never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Requests ──────────────────────────────────────────────────

/// Create payload as it arrives off the wire. Required fields are Options
/// here so a missing one yields the combined 400 instead of a decode error;
/// priority and dueDate still deserialize through the closed types, so
/// out-of-set values never reach the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Title, due date, and priority are required.")]
    MissingFields,
    #[error("Task not found.")]
    TaskNotFound,
}

// ── The store ──────────────────────────────────────────────────

/// The authoritative task set. Lives in memory, loaded from the save file on
/// boot. Every mutation goes through the methods below; a failed call leaves
/// the map untouched.
#[derive(Debug, Default)]
pub struct TaskStore {
    pub tasks: HashMap<Uuid, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore {
            tasks: HashMap::new(),
        }
    }

    /// Create a task from a wire payload. Title, due date, and priority must
    /// all be present (title non-empty once trimmed); title and description
    /// are stored trimmed, a blank description is dropped.
    pub fn create(&mut self, req: CreateTaskRequest) -> Result<Task, StoreError> {
        let title = req.title.as_deref().map(str::trim).unwrap_or("");
        let (Some(priority), Some(due_date)) = (req.priority, req.due_date) else {
            return Err(StoreError::MissingFields);
        };
        if title.is_empty() {
            return Err(StoreError::MissingFields);
        }

        let description = req
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description,
            priority,
            due_date,
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    /// Flip a task's status. Only `status` and `updated_at` move; any other
    /// field a caller may have sent is already gone by this point.
    pub fn update_status(&mut self, id: Uuid, status: TaskStatus) -> Result<Task, StoreError> {
        let task = self.tasks.get_mut(&id).ok_or(StoreError::TaskNotFound)?;
        task.status = status;
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    /// Hard delete. Returns the removed task so the caller can clean up the
    /// save file.
    pub fn remove(&mut self, id: Uuid) -> Result<Task, StoreError> {
        self.tasks.remove(&id).ok_or(StoreError::TaskNotFound)
    }

    /// All tasks in the listing order: due date ascending, and among equal
    /// due dates the most recently created first. Filtering is the client's
    /// job.
    pub fn list_sorted(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        tasks
    }
}

// ── Tests ──────────────────────────────────────────────────────

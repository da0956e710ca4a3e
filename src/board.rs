//! Client-side board state.
//!
//! One owned state object: the unfiltered task list as last confirmed by the
//! server, the filter/sort settings, the create form, and the transient
//! notice. What the user sees is always `visible()` — a pure derivation over
//! that state, recomputed on demand, never stored.

use crate::client::TaskView;
use crate::store::{CreateTaskRequest, Priority, TaskStatus};
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// How long a notice stays up before it dismisses itself.
pub const NOTICE_TTL: Duration = Duration::from_millis(3500);

// ── Filters & sort ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &TaskView) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => task.status == TaskStatus::Pending,
            StatusFilter::Completed => task.status == TaskStatus::Completed,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All statuses",
            StatusFilter::Pending => "Pending",
            StatusFilter::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(self, task: &TaskView) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => task.priority == Priority::Low,
            PriorityFilter::Medium => task.priority == Priority::Medium,
            PriorityFilter::High => task.priority == Priority::High,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Low,
            PriorityFilter::Low => PriorityFilter::Medium,
            PriorityFilter::Medium => PriorityFilter::High,
            PriorityFilter::High => PriorityFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriorityFilter::All => "All priorities",
            PriorityFilter::Low => "Low priority",
            PriorityFilter::Medium => "Medium priority",
            PriorityFilter::High => "High priority",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "Due date ↑ (soonest first)",
            SortDirection::Desc => "Due date ↓ (latest first)",
        }
    }
}

// ── Notices ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient toast. Dismissed by `tick` after [`NOTICE_TTL`] or manually.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: Option<String>,
    posted_at: Instant,
}

// ── Form draft ─────────────────────────────────────────────────

/// Field-level validation errors, all rules evaluated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftErrors {
    pub title: Option<&'static str>,
    pub due_date: Option<&'static str>,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.due_date.is_none()
    }
}

/// The create form as the user types it. Priority is the closed enum with
/// the Medium default, so the "priority is required" case of the source form
/// cannot occur.
#[derive(Debug, Clone)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: String,
    pub errors: DraftErrors,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: String::new(),
            errors: DraftErrors::default(),
        }
    }
}

impl Draft {
    /// Check every rule and collect the failures; on success return the
    /// request payload (trimmed title, blank description dropped).
    pub fn validate(&self, today: NaiveDate) -> Result<CreateTaskRequest, DraftErrors> {
        let mut errors = DraftErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.title = Some("Title is required.");
        } else if title.chars().count() < 3 {
            errors.title = Some("Title should be at least 3 characters.");
        }

        let raw_due = self.due_date.trim();
        let mut due_date = None;
        if raw_due.is_empty() {
            errors.due_date = Some("Due date is required.");
        } else {
            match NaiveDate::parse_from_str(raw_due, "%Y-%m-%d") {
                Ok(due) if due < today => {
                    errors.due_date = Some("Due date cannot be in the past.");
                }
                Ok(due) => due_date = Some(due),
                Err(_) => errors.due_date = Some("Enter the due date as YYYY-MM-DD."),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.description.trim();
        Ok(CreateTaskRequest {
            title: Some(title.to_string()),
            description: (!description.is_empty()).then(|| description.to_string()),
            priority: Some(self.priority),
            due_date,
        })
    }

    pub fn reset(&mut self) {
        *self = Draft::default();
    }
}

// ── Mutation lifecycle ─────────────────────────────────────────

/// Every mutation goes Idle → Submitting → settle → Idle. There is no retry
/// state; a failure just posts an error notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
}

// ── The board ──────────────────────────────────────────────────

pub struct Board {
    /// Unfiltered list, source of truth after the last successful fetch or
    /// mutation. Display order is always recomputed by `visible()`.
    pub tasks: Vec<TaskView>,
    pub status_filter: StatusFilter,
    pub priority_filter: PriorityFilter,
    pub sort: SortDirection,
    pub phase: Phase,
    pub loading: bool,
    pub draft: Draft,
    notice: Option<Notice>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            tasks: Vec::new(),
            status_filter: StatusFilter::All,
            priority_filter: PriorityFilter::All,
            sort: SortDirection::Asc,
            phase: Phase::Idle,
            loading: true,
            draft: Draft::default(),
            notice: None,
        }
    }

    // ── Derivation ─────────────────────────────────────────────

    /// The displayed list: status filter, then priority filter, then a
    /// stable sort on due date. A missing due date sorts as the minimum
    /// date; descending flips the comparison, so ties keep list order
    /// either way.
    pub fn visible(&self) -> Vec<&TaskView> {
        let mut rows: Vec<&TaskView> = self
            .tasks
            .iter()
            .filter(|t| self.status_filter.matches(t))
            .filter(|t| self.priority_filter.matches(t))
            .collect();

        rows.sort_by(|a, b| {
            let a_due = a.due_date.unwrap_or(NaiveDate::MIN);
            let b_due = b.due_date.unwrap_or(NaiveDate::MIN);
            match self.sort {
                SortDirection::Asc => a_due.cmp(&b_due),
                SortDirection::Desc => b_due.cmp(&a_due),
            }
        });

        rows
    }

    // ── Load & reconciliation ──────────────────────────────────

    /// Settle the initial fetch. Failure degrades to an empty list plus an
    /// error notice; there is no automatic retry.
    pub fn finish_load(&mut self, result: anyhow::Result<Vec<TaskView>>, now: Instant) {
        self.loading = false;
        match result {
            Ok(tasks) => self.tasks = tasks,
            Err(_) => {
                self.tasks = Vec::new();
                self.notify(
                    NoticeKind::Error,
                    "Failed to load tasks",
                    Some("Please check your connection or try again later."),
                    now,
                );
            }
        }
    }

    /// Start a mutation. Returns false when one is already in flight so the
    /// caller can drop the input instead of stacking submissions.
    pub fn begin_submit(&mut self) -> bool {
        if self.phase == Phase::Submitting {
            return false;
        }
        self.phase = Phase::Submitting;
        true
    }

    /// Validate the draft for submission. Errors land on the form and block
    /// the request; a payload is only handed out when the form is clean.
    pub fn submit_payload(&mut self, today: NaiveDate) -> Option<CreateTaskRequest> {
        match self.draft.validate(today) {
            Ok(payload) => {
                self.draft.errors = DraftErrors::default();
                Some(payload)
            }
            Err(errors) => {
                self.draft.errors = errors;
                None
            }
        }
    }

    /// Settle a create: prepend the stored task and clear the form, or post
    /// the server's message.
    pub fn finish_create(&mut self, result: anyhow::Result<TaskView>, now: Instant) {
        self.phase = Phase::Idle;
        match result {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.draft.reset();
                self.notify(
                    NoticeKind::Success,
                    "Task created",
                    Some("Your task has been added to the board."),
                    now,
                );
            }
            Err(err) => self.notify(NoticeKind::Error, "Could not create task", Some(&err.to_string()), now),
        }
    }

    /// Settle a status toggle: replace the matching task by id.
    pub fn finish_toggle(&mut self, result: anyhow::Result<TaskView>, now: Instant) {
        self.phase = Phase::Idle;
        match result {
            Ok(task) => {
                let title = if task.is_completed() {
                    "Task completed"
                } else {
                    "Task reopened"
                };
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
                self.notify(NoticeKind::Success, title, None, now);
            }
            Err(err) => self.notify(NoticeKind::Error, "Could not update task", Some(&err.to_string()), now),
        }
    }

    /// Settle a delete: drop the matching task by id.
    pub fn finish_delete(&mut self, id: Uuid, result: anyhow::Result<()>, now: Instant) {
        self.phase = Phase::Idle;
        match result {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                self.notify(NoticeKind::Success, "Task deleted", None, now);
            }
            Err(err) => self.notify(NoticeKind::Error, "Could not delete task", Some(&err.to_string()), now),
        }
    }

    // ── Notices ────────────────────────────────────────────────

    pub fn notify(&mut self, kind: NoticeKind, title: &str, message: Option<&str>, now: Instant) {
        self.notice = Some(Notice {
            kind,
            title: title.to_string(),
            message: message.map(String::from),
            posted_at: now,
        });
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Drop the notice once its window has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(notice) = &self.notice {
            if now.duration_since(notice.posted_at) >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

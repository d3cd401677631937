//! Task domain model.
//!
//! # Responsibility
//! - Define the single persisted record of the task list.
//! - Validate creation input at one boundary (`Task::new`).
//! - Allocate task ids that never collide within one collection.
//!
//! # Invariants
//! - `title` is non-empty after trimming.
//! - `created_at` is assigned once at creation and never changes.
//! - `completed` is the only field that changes after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer task identifier derived from the creation time in epoch millis.
pub type TaskId = i64;

/// Validation failures for task construction and loaded records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming surrounding whitespace.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// One entry of the task list.
///
/// Serialized in camelCase (`createdAt`) to match the stored `todos` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task from raw form input.
    ///
    /// Title and description are stored trimmed.
    ///
    /// # Errors
    /// - `EmptyTitle` when `title` is blank.
    pub fn new(
        id: TaskId,
        title: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        Self::validate_title(title)?;

        Ok(Self {
            id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            completed: false,
            created_at,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-form detail text; empty when the user left it blank.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    /// Checks a candidate title without building a record.
    pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Re-checks construction invariants on a record read from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        Self::validate_title(&self.title)
    }
}

/// Issues task ids from the clock, bumping past any id already handed out.
///
/// Two tasks created within the same millisecond get consecutive ids instead
/// of a duplicate.
#[derive(Debug, Clone, Default)]
pub struct TaskIdAllocator {
    last_issued: Option<TaskId>,
}

impl TaskIdAllocator {
    /// Seeds the allocator with the highest id present in `tasks`.
    pub fn seeded_from(tasks: &[Task]) -> Self {
        Self {
            last_issued: tasks.iter().map(Task::id).max(),
        }
    }

    /// Returns `now_ms`, or the next integer after the last issued id when
    /// the clock has not advanced past it.
    pub fn next(&mut self, now_ms: i64) -> TaskId {
        let id = match self.last_issued {
            Some(last) if now_ms <= last => last.saturating_add(1),
            _ => now_ms,
        };
        self.last_issued = Some(id);
        id
    }
}

//! Task resource types for the Tasklet HTTP API.
//!
//! Defines the `Task` entity as the remote store returns it, plus the
//! request bodies for create (`NewTask`) and partial update (`TaskPatch`).
//! All types are carried as JSON.

use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 255;

/// Identifier of a task.
///
/// Positive values are assigned by the remote store. Negative values are
/// reserved for local placeholders that have not been confirmed yet and are
/// never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw integer identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is a local placeholder id (negative).
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task as held by the remote store: `{id, title, completed}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier (negative only for local placeholders).
    pub id: TaskId,
    /// Non-empty title, at most [`MAX_TASK_TITLE_LENGTH`] characters.
    pub title: String,
    /// Whether the task has been completed.
    pub completed: bool,
}

impl Task {
    /// Creates an open (not completed) task.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Title for the new task.
    pub title: String,
}

/// Body of `PATCH /tasks/{id}`.
///
/// Fields left as `None` are omitted from the JSON so the server leaves
/// them untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// A patch that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// A patch that only changes the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

//! Optimistic task state for Tasklet.
//!
//! [`TaskManager`] owns the local copy of the task collection. Every
//! mutation is applied locally first and produces a [`Pending`] value that
//! describes the remote call to make and how to undo the change. Once the
//! call completes, [`TaskManager::settle`] either commits the server's
//! answer or rolls the collection back.

pub mod ids;
pub mod manager;
pub mod pending;

pub use ids::{Countdown, IdSource};
pub use manager::TaskManager;
pub use pending::{Pending, Settled};

use tasklet_proto::TaskId;
use thiserror::Error;

/// Mutations rejected locally, before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A new task was submitted with a blank title.
    #[error("Please enter a title.")]
    MissingTitle,
    /// A rename would leave the task with a blank title.
    #[error("Title cannot be empty.")]
    TitleEmpty,
    /// The title exceeds the maximum length.
    #[error("Title cannot exceed 255 characters.")]
    TitleTooLong,
    /// The task only exists locally and has no server id yet.
    #[error("Task is still being saved.")]
    Unconfirmed(TaskId),
    /// No task with this id is in the collection.
    #[error("Task not found.")]
    NotFound(TaskId),
}

//! Optimistic mutations awaiting a server response.
//!
//! Each mutation moves through a small state machine:
//!
//! ```text
//! begin_* ──► Pending ──settle(Ok)──► Committed
//!                    └──settle(Err)─► Reverted
//! ```
//!
//! A [`Pending`] carries exactly the data needed to undo its local change:
//! the placeholder id for an add, the previous flag for a toggle, or a full
//! copy of the collection for rename and delete.

use tasklet_proto::{Task, TaskId, TaskPatch};

use crate::api::Request;

/// A local mutation that has been applied but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// Reload the whole collection.
    Refresh,
    /// A placeholder task was prepended under `temp_id`.
    Add {
        /// Synthetic id of the placeholder entry.
        temp_id: TaskId,
        /// Trimmed title sent to the server.
        title: String,
    },
    /// The task's `completed` flag was flipped away from `previous`.
    Toggle {
        /// Target task.
        id: TaskId,
        /// Value before the toggle; restored on failure.
        previous: bool,
    },
    /// The task's title was replaced with `title`.
    Rename {
        /// Target task.
        id: TaskId,
        /// Trimmed new title.
        title: String,
        /// Collection before the rename; restored on failure.
        snapshot: Vec<Task>,
    },
    /// The task was removed from the collection.
    Delete {
        /// Target task.
        id: TaskId,
        /// Collection before the delete; restored on failure.
        snapshot: Vec<Task>,
    },
}

/// How a [`Pending`] mutation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The server confirmed the change; local state now mirrors it.
    Committed,
    /// The call failed; the local change was undone.
    Reverted,
}

impl Pending {
    /// The remote call that confirms this mutation.
    #[must_use]
    pub fn request(&self) -> Request {
        match self {
            Self::Refresh => Request::List,
            Self::Add { title, .. } => Request::Create {
                title: title.clone(),
            },
            Self::Toggle { id, previous } => Request::Update {
                id: *id,
                patch: TaskPatch::completed(!previous),
            },
            Self::Rename { id, title, .. } => Request::Update {
                id: *id,
                patch: TaskPatch::title(title.clone()),
            },
            Self::Delete { id, .. } => Request::Delete { id: *id },
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::Rename { .. } => "rename",
            Self::Delete { .. } => "delete",
        }
    }

    /// Banner text when the server gave no detail of its own.
    #[must_use]
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Refresh => "Failed to load tasks.",
            Self::Add { .. } => "Failed to add task.",
            Self::Toggle { .. } => "Failed to update task.",
            Self::Rename { .. } => "Failed to rename task.",
            Self::Delete { .. } => "Failed to delete task.",
        }
    }
}

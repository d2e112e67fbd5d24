//! Remote task API abstraction for Tasklet.
//!
//! Defines the [`TaskApi`] trait that every task backend must satisfy.
//! Concrete implementations:
//! - [`http::HttpTaskApi`]: JSON over HTTP against a configured base URL
//! - [`memory::InMemoryTaskApi`]: in-process store with failure injection
//!   for tests
//!
//! Each call is a single attempt. There are no retries and no client-side
//! timeout; transport failures surface as [`RequestError::Transport`].

pub mod http;
pub mod memory;

use std::fmt;
use std::future::Future;

use tasklet_proto::{Task, TaskId, TaskPatch};

/// Boxed error used as the source of transport and decode failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The four remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /tasks`
    List,
    /// `POST /tasks`
    Create,
    /// `PATCH /tasks/{id}`
    Update,
    /// `DELETE /tasks/{id}`
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Errors returned by [`TaskApi`] calls.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The server answered with a non-success status code.
    #[error("{operation} failed with status {status}")]
    Status {
        /// Operation that failed.
        operation: Operation,
        /// HTTP status code.
        status: u16,
        /// Server-supplied `detail` message, when it was a string.
        detail: Option<String>,
    },

    /// The request never produced a response (connection refused, reset, DNS).
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation that failed.
        operation: Operation,
        /// Underlying network error.
        source: BoxError,
    },

    /// A success response carried a body that could not be parsed.
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        /// Operation that failed.
        operation: Operation,
        /// Underlying decode error.
        source: BoxError,
    },
}

impl RequestError {
    /// Builds a [`RequestError::Transport`] from any error.
    pub fn transport(operation: Operation, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    /// Builds a [`RequestError::Decode`] from any error.
    pub fn decode(operation: Operation, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            operation,
            source: source.into(),
        }
    }

    /// The operation this error belongs to.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Status { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => *operation,
        }
    }

    /// The HTTP status code, if the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-supplied detail message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Async client for the remote task collection.
///
/// Implementations perform network I/O only and hold no task state.
pub trait TaskApi: Send + Sync {
    /// Fetch the full, ordered task collection.
    fn list(&self) -> impl Future<Output = Result<Vec<Task>, RequestError>> + Send;

    /// Create a task; the returned task carries the server-assigned id.
    fn create(&self, title: &str) -> impl Future<Output = Result<Task, RequestError>> + Send;

    /// Apply a partial update and return the fully updated task.
    fn update(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, RequestError>> + Send;

    /// Delete a task. Any 2xx (typically 204) is success.
    fn delete(&self, id: TaskId) -> impl Future<Output = Result<(), RequestError>> + Send;

    /// Human-readable description of the remote endpoint.
    fn endpoint(&self) -> &str;
}

/// A single remote call, detached from the API that will execute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch all tasks.
    List,
    /// Create a task with this title.
    Create {
        /// Title to create.
        title: String,
    },
    /// Patch a task.
    Update {
        /// Target task.
        id: TaskId,
        /// Fields to change.
        patch: TaskPatch,
    },
    /// Delete a task.
    Delete {
        /// Target task.
        id: TaskId,
    },
}

/// Successful result of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Result of [`Request::List`].
    Listed(Vec<Task>),
    /// Result of [`Request::Create`] or [`Request::Update`].
    Saved(Task),
    /// Result of [`Request::Delete`].
    Deleted,
}

impl Request {
    /// The remote operation this request maps to.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Create { .. } => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
        }
    }

    /// Execute this request against `api`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`RequestError`] the underlying call produced.
    pub async fn send<A: TaskApi>(&self, api: &A) -> Result<Response, RequestError> {
        match self {
            Self::List => api.list().await.map(Response::Listed),
            Self::Create { title } => api.create(title).await.map(Response::Saved),
            Self::Update { id, patch } => api.update(*id, patch).await.map(Response::Saved),
            Self::Delete { id } => api.delete(*id).await.map(|()| Response::Deleted),
        }
    }
}

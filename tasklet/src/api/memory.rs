//! In-process task API for testing.
//!
//! [`InMemoryTaskApi`] mirrors the remote store's observable behaviour
//! (ids assigned ascending from 1, newest tasks listed first, titles
//! trimmed and validated, idempotent delete) without any network I/O.
//! Failures can be queued per operation with [`InMemoryTaskApi::fail_next`]
//! to exercise rollback paths.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use tasklet_proto::{MAX_TASK_TITLE_LENGTH, Task, TaskId, TaskPatch};

use super::{Operation, RequestError, TaskApi};

/// A failure to inject into the next call of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Respond with a non-success status and optional detail message.
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` string to report.
        detail: Option<String>,
    },
    /// Fail as if the connection was refused.
    Network,
}

impl Failure {
    fn into_error(self, operation: Operation) -> RequestError {
        match self {
            Self::Status { status, detail } => RequestError::Status {
                operation,
                status,
                detail,
            },
            Self::Network => RequestError::transport(
                operation,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Newest first.
    tasks: Vec<Task>,
    next_id: i64,
    failures: HashMap<Operation, VecDeque<Failure>>,
    calls: Vec<Operation>,
}

impl MemoryState {
    /// Records the call and pops any queued failure for it.
    fn begin(&mut self, operation: Operation) -> Result<(), RequestError> {
        self.calls.push(operation);
        match self
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(failure) => Err(failure.into_error(operation)),
            None => Ok(()),
        }
    }
}

fn unprocessable(operation: Operation, detail: Option<&str>) -> RequestError {
    RequestError::Status {
        operation,
        status: 422,
        detail: detail.map(str::to_string),
    }
}

/// Rejects a raw title the way the store's request schema does, before
/// any lookup. Schema violations carry structured detail.
fn check_title_schema(operation: Operation, raw: &str) -> Result<(), RequestError> {
    let len = raw.chars().count();
    if len == 0 || len > MAX_TASK_TITLE_LENGTH {
        return Err(unprocessable(operation, None));
    }
    Ok(())
}

/// Trims a title that passed the schema check.
fn trimmed_title(operation: Operation, raw: &str) -> Result<String, RequestError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(unprocessable(operation, Some("Title cannot be empty.")));
    }
    Ok(title.to_string())
}

/// In-memory [`TaskApi`] with failure injection and call recording.
#[derive(Debug)]
pub struct InMemoryTaskApi {
    state: Mutex<MemoryState>,
}

impl Default for InMemoryTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskApi {
    /// Creates an empty store; the first task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Creates a store holding `tasks` in list order (newest first).
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0).max(0) + 1;
        Self {
            state: Mutex::new(MemoryState {
                tasks,
                next_id,
                ..MemoryState::default()
            }),
        }
    }

    /// Queue `failure` for the next call of `operation`.
    ///
    /// Multiple failures for the same operation are consumed in order.
    pub fn fail_next(&self, operation: Operation, failure: Failure) {
        self.state
            .lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(failure);
    }

    /// Snapshot of the stored tasks in list order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Every operation invoked so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().calls.clone()
    }
}

impl TaskApi for InMemoryTaskApi {
    async fn list(&self) -> Result<Vec<Task>, RequestError> {
        let mut state = self.state.lock();
        state.begin(Operation::List)?;
        Ok(state.tasks.clone())
    }

    async fn create(&self, title: &str) -> Result<Task, RequestError> {
        let mut state = self.state.lock();
        state.begin(Operation::Create)?;
        check_title_schema(Operation::Create, title)?;
        let title = trimmed_title(Operation::Create, title)?;

        let task = Task::new(TaskId::new(state.next_id), title);
        state.next_id += 1;
        state.tasks.insert(0, task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, RequestError> {
        let mut state = self.state.lock();
        state.begin(Operation::Update)?;
        if patch.is_empty() {
            return Err(unprocessable(Operation::Update, None));
        }
        if let Some(raw) = patch.title.as_deref() {
            check_title_schema(Operation::Update, raw)?;
        }

        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return Err(RequestError::Status {
                operation: Operation::Update,
                status: 404,
                detail: Some("Task not found.".to_string()),
            });
        };
        let title = patch
            .title
            .as_deref()
            .map(|t| trimmed_title(Operation::Update, t))
            .transpose()?;
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), RequestError> {
        let mut state = self.state.lock();
        state.begin(Operation::Delete)?;
        state.tasks.retain(|t| t.id != id);
        Ok(())
    }

    fn endpoint(&self) -> &str {
        "memory://tasks"
    }
}

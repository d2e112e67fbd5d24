//! Shared wire definitions for the Tasklet task API.

pub mod error;
pub mod task;

pub use error::ErrorDetail;
pub use task::{MAX_TASK_TITLE_LENGTH, NewTask, Task, TaskId, TaskPatch};

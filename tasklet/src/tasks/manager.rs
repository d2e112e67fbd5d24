//! Task manager: optimistic mutations and their reconciliation.
//!
//! `TaskManager` holds the local copy of the task collection and the
//! banner error. Mutations are split into two halves so that several can
//! be in flight at once:
//!
//! 1. `begin_*` validates, applies the change locally and returns a
//!    [`Pending`] describing the remote call.
//! 2. [`TaskManager::settle`] takes that `Pending` back together with the
//!    call's outcome and commits or rolls back.
//!
//! Overlapping mutations are settled independently in the order their
//! responses arrive, so the last response wins per entry.

use tasklet_proto::{MAX_TASK_TITLE_LENGTH, Task, TaskId};

use super::TaskError;
use super::ids::{Countdown, IdSource};
use super::pending::{Pending, Settled};
use crate::api::{RequestError, Response, TaskApi};

/// Local task collection with optimistic updates and rollback.
pub struct TaskManager<I = Countdown> {
    /// `None` until the first refresh settles.
    tasks: Option<Vec<Task>>,
    /// Message for the banner, cleared when the next mutation begins.
    last_error: Option<String>,
    /// Placeholder id generator for unconfirmed adds.
    ids: I,
}

impl TaskManager<Countdown> {
    /// Creates an uninitialized manager using [`Countdown`] placeholder ids.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_ids(Countdown::new())
    }
}

impl Default for TaskManager<Countdown> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims `raw` and checks it is a usable title.
fn validate_title(raw: &str, when_empty: TaskError) -> Result<String, TaskError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(when_empty);
    }
    if title.chars().count() > MAX_TASK_TITLE_LENGTH {
        return Err(TaskError::TitleTooLong);
    }
    Ok(title.to_string())
}

impl<I: IdSource> TaskManager<I> {
    /// Creates an uninitialized manager drawing placeholder ids from `ids`.
    pub const fn with_ids(ids: I) -> Self {
        Self {
            tasks: None,
            last_error: None,
            ids,
        }
    }

    /// The current collection, or `None` while the first load is pending.
    #[must_use]
    pub fn tasks(&self) -> Option<&[Task]> {
        self.tasks.as_deref()
    }

    /// Whether the collection has been loaded at least once.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.tasks.is_some()
    }

    /// The message to show in the error banner, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Clears the banner without starting a mutation.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.as_deref()?.iter().find(|t| t.id == id)
    }

    /// Position of a task in the collection.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.as_deref()?.iter().position(|t| t.id == id)
    }

    /// Whether any placeholder entry is awaiting its server id.
    #[must_use]
    pub fn has_unconfirmed(&self) -> bool {
        self.tasks
            .as_deref()
            .is_some_and(|tasks| tasks.iter().any(|t| t.id.is_synthetic()))
    }

    /// Starts reloading the collection from the server.
    pub fn begin_refresh(&mut self) -> Pending {
        self.last_error = None;
        Pending::Refresh
    }

    /// Prepends a placeholder task and returns the pending create.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::MissingTitle`] for a blank title or
    /// [`TaskError::TitleTooLong`] for an over-long one. The same message is
    /// recorded as [`last_error`](Self::last_error); nothing is changed and
    /// no request should be made.
    pub fn begin_add(&mut self, title: &str) -> Result<Pending, TaskError> {
        self.last_error = None;
        let title = validate_title(title, TaskError::MissingTitle).map_err(|e| self.reject(e))?;

        let temp_id = self.fresh_id();
        self.tasks_mut().insert(0, Task::new(temp_id, title.clone()));
        tracing::debug!(%temp_id, "add applied locally");

        Ok(Pending::Add { temp_id, title })
    }

    /// Flips the task's `completed` flag and returns the pending update.
    ///
    /// `task` is the entry as the caller last saw it; its `completed` value
    /// is what a failed update restores.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Unconfirmed`] for placeholder tasks and
    /// [`TaskError::NotFound`] if the id is not in the collection.
    pub fn begin_toggle(&mut self, task: &Task) -> Result<Pending, TaskError> {
        self.last_error = None;
        let id = self.check_target(task.id)?;
        let previous = task.completed;

        if let Some(entry) = self.entry_mut(id) {
            entry.completed = !previous;
        }
        tracing::debug!(%id, completed = !previous, "toggle applied locally");

        Ok(Pending::Toggle { id, previous })
    }

    /// Retitles the task and returns the pending update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TitleEmpty`] if `new_title` is blank after
    /// trimming, [`TaskError::TitleTooLong`], [`TaskError::Unconfirmed`] or
    /// [`TaskError::NotFound`]. Nothing is changed on error.
    pub fn begin_rename(&mut self, task: &Task, new_title: &str) -> Result<Pending, TaskError> {
        self.last_error = None;
        let title =
            validate_title(new_title, TaskError::TitleEmpty).map_err(|e| self.reject(e))?;
        let id = self.check_target(task.id)?;

        let snapshot = self.snapshot();
        if let Some(entry) = self.entry_mut(id) {
            entry.title.clone_from(&title);
        }
        tracing::debug!(%id, "rename applied locally");

        Ok(Pending::Rename {
            id,
            title,
            snapshot,
        })
    }

    /// Removes the task and returns the pending delete.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Unconfirmed`] for placeholder tasks and
    /// [`TaskError::NotFound`] if the id is not in the collection.
    pub fn begin_delete(&mut self, task: &Task) -> Result<Pending, TaskError> {
        self.last_error = None;
        let id = self.check_target(task.id)?;

        let snapshot = self.snapshot();
        self.tasks_mut().retain(|t| t.id != id);
        tracing::debug!(%id, "delete applied locally");

        Ok(Pending::Delete { id, snapshot })
    }

    /// Reconciles a pending mutation with the outcome of its request.
    ///
    /// On success the server's data replaces the optimistic entry. On
    /// failure the local change is undone and the banner is set to the
    /// server's detail message, or a generic one for the operation.
    pub fn settle(
        &mut self,
        pending: Pending,
        outcome: Result<Response, RequestError>,
    ) -> Settled {
        match (pending, outcome) {
            (Pending::Refresh, Ok(Response::Listed(tasks))) => {
                tracing::debug!(count = tasks.len(), "collection refreshed");
                self.tasks = Some(tasks);
                Settled::Committed
            }
            (Pending::Add { temp_id, .. }, Ok(Response::Saved(task))) => {
                tracing::debug!(%temp_id, id = %task.id, "add confirmed");
                self.commit_add(temp_id, task);
                Settled::Committed
            }
            (Pending::Toggle { id, .. } | Pending::Rename { id, .. }, Ok(Response::Saved(task))) => {
                tracing::debug!(%id, "update confirmed");
                if let Some(entry) = self.entry_mut(id) {
                    *entry = task;
                }
                Settled::Committed
            }
            (Pending::Delete { id, .. }, Ok(Response::Deleted)) => {
                tracing::debug!(%id, "delete confirmed");
                Settled::Committed
            }
            (pending, Ok(response)) => {
                tracing::warn!(
                    mutation = pending.label(),
                    ?response,
                    "response does not match request, rolling back"
                );
                let message = pending.failure_message().to_string();
                self.revert(pending, message);
                Settled::Reverted
            }
            (pending, Err(err)) => {
                tracing::warn!(mutation = pending.label(), error = %err, "request failed, rolling back");
                let message = err
                    .detail()
                    .map_or_else(|| pending.failure_message().to_string(), str::to_string);
                self.revert(pending, message);
                Settled::Reverted
            }
        }
    }

    /// Sends the request for `pending` and settles it.
    ///
    /// Holding `&mut self` across the call means no other mutation can
    /// start meanwhile; use [`crate::net::Dispatcher`] for overlapping
    /// requests.
    pub async fn run<A: TaskApi>(&mut self, api: &A, pending: Pending) -> Settled {
        let outcome = pending.request().send(api).await;
        self.settle(pending, outcome)
    }

    /// Reloads the collection.
    pub async fn refresh<A: TaskApi>(&mut self, api: &A) -> Settled {
        let pending = self.begin_refresh();
        self.run(api, pending).await
    }

    /// Adds a task optimistically.
    ///
    /// # Errors
    ///
    /// See [`begin_add`](Self::begin_add); no request is made on error.
    pub async fn add<A: TaskApi>(&mut self, api: &A, title: &str) -> Result<Settled, TaskError> {
        let pending = self.begin_add(title)?;
        Ok(self.run(api, pending).await)
    }

    /// Toggles a task optimistically.
    ///
    /// # Errors
    ///
    /// See [`begin_toggle`](Self::begin_toggle); no request is made on error.
    pub async fn toggle<A: TaskApi>(&mut self, api: &A, task: &Task) -> Result<Settled, TaskError> {
        let pending = self.begin_toggle(task)?;
        Ok(self.run(api, pending).await)
    }

    /// Renames a task optimistically.
    ///
    /// # Errors
    ///
    /// See [`begin_rename`](Self::begin_rename); no request is made on error.
    pub async fn rename<A: TaskApi>(
        &mut self,
        api: &A,
        task: &Task,
        new_title: &str,
    ) -> Result<Settled, TaskError> {
        let pending = self.begin_rename(task, new_title)?;
        Ok(self.run(api, pending).await)
    }

    /// Deletes a task optimistically.
    ///
    /// # Errors
    ///
    /// See [`begin_delete`](Self::begin_delete); no request is made on error.
    pub async fn delete<A: TaskApi>(&mut self, api: &A, task: &Task) -> Result<Settled, TaskError> {
        let pending = self.begin_delete(task)?;
        Ok(self.run(api, pending).await)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Records a validation error for the banner and hands it back.
    fn reject(&mut self, err: TaskError) -> TaskError {
        tracing::debug!(error = %err, "mutation rejected locally");
        self.last_error = Some(err.to_string());
        err
    }

    /// Ensures `id` names a confirmed task in the collection.
    fn check_target(&mut self, id: TaskId) -> Result<TaskId, TaskError> {
        if id.is_synthetic() {
            return Err(self.reject(TaskError::Unconfirmed(id)));
        }
        if self.position(id).is_none() {
            return Err(self.reject(TaskError::NotFound(id)));
        }
        Ok(id)
    }

    /// Draws placeholder ids until one is negative and unused.
    fn fresh_id(&mut self) -> TaskId {
        loop {
            let id = self.ids.next_id();
            if id.is_synthetic() && self.position(id).is_none() {
                return id;
            }
            tracing::trace!(%id, "skipping unusable placeholder id");
        }
    }

    fn tasks_mut(&mut self) -> &mut Vec<Task> {
        self.tasks.get_or_insert_with(Vec::new)
    }

    fn entry_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.as_mut()?.iter_mut().find(|t| t.id == id)
    }

    fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone().unwrap_or_default()
    }

    /// Swaps the placeholder for the server's task in place.
    ///
    /// If a refresh already dropped the placeholder, the task is prepended
    /// unless the refresh brought it in.
    fn commit_add(&mut self, temp_id: TaskId, task: Task) {
        let tasks = self.tasks_mut();
        let already_present = tasks.iter().any(|t| t.id == task.id);
        match tasks.iter().position(|t| t.id == temp_id) {
            Some(pos) if already_present => {
                tasks.remove(pos);
            }
            Some(pos) => tasks[pos] = task,
            None if already_present => {}
            None => tasks.insert(0, task),
        }
    }

    /// Undoes the local change made by `pending` and sets the banner.
    fn revert(&mut self, pending: Pending, message: String) {
        match pending {
            Pending::Refresh => self.tasks = Some(Vec::new()),
            Pending::Add { temp_id, .. } => self.tasks_mut().retain(|t| t.id != temp_id),
            Pending::Toggle { id, previous } => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.completed = previous;
                }
            }
            Pending::Rename { snapshot, .. } | Pending::Delete { snapshot, .. } => {
                self.tasks = Some(snapshot);
            }
        }
        self.last_error = Some(message);
    }
}

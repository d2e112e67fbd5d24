//! Request dispatcher wiring the TUI to the task API.
//!
//! The UI never awaits a request directly. It hands each [`Pending`]
//! mutation to the [`Dispatcher`], which spawns the remote call on the
//! tokio runtime and reports back through a [`Completion`] channel:
//!
//! ```text
//! TUI loop  ─── Pending ───►  tokio::spawn(request)
//!           ◄── Completion ──
//! ```
//!
//! Calls run concurrently and complete in whatever order the server
//! answers. The main loop settles each completion as it arrives.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{RequestError, Response, TaskApi};
use crate::tasks::Pending;

/// Default capacity of the completion channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// A finished remote call, ready to be settled.
#[derive(Debug)]
pub struct Completion {
    /// The mutation the call belongs to.
    pub pending: Pending,
    /// What the server said.
    pub outcome: Result<Response, RequestError>,
}

/// Spawns remote calls and forwards their results.
pub struct Dispatcher<A> {
    api: Arc<A>,
    completions: mpsc::Sender<Completion>,
}

impl<A: TaskApi + 'static> Dispatcher<A> {
    /// Creates a dispatcher and the receiver its completions arrive on.
    ///
    /// A `capacity` of zero is raised to one.
    #[must_use]
    pub fn new(api: Arc<A>, capacity: usize) -> (Self, mpsc::Receiver<Completion>) {
        let (completions, rx) = mpsc::channel(capacity.max(1));
        (Self { api, completions }, rx)
    }

    /// Sends the request for `pending` in the background.
    ///
    /// The returned handle resolves once the completion has been queued.
    /// If the receiver is gone the result is dropped with a log line.
    pub fn dispatch(&self, pending: Pending) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let completions = self.completions.clone();
        tracing::debug!(mutation = pending.label(), "dispatching request");

        tokio::spawn(async move {
            let outcome = pending.request().send(api.as_ref()).await;
            if let Err(e) = &outcome {
                tracing::debug!(mutation = pending.label(), error = %e, "request failed");
            }
            if completions.send(Completion { pending, outcome }).await.is_err() {
                tracing::debug!("completion receiver dropped; discarding result");
            }
        })
    }
}

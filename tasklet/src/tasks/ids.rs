//! Synthetic id generation for unconfirmed tasks.

use tasklet_proto::TaskId;

/// Source of placeholder ids for tasks that have not reached the server.
///
/// Every id returned must be negative. The manager skips ids that are
/// already present in the collection, so a source only needs to avoid
/// repeating itself.
pub trait IdSource {
    /// Produce the next placeholder id.
    fn next_id(&mut self) -> TaskId;
}

/// Counts down from -1: -1, -2, -3, ...
#[derive(Debug, Clone)]
pub struct Countdown {
    next: i64,
}

impl Countdown {
    /// Starts at -1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: -1 }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for Countdown {
    fn next_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next);
        // Wrapping past i64::MIN would yield a positive id.
        self.next = self.next.checked_sub(1).unwrap_or(-1);
        id
    }
}

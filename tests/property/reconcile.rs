//! Property-based tests for optimistic reconciliation.
//!
//! Uses proptest to verify, for arbitrary collections and failures:
//! 1. A failed Add leaves the collection as it was before the Add.
//! 2. A failed Toggle restores the entry's `completed` flag.
//! 3. A failed Rename or Delete restores the pre-operation collection exactly.
//! 4. A successful Add leaves exactly one entry with the server id and no
//!    synthetic ids.
//! 5. Settling the same listing twice yields the same collection.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use proptest::sample::Index;
use tasklet::api::{Operation, RequestError, Response};
use tasklet::tasks::{Settled, TaskManager};
use tasklet_proto::{Task, TaskId};

// --- Strategies ---

/// A collection with unique positive ids, newest first.
fn arb_collection(min: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(("[a-zA-Z0-9 ]{1,24}", any::<bool>()), min..12).prop_map(|rows| {
        let n = rows.len();
        rows.into_iter()
            .enumerate()
            .map(|(i, (title, completed))| Task {
                id: TaskId::new(i64::try_from(n - i).unwrap()),
                title,
                completed,
            })
            .collect()
    })
}

/// A title that survives trimming.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,30}"
}

/// Any failure the remote client can report for `operation`.
fn arb_failure(operation: Operation) -> impl Strategy<Value = RequestError> {
    prop_oneof![
        (400u16..600, proptest::option::of("[A-Za-z .]{1,40}")).prop_map(
            move |(status, detail)| RequestError::Status {
                operation,
                status,
                detail,
            }
        ),
        Just(()).prop_map(move |()| RequestError::transport(
            operation,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        )),
    ]
}

fn loaded(tasks: Vec<Task>) -> TaskManager {
    let mut mgr = TaskManager::new();
    let pending = mgr.begin_refresh();
    mgr.settle(pending, Ok(Response::Listed(tasks)));
    mgr
}

proptest! {
    #[test]
    fn failed_add_restores_collection(
        before in arb_collection(0),
        title in arb_title(),
        err in arb_failure(Operation::Create),
    ) {
        let mut mgr = loaded(before.clone());
        let pending = mgr.begin_add(&title).unwrap();

        prop_assert_eq!(mgr.settle(pending, Err(err)), Settled::Reverted);
        prop_assert_eq!(mgr.tasks().unwrap(), before.as_slice());
        prop_assert!(mgr.last_error().is_some());
    }

    #[test]
    fn failed_toggle_restores_flag(
        before in arb_collection(1),
        pick in any::<Index>(),
        err in arb_failure(Operation::Update),
    ) {
        let target = pick.get(&before).clone();
        let mut mgr = loaded(before.clone());
        let pending = mgr.begin_toggle(&target).unwrap();
        prop_assert_eq!(mgr.get(target.id).unwrap().completed, !target.completed);

        mgr.settle(pending, Err(err));
        prop_assert_eq!(mgr.get(target.id).unwrap().completed, target.completed);
        prop_assert_eq!(mgr.tasks().unwrap(), before.as_slice());
    }

    #[test]
    fn failed_rename_restores_snapshot(
        before in arb_collection(1),
        pick in any::<Index>(),
        title in arb_title(),
        err in arb_failure(Operation::Update),
    ) {
        let target = pick.get(&before).clone();
        let mut mgr = loaded(before.clone());
        let pending = mgr.begin_rename(&target, &title).unwrap();

        mgr.settle(pending, Err(err));
        prop_assert_eq!(mgr.tasks().unwrap(), before.as_slice());
    }

    #[test]
    fn failed_delete_restores_snapshot(
        before in arb_collection(1),
        pick in any::<Index>(),
        err in arb_failure(Operation::Delete),
    ) {
        let target = pick.get(&before).clone();
        let mut mgr = loaded(before.clone());
        let pending = mgr.begin_delete(&target).unwrap();
        prop_assert!(mgr.get(target.id).is_none());

        mgr.settle(pending, Err(err));
        prop_assert_eq!(mgr.tasks().unwrap(), before.as_slice());
    }

    #[test]
    fn successful_add_leaves_no_synthetic_id(
        before in arb_collection(0),
        title in arb_title(),
        offset in 1i64..1000,
    ) {
        let server_id = TaskId::new(i64::try_from(before.len()).unwrap() + offset);
        let mut mgr = loaded(before.clone());
        let pending = mgr.begin_add(&title).unwrap();
        let confirmed = Task::new(server_id, title.trim());

        prop_assert_eq!(
            mgr.settle(pending, Ok(Response::Saved(confirmed.clone()))),
            Settled::Committed
        );
        let tasks = mgr.tasks().unwrap();
        prop_assert!(tasks.iter().all(|t| !t.id.is_synthetic()));
        prop_assert_eq!(tasks.iter().filter(|t| t.id == server_id).count(), 1);
        prop_assert_eq!(&tasks[0], &confirmed);
        prop_assert_eq!(&tasks[1..], before.as_slice());
    }

    #[test]
    fn refresh_is_idempotent(listing in arb_collection(0)) {
        let mut mgr = loaded(listing.clone());
        let first = mgr.tasks().unwrap().to_vec();
        let pending = mgr.begin_refresh();
        mgr.settle(pending, Ok(Response::Listed(listing)));
        prop_assert_eq!(mgr.tasks().unwrap(), first.as_slice());
    }
}

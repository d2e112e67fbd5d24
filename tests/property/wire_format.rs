//! Property-based tests for the task API wire format.
//!
//! Uses proptest to verify:
//! 1. A `TaskPatch` serializes exactly the fields it sets.
//! 2. Server task payloads decode to the same id/title/completed values.
//! 3. Arbitrary failure bodies never panic `ErrorDetail::parse`, and only
//!    string details produce a message.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use tasklet_proto::{ErrorDetail, Task, TaskId, TaskPatch};

/// Strategy for titles the server would accept.
fn arb_title() -> impl Strategy<Value = String> {
    "[^\x00]{1,255}"
}

proptest! {
    #[test]
    fn patch_serializes_only_set_fields(
        title in proptest::option::of(arb_title()),
        completed in proptest::option::of(any::<bool>()),
    ) {
        let patch = TaskPatch { title: title.clone(), completed };
        let json = serde_json::to_value(&patch).unwrap();
        let object = json.as_object().unwrap();

        prop_assert_eq!(object.contains_key("title"), title.is_some());
        prop_assert_eq!(object.contains_key("completed"), completed.is_some());
        if let Some(t) = &title {
            prop_assert_eq!(object["title"].as_str(), Some(t.as_str()));
        }
        prop_assert_eq!(patch.is_empty(), object.is_empty());
    }

    #[test]
    fn server_payload_decodes(id in any::<i64>(), title in arb_title(), completed in any::<bool>()) {
        let payload = serde_json::json!({"id": id, "title": title, "completed": completed});
        let task: Task = serde_json::from_value(payload).unwrap();
        prop_assert_eq!(task.id, TaskId::new(id));
        prop_assert_eq!(task.title, title);
        prop_assert_eq!(task.completed, completed);
    }

    #[test]
    fn arbitrary_failure_body_never_panics(body in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = ErrorDetail::parse(&body);
    }

    #[test]
    fn only_string_detail_yields_message(detail in "[a-zA-Z][a-zA-Z .]{0,63}", code in any::<i32>()) {
        let text = serde_json::json!({"detail": detail}).to_string();
        let parsed = ErrorDetail::parse(text.as_bytes()).unwrap();
        prop_assert_eq!(parsed.message(), Some(detail.as_str()));

        let numeric = serde_json::json!({"detail": code}).to_string();
        let parsed = ErrorDetail::parse(numeric.as_bytes()).unwrap();
        prop_assert_eq!(parsed.message(), None);
    }
}

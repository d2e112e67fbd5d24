//! Integration tests for optimistic task mutations over HTTP.
//!
//! Drives `TaskManager` against `HttpTaskApi` and a `wiremock` server,
//! covering commit and rollback for every mutation.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::json;
use tasklet::api::http::HttpTaskApi;
use tasklet::tasks::{Settled, TaskError, TaskManager};
use tasklet_proto::{Task, TaskId};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn task(id: i64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId::new(id),
        title: title.to_string(),
        completed,
    }
}

fn task_json(t: &Task) -> serde_json::Value {
    json!({ "id": t.id.get(), "title": t.title, "completed": t.completed })
}

/// Starts a server whose `GET /tasks` returns `tasks`.
async fn server_listing(tasks: &[Task]) -> (MockServer, HttpTaskApi) {
    let server = MockServer::start().await;
    let body: Vec<_> = tasks.iter().map(task_json).collect();
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    let api = HttpTaskApi::new(&server.uri()).unwrap();
    (server, api)
}

/// Manager loaded from `api`.
async fn loaded(api: &HttpTaskApi) -> TaskManager {
    let mut mgr = TaskManager::new();
    assert_eq!(mgr.refresh(api).await, Settled::Committed);
    mgr
}

/// A client for a port nobody listens on.
fn unreachable_api() -> HttpTaskApi {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    HttpTaskApi::new(&format!("http://127.0.0.1:{port}")).unwrap()
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_twice_yields_same_collection() {
    let seed = vec![task(2, "b", true), task(1, "a", false)];
    let (_server, api) = server_listing(&seed).await;
    let mut mgr = loaded(&api).await;
    let first = mgr.tasks().unwrap().to_vec();

    mgr.refresh(&api).await;
    assert_eq!(mgr.tasks().unwrap(), first.as_slice());
    assert_eq!(first, seed);
}

#[tokio::test]
async fn refresh_failure_empties_and_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let api = HttpTaskApi::new(&server.uri()).unwrap();

    let mut mgr = TaskManager::new();
    assert_eq!(mgr.refresh(&api).await, Settled::Reverted);
    assert_eq!(mgr.tasks(), Some(&[][..]));
    assert_eq!(mgr.last_error(), Some("Failed to load tasks."));
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_commits_server_task_as_first_entry() {
    let (server, api) = server_listing(&[task(3, "older", false)]).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({ "title": "Buy milk" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "title": "Buy milk", "completed": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    let settled = mgr.add(&api, "  Buy milk  ").await.unwrap();

    assert_eq!(settled, Settled::Committed);
    let tasks = mgr.tasks().unwrap();
    assert_eq!(tasks[0], task(7, "Buy milk", false));
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| !t.id.is_synthetic()));
    assert!(mgr.last_error().is_none());
}

#[tokio::test]
async fn add_failure_shows_server_detail_and_reverts() {
    let seed = vec![task(1, "a", false)];
    let (server, api) = server_listing(&seed).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "Title cannot be empty." })),
        )
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    let settled = mgr.add(&api, "x").await.unwrap();

    assert_eq!(settled, Settled::Reverted);
    assert_eq!(mgr.tasks().unwrap(), seed.as_slice());
    assert_eq!(mgr.last_error(), Some("Title cannot be empty."));
}

#[tokio::test]
async fn blank_add_makes_no_request() {
    let (server, api) = server_listing(&[]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    let err = mgr.add(&api, "   ").await.unwrap_err();
    assert_eq!(err, TaskError::MissingTitle);
    assert_eq!(mgr.last_error(), Some("Please enter a title."));
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_commits_server_value() {
    let x = task(3, "X", false);
    let (server, api) = server_listing(std::slice::from_ref(&x)).await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/3"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(&task(3, "X", true))))
        .expect(1)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    mgr.toggle(&api, &x).await.unwrap();
    assert_eq!(mgr.get(TaskId::new(3)), Some(&task(3, "X", true)));
}

#[tokio::test]
async fn toggle_network_failure_keeps_original_flag() {
    let x = task(3, "X", false);
    let (_server, api) = server_listing(std::slice::from_ref(&x)).await;
    let mut mgr = loaded(&api).await;

    let settled = mgr.toggle(&unreachable_api(), &x).await.unwrap();

    assert_eq!(settled, Settled::Reverted);
    assert_eq!(mgr.get(TaskId::new(3)), Some(&x));
    assert_eq!(mgr.last_error(), Some("Failed to update task."));
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rename_to_blank_makes_no_request() {
    let a = task(5, "A", false);
    let (server, api) = server_listing(std::slice::from_ref(&a)).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    let err = mgr.rename(&api, &a, "   ").await.unwrap_err();

    assert_eq!(err, TaskError::TitleEmpty);
    assert_eq!(mgr.tasks().unwrap(), &[a]);
    assert_eq!(mgr.last_error(), Some("Title cannot be empty."));
}

#[tokio::test]
async fn rename_failure_restores_snapshot() {
    let seed = vec![task(6, "C", true), task(5, "A", false)];
    let (server, api) = server_listing(&seed).await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    mgr.rename(&api, &seed[1], "B").await.unwrap();

    assert_eq!(mgr.tasks().unwrap(), seed.as_slice());
    assert_eq!(mgr.last_error(), Some("Failed to rename task."));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_not_found_restores_original_position() {
    let seed = vec![task(10, "c", false), task(9, "b", true), task(8, "a", false)];
    let (server, api) = server_listing(&seed).await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Task not found." })))
        .expect(1)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    let settled = mgr.delete(&api, &seed[1]).await.unwrap();

    assert_eq!(settled, Settled::Reverted);
    assert_eq!(mgr.tasks().unwrap(), seed.as_slice());
    assert_eq!(mgr.position(TaskId::new(9)), Some(1));
    assert_eq!(mgr.last_error(), Some("Task not found."));
}

#[tokio::test]
async fn delete_success_keeps_entry_removed() {
    let seed = vec![task(9, "b", false), task(8, "a", false)];
    let (server, api) = server_listing(&seed).await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut mgr = loaded(&api).await;
    assert_eq!(mgr.delete(&api, &seed[0]).await.unwrap(), Settled::Committed);
    assert_eq!(mgr.tasks().unwrap(), &[task(8, "a", false)]);
}

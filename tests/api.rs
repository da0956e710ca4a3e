//! REST API tests.
//!
//! Each test drives the full stack — router → store → save file — through
//! `tower::ServiceExt::oneshot` against a throwaway redb file.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::sync::{Arc, RwLock};
use taskboard::api::{self, AppState};
use taskboard::persist::SaveFile;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_ORIGIN: &str = "http://localhost:5173";

fn test_app(name: &str) -> (Router, String) {
    let path = format!("/tmp/taskboard_api_{name}_{}.redb", std::process::id());
    let _ = fs::remove_file(&path);

    let save_file = SaveFile::open(&path).unwrap();
    let store = save_file.load_store().unwrap();
    let state = Arc::new(AppState {
        store: RwLock::new(store),
        save_file,
    });

    (api::router(state, TEST_ORIGIN), path)
}

fn cleanup(path: &str) {
    let _ = fs::remove_file(path);
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn task_payload(title: &str, due: &str) -> Value {
    json!({ "title": title, "priority": "Medium", "dueDate": due })
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, path) = test_app("health");

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    cleanup(&path);
}

#[tokio::test]
async fn create_returns_stored_pending_task() {
    let (app, path) = test_app("create");

    let payload = json!({
        "title": "Write report",
        "description": "quarterly numbers",
        "priority": "High",
        "dueDate": "2099-01-01"
    });
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Write report");
    assert_eq!(body["description"], "quarterly numbers");
    assert_eq!(body["priority"], "High");
    assert_eq!(body["dueDate"], "2099-01-01");
    assert_eq!(body["status"], "Pending");
    assert!(body["id"].as_str().map(Uuid::parse_str).unwrap().is_ok());
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());

    cleanup(&path);
}

#[tokio::test]
async fn create_missing_required_field_is_rejected() {
    let (app, path) = test_app("create_missing");

    let payloads = [
        json!({ "priority": "Medium", "dueDate": "2099-01-01" }),
        json!({ "title": "Write report", "priority": "Medium" }),
        json!({ "title": "Write report", "dueDate": "2099-01-01" }),
        json!({ "title": "   ", "priority": "Medium", "dueDate": "2099-01-01" }),
    ];

    for payload in payloads {
        let (status, body) = send(&app, Method::POST, "/api/tasks", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title, due date, and priority are required.");
    }

    // Nothing was stored
    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    cleanup(&path);
}

#[tokio::test]
async fn create_rejects_priority_outside_the_known_set() {
    let (app, path) = test_app("create_bad_priority");

    let payload = json!({ "title": "Write report", "priority": "Urgent", "dueDate": "2099-01-01" });
    let (status, _) = send(&app, Method::POST, "/api/tasks", Some(payload)).await;
    assert!(status.is_client_error());

    let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(body, json!([]));

    cleanup(&path);
}

#[tokio::test]
async fn list_orders_by_due_date_then_newest_created() {
    let (app, path) = test_app("list_order");

    for (title, due) in [
        ("June", "2099-06-01"),
        ("January early", "2099-01-01"),
        ("January late", "2099-01-01"),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/tasks", Some(task_payload(title, due))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    // Due date ascending; the later-created task wins the January tie.
    assert_eq!(titles, vec!["January late", "January early", "June"]);

    cleanup(&path);
}

#[tokio::test]
async fn update_status_flips_only_the_status() {
    let (app, path) = test_app("update");

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(task_payload("Write report", "2099-01-01")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({ "status": "Completed" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");
    assert_eq!(body["title"], "Write report");
    assert_eq!(body["dueDate"], "2099-01-01");
    assert_eq!(body["createdAt"], created["createdAt"]);

    cleanup(&path);
}

#[tokio::test]
async fn update_ignores_fields_other_than_status() {
    let (app, path) = test_app("update_extra");

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(task_payload("Untouchable", "2099-01-01")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({ "status": "Completed", "title": "Hijacked", "priority": "High" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Untouchable");
    assert_eq!(body["priority"], "Medium");

    cleanup(&path);
}

#[tokio::test]
async fn update_rejects_invalid_status_and_leaves_task_alone() {
    let (app, path) = test_app("update_invalid");

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(task_payload("Write report", "2099-01-01")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    for payload in [json!({ "status": "Archived" }), json!({})] {
        let (status, body) = send(&app, Method::PUT, &format!("/api/tasks/{id}"), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid status value.");
    }

    let (_, body) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(body[0]["status"], "Pending");

    cleanup(&path);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (app, path) = test_app("update_missing");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{}", Uuid::new_v4()),
        Some(json!({ "status": "Completed" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found.");

    cleanup(&path);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let (app, path) = test_app("delete_missing");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/tasks/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found.");

    cleanup(&path);
}

#[tokio::test]
async fn delete_answers_no_content_with_empty_body() {
    let (app, path) = test_app("delete");

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(task_payload("Doomed", "2099-01-01")),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/tasks/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    cleanup(&path);
}

#[tokio::test]
async fn create_complete_delete_round_trip() {
    let (app, path) = test_app("round_trip");

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Write report", "priority": "High", "dueDate": "2099-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{id}"),
        Some(json!({ "status": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Completed");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tasks/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(listed, json!([]));

    cleanup(&path);
}

#[tokio::test]
async fn cors_admits_the_configured_origin() {
    let (app, path) = test_app("cors");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/health")
        .header(header::ORIGIN, TEST_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(TEST_ORIGIN)
    );

    cleanup(&path);
}

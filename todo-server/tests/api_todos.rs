//! HTTP API tests
//!
//! Drives the fully layered router in-process with `tower::ServiceExt::oneshot`
//! against a fresh in-memory database per test.

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use todo_server::api::build_app;
use todo_server::{Config, ServerState};

async fn app() -> Router {
    let config = Config::for_tests();
    let state = ServerState::initialize(&config).await.unwrap();
    build_app(&state).with_state(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, title: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/api/todos", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

async fn listed(app: &Router, uri: &str) -> Vec<(i64, i64)> {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|t| (t["id"].as_i64().unwrap(), t["order"].as_i64().unwrap()))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_create_and_list_in_order() {
    let app = app().await;
    let a = create(&app, "A").await;
    let b = create(&app, "B").await;
    let c = create(&app, "C").await;

    assert_eq!(listed(&app, "/api/todos").await, vec![(a, 0), (b, 1), (c, 2)]);

    let (status, body) = send(&app, Method::GET, &format!("/api/todos/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "pending");
    assert_eq!(body["priority"], "medium");
}

#[tokio::test]
async fn test_batch_order_is_idempotent() {
    let app = app().await;
    let a = create(&app, "A").await;
    let b = create(&app, "B").await;
    let c = create(&app, "C").await;

    let batch = json!({ "updates": [
        { "id": b, "order": 0 },
        { "id": c, "order": 1 },
        { "id": a, "order": 2 },
    ]});

    let (status, body) = send(&app, Method::POST, "/api/todos/batch-order", Some(batch.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "updated": 3, "skipped": 0 }));
    let once = listed(&app, "/api/todos").await;

    send(&app, Method::POST, "/api/todos/batch-order", Some(batch)).await;
    let twice = listed(&app, "/api/todos").await;

    assert_eq!(once, vec![(b, 0), (c, 1), (a, 2)]);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_batch_order_skips_missing_ids() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/todos/batch-order",
        Some(json!({ "updates": [{ "id": 99, "order": 3 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "updated": 0, "skipped": 1 }));
    assert!(listed(&app, "/api/todos").await.is_empty());
}

#[tokio::test]
async fn test_batch_order_moves_partition_in_one_request() {
    let app = app().await;
    let w = create(&app, "W").await;
    let x = create(&app, "X").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/todos/batch-order",
        Some(json!({ "updates": [
            { "id": w, "order": 0 },
            { "id": x, "order": 0, "state": "completed" },
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(listed(&app, "/api/todos?state=pending").await, vec![(w, 0)]);
    assert_eq!(listed(&app, "/api/todos?state=completed").await, vec![(x, 0)]);
}

#[tokio::test]
async fn test_batch_order_rejects_duplicate_ids() {
    let app = app().await;
    let a = create(&app, "A").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/todos/batch-order",
        Some(json!({ "updates": [{ "id": a, "order": 0 }, { "id": a, "order": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_set_order_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/todos/42/order",
        Some(json!({ "order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_set_order_returns_updated_todo() {
    let app = app().await;
    let a = create(&app, "A").await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/todos/{a}/order"),
        Some(json!({ "order": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"], 7);
}

#[tokio::test]
async fn test_malformed_payload_is_validation_failure() {
    let app = app().await;
    let a = create(&app, "A").await;

    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/todos/{a}/order"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"order\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 2);

    // order is not editable through PUT
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{a}"),
        Some(json!({ "order": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_integer_order_is_invalid_operation() {
    let app = app().await;
    let a = create(&app, "A").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/todos/{a}/order"),
        Some(json!({ "order": "first" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 9);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/todos/batch-order",
        Some(json!({ "updates": [{ "id": a, "order": 1.5 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 9);

    // nothing was written
    let (_, body) = send(&app, Method::GET, &format!("/api/todos/{a}"), None).await;
    assert_eq!(body["order"], 0);
}

#[tokio::test]
async fn test_unknown_state_filter_is_enveloped() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/todos?state=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = send(&app, Method::GET, "/api/todos?state=completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_toggle_and_soft_delete() {
    let app = app().await;
    let a = create(&app, "A").await;
    let b = create(&app, "B").await;

    let (status, body) = send(&app, Method::PATCH, &format!("/api/todos/{a}/toggle"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "completed");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/todos/{b}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(true));

    assert_eq!(listed(&app, "/api/todos?state=pending").await, vec![]);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/todos/{b}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_update_validates_dates_against_stored_values() {
    let app = app().await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/todos",
        Some(json!({ "title": "trip", "start_date": 2000, "due_date": 3000 })),
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["has_due_date"], true);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{id}"),
        Some(json!({ "due_date": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/todos/{id}"),
        Some(json!({ "title": "road trip", "labels": ["travel"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "road trip");
    assert_eq!(body["labels"], json!(["travel"]));
}

#[tokio::test]
async fn test_create_requires_title() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/todos", Some(json!({ "title": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn test_labels_crud() {
    let app = app().await;

    let (status, home) = send(&app, Method::POST, "/api/labels", Some(json!({ "name": "home" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, again) = send(&app, Method::POST, "/api/labels", Some(json!({ "name": "home" }))).await;
    assert_eq!(home, again);

    send(&app, Method::POST, "/api/labels", Some(json!({ "name": "work" }))).await;

    let id = home["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/labels/{id}"),
        Some(json!({ "name": "work" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5002);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/labels/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::DELETE, &format!("/api/labels/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);
}

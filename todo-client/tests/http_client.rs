//! HTTP client against a real server on a loopback port

use std::sync::Arc;

use shared::models::{BatchOrderEntry, TodoCreate, TodoState, TodoUpdate};
use todo_client::{ClientConfig, ClientError, HttpClient, RefreshOutcome, SyncController};
use todo_server::api::build_app;
use todo_server::{Config, ServerState};

async fn spawn_server() -> HttpClient {
    let config = Config::for_tests();
    let state = ServerState::initialize(&config).await.unwrap();
    let app = build_app(&state).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ClientConfig::new(format!("http://{addr}"))
        .with_timeout(5)
        .build_http_client()
        .unwrap()
}

fn new_todo(title: &str) -> TodoCreate {
    TodoCreate {
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_todo_round_trip() {
    let client = spawn_server().await;

    let health = client.health().await.unwrap();
    assert_eq!(health["status"], "ok");

    let a = client.create_todo(&new_todo("a")).await.unwrap();
    let b = client.create_todo(&new_todo("b")).await.unwrap();
    assert!(a.order < b.order);

    let updated = client
        .update_todo(
            a.id,
            &TodoUpdate {
                description: Some("details".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("details"));
    assert_eq!(updated.order, a.order);

    let moved = client.set_todo_order(a.id, 10).await.unwrap();
    assert_eq!(moved.order, 10);
    let listed = client.list_todos(Some(TodoState::Pending)).await.unwrap();
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b.id, a.id]);

    let toggled = client.toggle_todo(b.id).await.unwrap();
    assert_eq!(toggled.state, TodoState::Completed);

    assert!(client.delete_todo(a.id).await.unwrap());
    let err = client.get_todo(a.id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn test_batch_skips_missing_ids() {
    let client = spawn_server().await;
    let a = client.create_todo(&new_todo("a")).await.unwrap();

    let result = client
        .batch_todo_order(&[BatchOrderEntry::new(a.id, 4), BatchOrderEntry::new(999, 3)])
        .await
        .unwrap();
    assert_eq!(result.updated, 1);
    assert_eq!(result.skipped, 1);

    let err = client
        .batch_todo_order(&[BatchOrderEntry::new(a.id, 1), BatchOrderEntry::new(a.id, 2)])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_set_order_on_missing_todo() {
    let client = spawn_server().await;
    let err = client.set_todo_order(42, 0).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_labels() {
    let client = spawn_server().await;

    let work = client.create_label("work").await.unwrap();
    let again = client.create_label("work").await.unwrap();
    assert_eq!(work, again);

    let home = client.create_label("home").await.unwrap();
    let err = client.rename_label(home.id, "work").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    assert!(client.delete_label(home.id).await.unwrap());
    assert_eq!(client.list_labels().await.unwrap(), vec![work]);
}

#[tokio::test]
async fn test_sync_controller_over_http() {
    let client = spawn_server().await;
    for title in ["a", "b", "c"] {
        client.create_todo(&new_todo(title)).await.unwrap();
    }

    let controller = SyncController::new(Arc::new(client));
    assert_eq!(controller.refresh().await, RefreshOutcome::Applied);
    let before: Vec<String> = controller.pending().into_iter().map(|t| t.title).collect();
    assert_eq!(before, vec!["a", "b", "c"]);

    controller
        .reorder_within_partition(TodoState::Pending, 0, 2)
        .await
        .unwrap();
    controller
        .move_across_partitions(TodoState::Pending, 0, 0)
        .await
        .unwrap();

    let pending: Vec<String> = controller.pending().into_iter().map(|t| t.title).collect();
    let completed: Vec<String> = controller.completed().into_iter().map(|t| t.title).collect();
    assert_eq!(pending, vec!["c", "a"]);
    assert_eq!(completed, vec!["b"]);

    // Store agrees with the view
    let stored = controller.store().list_todos(Some(TodoState::Pending)).await.unwrap();
    let stored: Vec<String> = stored.into_iter().map(|t| t.title).collect();
    assert_eq!(stored, pending);
    assert!(controller.take_notifications().is_empty());
}

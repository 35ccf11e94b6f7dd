//! Todo API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::api::{ApiJson, ApiQuery, OrderJson};
use crate::core::ServerState;
use crate::db::repository::{RepoError, todo};
use crate::utils::{AppError, AppResult};
use shared::models::{
    BatchOrderRequest, BatchOrderResponse, OrderUpdate, Todo, TodoCreate, TodoState, TodoUpdate,
    validate_date_range,
};

/// Map a repository miss to the todo-specific error code
fn repo_err(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => AppError::todo_not_found(id),
        other => other.into(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub state: Option<TodoState>,
}

/// GET /api/todos - active todos sorted by (order, id)
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = todo::find_active(&state.pool, query.state).await?;
    tracing::debug!(count = todos.len(), partition = ?query.state, "Listed todos");
    Ok(Json(todos))
}

/// GET /api/todos/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    let t = todo::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    Ok(Json(t))
}

/// POST /api/todos
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TodoCreate>,
) -> AppResult<Json<Todo>> {
    payload.validate()?;
    let t = todo::create(&state.pool, payload).await?;
    tracing::info!(id = t.id, order = t.order, state = %t.state, "Todo created");
    Ok(Json(t))
}

/// PUT /api/todos/{id} - partial update, order and state excluded
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<TodoUpdate>,
) -> AppResult<Json<Todo>> {
    payload.validate()?;

    let existing = todo::find_active_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    validate_date_range(
        payload.start_date.or(existing.start_date),
        payload.due_date.or(existing.due_date),
    )?;

    let t = todo::update(&state.pool, id, payload)
        .await
        .map_err(repo_err(id))?;
    tracing::info!(id, "Todo updated");
    Ok(Json(t))
}

/// PATCH /api/todos/{id}/order
pub async fn set_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    OrderJson(payload): OrderJson<OrderUpdate>,
) -> AppResult<Json<Todo>> {
    let t = todo::set_order(&state.pool, id, payload.order)
        .await
        .map_err(repo_err(id))?;
    tracing::debug!(id, order = payload.order, "Todo order set");
    Ok(Json(t))
}

/// POST /api/todos/batch-order - all or nothing, unknown ids skipped
pub async fn batch_order(
    State(state): State<ServerState>,
    OrderJson(payload): OrderJson<BatchOrderRequest>,
) -> AppResult<Json<BatchOrderResponse>> {
    payload.validate()?;
    let result = todo::batch_set_order(&state.pool, &payload.updates).await?;
    tracing::info!(
        count = payload.updates.len(),
        updated = result.updated,
        skipped = result.skipped,
        "Batch order applied"
    );
    Ok(Json(result))
}

/// PATCH /api/todos/{id}/toggle
pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Todo>> {
    let t = todo::toggle(&state.pool, id).await.map_err(repo_err(id))?;
    tracing::info!(id, state = %t.state, "Todo toggled");
    Ok(Json(t))
}

/// DELETE /api/todos/{id} - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    todo::soft_delete(&state.pool, id)
        .await
        .map_err(repo_err(id))?;
    tracing::info!(id, "Todo deleted");
    Ok(Json(true))
}

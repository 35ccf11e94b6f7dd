//! Label API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::db::repository::{RepoError, label};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Label, LabelInput};

fn repo_err(id: i64) -> impl FnOnce(RepoError) -> AppError {
    move |err| match err {
        RepoError::NotFound(_) => AppError::with_message(
            ErrorCode::LabelNotFound,
            format!("Label {} not found", id),
        ),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::LabelNameExists, msg),
        other => other.into(),
    }
}

/// GET /api/labels
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Label>>> {
    let labels = label::find_all(&state.pool).await?;
    Ok(Json(labels))
}

/// GET /api/labels/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Label>> {
    let l = label::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LabelNotFound))?;
    Ok(Json(l))
}

/// POST /api/labels - find-or-create by name
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<LabelInput>,
) -> AppResult<Json<Label>> {
    let l = label::create(&state.pool, &payload.name).await?;
    tracing::info!(id = l.id, name = %l.name, "Label saved");
    Ok(Json(l))
}

/// PUT /api/labels/{id} - rename
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<LabelInput>,
) -> AppResult<Json<Label>> {
    let l = label::rename(&state.pool, id, &payload.name)
        .await
        .map_err(repo_err(id))?;
    Ok(Json(l))
}

/// DELETE /api/labels/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let removed = label::delete(&state.pool, id).await.map_err(repo_err(id))?;
    tracing::info!(id, "Label deleted");
    Ok(Json(removed))
}

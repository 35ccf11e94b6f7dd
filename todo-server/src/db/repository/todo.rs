//! Todo Repository
//!
//! Every read returns active todos only, sorted by `(sort_order, id)`.
//! Order writes are absolute assignments and skip rows that are missing or
//! soft-deleted.

use super::label::{names_by_todo, names_for_todo, replace_todo_labels};
use super::{RepoError, RepoResult};
use shared::models::{
    BatchOrderEntry, BatchOrderResponse, Todo, TodoCreate, TodoState, TodoUpdate,
};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, description, state, priority, sort_order, active, start_date, due_date, has_due_date, created_by, updated_by, created_at, updated_at";

fn not_found(id: i64) -> RepoError {
    RepoError::NotFound(format!("Todo {id} not found"))
}

/// All active todos, optionally limited to one partition
pub async fn find_active(pool: &SqlitePool, state: Option<TodoState>) -> RepoResult<Vec<Todo>> {
    let mut todos = match state {
        Some(state) => {
            sqlx::query_as::<_, Todo>(&format!(
                "SELECT {COLUMNS} FROM todo WHERE active = 1 AND state = ? ORDER BY sort_order, id"
            ))
            .bind(state)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Todo>(&format!(
                "SELECT {COLUMNS} FROM todo WHERE active = 1 ORDER BY sort_order, id"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    let mut labels = names_by_todo(pool).await?;
    for todo in &mut todos {
        todo.labels = labels.remove(&todo.id).unwrap_or_default();
    }
    Ok(todos)
}

pub async fn find_active_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Todo>> {
    let todo = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {COLUMNS} FROM todo WHERE id = ? AND active = 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match todo {
        Some(mut todo) => {
            todo.labels = names_for_todo(pool, id).await?;
            Ok(Some(todo))
        }
        None => Ok(None),
    }
}

/// Insert a todo at the end of its partition
pub async fn create(pool: &SqlitePool, data: TodoCreate) -> RepoResult<Todo> {
    let now = shared::util::now_millis();
    let state = data.state.unwrap_or_default();
    let priority = data.priority.unwrap_or_default();
    let has_due_date = data.has_due_date.unwrap_or(data.due_date.is_some());

    let mut tx = pool.begin().await?;

    let next_order = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM todo WHERE state = ? AND active = 1",
    )
    .bind(state)
    .fetch_one(&mut *tx)
    .await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO todo (title, description, state, priority, sort_order, active, start_date, due_date, has_due_date, created_by, updated_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8, ?9, ?9, ?10, ?10) RETURNING id",
    )
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(state)
    .bind(priority)
    .bind(next_order)
    .bind(data.start_date)
    .bind(data.due_date)
    .bind(has_due_date)
    .bind(&data.created_by)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    replace_todo_labels(&mut tx, id, &data.labels).await?;

    tx.commit().await?;

    tracing::debug!(id, order = next_order, state = %state, "Todo created");

    find_active_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create todo".into()))
}

/// Partial update; order and state are left alone
pub async fn update(pool: &SqlitePool, id: i64, data: TodoUpdate) -> RepoResult<Todo> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE todo SET title = COALESCE(?1, title), description = COALESCE(?2, description), priority = COALESCE(?3, priority), \
         start_date = COALESCE(?4, start_date), due_date = COALESCE(?5, due_date), has_due_date = COALESCE(?6, has_due_date), \
         updated_by = COALESCE(?7, updated_by), updated_at = ?8 WHERE id = ?9 AND active = 1",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.priority)
    .bind(data.start_date)
    .bind(data.due_date)
    .bind(data.has_due_date)
    .bind(&data.updated_by)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    if let Some(ref labels) = data.labels {
        replace_todo_labels(&mut tx, id, labels).await?;
    }

    tx.commit().await?;

    find_active_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Set the order of one active todo
pub async fn set_order(pool: &SqlitePool, id: i64, order: i64) -> RepoResult<Todo> {
    let rows = sqlx::query(
        "UPDATE todo SET sort_order = ?, updated_at = ? WHERE id = ? AND active = 1",
    )
    .bind(order)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_active_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Apply a batch of order writes in one transaction
///
/// Orders are written first, then partition changes. Entries naming a
/// missing or inactive todo are skipped and counted.
pub async fn batch_set_order(
    pool: &SqlitePool,
    entries: &[BatchOrderEntry],
) -> RepoResult<BatchOrderResponse> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    let mut result = BatchOrderResponse::default();

    for entry in entries {
        let rows = sqlx::query(
            "UPDATE todo SET sort_order = ?, updated_at = ? WHERE id = ? AND active = 1",
        )
        .bind(entry.order)
        .bind(now)
        .bind(entry.id)
        .execute(&mut *tx)
        .await?;

        if rows.rows_affected() == 0 {
            tracing::debug!(id = entry.id, "Batch order entry skipped, no active todo");
            result.skipped += 1;
        } else {
            result.updated += 1;
        }
    }

    for entry in entries {
        if let Some(state) = entry.state {
            sqlx::query("UPDATE todo SET state = ?, updated_at = ? WHERE id = ? AND active = 1")
                .bind(state)
                .bind(now)
                .bind(entry.id)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(result)
}

/// Flip the state of one active todo
pub async fn toggle(pool: &SqlitePool, id: i64) -> RepoResult<Todo> {
    let rows = sqlx::query(
        "UPDATE todo SET state = CASE state WHEN 'pending' THEN 'completed' ELSE 'pending' END, updated_at = ? \
         WHERE id = ? AND active = 1",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_active_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Soft delete: the row stays, `active` goes to 0
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE todo SET active = 0, updated_at = ? WHERE id = ? AND active = 1")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

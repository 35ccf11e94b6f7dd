//! Order store abstraction
//!
//! The sync controller only needs these operations from persistence, so tests
//! can swap the HTTP client for an in-memory store.

use async_trait::async_trait;

use crate::{ClientResult, HttpClient};
use shared::models::{BatchOrderEntry, BatchOrderResponse, Todo, TodoMutation, TodoState};

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Active todos sorted by `(order, id)`, optionally one partition only
    async fn list_active(&self, state: Option<TodoState>) -> ClientResult<Vec<Todo>>;

    /// Fails with `NotFound` when no active todo has this id
    async fn set_order(&self, id: i64, order: i64) -> ClientResult<Todo>;

    /// Atomic; entries naming missing or inactive ids are skipped
    async fn batch_set_order(&self, updates: &[BatchOrderEntry])
    -> ClientResult<BatchOrderResponse>;

    async fn toggle(&self, id: i64) -> ClientResult<Todo>;

    async fn delete(&self, id: i64) -> ClientResult<()>;

    /// Validate and dispatch one mutation
    async fn apply(&self, mutation: &TodoMutation) -> ClientResult<()> {
        mutation.validate()?;
        tracing::debug!(kind = mutation.kind(), "Dispatching mutation");

        match mutation {
            TodoMutation::SetOrder { id, order } => {
                self.set_order(*id, *order).await?;
            }
            TodoMutation::BatchOrder { updates } => {
                let result = self.batch_set_order(updates).await?;
                if result.skipped > 0 {
                    tracing::debug!(
                        updated = result.updated,
                        skipped = result.skipped,
                        "Batch skipped inactive todos"
                    );
                }
            }
            TodoMutation::Toggle { id } => {
                self.toggle(*id).await?;
            }
            TodoMutation::Delete { id } => self.delete(*id).await?,
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for HttpClient {
    async fn list_active(&self, state: Option<TodoState>) -> ClientResult<Vec<Todo>> {
        self.list_todos(state).await
    }

    async fn set_order(&self, id: i64, order: i64) -> ClientResult<Todo> {
        self.set_todo_order(id, order).await
    }

    async fn batch_set_order(
        &self,
        updates: &[BatchOrderEntry],
    ) -> ClientResult<BatchOrderResponse> {
        self.batch_todo_order(updates).await
    }

    async fn toggle(&self, id: i64) -> ClientResult<Todo> {
        self.toggle_todo(id).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        self.delete_todo(id).await.map(|_| ())
    }
}

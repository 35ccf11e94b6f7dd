//! Sync controller

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as WriteGate;

use super::{RefreshOutcome, SyncError, SyncPhase, ViewState};
use crate::{ClientError, OrderStore};
use shared::models::{Todo, TodoMutation, TodoState};
use shared::reorder;

/// Keeps the local pending/completed lists in step with an [`OrderStore`].
///
/// Gestures update the view synchronously and then persist. Store writes go
/// out one at a time in gesture order, so a later renumbering is never
/// overwritten by an earlier one. The view lock is never held across a store
/// call.
pub struct SyncController<S> {
    store: Arc<S>,
    view: Mutex<ViewState>,
    writes: WriteGate<()>,
}

impl<S: OrderStore> SyncController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            view: Mutex::new(ViewState::default()),
            writes: WriteGate::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn pending(&self) -> Vec<Todo> {
        self.partition(TodoState::Pending)
    }

    pub fn completed(&self) -> Vec<Todo> {
        self.partition(TodoState::Completed)
    }

    pub fn partition(&self, state: TodoState) -> Vec<Todo> {
        self.view.lock().partition(state).to_vec()
    }

    pub fn phase(&self) -> SyncPhase {
        self.view.lock().phase()
    }

    pub fn is_shadowed(&self, id: i64) -> bool {
        self.view.lock().is_shadowed(id)
    }

    /// Drain failures not yet shown to the user
    pub fn take_notifications(&self) -> Vec<SyncError> {
        self.view.lock().take_notifications()
    }

    /// Fetch every active todo and merge it, unless the result is outdated
    /// by the time it arrives. Also the manual recovery path after a failed
    /// gesture.
    pub async fn refresh(&self) -> RefreshOutcome {
        let seq = self.view.lock().begin_fetch();
        tracing::debug!(seq, "Fetch started");

        let fetched = self
            .store
            .list_active(None)
            .await
            .map_err(|e| SyncError::new("refresh", &e));

        let outcome = self.view.lock().finish_fetch(seq, fetched);
        match outcome {
            RefreshOutcome::Applied => tracing::debug!(seq, "Fetch applied"),
            RefreshOutcome::Stale => tracing::warn!(seq, "Discarded stale fetch"),
            RefreshOutcome::Suppressed => {
                tracing::warn!(seq, "Discarded fetch overlapping a local reorder")
            }
            RefreshOutcome::Failed => tracing::error!(seq, "Fetch failed"),
        }
        outcome
    }

    /// Move the item at `from` to `to` inside one partition
    pub async fn reorder_within_partition(
        &self,
        partition: TodoState,
        from: usize,
        to: i64,
    ) -> Result<(), SyncError> {
        let updates = {
            let mut view = self.view.lock();
            let result = reorder::reorder_within_partition(view.partition(partition), from, to);
            match result {
                Ok(result) => {
                    view.set_partition(partition, result.items);
                    view.begin_write();
                    result.ops
                }
                Err(e) => {
                    let err = SyncError::new("reorder", &ClientError::from(e));
                    view.notify(err.clone());
                    return Err(err);
                }
            }
        };

        tracing::info!(%partition, from, to, writes = updates.len(), "Reordered partition");
        self.persist("reorder", TodoMutation::BatchOrder { updates })
            .await
    }

    /// Move the item at `from` in `source` to `to` in the other partition
    pub async fn move_across_partitions(
        &self,
        source: TodoState,
        from: usize,
        to: i64,
    ) -> Result<(), SyncError> {
        let dest = source.toggled();
        let updates = {
            let mut view = self.view.lock();
            let result = reorder::move_across_partitions(
                view.partition(source),
                view.partition(dest),
                from,
                to,
                dest,
            );
            match result {
                Ok(transfer) => {
                    let updates = transfer.batch_entries();
                    view.set_partition(source, transfer.source);
                    view.set_partition(dest, transfer.dest);
                    view.begin_write();
                    updates
                }
                Err(e) => {
                    let err = SyncError::new("move", &ClientError::from(e));
                    view.notify(err.clone());
                    return Err(err);
                }
            }
        };

        tracing::info!(%source, %dest, from, to, writes = updates.len(), "Moved across partitions");
        self.persist("move", TodoMutation::BatchOrder { updates })
            .await
    }

    /// Hide `id` at once and soft-delete it in the store. Neighbours are not
    /// renumbered.
    pub async fn delete_item(&self, id: i64) -> Result<(), SyncError> {
        {
            let mut view = self.view.lock();
            view.shadow(id);
            view.remove_local(id);
        }

        let result = {
            let _gate = self.writes.lock().await;
            self.store.apply(&TodoMutation::Delete { id }).await
        };

        match result {
            Ok(()) => {
                tracing::info!(id, "Todo deleted");
                Ok(())
            }
            Err(ClientError::NotFound(_)) => {
                tracing::debug!(id, "Todo already gone");
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Delete failed");
                let err = SyncError::new("delete", &e);
                let mut view = self.view.lock();
                view.unshadow(id);
                view.notify(err.clone());
                Err(err)
            }
        }
    }

    /// Flip the partition of `id`, keeping its stored order
    pub async fn toggle_item(&self, id: i64) -> Result<(), SyncError> {
        self.view.lock().begin_write();
        self.persist("toggle", TodoMutation::Toggle { id }).await
    }

    /// Dispatch a write registered with `begin_write`, after every earlier
    /// one. The last queued write to succeed triggers the refresh; on failure
    /// the optimistic view is kept and nothing is retried.
    async fn persist(
        &self,
        operation: &'static str,
        mutation: TodoMutation,
    ) -> Result<(), SyncError> {
        let result = {
            let _gate = self.writes.lock().await;
            self.store.apply(&mutation).await
        };
        let settled = self.view.lock().end_write();

        match result {
            Ok(()) => {
                if settled {
                    self.refresh().await;
                } else {
                    tracing::debug!(operation, "Refresh left to the last queued write");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(operation, error = %e, "Persist failed, keeping local view");
                let err = SyncError::new(operation, &e);
                self.view.lock().notify(err.clone());
                Err(err)
            }
        }
    }
}

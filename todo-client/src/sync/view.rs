//! Local view of the two partitions plus fetch bookkeeping

use std::collections::HashSet;

use shared::models::{Todo, TodoState};
use shared::reorder::split_partitions;

use super::SyncError;

/// Refresh cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Merged into the view
    Applied,
    /// A newer fetch was issued after this one
    Stale,
    /// A drag started while this fetch was outstanding
    Suppressed,
    /// The store call failed
    Failed,
}

#[derive(Debug, Default)]
pub struct ViewState {
    pending: Vec<Todo>,
    completed: Vec<Todo>,
    /// Ids deleted locally that a fetch may still report
    shadow: HashSet<i64>,
    latest_issued: u64,
    outstanding: usize,
    /// Fetches with a sequence number up to this one are dropped
    suppress_through: Option<u64>,
    /// Local writes queued or in flight
    pending_writes: usize,
    notifications: Vec<SyncError>,
}

impl ViewState {
    pub fn partition(&self, state: TodoState) -> &[Todo] {
        match state {
            TodoState::Pending => &self.pending,
            TodoState::Completed => &self.completed,
        }
    }

    pub fn set_partition(&mut self, state: TodoState, items: Vec<Todo>) {
        match state {
            TodoState::Pending => self.pending = items,
            TodoState::Completed => self.completed = items,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        if self.outstanding > 0 {
            SyncPhase::Fetching
        } else {
            SyncPhase::Idle
        }
    }

    pub fn is_shadowed(&self, id: i64) -> bool {
        self.shadow.contains(&id)
    }

    /// Register a new fetch and return its sequence number
    ///
    /// A fetch issued while local writes are pending may read the store
    /// before they land, so it is suppressed from the start.
    pub fn begin_fetch(&mut self) -> u64 {
        self.latest_issued += 1;
        self.outstanding += 1;
        if self.pending_writes > 0 {
            self.suppress_through = Some(self.latest_issued);
        }
        self.latest_issued
    }

    /// Register a local write; outstanding fetches are discarded
    pub fn begin_write(&mut self) {
        self.pending_writes += 1;
        self.suppress_in_flight();
    }

    /// Returns true once no other local write is pending
    pub fn end_write(&mut self) -> bool {
        self.pending_writes = self.pending_writes.saturating_sub(1);
        self.pending_writes == 0
    }

    /// Mark every outstanding fetch for discard
    pub fn suppress_in_flight(&mut self) {
        if self.outstanding > 0 {
            self.suppress_through = Some(self.latest_issued);
        }
    }

    /// Settle fetch `seq`. Failures are always reported, even for a fetch
    /// that would have been discarded.
    pub fn finish_fetch(
        &mut self,
        seq: u64,
        fetched: Result<Vec<Todo>, SyncError>,
    ) -> RefreshOutcome {
        self.outstanding = self.outstanding.saturating_sub(1);

        let suppressed = match self.suppress_through {
            Some(through) if seq <= through => {
                if seq == through {
                    self.suppress_through = None;
                }
                true
            }
            _ => false,
        };

        let items = match fetched {
            Ok(items) => items,
            Err(err) => {
                self.notify(err);
                return RefreshOutcome::Failed;
            }
        };

        if suppressed {
            return RefreshOutcome::Suppressed;
        }
        if seq < self.latest_issued {
            return RefreshOutcome::Stale;
        }

        self.merge(items);
        self.suppress_through = None;
        RefreshOutcome::Applied
    }

    /// Replace both partitions with `fetched`, hiding shadowed ids
    pub fn merge(&mut self, fetched: Vec<Todo>) {
        let present: HashSet<i64> = fetched.iter().map(|t| t.id).collect();
        let shadow = &self.shadow;
        let (pending, completed) =
            split_partitions(fetched.into_iter().filter(|t| !shadow.contains(&t.id)));

        self.pending = pending;
        self.completed = completed;
        self.shadow.retain(|id| present.contains(id));
    }

    /// Drop `id` from whichever partition holds it; the rest keep their order
    pub fn remove_local(&mut self, id: i64) -> bool {
        let before = self.pending.len() + self.completed.len();
        self.pending.retain(|t| t.id != id);
        self.completed.retain(|t| t.id != id);
        before != self.pending.len() + self.completed.len()
    }

    pub fn shadow(&mut self, id: i64) {
        self.shadow.insert(id);
    }

    pub fn unshadow(&mut self, id: i64) {
        self.shadow.remove(&id);
    }

    pub fn notify(&mut self, err: SyncError) {
        self.notifications.push(err);
    }

    pub fn take_notifications(&mut self) -> Vec<SyncError> {
        std::mem::take(&mut self.notifications)
    }
}

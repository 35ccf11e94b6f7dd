//! Reordering of partitioned todo lists
//!
//! Pure transforms used by the sync controller: given the current partition
//! contents and a drag gesture, produce the new partition contents plus the
//! order writes that make the store agree with them. Nothing here performs
//! I/O, so a failed transform leaves the caller's lists untouched.
//!
//! Every transform renumbers the whole affected partition to `0..len`, so
//! each emitted write is an absolute assignment and replaying it is harmless.

use thiserror::Error;

use crate::error::{AppError, ErrorCode};
use crate::models::{BatchOrderEntry, Todo, TodoState};

/// A gesture that cannot be applied to the current lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("cannot move an item out of an empty list")]
    EmptySource,
    #[error("index {from} is out of bounds for a list of {len} items")]
    IndexOutOfBounds { from: usize, len: usize },
}

impl From<ReorderError> for AppError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::EmptySource => AppError::invalid_operation(err.to_string()),
            ReorderError::IndexOutOfBounds { from, len } => {
                AppError::with_message(ErrorCode::TodoReorderOutOfBounds, err.to_string())
                    .with_detail("from", from)
                    .with_detail("len", len)
            }
        }
    }
}

/// Result of a move inside one partition
#[derive(Debug, Clone, PartialEq)]
pub struct Reordered {
    pub items: Vec<Todo>,
    pub ops: Vec<BatchOrderEntry>,
}

/// The partition transition of a cross-list move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionChange {
    pub id: i64,
    pub state: TodoState,
}

/// Result of a move between partitions
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub source: Vec<Todo>,
    pub dest: Vec<Todo>,
    /// Order writes for both lists, source first
    pub ops: Vec<BatchOrderEntry>,
    pub partition_change: PartitionChange,
}

impl Transfer {
    /// Order writes with the partition change folded into the moved item's
    /// entry, ready to commit as a single batch.
    pub fn batch_entries(&self) -> Vec<BatchOrderEntry> {
        self.ops
            .iter()
            .map(|op| {
                if op.id == self.partition_change.id {
                    BatchOrderEntry {
                        state: Some(self.partition_change.state),
                        ..*op
                    }
                } else {
                    *op
                }
            })
            .collect()
    }
}

/// Move the item at `from` to position `to` within the same list.
///
/// `to` past the end appends; negative `to` inserts at the front.
pub fn reorder_within_partition(
    list: &[Todo],
    from: usize,
    to: i64,
) -> Result<Reordered, ReorderError> {
    check_source(list, from)?;

    let mut items = list.to_vec();
    let moved = items.remove(from);
    let at = clamp_index(to, items.len());
    items.insert(at, moved);

    let ops = renumber(&mut items);
    Ok(Reordered { items, ops })
}

/// Move the item at `from` in `source` to position `to` in `dest`, switching
/// it to `new_state`.
pub fn move_across_partitions(
    source: &[Todo],
    dest: &[Todo],
    from: usize,
    to: i64,
    new_state: TodoState,
) -> Result<Transfer, ReorderError> {
    check_source(source, from)?;

    let mut source = source.to_vec();
    let mut dest = dest.to_vec();

    let mut moved = source.remove(from);
    moved.state = new_state;
    let partition_change = PartitionChange {
        id: moved.id,
        state: new_state,
    };

    let at = clamp_index(to, dest.len());
    dest.insert(at, moved);

    let mut ops = renumber(&mut source);
    ops.extend(renumber(&mut dest));

    Ok(Transfer {
        source,
        dest,
        ops,
        partition_change,
    })
}

/// Display ordering: `order` ascending, then `id` ascending
pub fn sort_by_position(items: &mut [Todo]) {
    items.sort_by_key(|t| (t.order, t.id));
}

/// Split active todos into sorted `(pending, completed)` lists
pub fn split_partitions(items: impl IntoIterator<Item = Todo>) -> (Vec<Todo>, Vec<Todo>) {
    let (mut pending, mut completed): (Vec<_>, Vec<_>) = items
        .into_iter()
        .filter(|t| t.active)
        .partition(|t| t.state == TodoState::Pending);
    sort_by_position(&mut pending);
    sort_by_position(&mut completed);
    (pending, completed)
}

fn check_source(list: &[Todo], from: usize) -> Result<(), ReorderError> {
    if list.is_empty() {
        return Err(ReorderError::EmptySource);
    }
    if from >= list.len() {
        return Err(ReorderError::IndexOutOfBounds {
            from,
            len: list.len(),
        });
    }
    Ok(())
}

/// Insertion point for a list of `len` items
fn clamp_index(to: i64, len: usize) -> usize {
    usize::try_from(to).map_or(0, |to| to.min(len))
}

fn renumber(items: &mut [Todo]) -> Vec<BatchOrderEntry> {
    items
        .iter_mut()
        .enumerate()
        .map(|(position, item)| {
            item.order = position as i64;
            BatchOrderEntry::new(item.id, item.order)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, order: i64, state: TodoState) -> Todo {
        Todo {
            id,
            title: format!("todo {}", id),
            description: None,
            state,
            priority: Default::default(),
            order,
            active: true,
            start_date: None,
            due_date: None,
            has_due_date: false,
            created_by: None,
            updated_by: None,
            created_at: 0,
            updated_at: 0,
            labels: Vec::new(),
        }
    }

    fn pending(ids: &[i64]) -> Vec<Todo> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| todo(*id, i as i64, TodoState::Pending))
            .collect()
    }

    fn ids(items: &[Todo]) -> Vec<i64> {
        items.iter().map(|t| t.id).collect()
    }

    fn assert_dense(items: &[Todo]) {
        for (i, t) in items.iter().enumerate() {
            assert_eq!(t.order, i as i64, "todo {} at position {}", t.id, i);
        }
    }

    #[test]
    fn test_move_first_to_last() {
        // A=1, B=2, C=3
        let list = pending(&[1, 2, 3]);
        let out = reorder_within_partition(&list, 0, 2).unwrap();

        assert_eq!(ids(&out.items), vec![2, 3, 1]);
        assert_dense(&out.items);
        assert_eq!(
            out.ops,
            vec![
                BatchOrderEntry::new(2, 0),
                BatchOrderEntry::new(3, 1),
                BatchOrderEntry::new(1, 2),
            ]
        );
        // input untouched
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[test]
    fn test_same_position_still_renumbers() {
        let mut list = pending(&[1, 2, 3]);
        list[0].order = 10;
        list[1].order = 20;
        list[2].order = 30;

        let out = reorder_within_partition(&list, 1, 1).unwrap();
        assert_eq!(ids(&out.items), vec![1, 2, 3]);
        assert_dense(&out.items);
        assert_eq!(out.ops.len(), 3);
    }

    #[test]
    fn test_target_is_clamped() {
        let list = pending(&[1, 2, 3, 4]);

        let out = reorder_within_partition(&list, 1, 99).unwrap();
        assert_eq!(ids(&out.items), vec![1, 3, 4, 2]);

        let out = reorder_within_partition(&list, 2, -5).unwrap();
        assert_eq!(ids(&out.items), vec![3, 1, 2, 4]);
        assert_dense(&out.items);
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        assert_eq!(
            reorder_within_partition(&[], 0, 0).unwrap_err(),
            ReorderError::EmptySource
        );
        assert_eq!(
            reorder_within_partition(&pending(&[1, 2]), 2, 0).unwrap_err(),
            ReorderError::IndexOutOfBounds { from: 2, len: 2 }
        );

        let err: AppError = ReorderError::EmptySource.into();
        assert_eq!(err.code, ErrorCode::InvalidOperation);
    }

    #[test]
    fn test_result_is_permutation_with_moved_item_at_target() {
        let list = pending(&[10, 20, 30, 40, 50]);
        for from in 0..list.len() {
            for to in -1..=6i64 {
                let out = reorder_within_partition(&list, from, to).unwrap();

                let mut sorted = ids(&out.items);
                sorted.sort();
                assert_eq!(sorted, ids(&list));

                let expected_at = to.clamp(0, list.len() as i64 - 1) as usize;
                assert_eq!(out.items[expected_at].id, list[from].id);
                assert_dense(&out.items);
                assert_eq!(out.ops.len(), list.len());
            }
        }
    }

    #[test]
    fn test_move_to_completed_front() {
        // pending [W, X], completed [Y]; drag X to completed index 0
        let source = pending(&[7, 8]);
        let dest = vec![todo(9, 0, TodoState::Completed)];

        let out = move_across_partitions(&source, &dest, 1, 0, TodoState::Completed).unwrap();

        assert_eq!(ids(&out.source), vec![7]);
        assert_eq!(ids(&out.dest), vec![8, 9]);
        assert_dense(&out.dest);
        assert_eq!(out.dest[0].state, TodoState::Completed);
        assert_eq!(
            out.partition_change,
            PartitionChange {
                id: 8,
                state: TodoState::Completed
            }
        );
        assert_eq!(
            out.ops,
            vec![
                BatchOrderEntry::new(7, 0),
                BatchOrderEntry::new(8, 0),
                BatchOrderEntry::new(9, 1),
            ]
        );
    }

    #[test]
    fn test_transfer_batch_carries_state_once() {
        let source = pending(&[1, 2, 3]);
        let out = move_across_partitions(&source, &[], 0, 5, TodoState::Completed).unwrap();

        assert_eq!(ids(&out.dest), vec![1]);
        assert!(!out.source.iter().any(|t| t.id == 1));

        let batch = out.batch_entries();
        let with_state: Vec<_> = batch.iter().filter(|e| e.state.is_some()).collect();
        assert_eq!(with_state.len(), 1);
        assert_eq!(with_state[0].id, 1);
        assert_eq!(with_state[0].state, Some(TodoState::Completed));

        let mut seen: Vec<_> = batch.iter().map(|e| e.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), batch.len());
    }

    #[test]
    fn test_transfer_from_empty_source_fails() {
        let dest = pending(&[1]);
        let err = move_across_partitions(&[], &dest, 0, 0, TodoState::Completed).unwrap_err();
        assert_eq!(err, ReorderError::EmptySource);
    }

    #[test]
    fn test_split_partitions_sorts_and_filters() {
        let a = todo(3, 1, TodoState::Pending);
        let b = todo(1, 1, TodoState::Pending);
        let c = todo(2, 0, TodoState::Completed);
        let mut gone = todo(4, 0, TodoState::Pending);
        gone.active = false;

        let (pending, completed) = split_partitions(vec![a, gone, c, b]);
        // equal order falls back to id
        assert_eq!(ids(&pending), vec![1, 3]);
        assert_eq!(ids(&completed), vec![2]);
    }
}

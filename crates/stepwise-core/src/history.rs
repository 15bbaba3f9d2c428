//! Bounded undo/redo history of plan snapshots.
//!
//! The ledger is a sliding window of full snapshots with a cursor pointing at
//! the current one. Pushing after an undo discards the redo branch; pushing
//! past capacity silently evicts the oldest snapshots. Undo and redo only move
//! the cursor and never alter the stored snapshots.

use std::collections::VecDeque;

use log::trace;

/// Number of snapshots the ledger retains.
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded, append-only log of snapshots with a movable cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLedger<T> {
    entries: VecDeque<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T: Clone> HistoryLedger<T> {
    /// Creates an empty ledger holding at most [`HISTORY_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Creates an empty ledger with a custom capacity (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Records a new snapshot and makes it current.
    ///
    /// Everything after the cursor is dropped first, then the window is
    /// trimmed from the front to the capacity.
    pub fn push(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        let overflow = self.entries.len().saturating_sub(self.capacity);
        if overflow > 0 {
            trace!("history: evicting {overflow} oldest snapshot(s)");
            self.entries.drain(..overflow);
        }

        self.cursor = Some(self.entries.len() - 1);
    }

    /// Moves the cursor one step back and returns the snapshot there.
    ///
    /// At the oldest entry (or when empty) this is a no-op that returns the
    /// current snapshot unchanged.
    pub fn undo(&mut self) -> Option<&T> {
        if let Some(cursor) = self.cursor.filter(|cursor| *cursor > 0) {
            self.cursor = Some(cursor - 1);
        }
        self.current()
    }

    /// Moves the cursor one step forward and returns the snapshot there.
    ///
    /// At the newest entry (or when empty) this is a no-op.
    pub fn redo(&mut self) -> Option<&T> {
        if self.can_redo() {
            self.cursor = self.cursor.map(|cursor| cursor + 1);
        }
        self.current()
    }

    /// Snapshot under the cursor, if any.
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|cursor| self.entries.get(cursor))
    }

    /// Whether an older snapshot is available.
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    /// Whether a newer snapshot is available.
    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|cursor| cursor + 1 < self.entries.len())
    }

    /// Index of the current snapshot; `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no snapshot has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained snapshots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates retained snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> Default for HistoryLedger<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(values: impl IntoIterator<Item = u32>) -> HistoryLedger<u32> {
        let mut ledger = HistoryLedger::new();
        for value in values {
            ledger.push(value);
        }
        ledger
    }

    #[test]
    fn test_empty_ledger() {
        let mut ledger: HistoryLedger<u32> = HistoryLedger::new();

        assert!(ledger.is_empty());
        assert_eq!(ledger.cursor(), None);
        assert!(!ledger.can_undo());
        assert!(!ledger.can_redo());
        assert_eq!(ledger.undo(), None);
        assert_eq!(ledger.redo(), None);
        assert_eq!(ledger.cursor(), None);
    }

    #[test]
    fn test_push_moves_cursor_to_end() {
        let ledger = ledger_with([1, 2, 3]);

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.cursor(), Some(2));
        assert_eq!(ledger.current(), Some(&3));
        assert!(ledger.can_undo());
        assert!(!ledger.can_redo());
    }

    #[test]
    fn test_single_entry_cannot_undo() {
        let mut ledger = ledger_with([7]);

        assert!(!ledger.can_undo());
        assert_eq!(ledger.undo(), Some(&7));
        assert_eq!(ledger.cursor(), Some(0));
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut ledger = ledger_with([1, 2, 3]);

        assert_eq!(ledger.undo(), Some(&2));
        assert_eq!(ledger.undo(), Some(&1));
        assert_eq!(ledger.undo(), Some(&1));
        assert!(!ledger.can_undo());
        assert!(ledger.can_redo());

        assert_eq!(ledger.redo(), Some(&2));
        assert_eq!(ledger.redo(), Some(&3));
        assert_eq!(ledger.redo(), Some(&3));
        assert!(!ledger.can_redo());

        // Undo/redo never change the stored entries.
        assert_eq!(ledger.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_push_after_undo_prunes_redo_branch() {
        let mut ledger = ledger_with([1, 2, 3]);
        ledger.undo();
        ledger.undo();

        ledger.push(9);

        assert_eq!(ledger.iter().copied().collect::<Vec<_>>(), [1, 9]);
        assert_eq!(ledger.cursor(), Some(1));
        assert!(!ledger.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut ledger = ledger_with(0..25);

        assert_eq!(ledger.len(), HISTORY_CAPACITY);
        assert_eq!(ledger.cursor(), Some(HISTORY_CAPACITY - 1));
        assert_eq!(ledger.iter().next(), Some(&5));
        assert_eq!(ledger.current(), Some(&24));

        for _ in 0..30 {
            ledger.undo();
        }
        assert_eq!(ledger.current(), Some(&5));
        assert_eq!(ledger.cursor(), Some(0));
    }

    #[test]
    fn test_eviction_after_undo_keeps_window_consistent() {
        let mut ledger = HistoryLedger::with_capacity(3);
        for value in [1, 2, 3] {
            ledger.push(value);
        }
        ledger.undo();

        ledger.push(4);
        assert_eq!(ledger.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);

        ledger.push(5);
        assert_eq!(ledger.iter().copied().collect::<Vec<_>>(), [2, 4, 5]);
        assert_eq!(ledger.cursor(), Some(2));
        assert_eq!(ledger.current(), Some(&5));
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut ledger = HistoryLedger::with_capacity(0);
        ledger.push(1);
        ledger.push(2);

        assert_eq!(ledger.capacity(), 1);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.current(), Some(&2));
    }
}

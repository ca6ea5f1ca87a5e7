//! # Undo/Redo History
//!
//! Linear, bounded history of whole-document snapshots.
//!
//! ## Design
//!
//! - Each mutating action pushes a snapshot of the page and group index taken
//!   *before* it mutates
//! - A push after an undo drops every redo entry (no branching)
//! - Beyond the bound, the oldest snapshot is evicted first
//! - Undoing from the newest position first records the live state, so redo
//!   can return to it
//!
//! Snapshots are full deep copies; undo/redo cost is proportional to the
//! document size.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::DEFAULT_MAX_HISTORY;
use crate::page::groups::GroupIndex;
use crate::page::model::Page;

/// Smallest bound that still allows one undo step.
const MIN_HISTORY: usize = 2;

/// Page plus group index captured at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub page: Page,
    pub groups: GroupIndex,
    /// Name of the action that was about to run when this was captured.
    pub label: &'static str,
}

impl HistoryEntry {
    /// Deep-copies the live state.
    pub fn capture(page: &Page, groups: &GroupIndex, label: &'static str) -> Self {
        Self {
            page: page.clone(),
            groups: groups.clone(),
            label,
        }
    }
}

/// Bounded snapshot stack with a cursor.
///
/// `cursor` is the index of the snapshot equal to the live state; it equals
/// `entries.len()` when the live state is newer than every snapshot.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    max_entries: usize,
}

impl History {
    /// Creates a history with the default bound (50).
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_HISTORY)
    }

    /// Creates a history with a custom bound (at least 2).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_entries: max_entries.max(MIN_HISTORY),
        }
    }

    /// Records a snapshot taken before a mutation.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        self.evict_overflow();
        self.cursor = self.entries.len();
        trace!(cursor = self.cursor, len = self.entries.len(), "history push");
    }

    /// Steps back one snapshot.
    ///
    /// `live` is only called when undoing from the newest position, to keep the
    /// current state reachable by redo.
    pub fn undo(&mut self, live: impl FnOnce() -> HistoryEntry) -> Option<HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        if self.cursor == self.entries.len() {
            self.entries.push_back(live());
            self.evict_overflow();
            self.cursor = self.entries.len() - 1;
        }
        self.cursor -= 1;
        trace!(cursor = self.cursor, "history undo");
        self.entries.get(self.cursor).cloned()
    }

    /// Steps forward one snapshot.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        trace!(cursor = self.cursor, "history redo");
        self.entries.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Label of the action the next undo would revert.
    pub fn undo_label(&self) -> Option<&'static str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.cursor - 1).map(|e| e.label)
    }

    /// Label of the action the next redo would re-apply.
    pub fn redo_label(&self) -> Option<&'static str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.cursor).map(|e| e.label)
    }

    /// Number of snapshots held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    fn evict_overflow(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> HistoryEntry {
        HistoryEntry::capture(&Page::new(title), &GroupIndex::new(), "edit")
    }

    fn title(entry: Option<HistoryEntry>) -> String {
        entry.expect("expected a snapshot").page.title
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.len(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.max_entries(), 50);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new();
        history.push(entry("D0"));
        // live state is now D1

        assert_eq!(title(history.undo(|| entry("D1"))), "D0");
        assert!(history.can_redo());
        assert_eq!(title(history.redo()), "D1");
        assert!(!history.can_redo());
        assert_eq!(title(history.undo(|| panic!("not at tip"))), "D0");
    }

    #[test]
    fn test_multi_step_walk() {
        let mut history = History::new();
        history.push(entry("D0"));
        history.push(entry("D1"));
        // live state is D2

        assert_eq!(title(history.undo(|| entry("D2"))), "D1");
        assert_eq!(title(history.undo(|| unreachable!())), "D0");
        assert!(history.undo(|| unreachable!()).is_none());
        assert_eq!(title(history.redo()), "D1");
        assert_eq!(title(history.redo()), "D2");
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_new_push_clears_redo() {
        let mut history = History::new();
        history.push(entry("D0"));
        history.undo(|| entry("D1"));
        assert!(history.can_redo());

        history.push(entry("D0"));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = History::with_max_entries(3);
        for i in 0..10 {
            history.push(entry(&format!("D{}", i)));
            assert!(history.len() <= 3);
        }
        // live state is D10

        assert_eq!(title(history.undo(|| entry("D10"))), "D9");
        assert!(history.len() <= 3);
        assert_eq!(title(history.undo(|| unreachable!())), "D8");
        assert!(history.undo(|| unreachable!()).is_none());
        assert_eq!(title(history.redo()), "D9");
        assert_eq!(title(history.redo()), "D10");
    }

    #[test]
    fn test_minimum_bound() {
        let mut history = History::with_max_entries(0);
        assert_eq!(history.max_entries(), 2);
        history.push(entry("D0"));
        assert_eq!(title(history.undo(|| entry("D1"))), "D0");
        assert_eq!(title(history.redo()), "D1");
    }

    #[test]
    fn test_labels() {
        let mut history = History::new();
        history.push(HistoryEntry::capture(&Page::new("D0"), &GroupIndex::new(), "add_section"));
        assert_eq!(history.undo_label(), Some("add_section"));
        assert_eq!(history.redo_label(), None);

        history.undo(|| entry("D1"));
        assert_eq!(history.undo_label(), None);
        assert_eq!(history.redo_label(), Some("add_section"));
    }
}

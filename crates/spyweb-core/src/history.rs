//! Session-scoped undo/redo stacks of store edits.

use std::collections::VecDeque;

use spyweb_protocols::{HistoryEntry, MaskRecord};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo/redo log. When the undo stack is full the oldest entry is
/// dropped.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    limit: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a fresh add. Clears the redo stack.
    pub fn push_add(&mut self, domain: &str, record: MaskRecord) {
        self.record(HistoryEntry::add(domain, record));
    }

    /// Record an in-place update. Clears the redo stack.
    pub fn push_update(&mut self, domain: &str, record: MaskRecord, previous: MaskRecord) {
        self.record(HistoryEntry::update(domain, record, previous));
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.push_undo(entry);
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(entry);
    }

    pub fn pop_undo(&mut self) -> Option<HistoryEntry> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<HistoryEntry> {
        self.redo.pop()
    }

    /// Move an undone entry onto the redo stack.
    pub fn push_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    /// Put a redone entry back on the undo stack, keeping the redo stack.
    pub fn push_redone(&mut self, entry: HistoryEntry) {
        self.push_undo(entry);
    }

    /// Return a popped undo entry whose replay failed.
    pub fn restore_undo(&mut self, entry: HistoryEntry) {
        self.undo.push_back(entry);
    }

    /// Return a popped redo entry whose replay failed.
    pub fn restore_redo(&mut self, entry: HistoryEntry) {
        self.redo.push(entry);
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

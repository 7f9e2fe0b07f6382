//! Undoable store mutations.

use super::record::MaskRecord;

/// Which store mutation an entry reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Add,
    Update,
}

/// One undo/redo log entry. Session-scoped, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub record: MaskRecord,
    pub previous_record: Option<MaskRecord>,
    pub domain: String,
}

impl HistoryEntry {
    /// Entry for a fresh insert.
    pub fn add(domain: impl Into<String>, record: MaskRecord) -> Self {
        Self {
            kind: HistoryKind::Add,
            record,
            previous_record: None,
            domain: domain.into(),
        }
    }

    /// Entry for an in-place replacement of `previous`.
    pub fn update(domain: impl Into<String>, record: MaskRecord, previous: MaskRecord) -> Self {
        Self {
            kind: HistoryKind::Update,
            record,
            previous_record: Some(previous),
            domain: domain.into(),
        }
    }
}

//! Per-page session state.

use spyweb_dom::NodeId;
use spyweb_protocols::{MaskRecord, MaskSettings, UndoRedoState};

use crate::history::EditHistory;

/// Everything one page context owns. Replaced wholesale on navigation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Hostname records are created under.
    pub domain: String,
    pub inspecting: bool,
    /// Recipe for masks created by the next clicks.
    pub settings: MaskSettings,
    pub history: EditHistory,
    /// Records applicable to this page, as last loaded.
    pub records: Vec<MaskRecord>,
    /// Element under the highlight overlay.
    pub highlighted: Option<NodeId>,
}

impl SessionContext {
    pub fn new(domain: impl Into<String>, settings: MaskSettings, history_limit: usize) -> Self {
        Self {
            domain: domain.into(),
            inspecting: false,
            settings,
            history: EditHistory::new(history_limit),
            records: Vec::new(),
            highlighted: None,
        }
    }

    /// Start over on a new page. Settings survive.
    pub fn reset_for(&mut self, domain: impl Into<String>) {
        let limit = self.history.limit();
        self.domain = domain.into();
        self.inspecting = false;
        self.history = EditHistory::new(limit);
        self.records.clear();
        self.highlighted = None;
    }

    pub fn undo_redo_state(&self, success: bool) -> UndoRedoState {
        UndoRedoState {
            success,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
}

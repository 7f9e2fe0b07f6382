//! Inbound commands and their responses.
//!
//! Commands arrive as JSON objects tagged by `action`, e.g.
//! `{"action": "startInspection", "settings": {...}}`.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::types::MaskSettings;

/// A request from the settings UI to the page session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Enter inspection mode, optionally replacing the live settings.
    StartInspection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settings: Option<MaskSettings>,
    },
    /// Leave inspection mode.
    StopInspection,
    /// Report whether inspection mode is active.
    GetInspectionState,
    /// Reload the store and rebuild every mask on the page.
    RefreshMasks,
    /// Replace the live settings used for subsequent clicks.
    UpdateSettings { settings: MaskSettings },
    /// Undo the latest masking edit.
    Undo,
    /// Redo the latest undone edit.
    Redo,
    /// Report undo/redo availability.
    GetUndoRedoState,
    /// Clear the current domain's records, or all records when `all` is set.
    ClearMasks {
        #[serde(default)]
        all: bool,
    },
}

impl Command {
    /// Parse a command from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("action").and_then(|a| a.as_str()).is_none() {
            return Err(ProtocolError::InvalidCommand(
                "missing string field 'action'".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// The wire name of this command.
    pub fn action(&self) -> &'static str {
        match self {
            Command::StartInspection { .. } => "startInspection",
            Command::StopInspection => "stopInspection",
            Command::GetInspectionState => "getInspectionState",
            Command::RefreshMasks => "refreshMasks",
            Command::UpdateSettings { .. } => "updateSettings",
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::GetUndoRedoState => "getUndoRedoState",
            Command::ClearMasks { .. } => "clearMasks",
        }
    }
}

/// Undo/redo outcome and availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRedoState {
    pub success: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// The reply to a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    UndoRedo(UndoRedoState),
    Inspection { inspecting: bool },
    Ack { success: bool },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ack { success: true }
    }

    pub fn failed() -> Self {
        Response::Ack { success: false }
    }

    /// Whether the command took effect.
    pub fn is_success(&self) -> bool {
        match self {
            Response::UndoRedo(state) => state.success,
            Response::Inspection { .. } => true,
            Response::Ack { success } => *success,
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

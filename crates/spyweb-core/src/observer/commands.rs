//! Inbound command handling and history replay.

use spyweb_protocols::{Command, HistoryEntry, HistoryKind, Response, UndoRedoState};
use spyweb_store::StoreError;
use tracing::{debug, info, warn};

use super::PageObserver;
use crate::error::ObserverError;

impl PageObserver {
    /// Answer one command from the UI layer. Failures are reported in the
    /// response, never as errors.
    pub async fn handle_command(&mut self, command: Command) -> Response {
        debug!(action = command.action(), "Handling command");
        match command {
            Command::StartInspection { settings } => {
                if let Some(settings) = settings {
                    self.session.settings = settings;
                }
                self.session.inspecting = true;
                Response::ok()
            }
            Command::StopInspection => {
                self.session.inspecting = false;
                self.hide_highlight();
                self.doc.take_mutations();
                Response::ok()
            }
            Command::GetInspectionState => Response::Inspection {
                inspecting: self.session.inspecting,
            },
            Command::RefreshMasks => match self.refresh().await {
                Ok(_) => Response::ok(),
                Err(e) => {
                    warn!(error = %e, "Refresh failed");
                    Response::failed()
                }
            },
            Command::UpdateSettings { settings } => {
                self.session.settings = settings;
                Response::ok()
            }
            Command::Undo => Response::UndoRedo(self.undo().await),
            Command::Redo => Response::UndoRedo(self.redo().await),
            Command::GetUndoRedoState => Response::UndoRedo(self.session.undo_redo_state(true)),
            Command::ClearMasks { all } => match self.clear(all).await {
                Ok(_) => Response::ok(),
                Err(e) => {
                    warn!(error = %e, "Clear failed");
                    Response::failed()
                }
            },
        }
    }

    /// Reload the store and rebuild every mask.
    ///
    /// If the stored records differ from the ones this session last saw,
    /// they were edited elsewhere and both history stacks are cleared.
    pub async fn refresh(&mut self) -> Result<usize, ObserverError> {
        let before = self.session.records.clone();
        let applied = self.rerender().await;
        if applied.is_ok() && self.session.records != before {
            debug!("Records changed outside this session, clearing history");
            self.session.history.clear();
        }
        applied
    }

    /// Remove the current domain's records, or every record when `all`.
    pub async fn clear(&mut self, all: bool) -> Result<usize, ObserverError> {
        let removed = if all {
            self.masks.clear_all().await?
        } else {
            self.masks.clear_domain(&self.session.domain).await?
        };
        self.session.history.clear();
        self.rerender().await?;
        info!(removed, all, "Masks cleared");
        Ok(removed)
    }

    /// Revert the most recent edit.
    pub async fn undo(&mut self) -> UndoRedoState {
        let Some(entry) = self.session.history.pop_undo() else {
            return self.session.undo_redo_state(false);
        };
        match self.revert(&entry).await {
            Ok(()) => {
                debug!(selector = %entry.record.selector, kind = ?entry.kind, "Undone");
                self.session.history.push_redo(entry);
                self.rerender_after_replay().await;
                self.session.undo_redo_state(true)
            }
            Err(e) => {
                warn!(error = %e, "Undo failed");
                self.session.history.restore_undo(entry);
                self.session.undo_redo_state(false)
            }
        }
    }

    /// Re-apply the most recently undone edit.
    pub async fn redo(&mut self) -> UndoRedoState {
        let Some(entry) = self.session.history.pop_redo() else {
            return self.session.undo_redo_state(false);
        };
        match self.replay(&entry).await {
            Ok(()) => {
                debug!(selector = %entry.record.selector, kind = ?entry.kind, "Redone");
                self.session.history.push_redone(entry);
                self.rerender_after_replay().await;
                self.session.undo_redo_state(true)
            }
            Err(e) => {
                warn!(error = %e, "Redo failed");
                self.session.history.restore_redo(entry);
                self.session.undo_redo_state(false)
            }
        }
    }

    async fn revert(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        match (&entry.kind, &entry.previous_record) {
            (HistoryKind::Update, Some(previous)) => {
                self.masks
                    .update(&entry.domain, &previous.selector, previous.clone())
                    .await?;
            }
            _ => {
                self.masks
                    .remove(&entry.domain, &entry.record.selector)
                    .await?;
            }
        }
        Ok(())
    }

    async fn replay(&self, entry: &HistoryEntry) -> Result<(), StoreError> {
        match entry.kind {
            HistoryKind::Add => {
                self.masks.add(&entry.domain, entry.record.clone()).await?;
            }
            HistoryKind::Update => {
                self.masks
                    .update(&entry.domain, &entry.record.selector, entry.record.clone())
                    .await?;
            }
        }
        Ok(())
    }

    async fn rerender_after_replay(&mut self) {
        if let Err(e) = self.rerender().await {
            warn!(error = %e, "Failed to re-render masks");
        }
    }
}

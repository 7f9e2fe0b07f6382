//! # SpyWeb Protocols
//!
//! Shared data model for the SpyWeb masking engine.
//! Contains only data definitions - no DOM access and no storage.
//!
//! ## Core Types
//!
//! - [`MaskSpec`] - Visual recipe for one mask
//! - [`MaskSettings`] - Live recipe plus default scope, as persisted
//! - [`MaskRecord`] - One persisted masking decision
//! - [`HistoryEntry`] - One undoable store mutation
//! - [`Command`] / [`Response`] - Inbound request/response contract

pub mod command;
pub mod error;
pub mod types;

pub use command::{Command, Response, UndoRedoState};
pub use error::ProtocolError;
pub use types::*;

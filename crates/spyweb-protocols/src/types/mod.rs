//! Data model types.

mod history;
mod record;
mod spec;

pub use history::{HistoryEntry, HistoryKind};
pub use record::{ElementKind, MaskRecord, StyleSnapshot, TargetKind};
pub use spec::{DEFAULT_MASK_COLOR, DEFAULT_MASK_TEXT, MaskSettings, MaskSpec, Scope, VisualMode};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

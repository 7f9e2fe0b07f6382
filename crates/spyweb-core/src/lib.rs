//! # SpyWeb Core
//!
//! Element masking for live pages.
//!
//! ## Components
//!
//! - [`resolve`] - Pick the element a pointer target really stands for
//! - [`synthesize`] - Build a stable CSS selector for an element
//! - [`classify`] - Decide the rendering path for an element
//! - [`MaskRenderer`] - Attach and restore masks on the page
//! - [`EditHistory`] - Bounded undo/redo stacks
//! - [`PageObserver`] - Per-page event loop keeping masks in sync with the store
//!
//! Artifacts created on the page use reserved `spyweb-*` tag names and
//! classes, see [`artifact`].

pub mod artifact;
pub mod classify;
pub mod error;
pub mod history;
pub mod observer;
pub mod render;
pub mod resolver;
pub mod session;
pub mod synthesizer;

pub use classify::classify;
pub use error::{ObserverError, RenderError};
pub use history::{DEFAULT_HISTORY_LIMIT, EditHistory};
pub use observer::{ClickOutcome, DebounceTimer, PageEvent, PageHandle, PageObserver, hostname};
pub use render::{DefaultImageLoader, ImageDimensions, ImageLoader, MaskRenderer, capture_style};
pub use resolver::resolve;
pub use session::SessionContext;
pub use synthesizer::synthesize;

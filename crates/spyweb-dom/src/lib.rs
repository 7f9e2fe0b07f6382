//! In-memory page model for the SpyWeb masking engine.
//!
//! The host page is represented as an arena of nodes addressed by
//! [`NodeId`]. Elements carry attributes, an inline style, a snapshot of
//! their computed style, a layout box and a click-listener flag, which is
//! everything the masking engine reads from a live page.
//!
//! ## Selectors
//!
//! [`Document::query_selector_all`] parses with `cssparser` and matches with
//! the `selectors` crate: type, class, id and attribute selectors, all
//! combinators and the tree-structural pseudo-classes. State pseudo-classes
//! such as `:hover` are rejected.
//! Elements inside a pass-through container (see
//! [`Document::set_passthrough`]) are matched as if they sat in its place.

mod document;
mod error;
mod geometry;
mod mutation;
mod node;
mod selector;
mod style;

pub use document::Document;
pub use error::DomError;
pub use geometry::BoundingBox;
pub use mutation::MutationRecord;
pub use node::{
    ClassName, ElementData, HTML_NAMESPACE, MATHML_NAMESPACE, Namespace, NodeData, NodeId,
    SVG_NAMESPACE,
};
pub use selector::{Selector, css_escape};
pub use style::{StyleMap, is_transparent};

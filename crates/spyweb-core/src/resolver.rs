//! Maskable-target resolution.
//!
//! Pointer targets inside compound widgets (an icon inside a button, a
//! `<path>` inside an `<svg>`) are usually the wrong masking granularity;
//! [`resolve`] lifts them to the control the user means.

use spyweb_dom::{Document, NodeId};

use crate::classify::{is_icon_glyph, is_interactive};

/// Choose the element that should carry the mask for a raw pointer target.
///
/// Rules, first match wins:
/// 1. `<img>` and `<video>` are returned as-is.
/// 2. SVG content (including `<use>`) lifts to its outermost `<svg>`, or to
///    that root's parent when the parent is interactive.
/// 3. Icon glyphs (`<i>`, icon-class `<span>`) lift to an interactive parent.
/// 4. Anything else is returned unchanged.
///
/// Text nodes resolve through their parent element.
pub fn resolve(doc: &Document, raw: NodeId) -> NodeId {
    let Some(element) = element_of(doc, raw) else {
        return raw;
    };
    let Some(data) = doc.element(element) else {
        return element;
    };

    if data.is_html() && (data.is("img") || data.is("video")) {
        return element;
    }

    if data.is_svg() {
        let root = svg_root(doc, element);
        return match doc.parent_element(root) {
            Some(parent) if is_interactive(doc, parent) => parent,
            _ => root,
        };
    }

    if is_icon_glyph(doc, element) {
        if let Some(parent) = doc.parent_element(element) {
            if is_interactive(doc, parent) {
                return parent;
            }
        }
    }

    element
}

fn element_of(doc: &Document, node: NodeId) -> Option<NodeId> {
    if doc.is_element(node) {
        Some(node)
    } else {
        doc.parent_element(node)
    }
}

/// The outermost `<svg>` in the unbroken run of SVG ancestors of `element`.
fn svg_root(doc: &Document, element: NodeId) -> NodeId {
    let mut root = element;
    let mut current = element;
    while let Some(data) = doc.element(current).filter(|d| d.is_svg()) {
        if data.is("svg") {
            root = current;
        }
        match doc.parent_element(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    root
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

//! Reversible hiding of original content.
//!
//! Every inline value the renderer overwrites is first saved in a
//! `data-spyweb-prev-*` attribute, only if no saved value exists yet, so
//! re-applying a mask never saves masked state as the original.

use spyweb_dom::{Document, NodeId, is_transparent};

use crate::artifact::{
    HIDDEN_TEXT_CLASS, HIDDEN_TEXT_TAG, PREV_CARET_ATTR, PREV_COLOR_ATTR, PREV_POSITION_ATTR,
    PREV_VISIBILITY_ATTR, WRAPPER_CLASS, WRAPPER_TAG, is_artifact,
};

/// Overwrite an inline property, saving the previous inline value once.
fn save_and_set(doc: &mut Document, node: NodeId, attr: &str, prop: &str, value: &str) {
    if !doc.has_attribute(node, attr) {
        let previous = doc.style(node, prop).unwrap_or("").to_string();
        doc.set_attribute(node, attr, &previous);
    }
    doc.set_style(node, prop, value);
}

/// Put back a property saved by [`save_and_set`].
fn restore_saved(doc: &mut Document, node: NodeId, attr: &str, prop: &str) {
    let Some(previous) = doc.remove_attribute(node, attr) else {
        return;
    };
    if previous.is_empty() {
        doc.remove_style(node, prop);
    } else {
        doc.set_style(node, prop, &previous);
    }
}

pub(crate) fn hide(doc: &mut Document, node: NodeId) {
    save_and_set(doc, node, PREV_VISIBILITY_ATTR, "visibility", "hidden");
}

pub(crate) fn unhide(doc: &mut Document, node: NodeId) {
    restore_saved(doc, node, PREV_VISIBILITY_ATTR, "visibility");
}

/// Make `element` a containing block for an absolutely positioned mask.
pub(crate) fn ensure_positioned(doc: &mut Document, element: NodeId) {
    let position = doc.computed_style(element, "position").unwrap_or("static");
    if position == "static" {
        save_and_set(doc, element, PREV_POSITION_ATTR, "position", "relative");
    }
}

/// Page origin of the box an absolutely positioned sibling of `element`
/// is laid out against: the nearest positioned ancestor, or the page.
pub(crate) fn containing_block_origin(doc: &Document, element: NodeId) -> (f64, f64) {
    doc.ancestors(element)
        .find(|&a| doc.computed_style(a, "position").is_some_and(|p| p != "static"))
        .map(|a| {
            let rect = doc.rect(a);
            (rect.x, rect.y)
        })
        .unwrap_or((0.0, 0.0))
}

pub(crate) fn restore_position(doc: &mut Document, element: NodeId) {
    restore_saved(doc, element, PREV_POSITION_ATTR, "position");
}

/// Hide every child of `element` in place.
///
/// Child elements get `visibility: hidden`. Text nodes with visible
/// characters are wrapped in a hidden span; whitespace-only text is left
/// alone since it renders nothing.
pub(crate) fn hide_children(doc: &mut Document, element: NodeId) {
    let children = doc.children(element).to_vec();
    for child in children {
        if let Some(text) = doc.text(child) {
            if text.trim().is_empty() {
                continue;
            }
            let span = doc.create_element(HIDDEN_TEXT_TAG);
            doc.add_class(span, HIDDEN_TEXT_CLASS);
            doc.set_style(span, "visibility", "hidden");
            doc.insert_before(element, span, Some(child));
            doc.append_child(span, child);
        } else if doc.is_element(child) && !is_artifact(doc, child) {
            hide(doc, child);
        }
    }
}

/// Reverse [`hide_children`].
pub(crate) fn unhide_children(doc: &mut Document, element: NodeId) {
    let children = doc.children(element).to_vec();
    for child in children {
        if doc.has_class(child, HIDDEN_TEXT_CLASS) {
            unwrap(doc, child);
        } else if doc.is_element(child) {
            unhide(doc, child);
        }
    }
}

/// Replace `node` by its children.
pub(crate) fn unwrap(doc: &mut Document, node: NodeId) {
    let Some(parent) = doc.parent(node) else {
        return;
    };
    let children = doc.children(node).to_vec();
    for child in children {
        doc.insert_before(parent, child, Some(node));
    }
    doc.remove(node);
}

/// Make input text transparent while keeping the caret visible.
pub(crate) fn hide_input_text(doc: &mut Document, input: NodeId) {
    // Read the host-computed color, since the inline one may already be ours.
    let caret = doc
        .element(input)
        .and_then(|e| e.computed_style().get("color"))
        .filter(|c| !is_transparent(c))
        .unwrap_or("black")
        .to_string();
    save_and_set(doc, input, PREV_COLOR_ATTR, "color", "transparent");
    save_and_set(doc, input, PREV_CARET_ATTR, "caret-color", &caret);
}

pub(crate) fn restore_input_text(doc: &mut Document, input: NodeId) {
    restore_saved(doc, input, PREV_COLOR_ATTR, "color");
    restore_saved(doc, input, PREV_CARET_ATTR, "caret-color");
}

/// The media wrapper around `element`, creating it on first use.
pub(crate) fn ensure_wrapper(doc: &mut Document, element: NodeId) -> NodeId {
    if let Some(parent) = doc.parent_element(element) {
        if doc.has_class(parent, WRAPPER_CLASS) {
            return parent;
        }
    }

    let rect = doc.rect(element);
    let wrapper = doc.create_element(WRAPPER_TAG);
    doc.add_class(wrapper, WRAPPER_CLASS);
    // The wrapped element keeps its structural slot for selectors.
    doc.set_passthrough(wrapper, true);
    doc.set_style(wrapper, "position", "relative");
    doc.set_style(wrapper, "display", "inline-block");
    if !rect.is_empty() {
        doc.set_style(wrapper, "width", &format!("{}px", rect.width));
        doc.set_style(wrapper, "height", &format!("{}px", rect.height));
    }
    doc.set_rect(wrapper, rect);

    if let Some(parent) = doc.parent(element) {
        doc.insert_before(parent, wrapper, Some(element));
    }
    doc.append_child(wrapper, element);
    wrapper
}

/// Move `element` out of its media wrapper and drop the wrapper.
pub(crate) fn remove_wrapper(doc: &mut Document, element: NodeId) {
    let Some(wrapper) = doc
        .parent_element(element)
        .filter(|&p| doc.has_class(p, WRAPPER_CLASS))
    else {
        return;
    };
    if let Some(parent) = doc.parent(wrapper) {
        doc.insert_before(parent, element, Some(wrapper));
    }
    doc.remove(wrapper);
}

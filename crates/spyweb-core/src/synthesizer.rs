//! Selector synthesis for interactively chosen elements.

use spyweb_dom::{ClassName, Document, NodeId, css_escape};

use crate::artifact::RESERVED_PREFIX;

/// Levels emitted before the path is cut off.
pub const MAX_PATH_DEPTH: usize = 5;

/// Derive a locator for `element`.
///
/// Elements with an id yield `#id`. Otherwise the path is built from the
/// element upward, one `tag.class1.class2` step per level with an
/// `:nth-of-type(n)` suffix whenever a sibling shares the tag, at most
/// [`MAX_PATH_DEPTH`] steps, joined ancestor-first with descendant
/// combinators. Media wrappers are skipped, so a path stays valid whether
/// or not the element is wrapped. Never fails; detached or foreign nodes get a best-effort
/// path and the caller checks that it resolves.
pub fn synthesize(doc: &Document, element: NodeId) -> String {
    if let Some(id) = doc.id_attribute(element) {
        return format!("#{}", css_escape(id));
    }

    let mut steps = Vec::with_capacity(MAX_PATH_DEPTH);
    let mut current = Some(element).filter(|&n| doc.is_element(n));
    while let Some(node) = current {
        steps.push(step(doc, node));
        if steps.len() >= MAX_PATH_DEPTH {
            break;
        }
        current = doc.structural_parent(node);
    }
    steps.reverse();
    steps.join(" ")
}

fn step(doc: &Document, node: NodeId) -> String {
    let Some(data) = doc.element(node) else {
        return "*".to_string();
    };

    let mut out = css_escape(data.local_name());
    if let Some(class_name) = doc.class_name(node) {
        for class in own_classes(class_name) {
            out.push('.');
            out.push_str(&css_escape(class));
        }
    }
    if doc.count_of_type(node) > 1 {
        out.push_str(&format!(":nth-of-type({})", doc.nth_of_type(node)));
    }
    out
}

/// Class tokens that are not engine artifacts, from either class-name shape.
fn own_classes(class_name: ClassName<'_>) -> impl Iterator<Item = &str> {
    let list = match class_name {
        ClassName::Plain(value) => value,
        ClassName::Animated { base_val, .. } => base_val,
    };
    list.split_ascii_whitespace()
        .filter(|c| !c.starts_with(RESERVED_PREFIX))
}

#[cfg(test)]
#[path = "synthesizer_tests.rs"]
mod tests;

//! Names and lookups for nodes the engine itself puts on the page.

use spyweb_dom::{Document, NodeId};

/// Class/id prefix reserved for engine artifacts.
pub const RESERVED_PREFIX: &str = "spyweb-";

/// Artifact elements use reserved custom tag names so inserting them never
/// shifts the `:nth-of-type` position of a page element.
pub const MASK_TAG: &str = "spyweb-mask";
pub const WRAPPER_TAG: &str = "spyweb-wrapper";
pub const HIDDEN_TEXT_TAG: &str = "spyweb-text";
pub const OVERLAY_TAG: &str = "spyweb-overlay";
pub const TILE_TAG: &str = "spyweb-tile";
pub const PLACEHOLDER_TAG: &str = "spyweb-placeholder";

/// The mask visual.
pub const MASK_CLASS: &str = "spyweb-mask";
/// Marks an element that currently carries a mask.
pub const MASKED_CLASS: &str = "spyweb-masked";
/// Positioning container around a masked image or video.
pub const WRAPPER_CLASS: &str = "spyweb-media-wrapper";
/// Span around a hidden text node of a masked element.
pub const HIDDEN_TEXT_CLASS: &str = "spyweb-hidden-text";
/// One cell of an image tile grid.
pub const TILE_CLASS: &str = "spyweb-mask-tile";
/// Placeholder shown instead of an image that is missing or failed.
pub const PLACEHOLDER_CLASS: &str = "spyweb-image-placeholder";

pub const HIGHLIGHT_OVERLAY_ID: &str = "spyweb-highlight-overlay";
pub const EARLY_HIDE_STYLE_ID: &str = "spyweb-early-hide";

/// On a masked element: its mask token.
pub const MASK_TOKEN_ATTR: &str = "data-spyweb-mask";
/// On a masked element: selector of the record that masked it.
pub const MASK_SELECTOR_ATTR: &str = "data-spyweb-selector";
/// On a mask: the token of the element it covers.
pub const MASK_OWNER_ATTR: &str = "data-spyweb-owner";
/// On a placeholder: why it was shown (`empty` or `error`).
pub const PLACEHOLDER_ATTR: &str = "data-spyweb-placeholder";

/// Saved inline values, restored on unmask. An empty value means "unset".
pub const PREV_VISIBILITY_ATTR: &str = "data-spyweb-prev-visibility";
pub const PREV_POSITION_ATTR: &str = "data-spyweb-prev-position";
pub const PREV_COLOR_ATTR: &str = "data-spyweb-prev-color";
pub const PREV_CARET_ATTR: &str = "data-spyweb-prev-caret";

/// Token identifying a masked element; stable for the document's lifetime.
pub fn token(node: NodeId) -> String {
    node.index().to_string()
}

/// The element a token refers to.
pub fn from_token(doc: &Document, token: &str) -> Option<NodeId> {
    token
        .parse::<usize>()
        .ok()
        .and_then(|index| doc.node_at(index))
        .filter(|&node| doc.is_element(node))
}

/// Whether `node` is an engine artifact or lives inside a mask or the
/// highlight overlay. Page elements inside a media wrapper are not artifacts.
pub fn is_artifact(doc: &Document, node: NodeId) -> bool {
    is_artifact_element(doc, node)
        || doc.ancestors(node).any(|n| {
            doc.has_class(n, MASK_CLASS) || doc.attribute(n, "id") == Some(HIGHLIGHT_OVERLAY_ID)
        })
}

fn is_artifact_element(doc: &Document, node: NodeId) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };
    if element
        .id()
        .is_some_and(|id| id == HIGHLIGHT_OVERLAY_ID || id == EARLY_HIDE_STYLE_ID)
    {
        return true;
    }
    element
        .classes()
        .any(|c| c.starts_with(RESERVED_PREFIX) && c != MASKED_CLASS)
}

/// The masked element a mask artifact belongs to, if `node` is inside one.
pub fn mask_owner(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mask = std::iter::once(node)
        .chain(doc.ancestors(node))
        .find(|&n| doc.has_class(n, MASK_CLASS))?;
    from_token(doc, doc.attribute(mask, MASK_OWNER_ATTR)?)
}

/// The nearest masked element containing `node`, including `node` itself.
pub fn masked_container(doc: &Document, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(doc.ancestors(node))
        .find(|&n| doc.has_class(n, MASKED_CLASS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        assert_eq!(from_token(&doc, &token(div)), Some(div));
        assert_eq!(from_token(&doc, "nope"), None);
        assert_eq!(from_token(&doc, "99999"), None);

        let text = doc.create_text("x");
        assert_eq!(from_token(&doc, &token(text)), None);
    }

    #[test]
    fn test_is_artifact() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let masked = doc.create_element("div");
        doc.add_class(masked, MASKED_CLASS);
        let mask = doc.create_element("div");
        doc.add_class(mask, MASK_CLASS);
        let tile = doc.create_element("div");
        doc.append_child(body, masked);
        doc.append_child(masked, mask);
        doc.append_child(mask, tile);

        let overlay = doc.create_element("div");
        doc.set_attribute(overlay, "id", HIGHLIGHT_OVERLAY_ID);

        assert!(!is_artifact(&doc, masked));
        assert!(is_artifact(&doc, mask));
        assert!(is_artifact(&doc, tile));
        assert!(is_artifact(&doc, overlay));
        assert!(!is_artifact(&doc, body));
    }

    #[test]
    fn test_wrapped_media_is_not_artifact() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let wrapper = doc.create_element("span");
        doc.add_class(wrapper, WRAPPER_CLASS);
        let img = doc.create_element("img");
        doc.append_child(body, wrapper);
        doc.append_child(wrapper, img);

        assert!(is_artifact(&doc, wrapper));
        assert!(!is_artifact(&doc, img));
    }

    #[test]
    fn test_mask_owner() {
        let mut doc = Document::new();
        let body = doc.body().unwrap();
        let target = doc.create_element("p");
        let mask = doc.create_element("div");
        doc.add_class(mask, MASK_CLASS);
        doc.set_attribute(mask, MASK_OWNER_ATTR, &token(target));
        let inner = doc.create_element("span");
        doc.append_child(body, target);
        doc.append_child(target, mask);
        doc.append_child(mask, inner);

        assert_eq!(mask_owner(&doc, inner), Some(target));
        assert_eq!(mask_owner(&doc, target), None);
    }
}

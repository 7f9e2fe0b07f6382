//! Temporary stylesheet that hides known selectors before masks exist.

use spyweb_dom::{Document, NodeId};
use spyweb_protocols::MaskRecord;

use crate::artifact::EARLY_HIDE_STYLE_ID;

/// CSS hiding every record's selector by visibility and opacity.
pub fn stylesheet(records: &[MaskRecord]) -> String {
    records
        .iter()
        .filter(|r| !r.selector.trim().is_empty())
        .map(|r| {
            format!(
                "{} {{ visibility: hidden !important; opacity: 0 !important; }}\n",
                r.selector
            )
        })
        .collect()
}

/// Inject the early-hide `<style>` into the head, replacing a previous one.
/// Returns `None` when there is nothing to hide.
pub fn inject(doc: &mut Document, records: &[MaskRecord]) -> Option<NodeId> {
    remove(doc);
    let css = stylesheet(records);
    if css.is_empty() {
        return None;
    }

    let style = doc.create_element("style");
    doc.set_attribute(style, "id", EARLY_HIDE_STYLE_ID);
    let text = doc.create_text(&css);
    doc.append_child(style, text);

    let parent = doc
        .head()
        .or_else(|| doc.document_element())
        .unwrap_or_else(|| doc.root());
    doc.append_child(parent, style);
    Some(style)
}

/// Remove the early-hide stylesheet. Returns whether one was present.
pub fn remove(doc: &mut Document) -> bool {
    match doc.get_element_by_id(EARLY_HIDE_STYLE_ID) {
        Some(style) => {
            doc.remove(style);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spyweb_protocols::{ElementKind, MaskSpec, Scope};

    fn rec(selector: &str) -> MaskRecord {
        MaskRecord::new(
            selector,
            "example.com",
            MaskSpec::default(),
            ElementKind::Generic,
            Scope::Current,
        )
    }

    #[test]
    fn test_stylesheet_rules() {
        let css = stylesheet(&[rec("#a"), rec("  "), rec("div.x p")]);
        assert_eq!(
            css,
            "#a { visibility: hidden !important; opacity: 0 !important; }\n\
             div.x p { visibility: hidden !important; opacity: 0 !important; }\n"
        );
    }

    #[test]
    fn test_inject_into_head_once() {
        let mut doc = Document::new();
        let head = doc.head().unwrap();

        inject(&mut doc, &[rec("#a")]).unwrap();
        let style = inject(&mut doc, &[rec("#b")]).unwrap();

        assert_eq!(doc.children(head), &[style]);
        assert!(doc.text_content(style).starts_with("#b"));
        assert!(remove(&mut doc));
        assert!(!remove(&mut doc));
        assert!(doc.children(head).is_empty());
    }

    #[test]
    fn test_nothing_to_hide() {
        let mut doc = Document::new();
        assert!(inject(&mut doc, &[]).is_none());
        assert!(doc.get_element_by_id(EARLY_HIDE_STYLE_ID).is_none());
    }
}

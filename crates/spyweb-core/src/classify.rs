//! Element classification.
//!
//! [`classify`] is computed once when a record is created and stored as the
//! record's target flags; the renderer dispatches on the stored kind.

use spyweb_dom::{Document, NodeId};
use spyweb_protocols::ElementKind;

/// Exact class tokens used by common icon fonts.
const ICON_CLASSES: &[&str] = &[
    "fa",
    "fas",
    "far",
    "fal",
    "fad",
    "fab",
    "icon",
    "glyphicon",
    "material-icons",
    "material-icons-outlined",
    "material-symbols-outlined",
    "bi",
    "mdi",
    "octicon",
];

/// Class prefixes used by common icon fonts.
const ICON_PREFIXES: &[&str] = &[
    "fa-", "icon-", "icon_", "glyphicon-", "bi-", "mdi-", "ti-", "octicon-", "lucide-",
    "feather-",
];

/// Class tokens hinting that an element acts as a button.
const BUTTON_HINTS: &[&str] = &["btn", "button", "icon-button", "icon-btn"];

/// Rendering kind of `element`.
pub fn classify(doc: &Document, element: NodeId) -> ElementKind {
    let Some(data) = doc.element(element) else {
        return ElementKind::Generic;
    };
    if data.is_svg() || is_icon_glyph(doc, element) {
        return ElementKind::SvgOrIcon;
    }
    match data.local_name().to_ascii_lowercase().as_str() {
        "img" => ElementKind::Image,
        "video" => ElementKind::Video,
        "input" | "textarea" => ElementKind::Input,
        _ => ElementKind::Generic,
    }
}

/// Whether a class token follows an icon-font naming convention.
pub fn is_icon_class(class: &str) -> bool {
    ICON_CLASSES.contains(&class)
        || ICON_PREFIXES.iter().any(|p| class.starts_with(p))
        || class.ends_with("-icon")
}

/// An `<i>`, or a `<span>` carrying an icon class.
pub fn is_icon_glyph(doc: &Document, element: NodeId) -> bool {
    let Some(data) = doc.element(element) else {
        return false;
    };
    if !data.is_html() {
        return false;
    }
    if data.is("i") {
        return true;
    }
    data.is("span") && data.classes().any(is_icon_class)
}

/// Why an element counts as interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveSignal {
    /// `<button>`, `<a>` or a button-type `<input>`.
    NativeTag,
    /// `role="button"` or `role="link"`.
    AriaRole,
    /// An `onclick` attribute or a registered click listener.
    ClickHandler,
    /// A class hinting at a button or icon button.
    ClassHint,
    /// Computed `cursor: pointer`.
    CursorPointer,
}

/// The first signal marking `element` as an interactive control.
pub fn interactive_signal(doc: &Document, element: NodeId) -> Option<InteractiveSignal> {
    let data = doc.element(element)?;

    if data.is_html() {
        let native = match data.local_name() {
            "button" | "a" => true,
            "input" => matches!(
                data.attribute("type").map(str::to_ascii_lowercase).as_deref(),
                Some("button" | "submit" | "reset" | "image")
            ),
            _ => false,
        };
        if native {
            return Some(InteractiveSignal::NativeTag);
        }
    }

    if matches!(data.attribute("role"), Some("button" | "link")) {
        return Some(InteractiveSignal::AriaRole);
    }

    if data.attribute("onclick").is_some() || data.has_click_listener() {
        return Some(InteractiveSignal::ClickHandler);
    }

    if data.classes().any(|c| {
        let c = c.to_ascii_lowercase();
        BUTTON_HINTS.contains(&c.as_str())
            || c.starts_with("btn-")
            || c.ends_with("-btn")
            || c.ends_with("-button")
            || c == "icon"
    }) {
        return Some(InteractiveSignal::ClassHint);
    }

    if doc.computed_style(element, "cursor") == Some("pointer") {
        return Some(InteractiveSignal::CursorPointer);
    }

    None
}

pub fn is_interactive(doc: &Document, element: NodeId) -> bool {
    interactive_signal(doc, element).is_some()
}

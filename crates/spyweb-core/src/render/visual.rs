//! Painting of the mask visual for each [`VisualMode`].

use spyweb_config::RenderConfig;
use spyweb_dom::{Document, NodeId, is_transparent};
use spyweb_protocols::{MaskRecord, MaskSpec, StyleSnapshot, VisualMode};
use tracing::{debug, warn};

use super::image::{ImageDimensions, TileLayout};
use crate::artifact::{
    PLACEHOLDER_ATTR, PLACEHOLDER_CLASS, PLACEHOLDER_TAG, PREV_COLOR_ATTR, TILE_CLASS, TILE_TAG,
};
use crate::error::RenderError;

const OPAQUE_FALLBACK: &str = "#ffffff";
const TEXT_FALLBACK_COLOR: &str = "#000000";
const BLUR_TINT: &str = "rgba(255, 255, 255, 0.3)";

const EMPTY_IMAGE_LABEL: &str = "No image configured";
const FAILED_IMAGE_LABEL: &str = "⚠ Image failed to load";

/// Outcome of resolving an image mask's source, decided before any node is
/// built so a failed load never leaves a half-built overlay.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ImageFill {
    /// Not an image mask.
    None,
    Empty,
    Failed(RenderError),
    Loaded(ImageDimensions),
}

/// Fill `mask` according to the record's visual mode.
pub(crate) fn paint(
    doc: &mut Document,
    mask: NodeId,
    element: NodeId,
    record: &MaskRecord,
    fill: &ImageFill,
    config: &RenderConfig,
) {
    let spec = &record.mask_spec;
    match spec.visual_mode {
        VisualMode::Text => paint_text(doc, mask, element, spec, config),
        VisualMode::Color => {
            let color = spec
                .explicit_color()
                .map(str::to_string)
                .or_else(|| opaque_background(doc, element, config.background_search_depth))
                .unwrap_or_else(|| config.fallback_color.clone());
            doc.set_style(mask, "background-color", &color);
        }
        VisualMode::Blur => {
            let blur = format!("blur({}px)", config.blur_radius_px);
            doc.set_style(mask, "backdrop-filter", &blur);
            doc.set_style(mask, "-webkit-backdrop-filter", &blur);
            doc.set_style(mask, "background-color", BLUR_TINT);
        }
        VisualMode::Inherit => {
            let snapshot = record
                .original_style
                .clone()
                .unwrap_or_else(|| capture_style(doc, element));
            paint_inherit(doc, mask, element, spec, &snapshot, config);
        }
        VisualMode::Image => paint_image(doc, mask, element, spec, fill),
    }
}

fn center_content(doc: &mut Document, mask: NodeId) {
    doc.set_style(mask, "display", "flex");
    doc.set_style(mask, "align-items", "center");
    doc.set_style(mask, "justify-content", "center");
    doc.set_style(mask, "overflow", "hidden");
}

fn set_label(doc: &mut Document, node: NodeId, label: &str) {
    let text = doc.create_text(label);
    doc.append_child(node, text);
}

fn paint_text(
    doc: &mut Document,
    mask: NodeId,
    element: NodeId,
    spec: &MaskSpec,
    config: &RenderConfig,
) {
    center_content(doc, mask);
    doc.set_style(mask, "white-space", "nowrap");

    let size = spec
        .text_mask_size
        .as_deref()
        .map(css_length)
        .unwrap_or_else(|| format!("{}px", config.default_font_size_px));
    doc.set_style(mask, "font-size", &size);
    if let Some(font) = spec.text_mask_font.as_deref() {
        doc.set_style(mask, "font-family", font);
    }

    let color = spec
        .text_mask_color
        .clone()
        .or_else(|| {
            doc.computed_style(element, "color")
                .filter(|c| !is_transparent(c))
                .map(str::to_string)
        })
        .unwrap_or_else(|| TEXT_FALLBACK_COLOR.to_string());
    doc.set_style(mask, "color", &color);

    let background = opaque_background(doc, element, config.background_search_depth)
        .unwrap_or_else(|| OPAQUE_FALLBACK.to_string());
    doc.set_style(mask, "background-color", &background);

    set_label(doc, mask, spec.display_text());
}

fn paint_inherit(
    doc: &mut Document,
    mask: NodeId,
    element: NodeId,
    spec: &MaskSpec,
    snapshot: &StyleSnapshot,
    config: &RenderConfig,
) {
    let copied = [
        ("font-family", &snapshot.font_family),
        ("font-size", &snapshot.font_size),
        ("font-weight", &snapshot.font_weight),
        ("font-style", &snapshot.font_style),
        ("line-height", &snapshot.line_height),
        ("letter-spacing", &snapshot.letter_spacing),
        ("color", &snapshot.color),
        ("padding", &snapshot.padding),
        ("text-align", &snapshot.text_align),
        ("border-radius", &snapshot.border_radius),
    ];
    for (prop, value) in copied {
        if !value.trim().is_empty() {
            doc.set_style(mask, prop, value);
        }
    }

    if !is_transparent(&snapshot.background_color) {
        doc.set_style(mask, "background-color", &snapshot.background_color);
    } else if is_paintable_shorthand(&snapshot.background) {
        doc.set_style(mask, "background", &snapshot.background);
    } else {
        let parent_background = doc.parent_element(element).and_then(|parent| {
            opaque_background(doc, parent, config.background_search_depth)
        });
        let background = parent_background.unwrap_or_else(|| OPAQUE_FALLBACK.to_string());
        doc.set_style(mask, "background-color", &background);
    }

    center_content(doc, mask);
    set_label(doc, mask, spec.display_text());
}

fn paint_image(
    doc: &mut Document,
    mask: NodeId,
    element: NodeId,
    spec: &MaskSpec,
    fill: &ImageFill,
) {
    match (spec.image_source(), fill) {
        (Some(source), ImageFill::Loaded(natural)) => {
            let rect = doc.rect(element);
            let layout = TileLayout::for_target(rect.width, rect.height);
            debug!(
                natural_width = natural.width,
                natural_height = natural.height,
                tile = layout.tile,
                tiles = layout.count(),
                "Tiling mask image"
            );
            let track = format!("{}px", layout.tile);
            doc.set_style(mask, "display", "grid");
            doc.set_style(
                mask,
                "grid-template-columns",
                &format!("repeat({}, {})", layout.columns, track),
            );
            doc.set_style(
                mask,
                "grid-template-rows",
                &format!("repeat({}, {})", layout.rows, track),
            );
            doc.set_style(mask, "overflow", "hidden");

            let image = format!("url(\"{}\")", source.replace('"', "%22"));
            for _ in 0..layout.count() {
                let tile = doc.create_element(TILE_TAG);
                doc.add_class(tile, TILE_CLASS);
                doc.set_style(tile, "background-image", &image);
                doc.set_style(tile, "background-size", "cover");
                doc.set_style(tile, "background-position", "center");
                doc.append_child(mask, tile);
            }
        }
        (Some(source), ImageFill::Failed(err)) => {
            warn!(source = %truncate(source), error = %err, "Mask image failed to load");
            placeholder(doc, mask, "error", FAILED_IMAGE_LABEL);
        }
        _ => placeholder(doc, mask, "empty", EMPTY_IMAGE_LABEL),
    }
}

fn placeholder(doc: &mut Document, mask: NodeId, reason: &str, label: &str) {
    center_content(doc, mask);
    doc.set_style(mask, "background-color", "#f0f0f0");
    doc.set_style(mask, "color", "#666666");
    let inner = doc.create_element(PLACEHOLDER_TAG);
    doc.add_class(inner, PLACEHOLDER_CLASS);
    doc.set_attribute(inner, PLACEHOLDER_ATTR, reason);
    set_label(doc, inner, label);
    doc.append_child(mask, inner);
}

/// Data URLs can be megabytes long; keep log lines short.
fn truncate(source: &str) -> &str {
    match source.char_indices().nth(64) {
        Some((end, _)) => &source[..end],
        None => source,
    }
}

/// First non-transparent background color on `element` or one of its
/// nearest `depth` ancestors.
pub(crate) fn opaque_background(doc: &Document, element: NodeId, depth: usize) -> Option<String> {
    std::iter::once(element)
        .chain(doc.ancestors(element).filter(|&n| doc.is_element(n)).take(depth))
        .filter_map(|node| doc.computed_style(node, "background-color"))
        .find(|value| !is_transparent(value))
        .map(str::to_string)
}

fn is_paintable_shorthand(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !value.starts_with("none")
        && !value.starts_with("rgba(0, 0, 0, 0) none")
        && !is_transparent(value)
}

/// A bare number means pixels.
fn css_length(value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        format!("{}px", value)
    } else {
        value.to_string()
    }
}

/// Font, color and background properties of `element`, as used by
/// inherit-mode masks.
pub fn capture_style(doc: &Document, element: NodeId) -> StyleSnapshot {
    let get = |prop: &str| {
        doc.computed_style(element, prop)
            .unwrap_or_default()
            .to_string()
    };
    // A masked input's inline color is ours; read the saved one instead.
    let color = match doc.attribute(element, PREV_COLOR_ATTR) {
        Some(saved) if !saved.is_empty() => saved.to_string(),
        Some(_) => doc
            .element(element)
            .and_then(|e| e.computed_style().get("color"))
            .unwrap_or(TEXT_FALLBACK_COLOR)
            .to_string(),
        None => get("color"),
    };
    StyleSnapshot {
        font_family: get("font-family"),
        font_size: get("font-size"),
        font_weight: get("font-weight"),
        font_style: get("font-style"),
        line_height: get("line-height"),
        letter_spacing: get("letter-spacing"),
        color,
        background_color: get("background-color"),
        background: get("background"),
        padding: get("padding"),
        text_align: get("text-align"),
        border_radius: get("border-radius"),
    }
}

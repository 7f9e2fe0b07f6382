//! Mask Renderer.
//!
//! [`MaskRenderer::apply`] attaches a mask for one record to one element,
//! picking a strategy from the record's stored [`ElementKind`]:
//!
//! - **Wrapped** (image, video, SVG root): the element moves into a
//!   positioning wrapper, is hidden in place and the mask sits beside it.
//! - **Input** (input, textarea): the text turns transparent, the caret
//!   stays visible and a pointer-transparent mask is layered on top.
//! - **Overlay** (everything else): each child is hidden individually and
//!   the mask is appended as an absolutely positioned child.
//!
//! Every side effect is reversible through [`MaskRenderer::restore`].

mod content;
mod image;
mod visual;

use std::collections::HashMap;
use std::sync::Arc;

use spyweb_config::RenderConfig;
use spyweb_dom::{Document, NodeId};
use spyweb_protocols::{ElementKind, MaskRecord, MaskSpec, VisualMode};
use tracing::debug;

use crate::artifact::{
    self, HIDDEN_TEXT_CLASS, MASK_CLASS, MASK_OWNER_ATTR, MASK_SELECTOR_ATTR, MASK_TAG,
    MASK_TOKEN_ATTR, MASKED_CLASS, PREV_VISIBILITY_ATTR, WRAPPER_CLASS,
};
use crate::error::RenderError;

pub use image::{
    DefaultImageLoader, ImageDimensions, ImageLoader, TileLayout, decode_data_url, dimensions,
};
pub use visual::capture_style;

use visual::ImageFill;

const MASK_Z_INDEX: &str = "2147483646";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Wrapped,
    Input,
    Overlay,
}

fn strategy(doc: &Document, element: NodeId, kind: ElementKind) -> Strategy {
    match kind {
        ElementKind::Image | ElementKind::Video => Strategy::Wrapped,
        ElementKind::Input => Strategy::Input,
        // An <svg> cannot host an HTML overlay child.
        ElementKind::SvgOrIcon if doc.element(element).is_some_and(|e| e.is_svg()) => {
            Strategy::Wrapped
        }
        _ => Strategy::Overlay,
    }
}

/// Attaches and detaches mask visuals.
pub struct MaskRenderer {
    config: RenderConfig,
    loader: Arc<dyn ImageLoader>,
    image_cache: HashMap<String, Result<ImageDimensions, RenderError>>,
}

impl MaskRenderer {
    pub fn new(config: RenderConfig, loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            config,
            loader,
            image_cache: HashMap::new(),
        }
    }

    /// Renderer with the HTTP/data-URL image loader.
    pub fn with_default_loader(config: RenderConfig) -> Self {
        let loader = Arc::new(DefaultImageLoader::new(config.image_timeout()));
        Self::new(config, loader)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Forget probed images so the next apply loads them again.
    pub fn clear_image_cache(&mut self) {
        self.image_cache.clear();
    }

    /// Mask `element` according to `record` and return the mask node.
    ///
    /// Any mask the element already carries is removed first, so applying
    /// the same record twice leaves exactly one mask attached. Returns
    /// `None` when `element` is not an element.
    pub async fn apply(
        &mut self,
        doc: &mut Document,
        element: NodeId,
        record: &MaskRecord,
    ) -> Option<NodeId> {
        if !doc.is_element(element) {
            return None;
        }
        let fill = self.image_fill(&record.mask_spec).await;
        Some(self.attach(doc, element, record, &fill))
    }

    async fn image_fill(&mut self, spec: &MaskSpec) -> ImageFill {
        if spec.visual_mode != VisualMode::Image {
            return ImageFill::None;
        }
        let Some(source) = spec.image_source() else {
            return ImageFill::Empty;
        };

        let result = match self.image_cache.get(source) {
            Some(cached) => cached.clone(),
            None => {
                let result = self.loader.probe(source).await;
                self.image_cache.insert(source.to_string(), result.clone());
                result
            }
        };
        match result {
            Ok(dims) => ImageFill::Loaded(dims),
            Err(err) => ImageFill::Failed(err),
        }
    }

    fn attach(
        &self,
        doc: &mut Document,
        element: NodeId,
        record: &MaskRecord,
        fill: &ImageFill,
    ) -> NodeId {
        remove_masks(doc, element);

        let token = artifact::token(element);
        let mask = doc.create_element(MASK_TAG);
        doc.add_class(mask, MASK_CLASS);
        doc.set_attribute(mask, MASK_OWNER_ATTR, &token);
        doc.set_style(mask, "position", "absolute");
        doc.set_style(mask, "z-index", MASK_Z_INDEX);
        doc.set_style(mask, "box-sizing", "border-box");
        visual::paint(doc, mask, element, record, fill, &self.config);

        let strategy = strategy(doc, element, record.element_kind());
        match strategy {
            Strategy::Wrapped => {
                let wrapper = content::ensure_wrapper(doc, element);
                content::hide(doc, element);
                cover(doc, mask);
                doc.append_child(wrapper, mask);
            }
            Strategy::Input => {
                content::hide_input_text(doc, element);
                let rect = doc.rect(element);
                let (origin_x, origin_y) = content::containing_block_origin(doc, element);
                doc.set_style(mask, "left", &format!("{}px", rect.x - origin_x));
                doc.set_style(mask, "top", &format!("{}px", rect.y - origin_y));
                doc.set_style(mask, "width", &format!("{}px", rect.width));
                doc.set_style(mask, "height", &format!("{}px", rect.height));
                doc.set_style(mask, "pointer-events", "none");
                doc.set_rect(mask, rect);
                doc.insert_after(element, mask);
            }
            Strategy::Overlay => {
                content::ensure_positioned(doc, element);
                content::hide_children(doc, element);
                cover(doc, mask);
                doc.append_child(element, mask);
            }
        }

        doc.add_class(element, MASKED_CLASS);
        doc.set_attribute(element, MASK_TOKEN_ATTR, &token);
        doc.set_attribute(element, MASK_SELECTOR_ATTR, &record.selector);
        debug!(
            selector = %record.selector,
            mode = %record.mask_spec.visual_mode,
            ?strategy,
            "Mask applied"
        );
        mask
    }

    /// Remove the mask from `element` and undo every change made to it.
    pub fn restore(&self, doc: &mut Document, element: NodeId) {
        remove_masks(doc, element);
        content::unhide_children(doc, element);
        content::restore_position(doc, element);
        content::restore_input_text(doc, element);

        let wrapped = doc
            .parent_element(element)
            .is_some_and(|p| doc.has_class(p, WRAPPER_CLASS));
        if wrapped {
            content::unhide(doc, element);
            content::remove_wrapper(doc, element);
        }

        doc.remove_class(element, MASKED_CLASS);
        doc.remove_attribute(element, MASK_TOKEN_ATTR);
        doc.remove_attribute(element, MASK_SELECTOR_ATTR);
    }

    /// Restore every masked element, then sweep artifacts whose owner is
    /// gone. Returns the number of masked elements restored.
    pub fn restore_all(&self, doc: &mut Document) -> usize {
        let masked = find(doc, |doc, n| doc.has_class(n, MASKED_CLASS));
        for &element in &masked {
            self.restore(doc, element);
        }

        for mask in find(doc, |doc, n| doc.has_class(n, MASK_CLASS)) {
            doc.remove(mask);
        }
        for wrapper in find(doc, |doc, n| doc.has_class(n, WRAPPER_CLASS)) {
            content::unwrap(doc, wrapper);
        }
        for span in find(doc, |doc, n| doc.has_class(n, HIDDEN_TEXT_CLASS)) {
            content::unwrap(doc, span);
        }
        for node in find(doc, |doc, n| doc.has_attribute(n, PREV_VISIBILITY_ATTR)) {
            content::unhide(doc, node);
        }

        masked.len()
    }
}

fn cover(doc: &mut Document, mask: NodeId) {
    doc.set_style(mask, "inset", "0");
    doc.set_style(mask, "width", "100%");
    doc.set_style(mask, "height", "100%");
}

fn find(doc: &Document, pred: impl Fn(&Document, NodeId) -> bool) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&n| pred(doc, n))
        .collect()
}

/// Masks owned by `element`, wherever they were attached.
fn masks_of(doc: &Document, element: NodeId) -> Vec<NodeId> {
    let token = artifact::token(element);
    find(doc, |doc, n| {
        doc.has_class(n, MASK_CLASS) && doc.attribute(n, MASK_OWNER_ATTR) == Some(token.as_str())
    })
}

fn remove_masks(doc: &mut Document, element: NodeId) {
    for mask in masks_of(doc, element) {
        doc.remove(mask);
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

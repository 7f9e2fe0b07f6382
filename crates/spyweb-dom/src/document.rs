//! Arena-backed document tree.

use crate::error::DomError;
use crate::geometry::BoundingBox;
use crate::mutation::MutationRecord;
use crate::node::{ClassName, ElementData, Namespace, Node, NodeData, NodeId};
use crate::selector::Selector;
use crate::style::StyleMap;

/// Values reported for properties the host snapshot does not carry.
const COMPUTED_DEFAULTS: &[(&str, &str)] = &[
    ("background-color", "rgba(0, 0, 0, 0)"),
    ("position", "static"),
    ("visibility", "visible"),
    ("cursor", "auto"),
    ("display", "inline"),
    ("color", "rgb(0, 0, 0)"),
];

/// A page: a tree of nodes plus a child-list mutation log.
///
/// The `style` attribute is not stored as an attribute: setting it replaces
/// the element's inline style, which is read back through [`Document::style`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    mutations: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let html = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.append_child(doc.root, html);
        doc.append_child(html, head);
        doc.append_child(html, body);
        doc.mutations.clear();
        doc
    }

    /// Create a document with no element at all.
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            root: NodeId(0),
            mutations: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root).next()
    }

    pub fn head(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html).find(|&c| self.is_tag(c, "head"))
    }

    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html).find(|&c| self.is_tag(c, "body"))
    }

    /// Look up a node by arena index.
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then_some(NodeId(index))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Local tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.local_name())
    }

    /// Whether `id` is an element with local name `tag`, ignoring ASCII case.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(tag))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&s| s == id)?;
        siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.is_element(s))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&s| s == id)?;
        siblings.get(position + 1).copied()
    }

    /// Ancestor elements, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_element(id), move |&n| self.parent_element(n))
    }

    /// All descendants in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        std::iter::successors(Some(node), |&n| self.parent(n)).any(|n| n == ancestor)
    }

    /// Whether the node is attached to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// Mark an element as a pass-through container. Its element children
    /// then occupy its slot among its parent's children for structural
    /// queries: selector matching, [`Document::nth_of_type`] and
    /// [`Document::count_of_type`].
    pub fn set_passthrough(&mut self, id: NodeId, passthrough: bool) {
        if let Some(element) = self.element_mut(id) {
            element.passthrough = passthrough;
        }
    }

    pub fn is_passthrough(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.passthrough)
    }

    /// Nearest ancestor element that is not a pass-through container.
    pub fn structural_parent(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&a| !self.is_passthrough(a))
    }

    /// Element children with pass-through containers replaced by their own
    /// structural children.
    pub fn structural_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in self.element_children(id) {
            if self.is_passthrough(child) {
                out.extend(self.structural_children(child));
            } else {
                out.push(child);
            }
        }
        out
    }

    /// Element siblings of `id` in structural order, including `id`.
    ///
    /// A pass-through container itself is placed among its raw siblings.
    pub(crate) fn sibling_elements(&self, id: NodeId) -> Vec<NodeId> {
        if self.is_passthrough(id) {
            return match self.parent(id) {
                Some(parent) => self.element_children(parent).collect(),
                None => vec![id],
            };
        }
        match self.structural_parent(id) {
            Some(parent) => self.structural_children(parent),
            None => vec![id],
        }
    }

    fn same_type_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let Some(element) = self.element(id) else {
            return Vec::new();
        };
        self.sibling_elements(id)
            .into_iter()
            .filter(|&s| {
                self.element(s).is_some_and(|o| {
                    o.local_name == element.local_name && o.namespace == element.namespace
                })
            })
            .collect()
    }

    /// 1-based position among structural siblings with the same tag and
    /// namespace.
    pub fn nth_of_type(&self, id: NodeId) -> usize {
        self.same_type_siblings(id)
            .iter()
            .position(|&s| s == id)
            .map_or(1, |p| p + 1)
    }

    /// Number of structural siblings (including `id`) sharing its tag and
    /// namespace.
    pub fn count_of_type(&self, id: NodeId) -> usize {
        self.same_type_siblings(id).len().max(1)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    // ------------------------------------------------------------------
    // Creation and tree mutation
    // ------------------------------------------------------------------

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    /// Create an HTML element; the tag name is lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(
            Namespace::Html,
            None,
            tag.to_ascii_lowercase(),
        )))
    }

    /// Create an element in `namespace`. A `prefix:name` qualified name keeps
    /// its prefix separately; non-HTML names keep their case.
    pub fn create_element_ns(&mut self, namespace: Namespace, qualified_name: &str) -> NodeId {
        let (prefix, local) = match qualified_name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l),
            None => (None, qualified_name),
        };
        let local = if namespace == Namespace::Html {
            local.to_ascii_lowercase()
        } else {
            local.to_string()
        };
        self.push(NodeData::Element(ElementData::new(namespace, prefix, local)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Comment(text.to_string()))
    }

    /// Replace a text node's content.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let NodeData::Text(existing) = &mut self.nodes[id.0].data {
            *existing = text.to_string();
        }
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` before `reference` (or at the end when `None` or when
    /// `reference` is not a child of `parent`), detaching it first.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if child == parent || self.contains(child, parent) {
            return;
        }
        self.remove(child);

        let children = &mut self.nodes[parent.0].children;
        let position = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        self.mutations.push(MutationRecord::added(parent, child));
    }

    /// Insert `child` directly after `reference` under the same parent.
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let next = self.next_sibling(reference);
        self.insert_before(parent, child, next);
    }

    /// Detach a node from its parent. The node and its subtree stay addressable.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.mutations.push(MutationRecord::removed(parent, id));
    }

    /// Drain the child-list mutation log.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute. `style` replaces the inline style declarations.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        if name.eq_ignore_ascii_case("style") {
            element.inline_style = StyleMap::parse(value);
        } else {
            element.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let element = self.element_mut(id)?;
        if name.eq_ignore_ascii_case("style") {
            let text = element.inline_style.to_css_text();
            element.inline_style = StyleMap::new();
            return Some(text);
        }
        element.remove_attribute(name)
    }

    /// Non-empty `id` attribute.
    pub fn id_attribute(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id").filter(|v| !v.is_empty())
    }

    pub fn class_name(&self, id: NodeId) -> Option<ClassName<'_>> {
        self.element(id).map(|e| e.class_name())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let Some(element) = self.element_mut(id) else {
            return;
        };
        let value = match element.attribute("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        element.set_attribute("class", &value);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        let remaining: Vec<String> = element
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        if remaining.is_empty() {
            element.remove_attribute("class");
        } else {
            element.set_attribute("class", &remaining.join(" "));
        }
    }

    pub fn set_click_listener(&mut self, id: NodeId, listening: bool) {
        if let Some(element) = self.element_mut(id) {
            element.click_listener = listening;
        }
    }

    pub fn has_click_listener(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.click_listener)
    }

    // ------------------------------------------------------------------
    // Style and layout
    // ------------------------------------------------------------------

    /// Inline style value.
    pub fn style(&self, id: NodeId, prop: &str) -> Option<&str> {
        self.element(id)?.inline_style.get(prop)
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.inline_style.set(prop, value);
        }
    }

    pub fn remove_style(&mut self, id: NodeId, prop: &str) -> Option<String> {
        self.element_mut(id)?.inline_style.remove(prop)
    }

    /// Record a host-computed style value.
    pub fn set_computed_style(&mut self, id: NodeId, prop: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.computed.set(prop, value);
        }
    }

    /// Effective style value: inline declaration, then host snapshot, then
    /// the initial value for the handful of properties the engine reads.
    pub fn computed_style(&self, id: NodeId, prop: &str) -> Option<&str> {
        let element = self.element(id)?;
        element
            .inline_style
            .get(prop)
            .or_else(|| element.computed.get(prop))
            .or_else(|| {
                COMPUTED_DEFAULTS
                    .iter()
                    .find(|(p, _)| p.eq_ignore_ascii_case(prop))
                    .map(|(_, v)| *v)
            })
    }

    pub fn set_rect(&mut self, id: NodeId, rect: BoundingBox) {
        if let Some(element) = self.element_mut(id) {
            element.rect = rect;
        }
    }

    /// Rendered box; empty for non-elements.
    pub fn rect(&self, id: NodeId) -> BoundingBox {
        self.element(id).map(|e| e.rect).unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// All connected elements matching `selectors`, in document order.
    pub fn query_selector_all(&self, selectors: &str) -> Result<Vec<NodeId>, DomError> {
        let selector = Selector::parse(selectors)?;
        Ok(self.select(&selector))
    }

    /// First connected element matching `selectors`.
    pub fn query_selector(&self, selectors: &str) -> Result<Option<NodeId>, DomError> {
        let selector = Selector::parse(selectors)?;
        Ok(self
            .descendants(self.root)
            .into_iter()
            .find(|&n| selector.matches(self, n)))
    }

    /// All connected elements matching a parsed selector.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    /// First connected element whose `id` attribute equals `value`.
    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attribute(n, "id") == Some(value))
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

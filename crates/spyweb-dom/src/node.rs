//! Node storage types.

use crate::geometry::BoundingBox;
use crate::style::StyleMap;

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Handle to a node inside one [`Document`](crate::Document).
///
/// Handles are indices into the owning document's arena and stay valid for
/// the document's lifetime, including while a node is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of the node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn uri(&self) -> &'static str {
        match self {
            Namespace::Html => HTML_NAMESPACE,
            Namespace::Svg => SVG_NAMESPACE,
            Namespace::MathMl => MATHML_NAMESPACE,
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            HTML_NAMESPACE => Some(Namespace::Html),
            SVG_NAMESPACE => Some(Namespace::Svg),
            MATHML_NAMESPACE => Some(Namespace::MathMl),
            _ => None,
        }
    }
}

/// An element's `className`, in the shape the page exposes it.
///
/// HTML elements expose a plain string; SVG elements expose an animated
/// string whose base value holds the class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassName<'a> {
    Plain(&'a str),
    Animated { base_val: &'a str, anim_val: &'a str },
}

impl<'a> ClassName<'a> {
    /// The class list text regardless of representation.
    pub fn as_str(&self) -> &'a str {
        match self {
            ClassName::Plain(value) => value,
            ClassName::Animated { base_val, .. } => base_val,
        }
    }
}

/// Element payload.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub(crate) local_name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) namespace: Namespace,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) inline_style: StyleMap,
    pub(crate) computed: StyleMap,
    pub(crate) rect: BoundingBox,
    pub(crate) click_listener: bool,
    pub(crate) passthrough: bool,
}

impl ElementData {
    pub(crate) fn new(namespace: Namespace, prefix: Option<String>, local_name: String) -> Self {
        Self {
            local_name,
            prefix,
            namespace,
            attributes: Vec::new(),
            inline_style: StyleMap::new(),
            computed: StyleMap::new(),
            rect: BoundingBox::default(),
            click_listener: false,
            passthrough: false,
        }
    }

    /// Unprefixed tag name; lowercase for HTML elements.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Tag name as written, including any namespace prefix.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn is_html(&self) -> bool {
        self.namespace == Namespace::Html
    }

    pub fn is_svg(&self) -> bool {
        self.namespace == Namespace::Svg
    }

    /// Whether the element's local name equals `name`, ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.local_name.eq_ignore_ascii_case(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// The element's `className` in its page representation.
    pub fn class_name(&self) -> ClassName<'_> {
        let value = self.attribute("class").unwrap_or("");
        if self.is_svg() {
            ClassName::Animated {
                base_val: value,
                anim_val: value,
            }
        } else {
            ClassName::Plain(value)
        }
    }

    /// Individual class tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn inline_style(&self) -> &StyleMap {
        &self.inline_style
    }

    /// Host-provided computed style snapshot.
    pub fn computed_style(&self) -> &StyleMap {
        &self.computed
    }

    pub fn rect(&self) -> BoundingBox {
        self.rect
    }

    pub fn has_click_listener(&self) -> bool {
        self.click_listener
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).1)
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

//! CSS selector parsing and matching over [`Document`], plus identifier
//! escaping, backed by the `selectors` and `cssparser` crates.

use std::borrow::Borrow;
use std::fmt;

use cssparser::{ParserInput, ToCss};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::context::QuirksMode;
use selectors::matching::{
    ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, SelectorCaches, matches_selector,
};
use selectors::parser::{ParseRelative, SelectorImpl, SelectorList, SelectorParseErrorKind};
use selectors::{Element, OpaqueElement};

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;

/// String atom used for every selector component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssString(pub String);

impl From<&str> for CssString {
    fn from(s: &str) -> Self {
        CssString(s.to_string())
    }
}

impl std::ops::Deref for CssString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CssString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl ToCss for CssString {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        dest.write_str(&self.0)
    }
}

impl precomputed_hash::PrecomputedHash for CssString {
    fn precomputed_hash(&self) -> u32 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpywebSelectorImpl;

impl SelectorImpl for SpywebSelectorImpl {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssString;
    type LocalName = CssString;
    type NamespacePrefix = CssString;
    type NamespaceUrl = CssString;
    type BorrowedLocalName = str;
    type BorrowedNamespaceUrl = str;

    type NonTSPseudoClass = PseudoClass;
    type PseudoElement = PseudoElement;
}

/// Non tree-structural pseudo-classes. Persisted selectors never carry
/// state pseudo-classes such as `:hover`, so none are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {}

impl selectors::parser::NonTSPseudoClass for PseudoClass {
    type Impl = SpywebSelectorImpl;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl ToCss for PseudoClass {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoElement {}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = SpywebSelectorImpl;
}

impl ToCss for PseudoElement {
    fn to_css<W>(&self, _dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {}
    }
}

/// Parser hooks; the defaults reject every non-standard pseudo-class.
struct SpywebParser;

impl<'i> selectors::parser::Parser<'i> for SpywebParser {
    type Impl = SpywebSelectorImpl;
    type Error = SelectorParseErrorKind<'i>;
}

/// A parsed selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    list: SelectorList<SpywebSelectorImpl>,
}

impl Selector {
    /// Parse a comma-separated selector list.
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let mut parser_input = ParserInput::new(input);
        let mut parser = cssparser::Parser::new(&mut parser_input);
        let list = parser
            .parse_entirely(|p| SelectorList::parse(&SpywebParser, p, ParseRelative::No))
            .map_err(|err| DomError::invalid_selector(input, format!("{:?}", err.kind)))?;
        Ok(Self { list })
    }

    /// Whether the element `node` matches any selector of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if !doc.is_element(node) {
            return false;
        }
        let element = ElementRef { doc, id: node };
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.list
            .slice()
            .iter()
            .any(|selector| matches_selector(selector, 0, None, &element, &mut context))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An element handle the matcher walks.
///
/// Tree navigation goes through the document's structural view, so an
/// element inside a pass-through container is matched as if it sat in
/// the container's place.
#[derive(Debug, Clone, Copy)]
struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    fn at(&self, id: NodeId) -> Self {
        ElementRef { doc: self.doc, id }
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.doc.attribute(self.id, name)
    }

    fn is_html(&self) -> bool {
        self.doc.element(self.id).is_some_and(|e| e.is_html())
    }
}

impl<'a> Element for ElementRef<'a> {
    type Impl = SpywebSelectorImpl;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.doc.node(self.id))
    }

    fn parent_element(&self) -> Option<Self> {
        self.doc.structural_parent(self.id).map(|p| self.at(p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.doc.sibling_elements(self.id);
        let position = siblings.iter().position(|&s| s == self.id)?;
        position.checked_sub(1).map(|p| self.at(siblings[p]))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.doc.sibling_elements(self.id);
        let position = siblings.iter().position(|&s| s == self.id)?;
        siblings.get(position + 1).map(|&s| self.at(s))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.doc
            .structural_children(self.id)
            .first()
            .map(|&c| self.at(c))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.is_html()
    }

    fn has_local_name(&self, local_name: &str) -> bool {
        self.doc.element(self.id).is_some_and(|e| {
            if e.is_html() {
                e.local_name().eq_ignore_ascii_case(local_name)
            } else {
                e.local_name() == local_name
            }
        })
    }

    fn has_namespace(&self, ns: &str) -> bool {
        self.doc
            .element(self.id)
            .is_some_and(|e| ns.is_empty() || e.namespace().uri() == ns)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.doc.element(self.id), other.doc.element(other.id)) {
            (Some(a), Some(b)) => a.namespace() == b.namespace() && a.local_name() == b.local_name(),
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssString>,
        local_name: &CssString,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes are stored without namespaces.
        if let NamespaceConstraint::Specific(url) = ns {
            if !url.is_empty() {
                return false;
            }
        }
        let Some(actual) = self.attribute(local_name) else {
            return false;
        };
        match operation {
            AttrSelectorOperation::Exists => true,
            AttrSelectorOperation::WithValue {
                operator,
                case_sensitivity,
                value,
            } => operator.eval_str(actual, value, *case_sensitivity),
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        pseudo: &PseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pseudo {}
    }

    fn match_pseudo_element(
        &self,
        pseudo: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        match *pseudo {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        let Some(element) = self.doc.element(self.id) else {
            return false;
        };
        element.attribute("href").is_some()
            && (element.is("a") || element.is("area") || element.is("link"))
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn assigned_slot(&self) -> Option<Self> {
        None
    }

    fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.doc
            .element(self.id)
            .and_then(|e| e.id())
            .is_some_and(|actual| case_sensitivity.eq(actual.as_bytes(), id.as_bytes()))
    }

    fn has_class(&self, class: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.doc.element(self.id).is_some_and(|e| {
            e.classes()
                .any(|c| case_sensitivity.eq(c.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssString) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssString) -> Option<CssString> {
        None
    }

    fn is_part(&self, _name: &CssString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.doc.children(self.id).iter().all(|&child| {
            !self.doc.is_element(child) && self.doc.text(child).is_none_or(str::is_empty)
        })
    }

    fn is_root(&self) -> bool {
        self.doc.document_element() == Some(self.id)
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}

/// Escape a string for use as a CSS identifier.
pub fn css_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    // Writing into a String cannot fail.
    let _ = cssparser::serialize_identifier(value, &mut out);
    out
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;

//! The node tree: elements, escaped text and raw markup.
//!
//! Every node carries a [`NodeId`] that is unique for the lifetime of the
//! process. Containers remove children by id, and cloning a node gives the
//! clone (and each of its descendants) fresh ids.
//!
//! # Example
//!
//! ```rust
//! use htmlgen::{Content, Element, Node, tags};
//!
//! let mut p = Element::with_content(
//!     &tags::P,
//!     [Content::text("Hello, "), Content::raw("<b>world</b>")],
//! )
//! .unwrap();
//! p.attrs.set("id", "greeting").unwrap();
//!
//! assert_eq!(p.to_html(), r#"<p id="greeting">Hello, <b>world</b></p>"#);
//! ```

use facet::Facet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Stem;
use crate::attrs::{AttrValue, Attributes};
use crate::children::{Content, HtmlChildren};
use crate::tags::{self, TagDescriptor};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Facet)]
#[facet(transparent)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while building or mutating a tree.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum DomError {
    /// invalid attribute name `{name}`
    InvalidAttributeName { name: String },

    /// invalid tag name `{tag}`
    InvalidTagName { tag: String },

    /// `{tag}` is a void element and cannot have children
    VoidElementHasNoChildren { tag: String },

    /// child not found in container
    ChildNotFound,
}

/// Text content, escaped when rendered.
#[derive(Debug, Facet)]
pub struct TextNode {
    id: NodeId,
    pub text: Stem,
}

impl TextNode {
    pub fn new(text: impl Into<Stem>) -> Self {
        Self {
            id: NodeId::next(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Clone for TextNode {
    fn clone(&self) -> Self {
        Self::new(self.text.clone())
    }
}

impl PartialEq for TextNode {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// Markup emitted verbatim. The caller vouches that it is well-formed.
#[derive(Debug, Facet)]
pub struct RawNode {
    id: NodeId,
    pub html: Stem,
}

impl RawNode {
    pub fn new(html: impl Into<Stem>) -> Self {
        Self {
            id: NodeId::next(),
            html: html.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Clone for RawNode {
    fn clone(&self) -> Self {
        Self::new(self.html.clone())
    }
}

impl PartialEq for RawNode {
    fn eq(&self, other: &Self) -> bool {
        self.html == other.html
    }
}

/// A node in the tree.
///
/// Equality is structural: ids are ignored.
#[derive(Debug, Clone, PartialEq, Facet)]
#[repr(u8)]
pub enum Node {
    /// An element node
    Element(Element),
    /// A text node
    Text(TextNode),
    /// A raw markup node
    Raw(RawNode),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<Stem>) -> Self {
        Node::Text(TextNode::new(text))
    }

    /// Create a raw markup node.
    pub fn raw(html: impl Into<Stem>) -> Self {
        Node::Raw(RawNode::new(html))
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Element(e) => e.id(),
            Node::Text(t) => t.id(),
            Node::Raw(r) => r.id(),
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Returns true if this is an element with the given tag name.
    pub fn is_element_named(&self, tag: &str) -> bool {
        matches!(self, Node::Element(e) if e.tag().eq_ignore_ascii_case(tag))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Returns true if this is a raw markup node.
    pub fn is_raw(&self) -> bool {
        matches!(self, Node::Raw(_))
    }

    /// Get as element reference.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as mutable element reference.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get the payload of a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    /// Get the payload of a raw node.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Node::Raw(r) => Some(&r.html),
            _ => None,
        }
    }

    /// Text and raw payloads of this node and all descendants, concatenated.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Raw(r) => out.push_str(&r.html),
            Node::Element(e) => {
                for child in e.children() {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<TextNode> for Node {
    fn from(t: TextNode) -> Self {
        Node::Text(t)
    }
}

impl From<RawNode> for Node {
    fn from(r: RawNode) -> Self {
        Node::Raw(r)
    }
}

/// An element: a tag name, attributes and, unless void, children.
#[derive(Debug, Facet)]
pub struct Element {
    id: NodeId,
    tag: Stem,
    /// Attributes of this element.
    pub attrs: Attributes,
    /// `None` exactly when the element is void.
    children: Option<HtmlChildren>,
}

impl Element {
    /// Create an element from a catalog descriptor, applying its default attributes.
    pub fn new(descriptor: &TagDescriptor) -> Self {
        let mut attrs = Attributes::new();
        for default in descriptor.default_attrs {
            attrs.insert(Stem::from_static(default.name), default.value.to_value());
        }
        Self {
            id: NodeId::next(),
            tag: Stem::from_static(descriptor.tag),
            attrs,
            children: (!descriptor.is_void).then(HtmlChildren::new),
        }
    }

    /// Create an element and append the given content in order.
    ///
    /// Equivalent to [`Element::new`] followed by one [`Element::append`]
    /// per item.
    pub fn with_content<I, C>(descriptor: &TagDescriptor, content: I) -> Result<Self, DomError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut elem = Self::new(descriptor);
        elem.extend(content)?;
        Ok(elem)
    }

    /// Create an element that is not in the tag catalog.
    ///
    /// The tag must start with an ASCII letter and continue with ASCII
    /// alphanumerics or `-`.
    pub fn custom(tag: impl Into<Stem>, is_void: bool) -> Result<Self, DomError> {
        let tag = tag.into();
        if !tags::is_valid_tag_name(&tag) {
            return Err(DomError::InvalidTagName {
                tag: tag.to_string(),
            });
        }
        Ok(Self {
            id: NodeId::next(),
            tag,
            attrs: Attributes::new(),
            children: (!is_void).then(HtmlChildren::new),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_void(&self) -> bool {
        self.children.is_none()
    }

    /// Whether this element was built from (or matches) the given descriptor.
    pub fn is(&self, descriptor: &TagDescriptor) -> bool {
        self.tag.eq_ignore_ascii_case(descriptor.tag) && self.is_void() == descriptor.is_void
    }

    /// Builder-style attribute setter.
    pub fn attr(
        mut self,
        name: impl Into<Stem>,
        value: impl Into<AttrValue>,
    ) -> Result<Self, DomError> {
        self.attrs.set(name, value)?;
        Ok(self)
    }

    /// Append a node or raw string, returning the id of the new child.
    pub fn append(&mut self, content: impl Into<Content>) -> Result<NodeId, DomError> {
        Ok(self.children_or_err()?.append(content))
    }

    /// Append several nodes or raw strings, preserving their order.
    ///
    /// Extending a void element with nothing is not an error.
    pub fn extend<I, C>(&mut self, content: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        let mut content = content.into_iter().peekable();
        if content.peek().is_none() {
            return Ok(());
        }
        let children = self.children_or_err()?;
        for item in content {
            children.append(item);
        }
        Ok(())
    }

    /// Append a string without escaping it.
    pub fn append_raw(&mut self, html: impl Into<Stem>) -> Result<NodeId, DomError> {
        Ok(self.children_or_err()?.append_raw(html))
    }

    /// Remove a direct child by id.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, DomError> {
        match &mut self.children {
            Some(children) => children.remove(id),
            None => Err(DomError::ChildNotFound),
        }
    }

    /// Remove the first raw child whose payload equals `html`.
    pub fn remove_raw(&mut self, html: &str) -> Result<Node, DomError> {
        match &mut self.children {
            Some(children) => children.remove_raw(html),
            None => Err(DomError::ChildNotFound),
        }
    }

    /// The children in order. Always empty for void elements.
    pub fn children(&self) -> &[Node] {
        match &self.children {
            Some(children) => children.as_slice(),
            None => &[],
        }
    }

    /// The child container, or `None` for void elements.
    pub fn children_mut(&mut self) -> Option<&mut HtmlChildren> {
        self.children.as_mut()
    }

    /// Returns true if the element has no children.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Text and raw payloads of all descendants, concatenated.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            child.collect_text(&mut out);
        }
        out
    }

    fn children_or_err(&mut self) -> Result<&mut HtmlChildren, DomError> {
        match &mut self.children {
            Some(children) => Ok(children),
            None => Err(DomError::VoidElementHasNoChildren {
                tag: self.tag.to_string(),
            }),
        }
    }
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::next(),
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children: self.children.clone(),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.attrs == other.attrs && self.children == other.children
    }
}

/// A complete HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The DOCTYPE declaration (e.g., "html" for `<!DOCTYPE html>`)
    pub doctype: Option<Stem>,
    /// The root html element
    pub root: Element,
}

impl Document {
    /// Create a new document with the given root element.
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            root,
        }
    }

    /// Create a new HTML5 document with empty head and body elements.
    pub fn html5() -> Self {
        let mut html = tags::html();
        if let Some(children) = html.children_mut() {
            children.append(tags::head());
            children.append(tags::body());
        }
        Self {
            doctype: Some(Stem::from_static("html")),
            root: html,
        }
    }

    /// Get the head element if present.
    pub fn head(&self) -> Option<&Element> {
        self.root
            .children()
            .iter()
            .filter_map(Node::as_element)
            .find(|e| e.is(&tags::HEAD))
    }

    pub fn head_mut(&mut self) -> Option<&mut Element> {
        self.root
            .children_mut()?
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.is(&tags::HEAD))
    }

    /// Get the body element if present.
    pub fn body(&self) -> Option<&Element> {
        self.root
            .children()
            .iter()
            .filter_map(Node::as_element)
            .find(|e| e.is(&tags::BODY))
    }

    /// Get mutable reference to the body element.
    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.root
            .children_mut()?
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.is(&tags::BODY))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::html5()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Node>();
    assert_sync::<Node>();
};

// =============================================================================
// Tests
// =============================================================================

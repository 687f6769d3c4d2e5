//! Ordered child containers.
//!
//! [`Children`] holds nodes only. [`HtmlChildren`], which every non-void
//! [`Element`] owns, also takes bare strings and stores them as raw markup.

use facet::Facet;
use std::ops::{Deref, DerefMut};

use crate::Stem;
use crate::dom::{DomError, Element, Node, NodeId, RawNode, TextNode};
use crate::tracing_macros::trace;

/// Anything that can be appended to an element: a node, or a raw string.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Node(Node),
    /// Markup appended verbatim.
    Raw(Stem),
}

impl Content {
    /// Escaped text content.
    pub fn text(text: impl Into<Stem>) -> Self {
        Content::Node(Node::text(text))
    }

    /// Raw markup content.
    pub fn raw(html: impl Into<Stem>) -> Self {
        Content::Raw(html.into())
    }

    fn into_node(self) -> Node {
        match self {
            Content::Node(node) => node,
            Content::Raw(html) => Node::raw(html),
        }
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Node(node)
    }
}

impl From<Element> for Content {
    fn from(elem: Element) -> Self {
        Content::Node(Node::Element(elem))
    }
}

impl From<TextNode> for Content {
    fn from(text: TextNode) -> Self {
        Content::Node(Node::Text(text))
    }
}

impl From<RawNode> for Content {
    fn from(raw: RawNode) -> Self {
        Content::Node(Node::Raw(raw))
    }
}

impl From<&str> for Content {
    fn from(html: &str) -> Self {
        Content::Raw(html.into())
    }
}

impl From<String> for Content {
    fn from(html: String) -> Self {
        Content::Raw(html.into())
    }
}

impl From<Stem> for Content {
    fn from(html: Stem) -> Self {
        Content::Raw(html)
    }
}

/// An ordered sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq, Facet)]
pub struct Children {
    nodes: Vec<Node>,
}

impl Children {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node, returning its id.
    pub fn append(&mut self, node: impl Into<Node>) -> NodeId {
        let node = node.into();
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Append several nodes, preserving their order.
    pub fn extend<I, N>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
    }

    /// Remove the child with the given id and hand it back.
    ///
    /// Fails with [`DomError::ChildNotFound`] if no direct child has that id.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, DomError> {
        let pos = self.position(id).ok_or(DomError::ChildNotFound)?;
        trace!(%id, pos, "removing child");
        Ok(self.nodes.remove(pos))
    }

    /// Index of the child with the given id.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all children.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl IntoIterator for Children {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<N: Into<Node>> FromIterator<N> for Children {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The child container of an element.
///
/// Derefs to [`Children`] for everything that works on nodes.
#[derive(Debug, Clone, Default, PartialEq, Facet)]
pub struct HtmlChildren {
    inner: Children,
}

impl HtmlChildren {
    pub fn new() -> Self {
        Self {
            inner: Children::new(),
        }
    }

    /// Append a node or a raw string, returning the id of the new child.
    pub fn append(&mut self, content: impl Into<Content>) -> NodeId {
        self.inner.append(content.into().into_node())
    }

    /// Append a string without escaping it.
    pub fn append_raw(&mut self, html: impl Into<Stem>) -> NodeId {
        self.inner.append(Node::raw(html))
    }

    /// Append several strings without escaping them.
    pub fn extend_raw<I, S>(&mut self, html: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Stem>,
    {
        self.inner.extend(html.into_iter().map(Node::raw));
    }

    /// Remove the first raw child whose payload equals `html`.
    pub fn remove_raw(&mut self, html: &str) -> Result<Node, DomError> {
        let pos = self
            .inner
            .nodes
            .iter()
            .position(|n| n.as_raw() == Some(html))
            .ok_or(DomError::ChildNotFound)?;
        trace!(pos, "removing raw child");
        Ok(self.inner.nodes.remove(pos))
    }
}

impl Deref for HtmlChildren {
    type Target = Children;

    fn deref(&self) -> &Children {
        &self.inner
    }
}

impl DerefMut for HtmlChildren {
    fn deref_mut(&mut self) -> &mut Children {
        &mut self.inner
    }
}

/// Interleave `pieces` with an escaped `glue` text node.
///
/// `join(", ", ["a", "b"])` yields raw `a`, text `, `, raw `b`.
pub fn join<I, C>(glue: &str, pieces: I) -> Children
where
    I: IntoIterator<Item = C>,
    C: Into<Content>,
{
    join_with(|| Node::text(glue), pieces)
}

/// Interleave `pieces` with `glue` emitted verbatim.
pub fn join_raw<I, C>(glue: &str, pieces: I) -> Children
where
    I: IntoIterator<Item = C>,
    C: Into<Content>,
{
    join_with(|| Node::raw(glue), pieces)
}

fn join_with<I, C>(glue: impl Fn() -> Node, pieces: I) -> Children
where
    I: IntoIterator<Item = C>,
    C: Into<Content>,
{
    let mut out = Children::new();
    for (i, piece) in pieces.into_iter().enumerate() {
        if i > 0 {
            out.append(glue());
        }
        out.append(piece.into().into_node());
    }
    out
}

//! Deterministic markup renderer.
//!
//! - Text is escaped (`&`, `<`, `>`, `"`, `'`)
//! - Raw nodes are written verbatim
//! - Attributes are written in ascending name order, values escaped and
//!   double-quoted; true booleans are bare names, false booleans are dropped
//! - Void elements are self-closed and never get end tags
//! - Whitespace is written exactly as built

use crate::attrs::AttrValue;
use crate::children::Children;
use crate::dom::{Document, Element, Node};
use crate::escape::escape;
use std::fmt::Write;

/// How void elements are closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoidStyle {
    /// `<br/>`
    #[default]
    SelfClosing,
    /// `<br>`
    Html5,
}

/// Options for rendering.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// How void elements are closed (default: self-closing).
    pub void_style: VoidStyle,
}

impl RenderOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close void elements the HTML5 way, without a slash.
    pub fn html5_void(mut self) -> Self {
        self.void_style = VoidStyle::Html5;
        self
    }
}

/// Render a node with default options.
pub fn render(node: &Node) -> String {
    render_with(node, &RenderOptions::default())
}

/// Render a node with custom options.
pub fn render_with(node: &Node, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, opts);
    renderer.write_node(node);
    out
}

/// Render an element and its children.
pub fn render_element(elem: &Element, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, opts);
    renderer.write_element(elem);
    out
}

/// Render a slice of nodes back to back.
pub fn render_fragment(nodes: &[Node], opts: &RenderOptions) -> String {
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, opts);
    for node in nodes {
        renderer.write_node(node);
    }
    out
}

/// Render a document, doctype first.
pub fn render_document(doc: &Document, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let mut renderer = Renderer::new(&mut out, opts);
    renderer.write_document(doc);
    out
}

struct Renderer<'a, W: Write> {
    out: &'a mut W,
    options: &'a RenderOptions,
}

impl<'a, W: Write> Renderer<'a, W> {
    fn new(out: &'a mut W, options: &'a RenderOptions) -> Self {
        Self { out, options }
    }

    fn write_escaped(&mut self, text: &str) {
        let _ = self.out.write_str(&escape(text));
    }

    fn write_attr(&mut self, name: &str, value: &AttrValue) {
        match value {
            AttrValue::Bool(false) => {}
            AttrValue::Bool(true) => {
                let _ = write!(self.out, " {}", name);
            }
            AttrValue::Str(s) => {
                let _ = write!(self.out, " {}=\"", name);
                self.write_escaped(s);
                let _ = self.out.write_char('"');
            }
            AttrValue::Number(n) => {
                // Numbers never contain markup-significant characters.
                let _ = write!(self.out, " {}=\"{}\"", name, n);
            }
        }
    }

    fn write_document(&mut self, doc: &Document) {
        if let Some(doctype) = &doc.doctype {
            let _ = write!(self.out, "<!DOCTYPE {}>", doctype);
        }
        self.write_element(&doc.root);
    }

    fn write_element(&mut self, elem: &Element) {
        let tag = elem.tag();

        let _ = write!(self.out, "<{}", tag);
        for (name, value) in elem.attrs.sorted() {
            self.write_attr(name, value);
        }

        if elem.is_void() {
            let _ = match self.options.void_style {
                VoidStyle::SelfClosing => self.out.write_str("/>"),
                VoidStyle::Html5 => self.out.write_char('>'),
            };
            return;
        }

        let _ = self.out.write_char('>');
        for child in elem.children() {
            self.write_node(child);
        }
        let _ = write!(self.out, "</{}>", tag);
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(elem) => self.write_element(elem),
            Node::Text(text) => self.write_escaped(&text.text),
            Node::Raw(raw) => {
                let _ = self.out.write_str(&raw.html);
            }
        }
    }
}

// =============================================================================
// Convenience methods
// =============================================================================

impl Node {
    /// Render this node with default options.
    pub fn to_html(&self) -> String {
        render(self)
    }

    /// Render this node with custom options.
    pub fn to_html_with_options(&self, opts: &RenderOptions) -> String {
        render_with(self, opts)
    }
}

impl Element {
    /// Render this element with default options.
    pub fn to_html(&self) -> String {
        render_element(self, &RenderOptions::default())
    }

    /// Render this element with custom options.
    pub fn to_html_with_options(&self, opts: &RenderOptions) -> String {
        render_element(self, opts)
    }
}

impl Children {
    /// Render these nodes back to back with default options.
    pub fn to_html(&self) -> String {
        render_fragment(self.as_slice(), &RenderOptions::default())
    }
}

impl Document {
    /// Render this document with default options.
    pub fn to_html(&self) -> String {
        render_document(self, &RenderOptions::default())
    }

    /// Render this document with custom options.
    pub fn to_html_with_options(&self, opts: &RenderOptions) -> String {
        render_document(self, opts)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children::{Content, join};
    use crate::escape::unescape;
    use crate::tags;

    #[test]
    fn test_void_elements() {
        let mut div = tags::div();
        div.append(tags::br()).unwrap();
        div.append(tags::hr()).unwrap();

        assert_eq!(div.to_html(), "<div><br/><hr/></div>");
        assert_eq!(
            div.to_html_with_options(&RenderOptions::new().html5_void()),
            "<div><br><hr></div>"
        );
    }

    #[test]
    fn test_img_closure() {
        let mut img = tags::img().attr("src", "a.png").unwrap();
        assert!(img.append(Node::text("x")).is_err());
        assert!(img.append_raw("x").is_err());
        assert_eq!(img.to_html(), r#"<img src="a.png"/>"#);
    }

    #[test]
    fn test_text_escaping() {
        let mut p = tags::p();
        p.append(Node::text("<script>alert('xss')</script>")).unwrap();

        assert_eq!(
            p.to_html(),
            "<p>&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_raw_is_verbatim() {
        let mut p = tags::p();
        p.append("<em>a & b</em>").unwrap();
        assert_eq!(p.to_html(), "<p><em>a & b</em></p>");
    }

    #[test]
    fn test_attribute_escaping() {
        let a = tags::a()
            .attr("href", "test?a=1&b=2")
            .unwrap()
            .attr("title", "Say \"hello\"")
            .unwrap();

        assert_eq!(
            a.to_html(),
            r#"<a href="test?a=1&amp;b=2" title="Say &quot;hello&quot;"></a>"#
        );
    }

    #[test]
    fn test_attribute_order() {
        let mut div = tags::div();
        div.attrs.set("class", "c").unwrap();
        div.attrs.set("id", "i").unwrap();
        div.attrs.set_data("x", "d").unwrap();

        assert_eq!(div.to_html(), r#"<div class="c" data-x="d" id="i"></div>"#);
    }

    #[test]
    fn test_boolean_and_numeric_attributes() {
        let mut input = tags::input();
        input.attrs.set("disabled", false).unwrap();
        input.attrs.set("required", true).unwrap();
        input.attrs.set("step", 1.50).unwrap();
        input.attrs.set("maxlength", 10).unwrap();

        assert_eq!(
            input.to_html(),
            r#"<input maxlength="10" required step="1.5" type="text"/>"#
        );
    }

    #[test]
    fn test_whitespace_preserved() {
        let mut pre = tags::pre();
        pre.append(Node::text("  a\n\n\tb  ")).unwrap();
        pre.append("  \n").unwrap();
        assert_eq!(pre.to_html(), "<pre>  a\n\n\tb    \n</pre>");
    }

    #[test]
    fn test_text_roundtrip() {
        let s = "Tom & Jerry's <\"adventure\">";
        let html = Node::text(s).to_html();
        assert_eq!(unescape(&html), s);
    }

    #[test]
    fn test_variadic_matches_append() {
        let mut em = tags::em();
        em.append(Node::text("inner")).unwrap();

        let built = Element::with_content(
            &tags::P,
            [
                Content::text("a < b"),
                Content::from(em.clone()),
                Content::text(" tail"),
            ],
        );
        let built = built.unwrap();

        let mut appended = tags::p();
        appended.append(Node::text("a < b")).unwrap();
        appended.append(em).unwrap();
        appended.append(Node::text(" tail")).unwrap();

        assert_eq!(built.to_html(), appended.to_html());
        assert_eq!(built.to_html(), "<p>a &lt; b<em>inner</em> tail</p>");
    }

    #[test]
    fn test_document_serialization() {
        let doc = Document::html5();
        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html><html><head></head><body></body></html>"
        );
    }

    #[test]
    fn test_join_rendering() {
        let joined = join(" & ", ["<Hello>", "<World>"]);
        assert_eq!(joined.to_html(), "<Hello> &amp; <World>");
    }

    #[test]
    fn test_rendering_does_not_mutate() {
        let mut div = tags::div();
        div.attrs.set("b", "2").unwrap();
        div.attrs.set("a", "1").unwrap();
        let before = div.clone();
        let _ = div.to_html();
        let order: Vec<&str> = div.attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["b", "a"]);
        assert_eq!(div, before);
    }
}

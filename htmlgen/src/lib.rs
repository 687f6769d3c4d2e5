//! Build HTML trees in code and render them to markup.
//!
//! htmlgen provides:
//! - **DOM**: an owned Element/Node tree with identity-based child removal
//! - **Tag catalog**: one factory per HTML tag, with void elements enforced
//! - **Rendering**: deterministic serialization with escaping and sorted attributes
//! - **Forms**: `application/x-www-form-urlencoded` and `multipart/form-data`
//!   submission encoding
//!
//! # Example
//!
//! ```rust
//! use htmlgen::{Content, Element, Node, tags};
//!
//! let mut list = tags::ul().attr("class", "menu").unwrap();
//! for item in ["Home", "About & Contact"] {
//!     let mut li = tags::li();
//!     li.append(Node::text(item)).unwrap();
//!     list.append(li).unwrap();
//! }
//!
//! assert_eq!(
//!     list.to_html(),
//!     r#"<ul class="menu"><li>Home</li><li>About &amp; Contact</li></ul>"#
//! );
//!
//! // Bare strings are raw markup.
//! let p = Element::with_content(&tags::P, [Content::text("a < b"), Content::raw("<br/>")]).unwrap();
//! assert_eq!(p.to_html(), "<p>a &lt; b<br/></p>");
//! ```

mod tracing_macros;

pub mod attrs;
pub mod children;
pub mod dom;
pub mod escape;
pub mod form;
pub mod render;
mod stem;
pub mod tags;

pub use stem::Stem;

// Re-export tree types at crate root for convenience
pub use attrs::{AttrValue, Attributes, Number};
pub use children::{Children, Content, HtmlChildren, join, join_raw};
pub use dom::{Document, DomError, Element, Node, NodeId, RawNode, TextNode};
pub use tags::TagDescriptor;

// Re-export rendering
pub use escape::{escape, unescape};
pub use render::{
    RenderOptions, VoidStyle, render, render_document, render_element, render_fragment,
    render_with,
};

// Re-export form encoding
pub use form::{EncryptionType, Form, FormError, FormMethod, Submission, encode};

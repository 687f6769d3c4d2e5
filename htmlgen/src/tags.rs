//! The tag catalog.
//!
//! Each concrete tag is plain data: a [`TagDescriptor`] constant giving its
//! name, whether it is void, and the attributes a fresh element starts with.
//! A factory function per tag builds an [`Element`] from the descriptor.
//!
//! Elements are organized by category:
//! - **Document**: [`html`], [`head`], [`body`]
//! - **Metadata**: [`title`], [`base`], [`link`], [`meta`], [`style`]
//! - **Sections**: [`header`], [`footer`], [`main`], [`article`], [`section`], [`nav`], [`aside`]
//! - **Headings**: [`h1`], [`h2`], [`h3`], [`h4`], [`h5`], [`h6`]
//! - **Grouping**: [`p`], [`div`], [`pre`], [`blockquote`], [`ol`], [`ul`], [`li`], [`dl`], [`dt`], [`dd`], [`hr`]
//! - **Text-level**: [`a`], [`span`], [`em`], [`strong`], [`code`], [`small`], [`b`], [`i`], [`br`], [`wbr`]
//! - **Embedded**: [`img`], [`iframe`], [`embed`], [`video`], [`audio`], [`source`], [`track`], [`picture`], [`area`]
//! - **Tables**: [`table`], [`caption`], [`colgroup`], [`col`], [`thead`], [`tbody`], [`tfoot`], [`tr`], [`th`], [`td`]
//! - **Forms**: [`form`], [`fieldset`], [`legend`], [`label`], [`input`], [`button`], [`select`], [`optgroup`], [`option`], [`textarea`]
//! - **Interactive**: [`details`], [`summary`], [`dialog`]
//! - **Scripting**: [`script`], [`noscript`], [`template`], [`canvas`]

use crate::Stem;
use crate::attrs::{AttrValue, Number};
use crate::dom::Element;

/// Static description of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDescriptor {
    pub tag: &'static str,
    /// Void elements have no children and no closing tag.
    pub is_void: bool,
    pub default_attrs: &'static [DefaultAttr],
}

/// An attribute every element of a tag starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultAttr {
    pub name: &'static str,
    pub value: DefaultValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Str(&'static str),
    Flag(bool),
    Int(i64),
}

impl DefaultValue {
    pub fn to_value(self) -> AttrValue {
        match self {
            DefaultValue::Str(s) => AttrValue::Str(Stem::from_static(s)),
            DefaultValue::Flag(b) => AttrValue::Bool(b),
            DefaultValue::Int(n) => AttrValue::Number(Number::Int(n)),
        }
    }
}

/// Whether `tag` is usable as an element name: an ASCII letter followed by
/// ASCII alphanumerics or `-`.
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Find the catalog descriptor for a tag name (ASCII case-insensitive).
pub fn lookup(tag: &str) -> Option<&'static TagDescriptor> {
    REGISTRY
        .iter()
        .copied()
        .find(|d| d.tag.eq_ignore_ascii_case(tag))
}

macro_rules! define_tags {
    (@void) => { false };
    (@void $void:literal) => { $void };
    ($(
        $(#[$doc:meta])*
        $konst:ident, $func:ident => $tag:literal
            $(, void = $void:literal)?
            $(, defaults = [$($name:literal = $value:expr),* $(,)?])?;
    )*) => {
        $(
            $(#[$doc])*
            pub const $konst: TagDescriptor = TagDescriptor {
                tag: $tag,
                is_void: define_tags!(@void $($void)?),
                default_attrs: &[$($(DefaultAttr { name: $name, value: $value }),*)?],
            };

            $(#[$doc])*
            pub fn $func() -> Element {
                Element::new(&$konst)
            }
        )*

        /// Every descriptor in the catalog.
        pub static REGISTRY: &[&TagDescriptor] = &[$(&$konst),*];
    };
}

define_tags! {
    // Document
    /// The `<html>` root element.
    HTML, html => "html";
    /// The `<head>` element.
    HEAD, head => "head";
    /// The `<body>` element.
    BODY, body => "body";

    // Metadata
    /// The `<title>` element.
    TITLE, title => "title";
    /// The `<base>` element.
    BASE, base => "base", void = true;
    /// The `<link>` element.
    LINK, link => "link", void = true;
    /// The `<meta>` element.
    META, meta => "meta", void = true;
    /// The `<style>` element.
    STYLE, style => "style";

    // Sections
    HEADER, header => "header";
    FOOTER, footer => "footer";
    MAIN, main => "main";
    ARTICLE, article => "article";
    SECTION, section => "section";
    NAV, nav => "nav";
    ASIDE, aside => "aside";

    // Headings
    H1, h1 => "h1";
    H2, h2 => "h2";
    H3, h3 => "h3";
    H4, h4 => "h4";
    H5, h5 => "h5";
    H6, h6 => "h6";

    // Grouping
    /// The `<p>` paragraph element.
    P, p => "p";
    /// The `<div>` generic container.
    DIV, div => "div";
    PRE, pre => "pre";
    BLOCKQUOTE, blockquote => "blockquote";
    OL, ol => "ol";
    UL, ul => "ul";
    LI, li => "li";
    DL, dl => "dl";
    DT, dt => "dt";
    DD, dd => "dd";
    /// The `<hr>` thematic break.
    HR, hr => "hr", void = true;

    // Text-level
    /// The `<a>` anchor element.
    A, a => "a";
    SPAN, span => "span";
    EM, em => "em";
    STRONG, strong => "strong";
    CODE, code => "code";
    SMALL, small => "small";
    B, b => "b";
    I, i => "i";
    /// The `<br>` line break.
    BR, br => "br", void = true;
    WBR, wbr => "wbr", void = true;

    // Embedded
    /// The `<img>` element.
    IMG, img => "img", void = true;
    IFRAME, iframe => "iframe";
    EMBED, embed => "embed", void = true;
    VIDEO, video => "video";
    AUDIO, audio => "audio";
    SOURCE, source => "source", void = true;
    TRACK, track => "track", void = true;
    PICTURE, picture => "picture";
    AREA, area => "area", void = true;

    // Tables
    TABLE, table => "table";
    CAPTION, caption => "caption";
    COLGROUP, colgroup => "colgroup";
    COL, col => "col", void = true;
    THEAD, thead => "thead";
    TBODY, tbody => "tbody";
    TFOOT, tfoot => "tfoot";
    TR, tr => "tr";
    TH, th => "th";
    TD, td => "td";

    // Forms
    /// The `<form>` element. Submits with `GET` unless told otherwise.
    FORM, form => "form", defaults = ["method" = DefaultValue::Str("GET")];
    FIELDSET, fieldset => "fieldset";
    LEGEND, legend => "legend";
    LABEL, label => "label";
    /// The `<input>` element, a text field by default.
    INPUT, input => "input", void = true, defaults = ["type" = DefaultValue::Str("text")];
    /// The `<button>` element, a submit button by default.
    BUTTON, button => "button", defaults = ["type" = DefaultValue::Str("submit")];
    SELECT, select => "select";
    OPTGROUP, optgroup => "optgroup";
    /// The `<option>` element.
    OPTION, option => "option";
    TEXTAREA, textarea => "textarea";

    // Interactive
    DETAILS, details => "details";
    SUMMARY, summary => "summary";
    DIALOG, dialog => "dialog";

    // Scripting
    SCRIPT, script => "script";
    NOSCRIPT, noscript => "noscript";
    TEMPLATE, template => "template";
    CANVAS, canvas => "canvas";
}

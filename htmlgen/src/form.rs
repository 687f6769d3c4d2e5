//! Form submission encoding.
//!
//! [`encode`] walks a form element, collects the fields a browser would
//! submit, and produces either an `application/x-www-form-urlencoded` body or
//! a `multipart/form-data` body, depending on the form's `enctype`.
//!
//! # Example
//!
//! ```rust
//! use htmlgen::form::{Form, FormMethod};
//! use htmlgen::tags;
//!
//! let mut form = Form::new().method(FormMethod::Post).action("/search");
//! form.append(
//!     tags::input()
//!         .attr("name", "q")
//!         .unwrap()
//!         .attr("value", "rust html")
//!         .unwrap(),
//! )
//! .unwrap();
//!
//! let submission = form.encode().unwrap();
//! assert_eq!(submission.content_type, "application/x-www-form-urlencoded");
//! assert_eq!(submission.body, b"q=rust%20html");
//! ```

use facet::Facet;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use smallvec::{SmallVec, smallvec};
use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::Stem;
use crate::attrs::AttrValue;
use crate::children::Content;
use crate::dom::{DomError, Element, Node, NodeId};
use crate::escape::escape;
use crate::tags;
use crate::tracing_macros::{debug, trace};

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const FORM_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const BOUNDARY_PREFIX: &str = "htmlgen-";
const BOUNDARY_LEN: usize = 24;
const BOUNDARY_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz\
                                  ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                  0123456789";

/// Form submission method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Parse a `method` attribute value. Unknown values mean `GET`.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("post") {
            Self::Post
        } else {
            Self::Get
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form encoding type (`enctype`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum EncryptionType {
    #[default]
    UrlEncoded,
    Multipart,
}

impl EncryptionType {
    /// Parse an `enctype` attribute value. Unknown values mean URL-encoded.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("multipart/form-data") {
            Self::Multipart
        } else {
            Self::UrlEncoded
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::UrlEncoded => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
        }
    }
}

/// Errors that can occur while encoding a form.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum FormError {
    /// required field `{name}` has no value
    MissingFieldValue { name: String },
}

/// One submitted name/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: Stem,
    pub value: Stem,
}

/// An encoded form submission, ready to hand to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub method: FormMethod,
    pub action: String,
    /// Value for the `Content-Type` header.
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Submission {
    /// The request target.
    ///
    /// For a URL-encoded `GET` the body is appended as the query string,
    /// otherwise the action is returned as-is.
    pub fn url(&self) -> String {
        let is_query = self.method == FormMethod::Get
            && self.content_type == EncryptionType::UrlEncoded.content_type();
        if !is_query || self.body.is_empty() {
            return self.action.clone();
        }
        let separator = if self.action.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}",
            self.action,
            separator,
            String::from_utf8_lossy(&self.body)
        )
    }

    /// The body as text. Always valid UTF-8 since field values are strings.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Source of multipart boundary tokens.
pub trait BoundaryGenerator {
    fn generate(&mut self) -> String;
}

/// Random alphanumeric boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl BoundaryGenerator for RandomBoundary {
    fn generate(&mut self) -> String {
        let mut rng = rand::rng();
        let mut boundary = String::with_capacity(BOUNDARY_PREFIX.len() + BOUNDARY_LEN);
        boundary.push_str(BOUNDARY_PREFIX);
        boundary.extend((0..BOUNDARY_LEN).map(|_| {
            let idx = rng.random_range(0..BOUNDARY_CHARSET.len());
            BOUNDARY_CHARSET[idx] as char
        }));
        boundary
    }
}

/// Encode a form element's fields with a random multipart boundary.
pub fn encode(form: &Element) -> Result<Submission, FormError> {
    encode_with(form, &mut RandomBoundary)
}

/// Encode a form element's fields, drawing boundaries from `boundaries`.
///
/// The method, action and encoding are read from the element's `method`,
/// `action` and `enctype` attributes.
pub fn encode_with(
    form: &Element,
    boundaries: &mut impl BoundaryGenerator,
) -> Result<Submission, FormError> {
    let method = form
        .attrs
        .get_str("method")
        .map(FormMethod::parse)
        .unwrap_or_default();
    let enctype = form
        .attrs
        .get_str("enctype")
        .map(EncryptionType::parse)
        .unwrap_or_default();
    let action = form
        .attrs
        .get("action")
        .and_then(AttrValue::to_text)
        .map(|s| s.to_string())
        .unwrap_or_default();

    let fields = collect_fields(form)?;
    debug!(
        %method,
        ?enctype,
        fields = fields.len(),
        "encoding form submission"
    );

    let (content_type, body) = match enctype {
        EncryptionType::UrlEncoded => (
            enctype.content_type().to_string(),
            url_encode(&fields).into_bytes(),
        ),
        EncryptionType::Multipart => {
            let boundary = pick_boundary(&fields, boundaries);
            (
                format!("{}; boundary={}", enctype.content_type(), boundary),
                multipart_encode(&fields, &boundary).into_bytes(),
            )
        }
    };

    Ok(Submission {
        method,
        action,
        content_type,
        body,
    })
}

/// Collect the submitted name/value pairs under `form`, in document order.
pub fn collect_fields(form: &Element) -> Result<Vec<FormField>, FormError> {
    let mut fields = Vec::new();
    collect_into(form, &mut fields)?;
    Ok(fields)
}

fn collect_into(elem: &Element, out: &mut Vec<FormField>) -> Result<(), FormError> {
    for child in elem.children().iter().filter_map(Node::as_element) {
        if is_field(child) {
            collect_field(child, out)?;
        } else {
            collect_into(child, out)?;
        }
    }
    Ok(())
}

fn is_field(elem: &Element) -> bool {
    elem.is(&tags::INPUT)
        || elem.is(&tags::SELECT)
        || elem.is(&tags::TEXTAREA)
        || elem.is(&tags::BUTTON)
}

fn collect_field(field: &Element, out: &mut Vec<FormField>) -> Result<(), FormError> {
    let Some(name) = field.attrs.get_str("name").filter(|n| !n.is_empty()) else {
        return Ok(());
    };
    if field.attrs.flag("disabled") {
        trace!(name, "skipping disabled field");
        return Ok(());
    }

    let required = field.attrs.flag("required");
    let missing = || FormError::MissingFieldValue {
        name: name.to_string(),
    };

    let values: SmallVec<[Stem; 1]> = if field.is(&tags::INPUT) {
        match input_value(field) {
            InputValue::Skip => smallvec![],
            InputValue::Value(v) => smallvec![v],
            InputValue::Missing if required => return Err(missing()),
            InputValue::Missing => smallvec![Stem::new()],
        }
    } else if field.is(&tags::BUTTON) {
        match control_type(field).as_str() {
            "reset" | "button" => smallvec![],
            _ => smallvec![attr_text(field, "value").unwrap_or_default()],
        }
    } else if field.is(&tags::TEXTAREA) {
        let text = field.text_content();
        if text.is_empty() && required {
            return Err(missing());
        }
        smallvec![Stem::from(text)]
    } else {
        let selected = selected_options(field);
        if selected.is_empty() && required {
            return Err(missing());
        }
        selected
    };

    for value in values {
        trace!(name, value = %value, "collected field");
        out.push(FormField {
            name: Stem::from(name),
            value,
        });
    }
    Ok(())
}

enum InputValue {
    Skip,
    Value(Stem),
    Missing,
}

fn input_value(input: &Element) -> InputValue {
    match control_type(input).as_str() {
        "checkbox" | "radio" => {
            if input.attrs.flag("checked") {
                InputValue::Value(
                    attr_text(input, "value").unwrap_or_else(|| Stem::from_static("on")),
                )
            } else {
                InputValue::Skip
            }
        }
        "reset" | "button" | "file" | "image" => InputValue::Skip,
        _ => match attr_text(input, "value") {
            Some(v) => InputValue::Value(v),
            None => InputValue::Missing,
        },
    }
}

fn control_type(elem: &Element) -> String {
    elem.attrs
        .get_str("type")
        .unwrap_or_default()
        .to_ascii_lowercase()
}

fn attr_text(elem: &Element, name: &str) -> Option<Stem> {
    elem.attrs.get(name).and_then(AttrValue::to_text)
}

struct OptionState {
    value: Stem,
    selected: bool,
    enabled: bool,
}

/// Values a `<select>` submits.
///
/// A multi-select submits every selected option; a single select submits
/// its first selected option, or its first enabled option if none is selected.
fn selected_options(select: &Element) -> SmallVec<[Stem; 1]> {
    let mut options = Vec::new();
    for child in select.children().iter().filter_map(Node::as_element) {
        if child.is(&tags::OPTION) {
            options.push(option_state(child, true));
        } else if child.is(&tags::OPTGROUP) {
            let group_enabled = !child.attrs.flag("disabled");
            options.extend(
                child
                    .children()
                    .iter()
                    .filter_map(Node::as_element)
                    .filter(|o| o.is(&tags::OPTION))
                    .map(|o| option_state(o, group_enabled)),
            );
        }
    }

    let mut chosen = options.iter().filter(|o| o.selected && o.enabled);
    if select.attrs.flag("multiple") {
        chosen.map(|o| o.value.clone()).collect()
    } else if let Some(first) = chosen.next() {
        smallvec![first.value.clone()]
    } else {
        options
            .iter()
            .find(|o| o.enabled)
            .map(|o| smallvec![o.value.clone()])
            .unwrap_or_default()
    }
}

fn option_state(option: &Element, group_enabled: bool) -> OptionState {
    OptionState {
        value: attr_text(option, "value").unwrap_or_else(|| Stem::from(option.text_content())),
        selected: option.attrs.flag("selected"),
        enabled: group_enabled && !option.attrs.flag("disabled"),
    }
}

fn url_encode(fields: &[FormField]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        let _ = write!(
            out,
            "{}={}",
            utf8_percent_encode(&field.name, FORM_UNRESERVED),
            utf8_percent_encode(&field.value, FORM_UNRESERVED)
        );
    }
    out
}

/// Draw boundaries until one appears in no field name or value.
fn pick_boundary(fields: &[FormField], boundaries: &mut impl BoundaryGenerator) -> String {
    loop {
        let boundary = boundaries.generate();
        let collides = boundary.is_empty()
            || fields
                .iter()
                .any(|f| f.name.contains(&*boundary) || f.value.contains(&*boundary));
        if !collides {
            return boundary;
        }
        debug!(%boundary, "boundary collides with field content, regenerating");
    }
}

/// A `Content-Disposition` parameter value: markup-escaped, with CR and LF
/// percent-encoded so it stays on its header line.
fn header_param(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if escaped.contains(['\r', '\n']) {
        Cow::Owned(escaped.replace('\r', "%0D").replace('\n', "%0A"))
    } else {
        escaped
    }
}

fn multipart_encode(fields: &[FormField], boundary: &str) -> String {
    let mut out = String::new();
    for field in fields {
        let _ = write!(
            out,
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary,
            header_param(&field.name),
            field.value
        );
    }
    let _ = write!(out, "--{}--\r\n", boundary);
    out
}

/// A `<form>` element with typed accessors for its submission settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    element: Element,
}

impl Form {
    /// An empty form that submits with `GET`, URL-encoded, to an empty action.
    pub fn new() -> Self {
        Self {
            element: tags::form(),
        }
    }

    /// A form with initial content appended in order.
    pub fn with_content<I, C>(content: I) -> Result<Self, DomError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        Ok(Self {
            element: Element::with_content(&tags::FORM, content)?,
        })
    }

    pub fn method(mut self, method: FormMethod) -> Self {
        self.element
            .attrs
            .insert(Stem::from_static("method"), Stem::from_static(method.as_str()).into());
        self
    }

    pub fn action(mut self, action: impl Into<Stem>) -> Self {
        self.element
            .attrs
            .insert(Stem::from_static("action"), AttrValue::Str(action.into()));
        self
    }

    pub fn encryption_type(mut self, enctype: EncryptionType) -> Self {
        self.element.attrs.insert(
            Stem::from_static("enctype"),
            Stem::from_static(enctype.content_type()).into(),
        );
        self
    }

    /// Switch between multipart and URL-encoded submission.
    pub fn multipart(self, multipart: bool) -> Self {
        self.encryption_type(if multipart {
            EncryptionType::Multipart
        } else {
            EncryptionType::UrlEncoded
        })
    }

    pub fn get_method(&self) -> FormMethod {
        self.element
            .attrs
            .get_str("method")
            .map(FormMethod::parse)
            .unwrap_or_default()
    }

    pub fn get_encryption_type(&self) -> EncryptionType {
        self.element
            .attrs
            .get_str("enctype")
            .map(EncryptionType::parse)
            .unwrap_or_default()
    }

    pub fn is_multipart(&self) -> bool {
        self.get_encryption_type() == EncryptionType::Multipart
    }

    /// Append a field or any other content.
    pub fn append(&mut self, content: impl Into<Content>) -> Result<NodeId, DomError> {
        self.element.append(content)
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    pub fn into_element(self) -> Element {
        self.element
    }

    /// Encode the current field state.
    pub fn encode(&self) -> Result<Submission, FormError> {
        encode(&self.element)
    }

    pub fn to_html(&self) -> String {
        self.element.to_html()
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Form> for Node {
    fn from(form: Form) -> Self {
        Node::Element(form.element)
    }
}

impl From<Form> for Content {
    fn from(form: Form) -> Self {
        Content::Node(Node::Element(form.element))
    }
}

// =============================================================================
// Tests
// =============================================================================

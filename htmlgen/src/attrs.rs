//! Attribute tables for elements.
//!
//! Attributes are stored in insertion order and sorted into a snapshot at
//! render time, so output is reproducible no matter how the table was built.

use facet::Facet;
use indexmap::{IndexMap, IndexSet};
use std::borrow::Cow;
use std::fmt;

use crate::Stem;
use crate::dom::DomError;

/// Prefix of the reserved `data-*` namespace.
const DATA_PREFIX: &str = "data-";

/// Name of the attribute that carries CSS class tokens.
const CLASS: &str = "class";

/// A numeric attribute value, kept native until rendering.
#[derive(Debug, Clone, Copy, PartialEq, Facet)]
#[repr(u8)]
pub enum Number {
    Int(i64),
    Float(f64),
    /// Kept at single precision so it renders its own shortest decimal.
    Float32(f32),
}

impl fmt::Display for Number {
    /// Fixed-point rendering: never scientific notation, trailing zeros
    /// trimmed, `0.5` rather than `.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write_float(f, x, x),
            Number::Float32(x) => write_float(f, x.into(), x),
        }
    }
}

/// `value` classifies, `shown` is printed. Float `Display` is the shortest
/// round-tripping decimal at its own precision and never uses exponent form.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64, shown: impl fmt::Display) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else if value == 0.0 {
        // Covers -0.0 as well.
        f.write_str("0")
    } else {
        write!(f, "{shown}")
    }
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Facet)]
#[repr(u8)]
pub enum AttrValue {
    /// Rendered as `name="value"` with the value escaped.
    Str(Stem),
    /// Rendered as a bare `name` when true, omitted when false.
    Bool(bool),
    /// Rendered as `name="value"` using the [`Number`] display policy.
    Number(Number),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The textual value as a form control or renderer sees it.
    ///
    /// A true boolean reads as the empty string, a false one as absent.
    pub fn to_text(&self) -> Option<Stem> {
        match self {
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Bool(true) => Some(Stem::new()),
            AttrValue::Bool(false) => None,
            AttrValue::Number(n) => Some(Stem::from(n.to_string())),
        }
    }
}

impl From<Stem> for AttrValue {
    fn from(s: Stem) -> Self {
        AttrValue::Str(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.into())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s.into())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<Number> for AttrValue {
    fn from(n: Number) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        AttrValue::Number(Number::Int(n.into()))
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        AttrValue::Number(Number::Int(n.into()))
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(Number::Int(n))
    }
}

impl From<f32> for AttrValue {
    fn from(n: f32) -> Self {
        AttrValue::Number(Number::Float32(n))
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(Number::Float(n))
    }
}

/// Whether `name` is acceptable as an HTML attribute name.
///
/// Rejects the empty string, ASCII whitespace, controls, `"`, `'`, `>`, `/`,
/// `=` and Unicode noncharacters.
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !(c.is_ascii_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '>' | '/' | '=')
                || is_noncharacter(c))
        })
}

fn is_noncharacter(c: char) -> bool {
    let cp = c as u32;
    (0xFDD0..=0xFDEF).contains(&cp) || (cp & 0xFFFE) == 0xFFFE
}

/// HTML attribute names are ASCII case-insensitive; keys are stored lowercase.
fn key(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// An element's attributes.
///
/// Names are unique and ASCII-lowercased on insert, so `ID` and `id` name the
/// same attribute. Setting an existing name overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Facet)]
pub struct Attributes {
    entries: IndexMap<Stem, AttrValue>,
}

impl Attributes {
    /// Create a new empty attribute table.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Set an attribute, replacing any previous value.
    ///
    /// The name is ASCII-lowercased before it is stored.
    pub fn set(
        &mut self,
        name: impl Into<Stem>,
        value: impl Into<AttrValue>,
    ) -> Result<(), DomError> {
        let name = name.into();
        if !is_valid_attribute_name(&name) {
            return Err(DomError::InvalidAttributeName {
                name: name.to_string(),
            });
        }
        let name = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Stem::from(name.to_ascii_lowercase())
        } else {
            name
        };
        self.insert(name, value.into());
        Ok(())
    }

    /// Insert without validating the name. Only for names known to be valid.
    pub(crate) fn insert(&mut self, name: Stem, value: AttrValue) {
        self.entries.insert(name, value);
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.get(&*key(name))
    }

    /// Get an attribute value if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttrValue::as_str)
    }

    /// Whether a presence-style attribute (`disabled`, `checked`, ...) is on.
    ///
    /// A boolean value counts as itself; any other value counts as present.
    pub fn flag(&self, name: &str) -> bool {
        match self.get(name) {
            Some(AttrValue::Bool(b)) => *b,
            Some(_) => true,
            None => false,
        }
    }

    /// Remove an attribute. Returns the old value if it existed.
    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.entries.shift_remove(&*key(name))
    }

    /// Check if an attribute exists.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&*key(name))
    }

    /// Set `data-<key>`.
    pub fn set_data(&mut self, key: &str, value: impl Into<AttrValue>) -> Result<(), DomError> {
        self.set(format!("{DATA_PREFIX}{key}"), value)
    }

    /// Get `data-<key>`.
    pub fn data(&self, key: &str) -> Option<&AttrValue> {
        self.get(&format!("{DATA_PREFIX}{key}"))
    }

    /// Remove `data-<key>`.
    pub fn remove_data(&mut self, key: &str) -> Option<AttrValue> {
        self.remove(&format!("{DATA_PREFIX}{key}"))
    }

    /// Iterate over `data-*` attributes with the prefix stripped, in insertion order.
    pub fn data_entries(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(DATA_PREFIX).map(|key| (key, v)))
    }

    /// The class tokens, in insertion order with duplicates collapsed.
    ///
    /// Only a string `class` value carries tokens.
    pub fn classes(&self) -> IndexSet<&str> {
        self.get_str(CLASS)
            .map(|s| s.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether `token` is one of the class tokens.
    pub fn has_class(&self, token: &str) -> bool {
        self.classes().contains(token)
    }

    /// Add class tokens. Whitespace in `tokens` separates several tokens;
    /// tokens already present are left where they are.
    pub fn add_class(&mut self, tokens: &str) {
        let mut classes: IndexSet<String> =
            self.classes().into_iter().map(str::to_owned).collect();
        let before = classes.len();
        classes.extend(tokens.split_ascii_whitespace().map(str::to_owned));
        if classes.len() != before {
            self.store_classes(classes);
        }
    }

    /// Remove a class token. Removing the last token removes the attribute.
    pub fn remove_class(&mut self, token: &str) {
        let mut classes: IndexSet<String> =
            self.classes().into_iter().map(str::to_owned).collect();
        if classes.shift_remove(token) {
            self.store_classes(classes);
        }
    }

    /// Toggle a class token, returning whether it is now present.
    pub fn toggle_class(&mut self, token: &str) -> bool {
        if self.has_class(token) {
            self.remove_class(token);
            false
        } else {
            self.add_class(token);
            true
        }
    }

    fn store_classes(&mut self, classes: IndexSet<String>) {
        if classes.is_empty() {
            self.remove(CLASS);
        } else {
            let joined = classes.into_iter().collect::<Vec<_>>().join(" ");
            self.insert(Stem::from_static(CLASS), AttrValue::Str(joined.into()));
        }
    }

    /// Iterate over all attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Snapshot of all attributes in ascending name order, as rendered.
    pub fn sorted(&self) -> Vec<(&str, &AttrValue)> {
        let mut attrs: Vec<_> = self.iter().collect();
        attrs.sort_by_key(|(k, _)| *k);
        attrs
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

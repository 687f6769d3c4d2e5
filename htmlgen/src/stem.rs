//! Stem - compact string type for tag names, attribute data and text payloads.

use compact_str::CompactString;
use facet::Facet;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Compact string type used throughout the node tree.
///
/// Either a `'static` literal (tag names and default attributes from the tag
/// catalog, zero-copy) or an owned compact string (everything built at runtime).
#[derive(Clone, Facet)]
#[facet(cow)]
#[repr(u8)]
pub enum Stem {
    Borrowed(&'static str),
    Owned(CompactString),
}

impl Stem {
    pub fn new() -> Self {
        Self::Owned(CompactString::default())
    }

    /// Wrap a string literal without copying it.
    pub const fn from_static(s: &'static str) -> Self {
        Self::Borrowed(s)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Borrowed(s) => s,
            Self::Owned(s) => s.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn push_str(&mut self, s: &str) {
        match self {
            Self::Owned(existing) => {
                existing.push_str(s);
            }
            Self::Borrowed(borrowed) => {
                *self = Self::Owned(compact_str::format_compact!("{}{}", borrowed, s));
            }
        }
    }
}

impl Default for Stem {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Stem {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Stem {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Stem {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Stem {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Stem {}

impl PartialEq<str> for Stem {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Stem {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for Stem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for Stem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl From<&str> for Stem {
    fn from(s: &str) -> Self {
        Self::Owned(CompactString::new(s))
    }
}

impl From<&String> for Stem {
    fn from(s: &String) -> Self {
        Self::Owned(CompactString::new(s))
    }
}

impl From<String> for Stem {
    fn from(s: String) -> Self {
        Self::Owned(CompactString::from(s))
    }
}

impl From<CompactString> for Stem {
    fn from(s: CompactString) -> Self {
        Self::Owned(s)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Stem>();
    assert_sync::<Stem>();
};

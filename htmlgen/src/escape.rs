//! Character-reference escaping shared by text content, attribute values and
//! multipart header parameters.

use std::borrow::Cow;

/// Escape the five markup-significant characters.
///
/// `&` is replaced first so that later substitutions are never re-escaped.
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape`]: decodes exactly the five references it produces.
///
/// Any other `&...;` sequence is left as-is.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    const REFS: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#x27;", '\''),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match REFS.iter().find(|(r, _)| rest.starts_with(r)) {
            Some((r, c)) => {
                out.push(*c);
                rest = &rest[r.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_five() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_borrows_clean_input() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_ampersand_not_double_escaped() {
        assert_eq!(escape("&lt;"), "&amp;lt;");
        assert_eq!(unescape(&escape("&lt;")), "&lt;");
    }

    #[test]
    fn test_roundtrip() {
        for s in [
            "",
            "&",
            "&&amp;",
            "<<>>",
            "'\"'",
            "a & b < c > d \" e ' f",
            "&#x27;&quot;",
            "unicode: héllo ✓ & 日本",
            "trailing &",
        ] {
            assert_eq!(unescape(&escape(s)), s, "roundtrip failed for {s:?}");
        }
    }

    #[test]
    fn test_unescape_leaves_unknown_references() {
        assert_eq!(unescape("&nbsp;&amp;"), "&nbsp;&");
    }
}

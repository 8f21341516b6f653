//! XML text escaping.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

// LeftmostLongest so that "&amp;lt;" decodes to "&lt;" and not "<"
static XML_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape XML special characters.
///
/// # Examples
///
/// ```
/// use slidecraft::common::escape_xml;
/// assert_eq!(escape_xml("R&D <2024>"), "R&amp;D &lt;2024&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Unescape the five predefined XML entities.
///
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use slidecraft::common::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    XML_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_entities() {
        assert_eq!(
            escape_xml(r#"<p class="x">Tom's & Jerry's</p>"#),
            "&lt;p class=&quot;x&quot;&gt;Tom&apos;s &amp; Jerry&apos;s&lt;/p&gt;"
        );
    }

    #[test]
    fn test_unescape_leaves_unknown_entities() {
        assert_eq!(unescape_xml("&nbsp;&amp;"), "&nbsp;&");
        assert_eq!(unescape_xml("&amp"), "&amp");
    }

    #[test]
    fn test_escape_then_unescape() {
        let text = "Q3 > Q2 & \"growth\"";
        assert_eq!(unescape_xml(&escape_xml(text)), text);
    }
}

use std::borrow::Cow;

/// Whether `c` may appear in an XML 1.0 document.
///
/// Allowed: tab, newline, carriage return, U+0020..=U+D7FF,
/// U+E000..=U+FFFD, U+10000..=U+10FFFF. Surrogates cannot occur in a Rust
/// `char`, so only the C0 controls and U+FFFE/U+FFFF need rejecting.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Strips characters that are not allowed anywhere in an XML 1.0 document.
///
/// Catalog text (descriptions pasted from other systems, mostly) can carry
/// stray control bytes. Escaping does not help with these: `&#1;` is just
/// as invalid as a raw U+0001, so they are dropped before escaping.
///
/// Returns `Cow::Borrowed` when nothing needs removing, which is the common
/// case.
///
/// # Examples
///
/// ```
/// use shopfeed::util::strip_invalid_xml_chars;
///
/// assert_eq!(strip_invalid_xml_chars("Plain text"), "Plain text");
/// assert_eq!(strip_invalid_xml_chars("Bad\u{1}byte"), "Badbyte");
/// assert_eq!(strip_invalid_xml_chars("Tab\tkept"), "Tab\tkept");
/// ```
pub fn strip_invalid_xml_chars(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
}

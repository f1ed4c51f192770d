use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::FeedError;
use crate::util::strip_invalid_xml_chars;

/// Namespace for Google Shopping item attributes (`g:` prefix).
pub const GOOGLE_NAMESPACE: &str = "http://base.google.com/ns/1.0";

pub(crate) type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// In-memory writer with two-space indentation.
pub(crate) fn new_writer() -> XmlWriter {
    Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2)
}

/// Makes `value` safe to embed as XML text.
///
/// Drops characters XML 1.0 cannot represent, then escapes `&`, `<`, `>`,
/// `"` and `'`.
///
/// # Examples
///
/// ```
/// use shopfeed::feed::escape_text;
///
/// assert_eq!(escape_text("Tom & Jerry's <Shop>"), "Tom &amp; Jerry&apos;s &lt;Shop&gt;");
/// assert_eq!(escape_text("plain"), "plain");
/// ```
pub fn escape_text(value: &str) -> Cow<'_, str> {
    match strip_invalid_xml_chars(value) {
        Cow::Borrowed(clean) => escape(clean),
        Cow::Owned(clean) => Cow::Owned(escape(clean.as_str()).into_owned()),
    }
}

/// Writes `<name>value</name>`.
///
/// A text event is always written, even for an empty value, so empty
/// fields come out as `<name></name>` on one line instead of being split
/// across lines by the indenting writer.
pub(crate) fn write_text_element(
    writer: &mut XmlWriter,
    name: &str,
    value: &str,
) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(FeedError::write)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(escape_text(value))))
        .map_err(FeedError::write)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(FeedError::write)?;
    Ok(())
}

pub(crate) fn write_start(writer: &mut XmlWriter, start: BytesStart<'_>) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(start))
        .map_err(FeedError::write)
}

pub(crate) fn write_end(writer: &mut XmlWriter, name: &str) -> Result<(), FeedError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(FeedError::write)
}

/// Consumes the writer and returns the document text.
pub(crate) fn finish(writer: XmlWriter) -> Result<String, FeedError> {
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

use super::error::FeedError;
use super::xml::{write_text_element, XmlWriter};
use crate::catalog::Store;

/// Writes the channel metadata for `store`.
///
/// Always emits exactly one `<title>`, `<link>` and `<description>`. A
/// missing meta description yields an empty `<description></description>`
/// since the feed format requires all three.
pub(crate) fn write_header(writer: &mut XmlWriter, store: &Store) -> Result<(), FeedError> {
    write_text_element(writer, "title", &store.name)?;
    write_text_element(writer, "link", &store.url)?;
    write_text_element(
        writer,
        "description",
        store.meta_description.as_deref().unwrap_or_default(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::xml::{finish, new_writer};
    use pretty_assertions::assert_eq;

    fn render(store: &Store) -> String {
        let mut writer = new_writer();
        write_header(&mut writer, store).unwrap();
        finish(writer).unwrap()
    }

    #[test]
    fn test_header_fields() {
        let store = Store {
            id: 1,
            code: "acme".to_string(),
            name: "Acme".to_string(),
            url: "https://acme.test".to_string(),
            meta_description: Some("Best stuff".to_string()),
        };

        assert_eq!(
            render(&store),
            "<title>Acme</title>\n<link>https://acme.test</link>\n<description>Best stuff</description>"
        );
    }

    #[test]
    fn test_missing_fields_render_empty_elements() {
        let store = Store {
            id: 1,
            code: "blank".to_string(),
            name: String::new(),
            url: String::new(),
            meta_description: None,
        };

        let xml = render(&store);
        assert!(xml.contains("<title></title>"));
        assert!(xml.contains("<link></link>"));
        assert!(xml.contains("<description></description>"));
    }

    #[test]
    fn test_header_values_are_escaped() {
        let store = Store {
            id: 1,
            code: "bb".to_string(),
            name: "Bits & Bobs".to_string(),
            url: "https://bb.test/?a=1&b=2".to_string(),
            meta_description: Some("<b>Cheap</b>".to_string()),
        };

        let xml = render(&store);
        assert!(xml.contains("<title>Bits &amp; Bobs</title>"));
        assert!(xml.contains("<link>https://bb.test/?a=1&amp;b=2</link>"));
        assert!(xml.contains("<description>&lt;b&gt;Cheap&lt;/b&gt;</description>"));
    }
}

//! XML serialization of a sitemap document

use crate::sitemap::{SitemapDocument, SitemapEntry, CHANGE_FREQUENCY};
use crate::{Result, SitemapError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const INDENT_SIZE: usize = 2;

/// Serializes a document to pretty-printed XML
///
/// Output depends only on the document's entries, so serializing the same
/// document twice yields identical bytes.
pub fn to_xml(document: &SitemapDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_event(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for entry in document.entries() {
        write_url(&mut writer, entry)?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| SitemapError::Xml(format!("Serialized sitemap is not UTF-8: {}", e)))?;
    xml.push('\n');
    Ok(xml)
}

fn write_url(writer: &mut Writer<Vec<u8>>, entry: &SitemapEntry) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new("url")))?;
    write_text_element(writer, "loc", &entry.location)?;
    write_text_element(writer, "lastmod", &entry.last_modified_text())?;
    write_text_element(writer, "changefreq", CHANGE_FREQUENCY)?;
    write_text_element(writer, "priority", &entry.priority_text())?;
    write_event(writer, Event::End(BytesEnd::new("url")))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    // BytesText::new escapes &, <, >, ' and "
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}

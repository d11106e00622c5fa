//! HTML parser for extracting anchor hrefs
//!
//! Parsing goes through html5ever's error-recovering tree builder, so broken
//! markup never aborts extraction; whatever anchors survive recovery are
//! reported.

use scraper::{Html, Selector};

/// Extracts the raw `href` values of all `<a>` elements
///
/// Values are returned in document order exactly as written: absolute and
/// relative links alike, with no filtering, trimming or resolution.
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::extract_hrefs;
///
/// let html = r#"<p><a href="/a">A</a> <a href="http://example.com/b">B</a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a", "http://example.com/b"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    if html.is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

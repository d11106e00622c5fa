use crate::url::raw_origin;
use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href found on a page into an absolute URL string
///
/// Hrefs that already start with `http` (which covers both `http://` and
/// `https://`) are treated as absolute and returned unchanged. Anything else
/// is treated as a path on the base URL's origin: leading slashes are
/// collapsed to exactly one and the result is joined to the base's scheme,
/// host and explicit port, copied from `base_url` as written (no case
/// folding, `:80` stays). Relative segments are not interpreted against the
/// base path, so `about` on `http://example.com/docs/` becomes
/// `http://example.com/about`.
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `base_url` - The URL of the page the href was found on
///
/// # Returns
///
/// * `Ok(String)` - The absolute URL
/// * `Err(UrlError)` - The base URL could not be parsed or has no host
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::resolve;
///
/// assert_eq!(
///     resolve("//contact", "http://example.com:8080/a/b").unwrap(),
///     "http://example.com:8080/contact"
/// );
/// assert_eq!(
///     resolve("https://other.com/x", "http://example.com/").unwrap(),
///     "https://other.com/x"
/// );
/// ```
pub fn resolve(href: &str, base_url: &str) -> UrlResult<String> {
    if href.starts_with("http") {
        return Ok(href.to_string());
    }

    Url::parse(base_url).map_err(|e| UrlError::Parse(format!("{}: {}", base_url, e)))?;
    let origin = raw_origin(base_url).ok_or(UrlError::MissingDomain)?;

    let mut absolute = format!("{}://{}", origin.scheme, origin.host);
    if let Some(port) = origin.port {
        absolute.push(':');
        absolute.push_str(port);
    }
    absolute.push('/');
    absolute.push_str(href.trim_start_matches('/'));

    Ok(absolute)
}

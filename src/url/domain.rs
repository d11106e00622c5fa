use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Scheme, host and port of an absolute URL, spelled as written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOrigin<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub port: Option<&'a str>,
}

/// Splits the origin out of `url` without normalizing it
///
/// Unlike [`Url`], this keeps the host's case and an explicit default port
/// such as `:80`, so URLs rebuilt from the origin stay string-equal to the
/// way the site writes them. Userinfo is dropped. Returns `None` when there
/// is no `scheme://host` prefix.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::raw_origin;
///
/// let origin = raw_origin("http://user@Example.COM:80/a?b").unwrap();
/// assert_eq!(origin.scheme, "http");
/// assert_eq!(origin.host, "Example.COM");
/// assert_eq!(origin.port, Some("80"));
/// ```
pub fn raw_origin(url: &str) -> Option<RawOrigin<'_>> {
    let (scheme, rest) = url.split_once("://")?;
    let authority_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let authority = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    let (host, port) = split_host_port(authority);
    if scheme.is_empty() || host.is_empty() {
        return None;
    }

    Some(RawOrigin {
        scheme,
        host,
        port: port.filter(|port| !port.is_empty()),
    })
}

fn split_host_port(authority: &str) -> (&str, Option<&str>) {
    // Bracketed IPv6 literals contain colons of their own
    if authority.starts_with('[') {
        if let Some(end) = authority.find(']') {
            let (host, rest) = authority.split_at(end + 1);
            return (host, rest.strip_prefix(':'));
        }
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    }
}

/// Parses a seed URL and returns it together with its host
///
/// The seed defines the crawl boundary, so it must be an absolute `http` or
/// `https` URL with a host. The host is returned exactly as written in the
/// seed, since the substring host policy matches against that text.
pub fn parse_seed(seed: &str) -> UrlResult<(Url, String)> {
    let url = Url::parse(seed).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = raw_origin(seed)
        .map(|origin| origin.host.to_string())
        .ok_or(UrlError::MissingDomain)?;
    Ok((url, host))
}

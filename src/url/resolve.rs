use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a link found on a page into an absolute URL
///
/// # Resolution Rules
///
/// | Link | Result |
/// |------|--------|
/// | starts with `http` | returned unchanged |
/// | starts with `/` | `scheme://host[:port]` + link |
/// | anything else | `scheme://host[:port]/` + link |
///
/// The `http` test is a plain prefix match, so a link such as `httpfoo`
/// is also returned unchanged. Links that are neither absolute nor
/// root-relative are resolved against the host root, not against the
/// directory of `base_url`.
///
/// # Arguments
///
/// * `base_url` - URL of the page the link was found on
/// * `link` - The href exactly as written in the markup
///
/// # Returns
///
/// * `Ok(String)` - The absolute URL
/// * `Err(UrlError::MalformedBaseUrl)` - `base_url` has no scheme or host
///
/// # Examples
///
/// ```
/// use crawlcraft::url::resolve_link;
///
/// let base = "http://ex.com/a/b";
/// assert_eq!(resolve_link(base, "http://other.com/x").unwrap(), "http://other.com/x");
/// assert_eq!(resolve_link(base, "/c").unwrap(), "http://ex.com/c");
/// assert_eq!(resolve_link(base, "c").unwrap(), "http://ex.com/c");
/// ```
pub fn resolve_link(base_url: &str, link: &str) -> UrlResult<String> {
    if link.starts_with("http") {
        return Ok(link.to_string());
    }

    let root = host_root(base_url)?;

    if link.starts_with('/') {
        Ok(format!("{}{}", root, link))
    } else {
        Ok(format!("{}/{}", root, link))
    }
}

/// Returns `scheme://host` for a URL, keeping an explicit non-default port
///
/// Path, query, fragment, and credentials are dropped.
pub fn host_root(url: &str) -> UrlResult<String> {
    let parsed =
        Url::parse(url).map_err(|e| UrlError::MalformedBaseUrl(format!("{}: {}", url, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MalformedBaseUrl(format!("{}: missing host", url)))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

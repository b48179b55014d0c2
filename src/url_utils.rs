//! URL Utility Functions
//!
//! Page URL parsing and resolution of the relative URLs found in head
//! metadata (icons, images).

use url::Url;

use crate::options::policy::DEFAULT_FAVICON_PATH;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a page URL, accepting any scheme the `url` crate understands
/// (`file:`, `about:` and friends included).
#[must_use]
pub fn parse_page_url(url_str: &str) -> Option<Url> {
    Url::parse(url_str.trim()).ok()
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Arguments
/// * `url_str` - The URL to resolve (can be relative or absolute)
/// * `base` - The base URL for resolution
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // Special schemes are kept verbatim
    if url_str.starts_with("data:")
        || url_str.starts_with("javascript:")
        || url_str.starts_with("mailto:")
        || url_str.starts_with("tel:")
    {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Resolve `url_str` against an optional base; without a base the input is
/// returned trimmed.
#[must_use]
pub fn resolve(url_str: &str, base: Option<&Url>) -> String {
    match base {
        Some(base) => create_absolute_url(url_str, base),
        None => url_str.trim().to_string(),
    }
}

/// Host name of a page URL, or empty string when the URL has none.
#[must_use]
pub fn host_name(url_str: &str) -> String {
    parse_page_url(url_str)
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Serialized origin (`scheme://host[:port]`) of a URL with a host.
#[must_use]
pub fn origin(url: &Url) -> Option<String> {
    url.host()?;
    Some(url.origin().ascii_serialization())
}

/// The icon path browsers request when a page declares no icon link.
#[must_use]
pub fn default_favicon_url(url: &Url) -> Option<String> {
    origin(url).map(|origin| format!("{origin}{DEFAULT_FAVICON_PATH}"))
}

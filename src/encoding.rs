//! Character encoding detection for raw page bytes.
//!
//! Captured pages sometimes arrive as bytes in a legacy charset. The decoder
//! follows the browser order of precedence: byte-order mark, transport
//! `Content-Type` charset, in-document `<meta>` declaration, then UTF-8.

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Number of leading bytes scanned for a `<meta>` charset declaration.
const PRESCAN_BYTES: usize = 1024;

/// Matches `<meta charset="...">` and the `http-equiv` form
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
#[allow(clippy::expect_used)]
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?\bcharset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#)
        .expect("valid regex")
});

/// Matches the `charset` parameter of a `Content-Type` header value.
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).expect("valid regex")
});

/// Charset label declared in the first bytes of the document, if any.
#[must_use]
pub fn declared_charset(html: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&html[..html.len().min(PRESCAN_BYTES)]);
    META_CHARSET_RE
        .captures(&head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Detect the encoding of `html`, consulting `content_type` (an HTTP header
/// value) before the document itself.
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(html) {
        return encoding;
    }

    let header_label = content_type
        .and_then(|ct| HEADER_CHARSET_RE.captures(ct))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    header_label
        .or_else(|| declared_charset(html))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to a UTF-8 string.
///
/// Invalid sequences become U+FFFD instead of failing the capture.
///
/// # Examples
///
/// ```
/// use page_clip::encoding::decode_html;
///
/// let html = b"<meta charset=\"windows-1252\"><p>Caf\xE9</p>";
/// assert!(decode_html(html, None).contains("Café"));
/// ```
#[must_use]
pub fn decode_html(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);
    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!(encoding = used.name(), "replaced malformed byte sequences while decoding page");
    }
    decoded.into_owned()
}

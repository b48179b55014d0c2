//! The page as seen by one extraction request.
//!
//! A `PageSnapshot` bundles what the host environment hands over for a
//! single "extract" request: the page URL, its serialized DOM and the text
//! the user currently has selected. Each request owns its snapshot; nothing
//! is shared between requests.

use url::Url;

use crate::dom::{self, Document};
use crate::encoding;
use crate::url_utils;

/// Serialized state of the active page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    /// URL of the page (as shown in the address bar).
    pub url: String,

    /// Serialized DOM (`document.documentElement.outerHTML` or raw source).
    pub html: String,

    /// Current text selection, untrimmed. Empty when nothing is selected.
    pub selection: String,
}

impl PageSnapshot {
    /// Snapshot without a selection.
    #[must_use]
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            selection: String::new(),
        }
    }

    /// Snapshot from raw page bytes, decoding with the detected charset.
    ///
    /// `content_type` is the transport `Content-Type` header, when known.
    #[must_use]
    pub fn from_bytes(url: impl Into<String>, html: &[u8], content_type: Option<&str>) -> Self {
        Self::new(url, encoding::decode_html(html, content_type))
    }

    /// Attach the user's current selection.
    #[must_use]
    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = selection.into();
        self
    }

    /// Parsed page URL, `None` when unparsable.
    #[must_use]
    pub fn parsed_url(&self) -> Option<Url> {
        url_utils::parse_page_url(&self.url)
    }

    /// Host name of the page URL, or empty string.
    #[must_use]
    pub fn host_name(&self) -> String {
        url_utils::host_name(&self.url)
    }

    /// Parse the serialized DOM into a fresh document owned by the caller.
    #[must_use]
    pub fn document(&self) -> Document {
        dom::parse(&self.html)
    }
}

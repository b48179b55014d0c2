//! # page-clip
//!
//! Content extraction core for "save this page" tools.
//!
//! Given a snapshot of a web page (URL, serialized DOM and the user's text
//! selection) it produces a single [`ContentRecord`]: the content worth
//! saving plus head metadata. Content comes from exactly one source, in
//! strict precedence order:
//!
//! 1. the user's selection, verbatim
//! 2. the main article found by a Readability-style extractor, as markdown
//! 3. the visible text of the best semantic container (or the whole body)
//!
//! ## Quick Start
//!
//! ```rust
//! use page_clip::{extract, ContentSource, PageSnapshot};
//!
//! let html = r#"<html><head><title>My Page</title>
//! <meta name="keywords" content="a, b , c"></head>
//! <body><main><p>Short note.</p></main></body></html>"#;
//!
//! let page = PageSnapshot::new("https://example.com/notes", html);
//! let record = extract(&page)?;
//!
//! assert_eq!(record.source, ContentSource::Fallback);
//! assert_eq!(record.content, "Short note.");
//! assert_eq!(record.keywords, vec!["a", "b", "c"]);
//! assert_eq!(record.favicon, "https://example.com/favicon.ico");
//! # Ok::<(), page_clip::Error>(())
//! ```
//!
//! ## Features
//!
//! - `readability` (default): structured extraction through `dom_smoothie`.
//!   Without it, or with `Options::use_readability = false`, the native
//!   density scorer runs instead.

mod error;
mod extract;
mod options;
mod page;
mod patterns;
mod result;

/// DOM helpers over `dom_query`, including rendered-text extraction.
pub mod dom;

/// Main-article strategies and the fallback extractor.
pub mod extractor;

/// Head metadata (meta tags, title, icons).
pub mod metadata;

/// User selection reader.
pub mod selection;

/// HTML to markdown normalizer.
pub mod markdown;

/// Degraded-extraction notifications.
pub mod notify;

/// URL resolution helpers.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Link density measurement.
pub mod link_density;

use std::any::Any;

pub use error::{Error, Result};
pub use extract::Extractor;
pub use extractor::{ArticleExtractor, ExtractedArticle};
pub use metadata::PageMetadata;
pub use notify::{ChannelNotifier, LogNotifier, NoopNotifier, Notification, Notifier, Severity};
pub use options::{policy, Options};
pub use page::PageSnapshot;
pub use result::{ContentRecord, ContentSource, ExtractResponse};

/// Extract a content record with default options, discarding notifications.
///
/// # Example
///
/// ```rust
/// use page_clip::{extract, PageSnapshot};
///
/// let page = PageSnapshot::new("https://example.com/", "<p>Body</p>")
///     .with_selection(" Hello world ");
/// let record = extract(&page)?;
/// assert_eq!(record.content, "Hello world");
/// assert!(record.has_selection);
/// # Ok::<(), page_clip::Error>(())
/// ```
pub fn extract(page: &PageSnapshot) -> Result<ContentRecord> {
    extract_with(page, &Options::default(), &NoopNotifier)
}

/// Extract a content record with custom options and a notification sink.
pub fn extract_with(
    page: &PageSnapshot,
    options: &Options,
    notifier: &dyn Notifier,
) -> Result<ContentRecord> {
    let strategy = extractor::default_extractor(options);
    extract::try_extract(page, options, strategy.as_ref(), notifier)
}

/// Handle one "extract current page" request.
///
/// Never panics: errors and panics inside the pipeline become a failure
/// response carrying a message.
#[must_use]
pub fn handle_extract_request(
    page: &PageSnapshot,
    options: &Options,
    notifier: &dyn Notifier,
) -> ExtractResponse {
    let strategy = extractor::default_extractor(options);
    extract::handle_request(page, options, strategy.as_ref(), notifier)
}

/// Message carried by a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

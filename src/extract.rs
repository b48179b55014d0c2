//! Extraction orchestrator.
//!
//! One linear pass per request:
//!
//! 1. a non-empty user selection wins outright
//! 2. otherwise the structured extractor's article body, normalized to markdown
//! 3. otherwise the fallback extractor's visible text, with a notification
//!
//! Head metadata is merged into every record regardless of the content source.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::dom;
use crate::error::{Error, Result};
use crate::extractor::{self, fallback, ArticleExtractor, ExtractedArticle};
use crate::markdown;
use crate::metadata;
use crate::notify::{self, NoopNotifier, Notification, Notifier};
use crate::options::policy::{EXCERPT_MAX_CHARS, MAX_DOM_DEPTH};
use crate::options::Options;
use crate::page::PageSnapshot;
use crate::result::{ContentRecord, ContentSource, ExtractResponse};
use crate::selection;

/// Reusable extraction handle: options, strategy and notification sink.
///
/// Holds no per-request state, so one handle can serve concurrent requests.
///
/// # Example
///
/// ```rust
/// use page_clip::{Extractor, PageSnapshot};
///
/// let page = PageSnapshot::new("https://example.com/", "<p>Hi</p>").with_selection("Hi");
/// let record = Extractor::new().extract(&page)?;
/// assert_eq!(record.content, "Hi");
/// # Ok::<(), page_clip::Error>(())
/// ```
pub struct Extractor {
    options: Options,
    strategy: Box<dyn ArticleExtractor>,
    notifier: Box<dyn Notifier>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("options", &self.options)
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Default options, default strategy, notifications discarded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Strategy chosen from `options`, notifications discarded.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        let strategy = extractor::default_extractor(&options);
        Self {
            options,
            strategy,
            notifier: Box::new(NoopNotifier),
        }
    }

    /// Replace the notification sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Replace the structured extraction strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ArticleExtractor + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Build the content record for `page`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] when the pipeline panics.
    pub fn extract(&self, page: &PageSnapshot) -> Result<ContentRecord> {
        try_extract(page, &self.options, self.strategy.as_ref(), self.notifier.as_ref())
    }

    /// Request boundary: never panics, always answers with a response.
    #[must_use]
    pub fn handle_request(&self, page: &PageSnapshot) -> ExtractResponse {
        handle_request(page, &self.options, self.strategy.as_ref(), self.notifier.as_ref())
    }
}

/// Run the pipeline, turning a panic anywhere inside it into
/// [`Error::Internal`].
pub(crate) fn try_extract(
    page: &PageSnapshot,
    options: &Options,
    strategy: &dyn ArticleExtractor,
    notifier: &dyn Notifier,
) -> Result<ContentRecord> {
    catch_unwind(AssertUnwindSafe(|| {
        extract_content(page, options, strategy, notifier)
    }))
    .map_err(|payload| Error::Internal(crate::panic_message(payload.as_ref())))
}

/// Main entry point for content extraction.
pub(crate) fn extract_content(
    page: &PageSnapshot,
    options: &Options,
    strategy: &dyn ArticleExtractor,
    notifier: &dyn Notifier,
) -> ContentRecord {
    tracing::debug!(url = %page.url, html_len = page.html.len(), "starting extraction");

    let doc = page.document();
    let flattened = dom::limit_depth(&doc, MAX_DOM_DEPTH);
    if flattened > 0 {
        tracing::debug!(url = %page.url, flattened, "flattened subtrees nested too deep");
    }
    let page_url = page.parsed_url();
    if page_url.is_none() && !page.url.is_empty() {
        tracing::debug!(url = %page.url, "page URL is not absolute; links stay relative");
    }

    let meta = metadata::read_metadata(&doc, page_url.as_ref());
    let selected_text = selection::read_selection(page);
    let host = page.host_name();

    let mut article: Option<ExtractedArticle> = None;
    let (source, content, mut excerpt) = if selected_text.is_empty() {
        article = extractor::run_extractor(strategy, &doc, page_url.as_ref());

        match article.as_ref().filter(|a| a.has_body()) {
            Some(found) => {
                let content = markdown::normalize(
                    found.body_markup.as_deref(),
                    found.plain_text.as_deref(),
                    options,
                );
                let excerpt = if found.excerpt.is_empty() {
                    truncate_chars(&content, EXCERPT_MAX_CHARS)
                } else {
                    truncate_chars(&found.excerpt, EXCERPT_MAX_CHARS)
                };
                (ContentSource::Structured, content, excerpt)
            }
            None => {
                tracing::warn!(
                    url = %page.url,
                    strategy = strategy.name(),
                    "no article found, falling back to visible text"
                );
                notify::deliver(notifier, Notification::limited_extraction());
                let content = fallback::fallback_text(&doc);
                let excerpt = truncate_chars(&content, EXCERPT_MAX_CHARS);
                (ContentSource::Fallback, content, excerpt)
            }
        }
    } else {
        let excerpt = truncate_chars(&selected_text, EXCERPT_MAX_CHARS);
        (ContentSource::Selection, selected_text.clone(), excerpt)
    };

    if excerpt.is_empty() {
        excerpt = truncate_chars(&meta.description, EXCERPT_MAX_CHARS);
    }

    let title = match (&source, &article) {
        (ContentSource::Structured, Some(found)) if !found.title.trim().is_empty() => {
            found.title.clone()
        }
        _ => meta.title.clone(),
    };

    let author = if meta.author.is_empty() {
        article.as_ref().map(|a| a.byline.clone()).unwrap_or_default()
    } else {
        meta.author.clone()
    };

    let site_name = article
        .as_ref()
        .map(|a| a.site_name.clone())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| host.clone());

    let content_length = content.chars().count();
    tracing::debug!(
        url = %page.url,
        source = ?source,
        content_length,
        "extraction complete"
    );

    ContentRecord {
        url: page.url.clone(),
        domain: host,
        title,
        content,
        excerpt,
        has_selection: !selected_text.is_empty(),
        selected_text,
        description: meta.description,
        author,
        published_date: meta.published_date,
        keywords: meta.keywords,
        og_image: meta.og_image,
        favicon: meta.favicon,
        content_length,
        site_name,
        source,
    }
}

/// Run one request to completion, converting errors and panics into a
/// failure response.
pub(crate) fn handle_request(
    page: &PageSnapshot,
    options: &Options,
    strategy: &dyn ArticleExtractor,
    notifier: &dyn Notifier,
) -> ExtractResponse {
    match try_extract(page, options, strategy, notifier) {
        Ok(record) => ExtractResponse::success(record),
        Err(err) => {
            tracing::warn!(url = %page.url, error = %err, "extraction request failed");
            ExtractResponse::failure(err.to_string())
        }
    }
}

/// First `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    use dom_query::Document;

    /// Strategy returning a canned article.
    struct Fixed(Option<ExtractedArticle>);

    impl ArticleExtractor for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn extract(&self, _doc: &Document, _url: Option<&Url>) -> Option<ExtractedArticle> {
            self.0.clone()
        }
    }

    fn article(title: &str, markup: &str) -> ExtractedArticle {
        ExtractedArticle {
            title: title.to_string(),
            body_markup: Some(markup.to_string()),
            plain_text: None,
            excerpt: String::new(),
            byline: "Extractor Byline".to_string(),
            site_name: String::new(),
            length: 0,
        }
    }

    const HEAD: &str = r#"<html><head>
        <title>Doc Title</title>
        <meta property="og:title" content="OG Title">
        <meta name="description" content="A short description.">
        </head><body><div><p>Body text</p></div></body></html>"#;

    fn run(page: &PageSnapshot, strategy: &dyn ArticleExtractor) -> (ContentRecord, usize) {
        let calls = AtomicUsize::new(0);
        let notifier = |_: Notification| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let record = extract_content(page, &Options::default(), strategy, &notifier);
        (record, calls.load(Ordering::SeqCst))
    }

    #[test]
    fn test_selection_wins() {
        let page = PageSnapshot::new("https://example.com/a", HEAD).with_selection("  Hello world ");
        let (record, notified) = run(&page, &Fixed(Some(article("X", "<p>ignored</p>"))));

        assert_eq!(record.source, ContentSource::Selection);
        assert_eq!(record.content, "Hello world");
        assert_eq!(record.excerpt, "Hello world");
        assert!(record.has_selection);
        assert_eq!(record.title, "OG Title");
        assert_eq!(notified, 0);
    }

    #[test]
    fn test_structured_overrides_title() {
        let page = PageSnapshot::new("https://example.com/a", HEAD);
        let (record, notified) = run(&page, &Fixed(Some(article("Extractor Title", "<h2>Hi</h2><p>There</p>"))));

        assert_eq!(record.source, ContentSource::Structured);
        assert_eq!(record.title, "Extractor Title");
        assert_eq!(record.content, "## Hi\n\nThere");
        assert_eq!(record.excerpt, "## Hi\n\nThere");
        assert_eq!(notified, 0);
    }

    #[test]
    fn test_blank_extractor_title_keeps_metadata_title() {
        let page = PageSnapshot::new("https://example.com/a", HEAD);
        let (record, _) = run(&page, &Fixed(Some(article("  ", "<p>There</p>"))));
        assert_eq!(record.title, "OG Title");
    }

    #[test]
    fn test_fallback_notifies_once() {
        let page = PageSnapshot::new("https://example.com/a", HEAD);
        let (record, notified) = run(&page, &Fixed(None));

        assert_eq!(record.source, ContentSource::Fallback);
        assert_eq!(record.content, "Body text");
        assert_eq!(record.title, "OG Title");
        assert_eq!(notified, 1);
    }

    #[test]
    fn test_empty_body_markup_falls_back() {
        let page = PageSnapshot::new("https://example.com/a", HEAD);
        let (record, notified) = run(&page, &Fixed(Some(article("Ignored", "   "))));

        assert_eq!(record.source, ContentSource::Fallback);
        assert_eq!(record.title, "OG Title");
        assert_eq!(notified, 1);
    }

    #[test]
    fn test_excerpt_falls_back_to_description() {
        let page = PageSnapshot::new(
            "https://example.com/a",
            r#"<head><meta name="description" content="Described."></head><body></body>"#,
        );
        let (record, _) = run(&page, &Fixed(None));
        assert_eq!(record.content, "");
        assert_eq!(record.excerpt, "Described.");
    }

    #[test]
    fn test_description_excerpt_is_capped() {
        let description = "word ".repeat(100);
        let page = PageSnapshot::new(
            "https://example.com/a",
            format!(r#"<head><meta name="description" content="{description}"></head><body></body>"#),
        );
        let (record, _) = run(&page, &Fixed(None));

        assert_eq!(record.excerpt.chars().count(), EXCERPT_MAX_CHARS);
        assert!(description.starts_with(&record.excerpt));
        assert_eq!(record.description, description.trim());
    }

    #[test]
    fn test_excerpt_is_capped() {
        let long = "x".repeat(1000);
        let page = PageSnapshot::new("https://example.com/", "").with_selection(long.clone());
        let (record, _) = run(&page, &Fixed(None));
        assert_eq!(record.excerpt.chars().count(), EXCERPT_MAX_CHARS);
        assert_eq!(record.content, long);
        assert_eq!(record.content_length, 1000);
    }

    #[test]
    fn test_author_and_site_name_fallbacks() {
        let page = PageSnapshot::new("https://news.example.com/a", HEAD);
        let (record, _) = run(&page, &Fixed(Some(article("T", "<p>x</p>"))));
        assert_eq!(record.author, "Extractor Byline");
        assert_eq!(record.site_name, "news.example.com");
        assert_eq!(record.domain, "news.example.com");
    }

    #[test]
    fn test_content_length_counts_chars() {
        let page = PageSnapshot::new("https://example.com/", "").with_selection("héllo wörld");
        let (record, _) = run(&page, &Fixed(None));
        assert_eq!(record.content_length, 11);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_handle_request_contains_panics() {
        struct Exploding;
        impl ArticleExtractor for Exploding {
            fn name(&self) -> &'static str {
                "exploding"
            }
            fn extract(&self, _doc: &Document, _url: Option<&Url>) -> Option<ExtractedArticle> {
                panic!("boom")
            }
        }

        let page = PageSnapshot::new("https://example.com/", "<body><p>text</p></body>");
        let response = handle_request(&page, &Options::default(), &Exploding, &NoopNotifier);
        // Strategy panics degrade to the fallback rather than failing the request
        assert!(response.success);
        assert_eq!(response.data.unwrap().source, ContentSource::Fallback);
    }

    #[test]
    fn test_handle_request_reports_notifier_panic_as_success() {
        let notifier = |_: Notification| panic!("host gone");
        let page = PageSnapshot::new("https://example.com/", "<body><p>text</p></body>");
        let response = handle_request(&page, &Options::default(), &Fixed(None), &notifier);
        assert!(response.success);
    }
}

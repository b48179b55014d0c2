//! Metadata extraction module.
//!
//! Reads head metadata (title, description, author, date, keywords, image,
//! icon) through fixed, per-field fallback chains. Pure DOM reads: no
//! network access, no mutation.

pub mod meta_tags;

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom;
use crate::url_utils;

pub use meta_tags::{parse_comma_list, MetaIndex, MetaSource};

use meta_tags::MetaSource::{DocumentTitle, Meta};

/// Title chain, highest priority first.
pub const TITLE_SOURCES: &[MetaSource] = &[Meta("og:title"), Meta("twitter:title"), DocumentTitle];

/// Description chain.
pub const DESCRIPTION_SOURCES: &[MetaSource] = &[
    Meta("og:description"),
    Meta("description"),
    Meta("twitter:description"),
];

/// Author chain.
pub const AUTHOR_SOURCES: &[MetaSource] = &[
    Meta("author"),
    Meta("article:author"),
    Meta("og:article:author"),
];

/// Publication date chain. Values are returned raw, unvalidated.
pub const PUBLISHED_DATE_SOURCES: &[MetaSource] = &[
    Meta("article:published_time"),
    Meta("date"),
    Meta("pubdate"),
];

/// Preview image chain.
pub const IMAGE_SOURCES: &[MetaSource] = &[Meta("og:image"), Meta("twitter:image")];

/// `rel` values of icon links, highest priority first.
pub const ICON_RELS: &[&str] = &["icon", "shortcut icon", "apple-touch-icon"];

/// Metadata read from the document head.
///
/// Every field defaults to empty; nothing is optional for consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// `og:title`, `twitter:title`, then `<title>`.
    pub title: String,

    /// Page description.
    pub description: String,

    /// Author as declared in meta tags.
    pub author: String,

    /// Publication date, verbatim from the source.
    pub published_date: String,

    /// `keywords` split on commas.
    pub keywords: Vec<String>,

    /// Preview image URL (absolute when the page URL is).
    pub og_image: String,

    /// Icon URL (absolute when the page URL is).
    pub favicon: String,
}

/// Extract all metadata from a document.
///
/// # Arguments
/// * `doc` - The parsed page
/// * `page_url` - Page URL used to resolve relative icon/image references
#[must_use]
pub fn read_metadata(doc: &Document, page_url: Option<&Url>) -> PageMetadata {
    let index = MetaIndex::from_document(doc);
    let field = |sources: &[MetaSource]| {
        index
            .first_non_empty(sources)
            .map(str::to_string)
            .unwrap_or_default()
    };

    let og_image = index
        .first_non_empty(IMAGE_SOURCES)
        .map(|image| url_utils::resolve(image, page_url))
        .unwrap_or_default();

    PageMetadata {
        title: field(TITLE_SOURCES),
        description: field(DESCRIPTION_SOURCES),
        author: field(AUTHOR_SOURCES),
        published_date: field(PUBLISHED_DATE_SOURCES),
        keywords: index.meta("keywords").map(parse_comma_list).unwrap_or_default(),
        og_image,
        favicon: read_favicon(doc, page_url),
    }
}

/// First declared icon link resolved against the page URL, else the
/// origin's default icon path.
#[must_use]
pub fn read_favicon(doc: &Document, page_url: Option<&Url>) -> String {
    let links: Vec<(String, String)> = doc
        .select("link[rel][href]")
        .nodes()
        .iter()
        .filter_map(|node| {
            let link = Selection::from(*node);
            let rel = dom::normalize_whitespace(&link.attr("rel")?).to_ascii_lowercase();
            let href = dom::non_empty_attribute(&link, "href")?;
            Some((rel, href))
        })
        .collect();

    let declared = ICON_RELS
        .iter()
        .find_map(|wanted| links.iter().find(|(rel, _)| rel == wanted))
        .map(|(_, href)| url_utils::resolve(href, page_url));

    declared
        .or_else(|| page_url.and_then(url_utils::default_favicon_url))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/news/story.html").unwrap()
    }

    #[test]
    fn test_read_metadata_full_head() {
        let html = r#"<!DOCTYPE html>
        <html>
        <head>
            <title>Doc Title</title>
            <meta property="og:title" content="OG Title">
            <meta name="description" content="Plain description">
            <meta name="author" content="Jane Doe">
            <meta property="article:published_time" content="2024-03-15T10:30:00Z">
            <meta name="keywords" content="rust, html , parsing">
            <meta property="og:image" content="/img/hero.jpg">
            <link rel="icon" href="/static/icon.png">
        </head>
        <body></body>
        </html>"#;

        let doc = Document::from(html);
        let metadata = read_metadata(&doc, Some(&base()));

        assert_eq!(metadata.title, "OG Title");
        assert_eq!(metadata.description, "Plain description");
        assert_eq!(metadata.author, "Jane Doe");
        assert_eq!(metadata.published_date, "2024-03-15T10:30:00Z");
        assert_eq!(metadata.keywords, vec!["rust", "html", "parsing"]);
        assert_eq!(metadata.og_image, "https://example.com/img/hero.jpg");
        assert_eq!(metadata.favicon, "https://example.com/static/icon.png");
    }

    #[test]
    fn test_title_falls_back_to_document_title() {
        let doc = Document::from("<html><head><title>Only Title</title></head></html>");
        assert_eq!(read_metadata(&doc, None).title, "Only Title");
    }

    #[test]
    fn test_empty_head_yields_empty_fields() {
        let doc = Document::from("<html><head></head><body><p>x</p></body></html>");
        let metadata = read_metadata(&doc, None);

        assert_eq!(metadata, PageMetadata::default());
    }

    #[test]
    fn test_favicon_priority() {
        let html = r#"<head>
            <link rel="apple-touch-icon" href="/apple.png">
            <link rel="shortcut icon" href="/shortcut.ico">
        </head>"#;
        let doc = Document::from(html);
        assert_eq!(
            read_favicon(&doc, Some(&base())),
            "https://example.com/shortcut.ico"
        );
    }

    #[test]
    fn test_favicon_rel_is_case_insensitive() {
        let doc = Document::from(r#"<link rel="Shortcut  Icon" href="fav.ico">"#);
        assert_eq!(
            read_favicon(&doc, Some(&base())),
            "https://example.com/news/fav.ico"
        );
    }

    #[test]
    fn test_favicon_default_path() {
        let doc = Document::from("<html><head></head></html>");
        assert_eq!(
            read_favicon(&doc, Some(&base())),
            "https://example.com/favicon.ico"
        );
        assert_eq!(read_favicon(&doc, None), "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let metadata = PageMetadata {
            published_date: "2024".into(),
            og_image: "x".into(),
            ..PageMetadata::default()
        };
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["publishedDate"], "2024");
        assert_eq!(json["ogImage"], "x");
    }
}

#![allow(clippy::unwrap_used)]

use page_clip::metadata::{read_favicon, read_metadata, PageMetadata};
use page_clip::{extract, PageSnapshot};
use dom_query::Document;
use url::Url;

fn base() -> Url {
    Url::parse("https://example.com/blog/post.html").unwrap()
}

fn metadata_of(head: &str) -> PageMetadata {
    let doc = Document::from(format!("<html><head>{head}</head><body></body></html>"));
    read_metadata(&doc, Some(&base()))
}

#[test]
fn title_prefers_og_then_twitter_then_document() {
    let all = metadata_of(
        r#"<title>Doc</title><meta name="twitter:title" content="Tw"><meta property="og:title" content="Og">"#,
    );
    assert_eq!(all.title, "Og");

    let twitter = metadata_of(r#"<title>Doc</title><meta name="twitter:title" content="Tw">"#);
    assert_eq!(twitter.title, "Tw");

    let doc_only = metadata_of("<title>  Doc   Title </title>");
    assert_eq!(doc_only.title, "Doc Title");
}

#[test]
fn description_chain_order() {
    let meta = metadata_of(
        r#"<meta name="twitter:description" content="tw"><meta name="description" content="plain">"#,
    );
    assert_eq!(meta.description, "plain");

    let meta = metadata_of(
        r#"<meta name="description" content="plain"><meta property="og:description" content="og">"#,
    );
    assert_eq!(meta.description, "og");
}

#[test]
fn empty_content_is_skipped_in_chain() {
    let meta = metadata_of(r#"<meta name="author" content="  "><meta property="article:author" content="Ann">"#);
    assert_eq!(meta.author, "Ann");
}

#[test]
fn published_date_is_returned_verbatim() {
    let meta = metadata_of(r#"<meta name="pubdate" content="yesterday-ish">"#);
    assert_eq!(meta.published_date, "yesterday-ish");
}

#[test]
fn keywords_are_split_and_trimmed() {
    let meta = metadata_of(r#"<meta name="keywords" content="a, b , c">"#);
    assert_eq!(meta.keywords, vec!["a", "b", "c"]);

    let meta = metadata_of(r#"<meta name="keywords" content=" a,, ,b ">"#);
    assert_eq!(meta.keywords, vec!["a", "b"]);

    let meta = metadata_of(r#"<meta name="keywords" content="">"#);
    assert!(meta.keywords.is_empty());
}

#[test]
fn og_image_is_resolved_against_page_url() {
    let meta = metadata_of(r#"<meta name="twitter:image" content="../img/card.png">"#);
    assert_eq!(meta.og_image, "https://example.com/img/card.png");
}

#[test]
fn favicon_uses_declared_icon() {
    let doc = Document::from(r#"<head><link rel="icon" href="//cdn.example.net/i.ico"></head>"#);
    assert_eq!(read_favicon(&doc, Some(&base())), "https://cdn.example.net/i.ico");
}

#[test]
fn favicon_defaults_to_origin_path() {
    let page = PageSnapshot::new("https://example.com/deep/path?q=1", "<html><head></head></html>");
    let record = extract(&page).unwrap();
    assert_eq!(record.favicon, "https://example.com/favicon.ico");
}

#[test]
fn favicon_keeps_port_of_origin() {
    let page = PageSnapshot::new("http://localhost:8080/x", "<html></html>");
    let record = extract(&page).unwrap();
    assert_eq!(record.favicon, "http://localhost:8080/favicon.ico");
}

#[test]
fn missing_head_gives_empty_fields() {
    let page = PageSnapshot::new("not a url", "<p>hello</p>");
    let record = extract(&page).unwrap();

    assert_eq!(record.title, "");
    assert_eq!(record.description, "");
    assert_eq!(record.author, "");
    assert!(record.keywords.is_empty());
    assert_eq!(record.og_image, "");
    assert_eq!(record.favicon, "");
    assert_eq!(record.domain, "");
}

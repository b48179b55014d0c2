#![allow(clippy::unwrap_used)]

use dom_query::Document;
use page_clip::{
    handle_extract_request, ArticleExtractor, ChannelNotifier, ContentSource, ExtractedArticle,
    Extractor, Notification, Options, PageSnapshot, Severity,
};
use std::sync::mpsc;
use url::Url;

struct Canned(&'static str);

impl ArticleExtractor for Canned {
    fn name(&self) -> &'static str {
        "canned"
    }

    fn extract(&self, _doc: &Document, _url: Option<&Url>) -> Option<ExtractedArticle> {
        Some(ExtractedArticle {
            title: "Canned Title".to_string(),
            body_markup: Some(self.0.to_string()),
            plain_text: None,
            excerpt: "Canned excerpt".to_string(),
            byline: "By Someone".to_string(),
            site_name: "Canned Site".to_string(),
            length: self.0.len(),
        })
    }
}

struct Broken;

impl ArticleExtractor for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn extract(&self, _doc: &Document, _url: Option<&Url>) -> Option<ExtractedArticle> {
        panic!("index out of range in scorer")
    }
}

#[test]
fn success_response_serializes_record() {
    let page = PageSnapshot::new("https://example.com/", "<p>x</p>").with_selection("picked");
    let response = handle_extract_request(&page, &Options::default(), &page_clip::NoopNotifier);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["content"], "picked");
    assert_eq!(json["data"]["hasSelection"], true);
    assert_eq!(json["data"]["contentLength"], 6);
    assert!(json.get("error").is_none());
}

#[test]
fn custom_strategy_fills_record() {
    let page = PageSnapshot::new(
        "https://example.com/a",
        r#"<head><meta property="og:title" content="Meta Title"></head><body></body>"#,
    );
    let record = Extractor::new()
        .with_strategy(Canned("<p>Canned <em>body</em></p>"))
        .extract(&page)
        .unwrap();

    assert_eq!(record.source, ContentSource::Structured);
    assert_eq!(record.title, "Canned Title");
    assert_eq!(record.content, "Canned _body_");
    assert_eq!(record.excerpt, "Canned excerpt");
    assert_eq!(record.author, "By Someone");
    assert_eq!(record.site_name, "Canned Site");
}

#[test]
fn panicking_strategy_degrades_to_fallback() {
    let (tx, rx) = mpsc::channel();
    let extractor = Extractor::new()
        .with_strategy(Broken)
        .with_notifier(ChannelNotifier::new(tx));
    let page = PageSnapshot::new("https://example.com/", "<body><main>Main text</main></body>");

    let response = extractor.handle_request(&page);
    assert!(response.success);

    let record = response.data.unwrap();
    assert_eq!(record.source, ContentSource::Fallback);
    assert_eq!(record.content, "Main text");

    let note: Notification = rx.try_recv().unwrap();
    assert_eq!(note.severity, Severity::Info);
    assert!(rx.try_recv().is_err());
}

#[test]
fn notifications_only_on_fallback() {
    let (tx, rx) = mpsc::channel();
    let extractor = Extractor::new()
        .with_strategy(Canned("<p>body</p>"))
        .with_notifier(ChannelNotifier::new(tx));

    let page = PageSnapshot::new("https://example.com/", "<p>x</p>");
    extractor.extract(&page).unwrap();
    extractor.extract(&page.clone().with_selection("sel")).unwrap();

    assert!(rx.try_recv().is_err());
}

#[test]
fn extractor_handle_is_reusable_across_threads() {
    let extractor = std::sync::Arc::new(Extractor::new().with_strategy(Canned("<p>shared</p>")));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let extractor = std::sync::Arc::clone(&extractor);
            std::thread::spawn(move || {
                let page = PageSnapshot::new(format!("https://example.com/{i}"), "<p>x</p>");
                extractor.extract(&page).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().content, "shared");
    }
}

#[test]
fn failure_response_round_trips() {
    let json = r#"{"success":false,"error":"Internal error: boom"}"#;
    let response: page_clip::ExtractResponse = serde_json::from_str(json).unwrap();

    assert!(!response.success);
    assert!(response.data.is_none());
    let err = response.into_result().unwrap_err();
    assert!(err.to_string().contains("boom"));
}

//! Readability strategy backed by `dom_smoothie`.

use dom_query::Document;
use dom_smoothie::{Config, Readability};
use url::Url;

use super::{ArticleExtractor, ExtractedArticle};
use crate::dom;
use crate::options::policy::{CHAR_THRESHOLD, MAX_ELEMENTS_TO_PARSE, N_TOP_CANDIDATES};
use crate::patterns::NON_CONTENT_SELECTOR;

/// Mozilla Readability heuristic (via dom_smoothie) with the fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityExtractor;

impl ReadabilityExtractor {
    /// Create the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn config() -> Config {
        Config {
            n_top_candidates: N_TOP_CANDIDATES,
            char_threshold: CHAR_THRESHOLD,
            max_elements_to_parse: MAX_ELEMENTS_TO_PARSE,
            ..Config::default()
        }
    }
}

impl ArticleExtractor for ReadabilityExtractor {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn extract(&self, doc: &Document, page_url: Option<&Url>) -> Option<ExtractedArticle> {
        // Readability consumes the document it parses; hand it a private copy
        let working = dom::clone_document(doc);
        dom::remove_matching(&working, NON_CONTENT_SELECTOR);

        let mut reader =
            match Readability::with_document(working, page_url.map(Url::as_str), Some(Self::config())) {
                Ok(reader) => reader,
                Err(err) => {
                    tracing::warn!(error = %err, "readability setup failed");
                    return None;
                }
            };

        let article = match reader.parse() {
            Ok(article) => article,
            Err(err) => {
                tracing::warn!(error = %err, "readability found no article");
                return None;
            }
        };

        let plain_text = article.text_content.to_string();
        let length = plain_text.chars().count();
        if length < CHAR_THRESHOLD {
            tracing::debug!(length, threshold = CHAR_THRESHOLD, "readability article below threshold");
            return None;
        }

        Some(ExtractedArticle {
            title: article.title.trim().to_string(),
            body_markup: Some(article.content.to_string()),
            plain_text: Some(plain_text),
            excerpt: article.excerpt.unwrap_or_default().trim().to_string(),
            byline: article.byline.unwrap_or_default().trim().to_string(),
            site_name: article.site_name.unwrap_or_default().trim().to_string(),
            length,
        })
    }
}

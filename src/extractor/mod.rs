//! Structured ("main article") extraction.
//!
//! The scoring heuristic sits behind [`ArticleExtractor`] so strategies can be
//! swapped without touching the orchestrator:
//!
//! - [`readability::ReadabilityExtractor`]: dom_smoothie's port of Mozilla
//!   Readability (feature `readability`, on by default)
//! - [`density::DensityExtractor`]: native content-density scorer
//!
//! [`fallback`] holds the plain-text extractor used when no strategy yields
//! an article.

pub mod density;
pub mod fallback;
#[cfg(feature = "readability")]
pub mod readability;

use std::panic::{catch_unwind, AssertUnwindSafe};

use dom_query::Document;
use url::Url;

use crate::options::Options;

/// Result of a successful structured extraction.
///
/// `None` from an extractor means failure; an `ExtractedArticle` always comes
/// from a content root that cleared the length threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Best-guess article title (may differ from the page title).
    pub title: String,

    /// Inner markup of the content root.
    pub body_markup: Option<String>,

    /// Plain text of the content root.
    pub plain_text: Option<String>,

    /// Short summary.
    pub excerpt: String,

    /// Best-guess author line.
    pub byline: String,

    /// Publisher name when determinable.
    pub site_name: String,

    /// Character count of the plain text.
    pub length: usize,
}

impl ExtractedArticle {
    /// Whether the article carries non-blank body markup.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body_markup
            .as_deref()
            .is_some_and(|markup| !markup.trim().is_empty())
    }
}

/// A main-content extraction strategy.
///
/// Implementations receive the parsed page and must leave it untouched:
/// destructive preprocessing happens on a private deep copy.
pub trait ArticleExtractor: Send + Sync {
    /// Short strategy name used in logs.
    fn name(&self) -> &'static str;

    /// Extract the main article, or `None` when no candidate qualifies.
    fn extract(&self, doc: &Document, page_url: Option<&Url>) -> Option<ExtractedArticle>;
}

/// Strategy selected by `options` and the enabled cargo features.
#[must_use]
pub fn default_extractor(options: &Options) -> Box<dyn ArticleExtractor> {
    #[cfg(feature = "readability")]
    {
        if options.use_readability {
            return Box::new(readability::ReadabilityExtractor::new());
        }
    }

    #[cfg(not(feature = "readability"))]
    {
        let _ = options;
    }

    Box::new(density::DensityExtractor::new())
}

/// Run a strategy, converting a panic inside it into `None`.
///
/// Extraction failures never propagate to the caller; they are logged and
/// reported as "no article".
pub fn run_extractor(
    extractor: &dyn ArticleExtractor,
    doc: &Document,
    page_url: Option<&Url>,
) -> Option<ExtractedArticle> {
    match catch_unwind(AssertUnwindSafe(|| extractor.extract(doc, page_url))) {
        Ok(article) => article,
        Err(payload) => {
            tracing::warn!(
                strategy = extractor.name(),
                error = %crate::panic_message(payload.as_ref()),
                "structured extraction panicked"
            );
            None
        }
    }
}

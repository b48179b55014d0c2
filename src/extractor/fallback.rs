//! Fallback Extraction
//!
//! Used when no structured strategy produced an article. Tries a fixed list
//! of semantic containers and returns the visible text of the first one that
//! renders anything, else the visible text of the whole body. Read-only: the
//! live document is never modified.

use dom_query::{Document, Selection};

use crate::dom;
use crate::patterns::FALLBACK_CONTAINERS;

/// Visible text of the most likely content container.
///
/// Returns an empty string only when the body itself renders no text.
#[must_use]
pub fn fallback_text(doc: &Document) -> String {
    for selector in FALLBACK_CONTAINERS {
        let matched = doc.select(selector);
        let Some(first) = matched.nodes().first() else {
            continue;
        };

        let text = dom::visible_text(&Selection::from(*first));
        if !text.is_empty() {
            tracing::debug!(selector, chars = text.chars().count(), "fallback container matched");
            return text;
        }
    }

    tracing::debug!("no fallback container matched, using body text");
    dom::document_visible_text(doc)
}

//! HTML Meta Tag Sources
//!
//! Every metadata field is read through the same ordered fallback chain:
//! a list of [`MetaSource`]s is tried in order and the first non-empty value
//! wins. Field-specific chains live in [`super`]; this module only knows how
//! to answer a single lookup.

use dom_query::{Document, Selection};

use crate::dom;

/// One candidate source for a metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSource {
    /// `<meta>` whose `name` or `property` equals the key (ASCII case-insensitive).
    Meta(&'static str),
    /// The document `<title>` element.
    DocumentTitle,
}

/// A `<meta>` element reduced to its lookup keys and content.
#[derive(Debug, Clone)]
struct MetaEntry {
    keys: Vec<String>,
    content: String,
}

/// All `<meta>` key/content pairs of a document, in document order.
///
/// Built once per extraction so every lookup is a linear scan over a small
/// vector instead of a fresh selector query.
#[derive(Debug, Clone, Default)]
pub struct MetaIndex {
    entries: Vec<MetaEntry>,
    document_title: String,
}

impl MetaIndex {
    /// Collect meta entries and the document title.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let mut entries = Vec::new();

        for node in doc.select("meta").nodes() {
            let meta = Selection::from(*node);
            let content = meta
                .attr("content")
                .map(|c| c.trim().to_string())
                .unwrap_or_default();

            let keys: Vec<String> = ["name", "property"]
                .iter()
                .filter_map(|attr| dom::non_empty_attribute(&meta, attr))
                .map(|k| k.to_ascii_lowercase())
                .collect();

            if keys.is_empty() {
                continue;
            }
            entries.push(MetaEntry { keys, content });
        }

        Self {
            entries,
            document_title: read_document_title(doc),
        }
    }

    /// Content of the first `<meta>` with `key` and non-empty content.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.keys.iter().any(|k| k.eq_ignore_ascii_case(key)))
            .map(|entry| entry.content.as_str())
            .find(|content| !content.is_empty())
    }

    /// Answer a single lookup.
    #[must_use]
    pub fn lookup(&self, source: MetaSource) -> Option<&str> {
        match source {
            MetaSource::Meta(key) => self.meta(key),
            MetaSource::DocumentTitle => {
                (!self.document_title.is_empty()).then_some(self.document_title.as_str())
            }
        }
    }

    /// First non-empty value of an ordered source chain.
    #[must_use]
    pub fn first_non_empty(&self, sources: &[MetaSource]) -> Option<&str> {
        sources.iter().find_map(|source| self.lookup(*source))
    }
}

/// Text of the document `<title>` with whitespace collapsed.
pub(crate) fn read_document_title(doc: &Document) -> String {
    let head_title = doc.select("head title");
    let title = if head_title.exists() {
        head_title
    } else {
        doc.select("title")
    };

    title
        .nodes()
        .first()
        .map(|node| dom::normalize_whitespace(&node.text()))
        .unwrap_or_default()
}

/// Split a comma-separated list, trimming each token and dropping empties.
#[must_use]
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

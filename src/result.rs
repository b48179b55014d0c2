//! Result types for extraction output.
//!
//! [`ContentRecord`] is the externally visible contract handed to the save
//! pipeline; [`ExtractResponse`] is the request-boundary envelope around it.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where the `content` field of a record came from.
///
/// Exactly one source applies per record; precedence is
/// `Selection` > `Structured` > `Fallback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// The user's text selection, verbatim.
    Selection,
    /// Normalized markdown of the structured extractor's article body.
    Structured,
    /// Visible text of the best semantic container or the body.
    Fallback,
}

/// The page as captured for saving.
///
/// Built once per extraction request and owned by the caller from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub url: String,

    /// Host name of `url`, empty when unparsable.
    pub domain: String,

    pub title: String,

    /// Selection text, normalized markdown, or fallback plain text.
    pub content: String,

    /// At most 300 characters; a page description used as the excerpt is
    /// truncated the same way.
    pub excerpt: String,

    /// Trimmed user selection; empty when nothing is selected.
    pub selected_text: String,

    /// `true` iff `selected_text` is non-empty.
    pub has_selection: bool,

    pub description: String,
    pub author: String,
    pub published_date: String,
    pub keywords: Vec<String>,
    pub og_image: String,
    pub favicon: String,

    /// Character count of `content`.
    pub content_length: usize,

    pub site_name: String,

    /// Which extraction path produced `content`.
    pub source: ContentSource,
}

/// Structured response of one "extract current page" request.
///
/// Serializes as `{"success":true,"data":{...}}` or
/// `{"success":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ContentRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    #[must_use]
    pub fn success(record: ContentRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Convert back into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> crate::Result<ContentRecord> {
        match (self.success, self.data) {
            (true, Some(record)) => Ok(record),
            _ => Err(Error::ExtractionFailed(
                self.error.unwrap_or_else(|| "no content record".to_string()),
            )),
        }
    }
}

impl From<crate::Result<ContentRecord>> for ExtractResponse {
    fn from(result: crate::Result<ContentRecord>) -> Self {
        match result {
            Ok(record) => Self::success(record),
            Err(err) => Self::failure(err.to_string()),
        }
    }
}

//! Error types for page-clip.
//!
//! Structured-extraction failures are not errors: they surface as `None`
//! from an [`ArticleExtractor`](crate::extractor::ArticleExtractor) and the
//! orchestrator degrades to the fallback source. The variants here cover a
//! request that aborted and a failure response read back by a caller.

/// Error type for extraction requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A failure response converted back into a `Result`.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Unexpected failure inside the pipeline (for example a caught panic).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

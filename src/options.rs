//! Configuration options and fixed extraction policy.
//!
//! `Options` holds the few behaviours a caller may toggle (which structured
//! strategy runs, whether links and images survive normalization). The numeric
//! thresholds live in [`policy`] and are deliberately not part of `Options`.

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use page_clip::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     include_images: false,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Run the dom_smoothie Readability strategy for structured extraction.
    ///
    /// When `false`, or when the crate is built without the `readability`
    /// feature, the native density scorer is used instead.
    ///
    /// Default: `true`
    pub use_readability: bool,

    /// Keep hyperlinks as `[text](href)` in normalized markdown.
    ///
    /// When disabled only the link text is kept.
    ///
    /// Default: `true`
    pub include_links: bool,

    /// Keep images as `![alt](src)` in normalized markdown.
    ///
    /// Default: `true`
    pub include_images: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            use_readability: true,
            include_links: true,
            include_images: true,
        }
    }
}

/// Fixed extraction policy constants.
pub mod policy {
    /// Number of top-scoring candidates kept while choosing the content root.
    pub const N_TOP_CANDIDATES: usize = 5;

    /// Minimum text length (chars) a content root must hold to count as an article.
    pub const CHAR_THRESHOLD: usize = 500;

    /// Maximum number of elements parsed by the structured extractor (0 = unbounded).
    pub const MAX_ELEMENTS_TO_PARSE: usize = 0;

    /// Maximum length (chars) of an excerpt derived by truncation.
    pub const EXCERPT_MAX_CHARS: usize = 300;

    /// Origin-relative icon path used when the page declares no icon link.
    pub const DEFAULT_FAVICON_PATH: &str = "/favicon.ico";

    /// Deepest element nesting kept as structure. Subtrees below this depth
    /// are collapsed to their visible text so no tree walk can exhaust the
    /// stack.
    pub const MAX_DOM_DEPTH: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert!(opts.use_readability);
        assert!(opts.include_links);
        assert!(opts.include_images);
    }

    #[test]
    fn test_struct_update_syntax() {
        let opts = Options {
            include_links: false,
            ..Options::default()
        };
        assert!(!opts.include_links);
        assert!(opts.use_readability);
    }
}

//! Compiled regex patterns and CSS selectors for content extraction.
//!
//! All patterns are compiled once at first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Class/id hints used by the density scorer
// =============================================================================

/// Class/id names that suggest article content.
pub static POSITIVE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story",
    )
    .expect("POSITIVE_HINT regex")
});

/// Class/id names that suggest boilerplate.
pub static NEGATIVE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget|nav|menu|cookie|subscribe|newsletter",
    )
    .expect("NEGATIVE_HINT regex")
});

/// Class/id names of obvious page chrome, skipped before scoring unless the
/// element also looks like content.
pub static UNLIKELY_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    )
    .expect("UNLIKELY_CANDIDATE regex")
});

/// Rescues elements matched by [`UNLIKELY_CANDIDATE`].
pub static MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|content|main|mathjax|shadow")
        .expect("MAYBE_CANDIDATE regex")
});

/// Class/id names that mark an author line.
pub static BYLINE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)byline|author|dateline|writtenby|p-author").expect("BYLINE_HINT regex")
});

/// Comma-like separators counted as a sign of prose (ASCII and CJK/Arabic commas).
pub static COMMAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[,\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]")
        .expect("COMMAS regex")
});

/// Title separators (`Article | Site`, `Article - Site`, ...).
pub static TITLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s[|\-–—\\/>»]\s").expect("TITLE_SEPARATOR regex")
});

// =============================================================================
// Markdown output
// =============================================================================

/// List marker followed by more than one space (`-   item`, `1.  item`).
pub static LIST_MARKER_SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([-*+]|\d+[.)]) {2,}").expect("LIST_MARKER_SPACING regex")
});

// =============================================================================
// Selectors
// =============================================================================

/// Non-content nodes stripped from every structured-extraction copy.
pub const NON_CONTENT_SELECTOR: &str = "script, style, noscript";

/// Semantic containers tried by the fallback extractor, highest priority first.
pub const FALLBACK_CONTAINERS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
];

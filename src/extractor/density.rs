//! Native content-density scorer.
//!
//! A compact Readability-style heuristic that needs nothing beyond
//! `dom_query`:
//!
//! 1. Strip non-content nodes, page chrome and unlikely candidates from a copy
//! 2. Score every prose block and propagate the score to its ancestors
//! 3. Discount each candidate by its link density and keep the best few
//! 4. Promote the winner to a better-scoring ancestor where warranted
//! 5. Merge related siblings into the final content root

use std::collections::HashMap;

use dom_query::{Document, NodeId, NodeRef, Selection};
use url::Url;

use super::{ArticleExtractor, ExtractedArticle};
use crate::dom;
use crate::link_density::{is_link_heavy, link_density};
use crate::metadata::MetaIndex;
use crate::options::policy::{CHAR_THRESHOLD, N_TOP_CANDIDATES};
use crate::patterns::{
    BYLINE_HINT, COMMAS, MAYBE_CANDIDATE, NEGATIVE_HINT, NON_CONTENT_SELECTOR, POSITIVE_HINT,
    TITLE_SEPARATOR, UNLIKELY_CANDIDATE,
};

/// Structural chrome removed before scoring.
const PAGE_CHROME: &str = "nav, aside, footer, form, iframe, button, dialog";

/// Blocks whose own text is scored.
const SCORED_BLOCKS: &str = "p, pre, td, section, h2, h3, h4, h5, h6, div";

/// A `div` containing any of these is a container, not a leaf block.
const BLOCK_CHILDREN: &str =
    "p, div, section, article, pre, table, ul, ol, dl, blockquote, h1, h2, h3, h4, h5, h6";

/// Elements never removed by the unlikely-candidate pass.
const PROTECTED_TAGS: &[&str] = &["html", "body", "a", "article", "main", "table", "tbody", "tr", "td"];

/// Blocks shorter than this (chars) contribute nothing.
const MIN_BLOCK_CHARS: usize = 25;

/// How many ancestor levels receive a share of a block's score.
const ANCESTOR_LEVELS: usize = 5;

/// Alternative candidates that must share an ancestor before it is promoted.
const MIN_SHARED_CANDIDATES: usize = 3;

/// Longest accepted byline (chars).
const MAX_BYLINE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    node: NodeRef<'a>,
    score: f64,
}

/// Scored candidates in discovery order plus an id lookup.
#[derive(Default)]
struct CandidateSet<'a> {
    candidates: Vec<Candidate<'a>>,
    index: HashMap<NodeId, usize>,
}

impl<'a> CandidateSet<'a> {
    fn add(&mut self, node: NodeRef<'a>, content_score: f64) {
        let slot = match self.index.get(&node.id) {
            Some(&slot) => slot,
            None => {
                self.candidates.push(Candidate {
                    node,
                    score: initial_score(&node),
                });
                self.index.insert(node.id, self.candidates.len() - 1);
                self.candidates.len() - 1
            }
        };
        self.candidates[slot].score += content_score;
    }

    fn score(&self, node: &NodeRef) -> Option<f64> {
        self.index.get(&node.id).map(|&slot| self.candidates[slot].score)
    }

    /// Best `n` candidates, highest first; ties keep document order.
    fn top(&self, n: usize) -> Vec<Candidate<'a>> {
        let mut ranked = self.candidates.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        ranked
    }
}

/// Content-density strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DensityExtractor;

impl DensityExtractor {
    /// Create the strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArticleExtractor for DensityExtractor {
    fn name(&self) -> &'static str {
        "density"
    }

    fn extract(&self, doc: &Document, _page_url: Option<&Url>) -> Option<ExtractedArticle> {
        let working = dom::clone_document(doc);
        dom::remove_matching(&working, NON_CONTENT_SELECTOR);

        let meta = MetaIndex::from_document(&working);
        let byline = find_byline(&working);

        dom::remove_matching(&working, PAGE_CHROME);
        remove_unlikely_candidates(&working);

        let mut set = score_blocks(&working);
        for candidate in &mut set.candidates {
            candidate.score *= 1.0 - link_density(&Selection::from(candidate.node));
        }

        let top = set.top(N_TOP_CANDIDATES);
        let Some(best) = top.first().copied() else {
            tracing::debug!("density scorer found no candidates");
            return None;
        };

        let root = promote(best, &top, &set);
        let root_score = set.score(&root).unwrap_or(0.0);
        let body_markup = merge_siblings(root, root_score, &set);

        let fragment = Document::from(body_markup.as_str());
        let plain_text = dom::document_visible_text(&fragment);
        let length = plain_text.chars().count();
        if length < CHAR_THRESHOLD {
            tracing::debug!(length, threshold = CHAR_THRESHOLD, "density root below threshold");
            return None;
        }

        Some(ExtractedArticle {
            title: article_title(&working, root, &meta),
            excerpt: first_paragraph(&fragment),
            byline,
            site_name: meta.meta("og:site_name").unwrap_or_default().to_string(),
            body_markup: Some(body_markup),
            plain_text: Some(plain_text),
            length,
        })
    }
}

/// Tag-dependent starting score plus class/id hints.
fn initial_score(node: &NodeRef) -> f64 {
    let base = match dom::node_tag(node).as_deref() {
        Some("div") => 5.0,
        Some("pre" | "td" | "blockquote") => 3.0,
        Some("address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form") => -3.0,
        Some("h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th") => -5.0,
        _ => 0.0,
    };
    base + class_weight(&Selection::from(*node))
}

fn class_weight(sel: &Selection) -> f64 {
    let mut weight = 0.0;
    for attr in ["class", "id"] {
        let Some(value) = dom::non_empty_attribute(sel, attr) else {
            continue;
        };
        if NEGATIVE_HINT.is_match(&value) {
            weight -= 25.0;
        }
        if POSITIVE_HINT.is_match(&value) {
            weight += 25.0;
        }
    }
    weight
}

fn remove_unlikely_candidates(doc: &Document) {
    let doomed: Vec<NodeRef> = doc
        .select("body *")
        .nodes()
        .iter()
        .copied()
        .filter(|node| {
            let tag = dom::node_tag(node).unwrap_or_default();
            if PROTECTED_TAGS.contains(&tag.as_str()) {
                return false;
            }
            let sel = Selection::from(*node);
            if dom::is_hidden(&sel) {
                return true;
            }
            let hints = dom::class_and_id(&sel);
            UNLIKELY_CANDIDATE.is_match(&hints) && !MAYBE_CANDIDATE.is_match(&hints)
        })
        .collect();

    for node in doomed {
        Selection::from(node).remove();
    }
}

fn score_blocks(doc: &Document) -> CandidateSet<'_> {
    let mut set = CandidateSet::default();

    for node in doc.select(SCORED_BLOCKS).nodes() {
        let block = Selection::from(*node);
        if dom::node_tag(node).as_deref() == Some("div") && block.select(BLOCK_CHILDREN).exists() {
            continue;
        }

        let text = dom::normalize_whitespace(&node.text());
        let length = text.chars().count();
        if length < MIN_BLOCK_CHARS {
            continue;
        }

        let content_score =
            1.0 + COMMAS.find_iter(&text).count() as f64 + (length / 100).min(3) as f64;

        let mut ancestor = node.parent();
        for level in 0..ANCESTOR_LEVELS {
            let Some(parent) = ancestor else { break };
            // Stop at <html> and the document root
            if !parent.is_element() || !parent.parent().is_some_and(|p| p.is_element()) {
                break;
            }
            let divider = match level {
                0 => 1.0,
                1 => 2.0,
                _ => level as f64 * 3.0,
            };
            set.add(parent, content_score / divider);
            ancestor = parent.parent();
        }
    }

    set
}

fn is_ancestor(ancestor: &NodeRef, node: &NodeRef) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id == ancestor.id {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn is_body_or_above(node: &NodeRef) -> bool {
    matches!(dom::node_tag(node).as_deref(), Some("body" | "html") | None)
}

/// Move from the best candidate to the node that really holds the article.
fn promote<'a>(best: Candidate<'a>, top: &[Candidate<'a>], set: &CandidateSet<'a>) -> NodeRef<'a> {
    let mut root = best.node;

    // Several strong candidates under one ancestor: the article was split
    let strong: Vec<NodeRef> = top
        .iter()
        .skip(1)
        .filter(|c| best.score > 0.0 && c.score / best.score >= 0.75)
        .map(|c| c.node)
        .collect();
    if strong.len() >= MIN_SHARED_CANDIDATES {
        let mut current = root.parent();
        while let Some(parent) = current.filter(|p| !is_body_or_above(p)) {
            let shared = strong.iter().filter(|n| is_ancestor(&parent, n)).count();
            if shared >= MIN_SHARED_CANDIDATES {
                root = parent;
                break;
            }
            current = parent.parent();
        }
    }

    // Climb while the parent keeps a comparable score
    let mut last_score = set.score(&root).unwrap_or(best.score);
    let threshold = last_score / 3.0;
    let mut current = root.parent();
    while let Some(parent) = current.filter(|p| !is_body_or_above(p)) {
        let Some(parent_score) = set.score(&parent) else {
            current = parent.parent();
            continue;
        };
        if parent_score < threshold {
            break;
        }
        if parent_score > last_score {
            root = parent;
            break;
        }
        last_score = parent_score;
        current = parent.parent();
    }

    // A lone child says nothing its parent doesn't
    while let Some(parent) = root.parent().filter(|p| !is_body_or_above(p)) {
        if element_children(&parent).len() != 1 {
            break;
        }
        root = parent;
    }

    root
}

fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// Outer markup of the root and every sibling that looks like part of it.
fn merge_siblings(root: NodeRef, root_score: f64, set: &CandidateSet) -> String {
    let Some(parent) = root.parent().filter(NodeRef::is_element) else {
        return Selection::from(root).html().to_string();
    };

    let threshold = (root_score * 0.2).max(10.0);
    let root_class = dom::non_empty_attribute(&Selection::from(root), "class");
    let mut parts = Vec::new();

    for sibling in element_children(&parent) {
        let sel = Selection::from(sibling);
        let keep = if sibling.id == root.id {
            true
        } else {
            let bonus = match (&root_class, dom::non_empty_attribute(&sel, "class")) {
                (Some(a), Some(b)) if *a == b => root_score * 0.2,
                _ => 0.0,
            };
            let scored = set.score(&sibling).is_some_and(|s| s + bonus >= threshold);
            (scored || is_prose_paragraph(&sel)) && !is_link_heavy(&sel)
        };
        if keep {
            parts.push(sel.html().to_string());
        }
    }

    format!("<div>{}</div>", parts.concat())
}

fn is_prose_paragraph(sel: &Selection) -> bool {
    if dom::tag_name(sel).as_deref() != Some("p") {
        return false;
    }
    let text = dom::normalize_whitespace(&sel.text());
    let length = text.chars().count();
    let density = link_density(sel);
    if length > 80 {
        density < 0.25
    } else {
        length > 0 && density == 0.0 && (text.ends_with('.') || text.contains(". "))
    }
}

/// `<h1>` in the root, the page's only `<h1>`, `og:title`, then a cleaned `<title>`.
fn article_title(doc: &Document, root: NodeRef, meta: &MetaIndex) -> String {
    if let Some(title) = first_heading(&Selection::from(root).select("h1")) {
        return title;
    }

    let all = doc.select("h1");
    if all.length() == 1 {
        if let Some(title) = first_heading(&all) {
            return title;
        }
    }

    if let Some(title) = meta.meta("og:title") {
        return title.to_string();
    }

    clean_document_title(&crate::metadata::meta_tags::read_document_title(doc))
}

fn first_heading(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .map(|n| dom::normalize_whitespace(&n.text()))
        .filter(|t| !t.is_empty())
}

/// Drop a trailing site name (`Story | Site`) when what remains still reads
/// like a title.
fn clean_document_title(title: &str) -> String {
    let Some(found) = TITLE_SEPARATOR.find(title) else {
        return title.to_string();
    };
    let head = title[..found.start()].trim();
    if head.split_whitespace().count() >= 3 {
        head.to_string()
    } else {
        title.to_string()
    }
}

fn find_byline(doc: &Document) -> String {
    let explicit = doc.select(r#"[rel="author"], [itemprop~="author"]"#);
    let hinted = doc
        .select("body *")
        .nodes()
        .iter()
        .copied()
        .filter(|node| BYLINE_HINT.is_match(&dom::class_and_id(&Selection::from(*node))))
        .collect::<Vec<_>>();

    explicit
        .nodes()
        .iter()
        .copied()
        .chain(hinted)
        .map(|node| dom::normalize_whitespace(&node.text()))
        .find(|text| !text.is_empty() && text.chars().count() <= MAX_BYLINE_CHARS)
        .unwrap_or_default()
}

fn first_paragraph(fragment: &Document) -> String {
    fragment
        .select("p")
        .nodes()
        .iter()
        .map(|node| dom::normalize_whitespace(&node.text()))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

//! Link Density
//!
//! Measures how much of an element's text sits inside links. Navigation
//! blocks, tag clouds and "related" lists are link-heavy; prose is not.

use dom_query::Selection;

use crate::dom;

/// Same-page anchors (`href="#..."`) count for less: they are usually
/// footnotes or tables of contents inside the article itself.
const HASH_LINK_WEIGHT: f64 = 0.3;

/// Length of `text` ignoring whitespace, so source indentation and line
/// breaks between links never count as prose.
fn visible_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Collect heuristics on link text.
///
/// Returns (total_link_length, num_short_links, non_empty_links)
fn collect_link_info(links: &Selection) -> (usize, usize, usize) {
    let mut link_length = 0;
    let mut n_short_links = 0;
    let mut n_non_empty_links = 0;

    for link in links.iter() {
        let text_length = visible_len(&link.text());

        if text_length == 0 {
            continue;
        }

        link_length += text_length;
        if text_length < 10 {
            n_short_links += 1;
        }
        n_non_empty_links += 1;
    }

    (link_length, n_short_links, n_non_empty_links)
}

/// Ratio (0.0..=1.0) of link text to all text in `element`.
#[must_use]
pub fn link_density(element: &Selection) -> f64 {
    let text_length = visible_len(&dom::text_content(element));
    if text_length == 0 {
        return 0.0;
    }

    let mut link_length = 0.0;
    for link in element.select("a").iter() {
        let weight = if link
            .attr("href")
            .is_some_and(|href| href.trim_start().starts_with('#'))
        {
            HASH_LINK_WEIGHT
        } else {
            1.0
        };
        link_length += visible_len(&link.text()) as f64 * weight;
    }

    (link_length / text_length as f64).min(1.0)
}

/// Check whether a short block is made of links (probably boilerplate).
///
/// Returns true when the element should not be treated as content.
#[must_use]
pub fn is_link_heavy(element: &Selection) -> bool {
    let links = element.select("a");
    let n_links = links.length();

    if n_links == 0 {
        return false;
    }

    let text_length = visible_len(&dom::text_content(element));

    // Shortcut for a block that is one long link
    if n_links == 1 {
        if let Some(link_node) = links.nodes().first() {
            let link_text_length = visible_len(&link_node.text());
            if link_text_length > 100 && (link_text_length as f64) > (text_length as f64) * 0.9 {
                return true;
            }
        }
    }

    let tag_name = dom::tag_name(element).unwrap_or_default();
    let has_next_sibling = element
        .nodes()
        .first()
        .and_then(dom_query::NodeRef::next_element_sibling)
        .is_some();

    let limit_length: usize = if tag_name == "p" {
        if has_next_sibling { 30 } else { 60 }
    } else if has_next_sibling {
        100
    } else {
        300
    };

    if text_length >= limit_length {
        return false;
    }

    let (link_length, n_short_links, n_non_empty_links) = collect_link_info(&links);

    if n_non_empty_links == 0 {
        return true;
    }

    // Link text > 80% of total text
    if (link_length as f64) > (text_length as f64) * 0.8 {
        return true;
    }

    // More than 80% of links are short - typical of nav menus
    n_non_empty_links > 1 && (n_short_links as f64) / (n_non_empty_links as f64) > 0.8
}

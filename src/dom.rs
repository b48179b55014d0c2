//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` shared by the readers and extractors:
//! attribute and tag access, isolated document copies, and the rendered
//! ("visible") text of a subtree.

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

/// Elements whose subtree never renders as text.
const NON_RENDERED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "svg",
    "iframe", "object", "embed", "canvas", "audio", "video", "select", "option", "datalist",
];

/// Elements that start and end their own line in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Get a non-empty, trimmed attribute value
#[must_use]
pub fn non_empty_attribute(sel: &Selection, name: &str) -> Option<String> {
    let value = sel.attr(name)?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Concatenated `class` and `id` attributes, used for hint matching
#[must_use]
pub fn class_and_id(sel: &Selection) -> String {
    let class = sel.attr("class").map(|s| s.to_string()).unwrap_or_default();
    let id = sel.attr("id").map(|s| s.to_string()).unwrap_or_default();
    format!("{class} {id}")
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Tag name of a single node (lowercase), `None` for non-elements
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

// === Text Content ===

/// Get all text content of node and descendants, including non-rendered
/// text such as script bodies.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Collapse every whitespace run to a single space and trim.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rendered text of every node in `sel`, approximating `innerText`.
///
/// Non-rendered and hidden subtrees are skipped, block elements and `<br>`
/// break lines, spaces inside a line are collapsed and consecutive blank
/// lines are merged into one.
#[must_use]
pub fn visible_text(sel: &Selection) -> String {
    let mut raw = String::new();
    for node in sel.nodes() {
        push_visible_text(node, &mut raw);
    }
    tidy_lines(&raw)
}

/// Rendered text of a whole document: `<body>` when present, else the root.
#[must_use]
pub fn document_visible_text(doc: &Document) -> String {
    let body = doc.select("body");
    if body.exists() {
        visible_text(&body)
    } else {
        visible_text(&doc.select("html"))
    }
}

/// Pending work for the visible-text walk.
enum TextStep<'a> {
    Visit(NodeRef<'a>),
    Emit(char),
}

fn push_visible_text(root: &NodeRef, out: &mut String) {
    let mut stack = vec![TextStep::Visit(*root)];

    while let Some(step) = stack.pop() {
        let node = match step {
            TextStep::Emit(ch) => {
                out.push(ch);
                continue;
            }
            TextStep::Visit(node) => node,
        };

        if node.is_text() {
            // Source newlines are layout, not rendered breaks
            out.extend(
                node.text()
                    .chars()
                    .map(|c| if c.is_whitespace() { ' ' } else { c }),
            );
            continue;
        }

        let Some(tag) = node_tag(&node) else {
            // Document and fragment roots still carry children
            push_children(&node, &mut stack);
            continue;
        };

        if NON_RENDERED_TAGS.contains(&tag.as_str()) || is_hidden(&Selection::from(node)) {
            continue;
        }

        if tag == "br" {
            out.push('\n');
            continue;
        }

        let is_block = BLOCK_TAGS.contains(&tag.as_str());
        let is_cell = matches!(tag.as_str(), "td" | "th");
        if is_block && !is_cell {
            out.push('\n');
        }

        if is_cell {
            stack.push(TextStep::Emit('\t'));
        } else if is_block {
            stack.push(TextStep::Emit('\n'));
        }
        push_children(&node, &mut stack);
    }
}

/// Queue children so they pop in document order.
fn push_children<'a>(node: &NodeRef<'a>, stack: &mut Vec<TextStep<'a>>) {
    stack.extend(node.children_it(true).map(TextStep::Visit));
}

/// Collapse every element nested deeper than `max_depth` into its visible
/// text, returning how many subtrees were flattened.
///
/// Elements at `max_depth` keep their tag; their descendants are replaced by
/// one text node. Later walks over the tree are then bounded by
/// `max_depth`.
pub fn limit_depth(doc: &Document, max_depth: usize) -> usize {
    let mut flattened = 0;
    let mut stack = vec![(doc.root(), 0_usize)];

    while let Some((node, depth)) = stack.pop() {
        if !node.is_element() {
            stack.extend(node.children_it(false).map(|child| (child, depth)));
            continue;
        }

        if depth < max_depth {
            stack.extend(node.children_it(false).map(|child| (child, depth + 1)));
            continue;
        }

        if node.first_element_child().is_some() {
            let text = visible_text(&Selection::from(node));
            node.set_text(text);
            flattened += 1;
        }
    }

    flattened
}

/// Whether an element is hidden by attribute or inline style.
#[must_use]
pub fn is_hidden(sel: &Selection) -> bool {
    if sel.has_attr("hidden") {
        return true;
    }
    if sel
        .attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return true;
    }
    sel.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("display:none") || compact.contains("visibility:hidden")
    })
}

fn tidy_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_blank = false;

    for line in raw.lines() {
        let line = normalize_whitespace(line);
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        out.push_str(&line);
        pending_blank = false;
    }

    out
}

// === Tree Manipulation ===

/// Remove every element matching `selector`
#[inline]
pub fn remove_matching(doc: &Document, selector: &str) {
    doc.select(selector).remove();
}

/// Deep, independent copy of a document.
///
/// Destructive preprocessing runs on the copy; the copy is dropped with the
/// caller's scope on every exit path.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

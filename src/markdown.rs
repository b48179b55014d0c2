//! Markup Normalizer.
//!
//! Converts an HTML fragment into markdown under one fixed style so the same
//! input always produces the same output:
//!
//! - headings are ATX (`#`), rules are `---`
//! - bullets are `- `, ordered items `1. `, `2. `, ...
//! - code blocks are fenced with triple backticks
//! - emphasis is `_em_`, strong is `**strong**`
//! - `<br>` is a hard break (two trailing spaces)
//! - blocks are separated by exactly one blank line
//!
//! Conversion is done by `htmd`. A `dom_query` pass runs first for what the
//! converter has no option for: hidden elements, `javascript:` links, the
//! link and image toggles, `lang-*` code classes and GFM pipe tables.

use dom_query::{Document, NodeRef, Selection};
use htmd::options::{
    BrStyle, BulletListMarker, CodeBlockFence, CodeBlockStyle, HeadingStyle, HrStyle, LinkStyle,
    Options as HtmdOptions,
};
use htmd::{Element, HtmlToMarkdown};

use crate::dom;
use crate::options::policy::MAX_DOM_DEPTH;
use crate::options::Options;
use crate::patterns::LIST_MARKER_SPACING;

/// Characters that have special meaning in Markdown and need escaping.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '[', ']', '`', '<', '>'];

/// Elements dropped together with their content.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "title", "meta", "link", "iframe",
    "object", "embed", "svg", "canvas", "button", "input", "select", "textarea", "form",
];

/// Stand-in element for a table already rendered as GFM.
const TABLE_PLACEHOLDER: &str = "page-clip-table";

/// Escape Markdown special characters in text content.
///
/// Besides inline markers, a line that would open a block (`# `, `- `,
/// `+ `, `1. `) gets its marker escaped.
///
/// # Examples
///
/// ```
/// use page_clip::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*", false), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name", false), r"my\_variable\_name");
/// assert_eq!(escape_markdown("# 1 priority", false), r"\# 1 priority");
/// assert_eq!(escape_markdown("*text*", true), "*text*");
/// ```
#[must_use]
pub fn escape_markdown(text: &str, in_code_block: bool) -> String {
    if in_code_block || text.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);

    for line in text.split_inclusive('\n') {
        let mut escaped = String::with_capacity(line.len());
        for ch in line.chars() {
            if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        push_escaped_line_start(&escaped, &mut result);
    }

    result
}

/// Append `line`, escaping a block marker at its start.
fn push_escaped_line_start(line: &str, out: &mut String) {
    let body = line.trim_start();
    out.push_str(&line[..line.len() - body.len()]);

    match block_marker_position(body) {
        Some(at) => {
            out.push_str(&body[..at]);
            out.push('\\');
            out.push_str(&body[at..]);
        }
        None => out.push_str(body),
    }
}

/// Byte offset of the character that would make `body` open a block:
/// an ATX heading, a bullet, an ordered item or a dash rule.
fn block_marker_position(body: &str) -> Option<usize> {
    let closes_marker = |rest: &str| rest.is_empty() || rest.starts_with(char::is_whitespace);

    let hashes = body.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) && closes_marker(&body[hashes..]) {
        return Some(0);
    }

    if body.starts_with(['-', '+']) && closes_marker(&body[1..]) {
        return Some(0);
    }
    let rule = body.trim_end();
    if rule.len() >= 3 && rule.chars().all(|c| c == '-' || c == ' ') {
        return Some(0);
    }

    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 && body[digits..].starts_with(['.', ')']) && closes_marker(&body[digits + 1..]) {
        return Some(digits);
    }

    None
}

/// Normalize an extracted article body into markdown.
///
/// Uses `body_markup` when present. Without markup the plain text is
/// returned trimmed, and with neither the result is empty.
#[must_use]
pub fn normalize(body_markup: Option<&str>, plain_text: Option<&str>, options: &Options) -> String {
    match (body_markup, plain_text) {
        (Some(markup), _) => html_to_markdown(markup, options),
        (None, Some(text)) => text.trim().to_string(),
        (None, None) => String::new(),
    }
}

/// Convert an HTML fragment (or full document) to markdown.
///
/// # Example
///
/// ```
/// use page_clip::{markdown::html_to_markdown, Options};
///
/// let md = html_to_markdown("<h2>Intro</h2><p>Hello <em>world</em></p>", &Options::default());
/// assert_eq!(md, "## Intro\n\nHello _world_");
/// ```
#[must_use]
pub fn html_to_markdown(html: &str, options: &Options) -> String {
    let doc = Document::from(html);
    dom::limit_depth(&doc, MAX_DOM_DEPTH);
    let tables = prepare(&doc, options);

    let prepared = doc
        .body()
        .map_or_else(|| doc.html(), |body| body.inner_html());

    match converter(tables).convert(&prepared) {
        Ok(markdown) => tidy(&markdown),
        Err(err) => {
            tracing::warn!(error = %err, "markdown conversion failed, using visible text");
            dom::document_visible_text(&Document::from(html))
        }
    }
}

/// Converter in the fixed output style. Placeholders are swapped back for
/// the pre-rendered `tables`.
fn converter(tables: Vec<String>) -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(HtmdOptions {
            heading_style: HeadingStyle::Atx,
            hr_style: HrStyle::Dashes,
            br_style: BrStyle::TwoSpaces,
            link_style: LinkStyle::Inlined,
            code_block_style: CodeBlockStyle::Fenced,
            code_block_fence: CodeBlockFence::Backticks,
            bullet_list_marker: BulletListMarker::Dash,
            ..HtmdOptions::default()
        })
        .skip_tags(SKIPPED_TAGS.to_vec())
        .add_handler(vec![TABLE_PLACEHOLDER], move |element: Element| {
            let index = element.content.trim().parse::<usize>().ok()?;
            tables.get(index).map(|table| format!("\n\n{table}\n\n"))
        })
        .build()
}

/// Rewrite `doc` in place for conversion and return the rendered tables.
fn prepare(doc: &Document, options: &Options) -> Vec<String> {
    let hidden: Vec<NodeRef> = doc
        .select("[hidden], [aria-hidden], [style]")
        .nodes()
        .iter()
        .copied()
        .filter(|node| dom::is_hidden(&Selection::from(*node)))
        .collect();
    for node in hidden {
        node.remove_from_parent();
    }

    prepare_links(doc, options);
    prepare_images(doc, options);
    prepare_code_blocks(doc);
    prepare_tables(doc)
}

/// Links that cannot be followed, or are switched off, keep their text only.
fn prepare_links(doc: &Document, options: &Options) {
    let links = doc.select("a");
    for link in links.nodes() {
        let href = dom::non_empty_attribute(&Selection::from(*link), "href")
            .filter(|h| !h.to_ascii_lowercase().starts_with("javascript:"));
        match href {
            Some(href) if options.include_links => {
                link.set_attr("href", &encode_destination(&href));
            }
            _ => {
                link.remove_attr("href");
                link.rename("span");
            }
        }
    }
}

fn prepare_images(doc: &Document, options: &Options) {
    let images = doc.select("img");
    for image in images.nodes() {
        match dom::non_empty_attribute(&Selection::from(*image), "src") {
            Some(src) if options.include_images => {
                image.set_attr("src", &encode_destination(&src));
            }
            _ => image.remove_from_parent(),
        }
    }
}

/// Every `<pre>` gets a `<code>` child carrying a `language-*` class when
/// the block names one (`language-x` or `lang-x`, on either element).
fn prepare_code_blocks(doc: &Document) {
    let blocks = doc.select("pre");
    for pre in blocks.nodes() {
        let pre_sel = Selection::from(*pre);
        if !pre_sel.select("code").exists() {
            let inner = pre.inner_html();
            pre.set_html(format!("<code>{inner}</code>"));
        }

        let code = pre_sel.select("code");
        let language = [&code, &pre_sel]
            .iter()
            .filter_map(|sel| sel.attr("class"))
            .find_map(|class| {
                class.split_whitespace().find_map(|c| {
                    c.strip_prefix("language-")
                        .or_else(|| c.strip_prefix("lang-"))
                        .map(str::to_string)
                })
            });
        if let Some(language) = language {
            code.set_attr("class", &format!("language-{language}"));
        }
    }
}

/// Replace each outermost table with a placeholder holding its index.
fn prepare_tables(doc: &Document) -> Vec<String> {
    let outermost: Vec<NodeRef> = doc
        .select("table")
        .nodes()
        .iter()
        .copied()
        .filter(|table| {
            !table
                .ancestors_it(None)
                .any(|a| dom::node_tag(&a).as_deref() == Some("table"))
        })
        .collect();

    let mut tables = Vec::new();
    for table in outermost {
        let rendered = table_to_markdown(&Selection::from(table));
        if rendered.is_empty() {
            table.remove_from_parent();
            continue;
        }
        table.replace_with_html(format!(
            "<{TABLE_PLACEHOLDER}>{}</{TABLE_PLACEHOLDER}>",
            tables.len()
        ));
        tables.push(rendered);
    }
    tables
}

/// Percent-encode the characters that would end an inline destination.
fn encode_destination(href: &str) -> String {
    href.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// A line made only of three or more `-`, `*` or `_` (spaces allowed).
fn is_thematic_break(line: &str) -> bool {
    let compact: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|marker| compact.iter().all(|c| c == marker))
}

/// Collapse runs of blank lines to one, single-space list markers, write
/// rules as `---`, trim trailing spaces (except hard breaks) and surrounding
/// blank lines. Fenced code is left verbatim.
fn tidy(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut open_fence: Option<String> = None;

    for line in raw.lines() {
        if let Some(fence) = &open_fence {
            if line.trim() == fence.as_str() {
                open_fence = None;
            }
            lines.push(line.trim_end().to_string());
            continue;
        }
        let content = line.trim_start();
        if content.starts_with("```") {
            let fence: String = content.chars().take_while(|&c| c == '`').collect();
            open_fence = Some(fence);
            lines.push(line.trim_end().to_string());
            continue;
        }

        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            continue;
        }
        if is_thematic_break(trimmed) {
            lines.push("---".to_string());
            continue;
        }

        let spaced = LIST_MARKER_SPACING.replace(trimmed, "${1}${2} ");
        if line.ends_with("  ") {
            lines.push(format!("{spaced}  "));
        } else {
            lines.push(spaced.into_owned());
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if let Some(last) = lines.last_mut() {
        let end = last.trim_end().len();
        last.truncate(end);
    }

    lines.join("\n")
}

// === Tables ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_attr(cell: &Selection) -> Self {
        match cell.attr("align").map(|a| a.trim().to_ascii_lowercase()).as_deref() {
            Some("left") => Self::Left,
            Some("center") => Self::Center,
            Some("right") => Self::Right,
            _ => Self::None,
        }
    }
}

fn format_separator(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => ":---",
        Alignment::Center => ":---:",
        Alignment::Right => "---:",
        Alignment::None => "---",
    }
}

/// GFM pipe table. The first row is the header; short rows are padded.
fn table_to_markdown(table: &Selection) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut alignments: Vec<Alignment> = Vec::new();

    for tr in table.select("tr").iter() {
        let mut row = Vec::new();
        for cell in tr.select("td, th").iter() {
            if rows.is_empty() {
                alignments.push(Alignment::from_attr(&cell));
            }
            let text = dom::normalize_whitespace(&dom::visible_text(&cell));
            row.push(escape_markdown(&text, false).replace('|', "\\|"));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }
    alignments.resize(col_count, Alignment::None);

    let format_row = |row: &[String]| {
        let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
        cells.resize(col_count, "");
        format!("| {} |", cells.join(" | "))
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (idx, row) in rows.iter().enumerate() {
        lines.push(format_row(row));
        if idx == 0 {
            let separator: Vec<&str> = alignments.iter().map(|a| format_separator(*a)).collect();
            lines.push(format!("| {} |", separator.join(" | ")));
        }
    }
    lines.join("\n")
}

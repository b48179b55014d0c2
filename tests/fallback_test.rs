#![allow(clippy::unwrap_used)]

use dom_query::Document;
use page_clip::extractor::fallback::fallback_text;
use page_clip::{extract, ContentSource, PageSnapshot};

#[test]
fn container_priority_order() {
    let cases = [
        (
            r#"<body><div class="content">c</div><main>m</main><article>a</article></body>"#,
            "a",
        ),
        (r#"<body><div class="content">c</div><main>m</main></body>"#, "m"),
        (r#"<body><div class="content">c</div><section role="main">r</section></body>"#, "r"),
        (r#"<body><div class="content">c</div><div class="article-content">ac</div></body>"#, "ac"),
        (r#"<body><div class="content">c</div><div class="post-content">pc</div></body>"#, "pc"),
        (r#"<body><div class="content">c</div></body>"#, "c"),
    ];

    for (html, expected) in cases {
        let doc = Document::from(html);
        assert_eq!(fallback_text(&doc), expected, "html: {html}");
    }
}

#[test]
fn visible_text_not_markup() {
    let doc = Document::from(
        r#"<body><article>
            <h2>Heading</h2>
            <p>First <b>bold</b> para.</p>
            <script>track()</script>
            <style>.x{}</style>
            <p style="display: none">Hidden</p>
            <ul><li>one</li><li>two</li></ul>
        </article></body>"#,
    );

    assert_eq!(fallback_text(&doc), "Heading\n\nFirst bold para.\n\none\n\ntwo");
}

#[test]
fn table_cells_are_separated() {
    let doc = Document::from("<body><main><table><tr><td>a</td><td>b</td></tr></table></main></body>");
    assert_eq!(fallback_text(&doc), "a b");
}

#[test]
fn first_matching_element_wins_within_selector() {
    let doc = Document::from("<body><article>first</article><article>second</article></body>");
    assert_eq!(fallback_text(&doc), "first");
}

#[test]
fn fallback_never_empty_when_body_has_text() {
    let page = PageSnapshot::new(
        "https://example.com/",
        "<body><article>   </article><main></main><p>Loose text</p></body>",
    );
    let record = extract(&page).unwrap();

    assert_eq!(record.source, ContentSource::Fallback);
    assert_eq!(record.content, "Loose text");
}

#[test]
fn blank_page_gives_empty_record() {
    let page = PageSnapshot::new("https://example.com/", "<html><body></body></html>");
    let record = extract(&page).unwrap();

    assert_eq!(record.source, ContentSource::Fallback);
    assert_eq!(record.content, "");
    assert_eq!(record.content_length, 0);
    assert_eq!(record.excerpt, "");
}

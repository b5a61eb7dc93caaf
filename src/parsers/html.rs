use crate::filter;
use crate::parsers::selector;
use crate::parsers::text::{collapse_whitespace, element_text, longer_than};
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| selector("h1, h2, h3"));
static TEXT_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("h1, h2, h3, h4, h5, h6, p, span, div, li, blockquote"));

/// Raw `href` values of every anchor in document order
pub fn hrefs(scope: ElementRef<'_>) -> Vec<&str> {
    scope
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .collect()
}

/// Every anchor resolved against `base`, deduplicated in first-seen order
pub fn outbound_links(scope: ElementRef<'_>, base: &Url) -> Vec<String> {
    let links = filter::normalize(hrefs(scope), base);
    ::log::debug!("HTML parser found {} links on {}", links.len(), base);
    links
}

/// Text of every `h1`-`h3` in document order
pub fn headlines(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .select(&HEADINGS)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Per-page text capture: each block-ish element's text, longer than two characters.
///
/// Nested blocks each contribute their own text, so parents repeat their children.
pub fn text_blocks(scope: ElementRef<'_>) -> Vec<String> {
    scope
        .select(&TEXT_BLOCKS)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|text| longer_than(text, 2))
        .collect()
}

//! Single-value descriptive fields: site name, slogan and about text.

use crate::parsers::text::{element_text, longer_than, text_excluding};
use crate::parsers::{Strategy, first_of, selector};
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Minimum length of an about fragment worth keeping
const ABOUT_MIN_CHARS: usize = 20;

/// Elements inside an about container whose text is navigation, not prose
const ABOUT_SKIP: &[&str] = &["nav", "a", "ul", "ol", "li", "header", "footer"];

static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[name='description' i]"));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[property='og:description']"));
static OG_SITE_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector("meta[property='og:site_name']"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static SLOGAN_CLASSES: LazyLock<Selector> =
    LazyLock::new(|| selector(".slogan, .tagline, .subtitle, .hero-text"));
static ABOUT_CONTAINERS: LazyLock<Selector> =
    LazyLock::new(|| selector("[id*='about' i], [class*='about' i]"));
static ABOUT_BLOCKS: LazyLock<Selector> = LazyLock::new(|| selector("p, div, span"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| selector("p"));

pub const NAME_STRATEGIES: &[(&str, Strategy)] = &[
    ("og:site_name", name_from_og_site_name),
    ("title", name_from_title),
    ("first h1", name_from_h1),
];

pub const SLOGAN_STRATEGIES: &[(&str, Strategy)] = &[
    ("meta description", meta_description),
    ("og:description", og_description),
    ("slogan class", slogan_from_class),
    ("heading after h1", slogan_after_h1),
];

pub const ABOUT_STRATEGIES: &[(&str, Strategy)] = &[
    ("meta description", meta_description),
    ("about containers", about_from_containers),
    ("about paragraph", about_from_paragraph),
];

pub fn extract_name(scope: ElementRef<'_>) -> String {
    first_of(scope, NAME_STRATEGIES)
}

pub fn extract_slogan(scope: ElementRef<'_>) -> String {
    first_of(scope, SLOGAN_STRATEGIES)
}

pub fn extract_about(scope: ElementRef<'_>) -> String {
    first_of(scope, ABOUT_STRATEGIES)
}

fn meta_content(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .find_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
}

pub fn meta_description(scope: ElementRef<'_>) -> Option<String> {
    meta_content(scope, &META_DESCRIPTION)
}

pub fn og_description(scope: ElementRef<'_>) -> Option<String> {
    meta_content(scope, &OG_DESCRIPTION)
}

pub fn name_from_og_site_name(scope: ElementRef<'_>) -> Option<String> {
    meta_content(scope, &OG_SITE_NAME)
}

pub fn name_from_title(scope: ElementRef<'_>) -> Option<String> {
    scope.select(&TITLE).next().map(element_text)
}

pub fn name_from_h1(scope: ElementRef<'_>) -> Option<String> {
    scope.select(&H1).next().map(element_text)
}

pub fn slogan_from_class(scope: ElementRef<'_>) -> Option<String> {
    scope.select(&SLOGAN_CLASSES).next().map(element_text)
}

/// The element right after the first `h1`, if it is an `h2` or `h3`
pub fn slogan_after_h1(scope: ElementRef<'_>) -> Option<String> {
    let h1 = scope.select(&H1).next()?;
    let next = h1.next_siblings().find_map(ElementRef::wrap)?;
    matches!(next.value().name(), "h2" | "h3").then(|| element_text(next))
}

/// Prose inside elements whose id or class mentions "about".
///
/// Each paragraph/div/span block (the container itself included) is read once,
/// even when about containers nest. Fragments of 20 characters or fewer are dropped.
pub fn about_from_containers(scope: ElementRef<'_>) -> Option<String> {
    let mut visited = HashSet::new();
    let mut fragments = Vec::new();

    for container in scope.select(&ABOUT_CONTAINERS) {
        let blocks = std::iter::once(container)
            .filter(|c| matches!(c.value().name(), "p" | "div" | "span"))
            .chain(container.select(&ABOUT_BLOCKS));
        for block in blocks {
            if !visited.insert(block.id()) || !is_prose_block(block, container) {
                continue;
            }
            let text = text_excluding(block, ABOUT_SKIP);
            if longer_than(&text, ABOUT_MIN_CHARS) {
                fragments.push(text);
            }
        }
    }

    Some(fragments.join(" "))
}

/// Outermost block holding no nested paragraph or div, outside navigation
fn is_prose_block(block: ElementRef<'_>, container: ElementRef<'_>) -> bool {
    if has_nested_block(block) {
        return false;
    }
    if block.id() == container.id() {
        return true;
    }

    let mut chain = Vec::new();
    for ancestor in block.ancestors().filter_map(ElementRef::wrap) {
        chain.push(ancestor);
        if ancestor.id() == container.id() {
            break;
        }
    }

    !chain.iter().any(|ancestor| match ancestor.value().name() {
        "p" | "span" => true,
        "div" => !has_nested_block(*ancestor),
        name => ABOUT_SKIP.contains(&name),
    })
}

fn has_nested_block(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|child| matches!(child.value().name(), "p" | "div"))
}

/// First paragraph mentioning "about" that is long enough to be prose
pub fn about_from_paragraph(scope: ElementRef<'_>) -> Option<String> {
    scope
        .select(&PARAGRAPHS)
        .map(element_text)
        .find(|text| text.to_lowercase().contains("about") && longer_than(text, ABOUT_MIN_CHARS))
}

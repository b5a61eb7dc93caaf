//! Contact-channel extractors: email, phone and social profile links.
//!
//! Email and phone are resolved through ordered strategy tables; the first
//! strategy yielding a non-empty value wins and results are never merged.

use crate::parsers::text::visible_text;
use crate::parsers::{Strategy, first_of, selector};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

/// Platforms whose profile links are collected as social links
pub const SOCIAL_PLATFORMS: &[&str] = &["facebook", "twitter", "linkedin", "instagram", "youtube"];

static MAILTO: LazyLock<Selector> = LazyLock::new(|| selector("a[href^='mailto:' i]"));
static TEL: LazyLock<Selector> = LazyLock::new(|| selector("a[href^='tel:' i]"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-z]{2,}").expect("Email pattern should be valid")
});
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}").expect("Phone pattern should be valid"));

pub const EMAIL_STRATEGIES: &[(&str, Strategy)] =
    &[("mailto anchor", email_from_mailto), ("body text", email_from_text)];

pub const PHONE_STRATEGIES: &[(&str, Strategy)] =
    &[("tel anchor", phone_from_tel), ("body text", phone_from_text)];

/// First email address found in `scope`
pub fn extract_email(scope: ElementRef<'_>) -> String {
    first_of(scope, EMAIL_STRATEGIES)
}

/// First phone number found in `scope`, with separators stripped
pub fn extract_phone(scope: ElementRef<'_>) -> String {
    strip_phone_separators(&first_of(scope, PHONE_STRATEGIES))
}

pub fn email_from_mailto(scope: ElementRef<'_>) -> Option<String> {
    let href = scope.select(&MAILTO).next()?.value().attr("href")?;
    let address = strip_scheme(href, "mailto:");
    // Drop any ?subject=... suffix
    let address = address.split('?').next().unwrap_or_default().trim();
    Some(address.to_string())
}

pub fn email_from_text(scope: ElementRef<'_>) -> Option<String> {
    let text = visible_text(scope);
    EMAIL_PATTERN.find(&text).map(|m| m.as_str().to_string())
}

pub fn phone_from_tel(scope: ElementRef<'_>) -> Option<String> {
    let href = scope.select(&TEL).next()?.value().attr("href")?;
    Some(strip_scheme(href, "tel:").trim().to_string())
}

pub fn phone_from_text(scope: ElementRef<'_>) -> Option<String> {
    let text = visible_text(scope);
    PHONE_PATTERN.find(&text).map(|m| m.as_str().trim().to_string())
}

/// Remove spaces, parentheses and dashes so numbers compare format-insensitively
pub fn strip_phone_separators(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '(' | ')' | '-'))
        .collect()
}

fn strip_scheme<'a>(href: &'a str, scheme: &str) -> &'a str {
    let href = href.trim();
    match href.get(..scheme.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => &href[scheme.len()..],
        _ => href,
    }
}

/// Platform keyword an href belongs to, if any
pub fn social_platform(href: &str) -> Option<&'static str> {
    let href = href.to_ascii_lowercase();
    SOCIAL_PLATFORMS
        .iter()
        .copied()
        .find(|platform| href.contains(platform))
}

/// Absolute URLs of social profile anchors, in document order, duplicates kept
pub fn social_links(scope: ElementRef<'_>, base: &Url) -> Vec<String> {
    scope
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| social_platform(href).is_some())
        .filter_map(|href| base.join(href.trim()).ok())
        .map(|url| url.to_string())
        .collect()
}

//! Structural guess at team-member blocks on an About-like page.
//!
//! Each element whose class contains the configured marker (`container` by
//! default) is treated as one candidate member. This is a site-dependent
//! heuristic; tune the marker through configuration rather than here.

use crate::parsers::contact::{extract_email, extract_phone, social_platform};
use crate::parsers::selector;
use crate::parsers::text::element_text;
use crate::results::TeamMember;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use url::Url;

/// Platforms kept under their own tag; everything else lands in `other`
const TAGGED_PLATFORMS: &[&str] = &["facebook", "instagram", "linkedin"];

static NAME_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| selector("h1, h2, h3, h4, h5, h6, [class*='name' i], strong"));
static ROLE_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    selector("[class*='role' i], [class*='position' i], [class*='designation' i], [class*='title' i], p, span")
});
static ADDRESS_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| selector("address, [class*='address' i]"));
static ANCHORS: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// Members found in `scope`; blocks that resolve no name, role, email or phone are dropped
pub fn extract_team(scope: ElementRef<'_>, base: &Url, container_class: &str) -> Vec<TeamMember> {
    let css = format!("[class*='{}']", container_class.replace('\'', "\\'"));
    let containers = match Selector::parse(&css) {
        Ok(containers) => containers,
        Err(e) => {
            ::log::warn!("Unusable team container class {:?}: {}", container_class, e);
            return Vec::new();
        }
    };

    let members: Vec<TeamMember> = scope
        .select(&containers)
        .map(|block| member_from_block(block, base))
        .filter(TeamMember::is_identified)
        .collect();

    ::log::debug!("Found {} team members on {}", members.len(), base);
    members
}

/// Read one candidate block into a member, fields left empty when unresolved
pub fn member_from_block(block: ElementRef<'_>, base: &Url) -> TeamMember {
    let name = first_text(block, &NAME_CANDIDATES, |_| true);
    let role = first_text(block, &ROLE_CANDIDATES, |text| text != name);
    let address = first_text(block, &ADDRESS_CANDIDATES, |_| true);

    TeamMember {
        role,
        email: extract_email(block),
        phone: extract_phone(block),
        address,
        social_links: tagged_social_links(block, base),
        name,
    }
}

fn first_text(block: ElementRef<'_>, selector: &Selector, accept: impl Fn(&str) -> bool) -> String {
    block
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty() && accept(text))
        .unwrap_or_default()
}

fn tagged_social_links(block: ElementRef<'_>, base: &Url) -> BTreeMap<String, Vec<String>> {
    let mut links: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for href in block.select(&ANCHORS).filter_map(|a| a.value().attr("href")) {
        let Some(platform) = social_platform(href) else {
            continue;
        };
        let Ok(url) = base.join(href.trim()) else {
            continue;
        };
        let tag = if TAGGED_PLATFORMS.contains(&platform) {
            platform
        } else {
            "other"
        };
        links.entry(tag.to_string()).or_default().push(url.to_string());
    }

    links
}

use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Resolve raw hrefs against `base` into an ordered set of absolute URLs.
///
/// Fragment-only and `javascript:` hrefs are skipped, unparsable ones are
/// dropped, and duplicates (by exact resolved string) keep their first position.
pub fn normalize<'a, I>(hrefs: I, base: &Url) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let Some(resolved) = resolve(href, base) else {
            ::log::trace!("Dropping href {:?} on {}", href, base);
            continue;
        };
        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    links
}

/// Resolve one href, rejecting fragment-only and script-pseudo links
pub fn resolve(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || is_script_pseudo(href) {
        return None;
    }
    base.join(href).ok()
}

fn is_script_pseudo(href: &str) -> bool {
    href.get(..10)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript"))
}

/// Second-stage filter deciding which frontier links are worth rendering
#[derive(Debug)]
pub struct LinkFilter {
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a filter from exclude patterns
    pub fn new<S: AsRef<str>>(exclude_patterns: &[S]) -> Result<Self, ConfigError> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern.as_ref())?);
        }

        Ok(Self { exclude_regexes })
    }

    /// Whether a resolved link points at renderable site content
    pub fn should_crawl(&self, link: &str) -> bool {
        !self.exclude_regexes.iter().any(|regex| regex.is_match(link))
    }

    /// Links eligible for fan-out, in frontier order, minus the seed page itself
    pub fn content_links(&self, links: &[String], seed: &str) -> Vec<String> {
        let seed = Url::parse(seed).ok();
        links
            .iter()
            .filter(|link| {
                if !self.should_crawl(link) {
                    ::log::debug!("Link filter rejected: {}", link);
                    return false;
                }
                !is_same_page(link, seed.as_ref())
            })
            .cloned()
            .collect()
    }
}

/// Same document as the seed, ignoring any fragment
fn is_same_page(link: &str, seed: Option<&Url>) -> bool {
    let (Some(seed), Ok(mut link)) = (seed, Url::parse(link)) else {
        return false;
    };
    link.set_fragment(None);
    let mut seed = seed.clone();
    seed.set_fragment(None);
    link == seed
}

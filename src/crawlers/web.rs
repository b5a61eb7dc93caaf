use crate::config::{FAN_OUT_CONCURRENCY, ScraperConfig};
use crate::crawlers::crawler::PageFetcher;
use crate::error::{ConfigError, FetchError};
use crate::filter::LinkFilter;
use crate::parsers::{Document, contact, html, profile, team};
use crate::results::{PageCapture, ScrapedSite, TeamMember};
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

static ABOUT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(about|about_us|about-us|our-story|who-we-are)")
        .expect("About link pattern should be valid")
});
static CONTACT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(contact|contact_us|contact-us|contacts|get-in-touch)")
        .expect("Contact link pattern should be valid")
});

/// Per-invocation crawl settings derived from [`ScraperConfig`]
#[derive(Debug)]
pub struct CrawlOptions {
    pub seed_timeout: Duration,
    pub page_timeout: Duration,
    pub filter: LinkFilter,
    pub team_container_class: String,
    pub max_subpages: Option<usize>,
}

impl CrawlOptions {
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            seed_timeout: config.seed_timeout(),
            page_timeout: config.page_timeout(),
            filter: LinkFilter::new(&config.exclude_patterns)?,
            team_container_class: config.team_container_class.clone(),
            max_subpages: config.max_subpages,
        })
    }
}

/// Fields read from the seed page in one synchronous pass
#[derive(Debug, Default)]
struct SeedExtraction {
    name: String,
    slogan: String,
    about: String,
    email: String,
    phone: String,
    social_links: Vec<String>,
    headlines: Vec<String>,
    links: Vec<String>,
}

fn extract_seed(source: &str, base: &Url) -> SeedExtraction {
    let doc = Document::parse(source, base.clone());
    let root = doc.root();

    SeedExtraction {
        name: profile::extract_name(root),
        slogan: profile::extract_slogan(root),
        about: profile::extract_about(root),
        email: contact::extract_email(root),
        phone: contact::extract_phone(root),
        social_links: contact::social_links(root, doc.base()),
        headlines: html::headlines(root),
        links: html::outbound_links(root, doc.base()),
    }
}

/// Pages fetched during one crawl, in the order their fetch was issued
#[derive(Default)]
struct FetchedPages {
    order: Vec<String>,
    sources: HashMap<String, String>,
    attempted: HashSet<String>,
}

impl FetchedPages {
    fn record(&mut self, url: &str, result: Result<String, FetchError>) {
        self.attempted.insert(url.to_string());
        match result {
            Ok(source) => {
                self.order.push(url.to_string());
                self.sources.insert(url.to_string(), source);
            }
            Err(e) => ::log::error!("Failed to scrape {}: {}", url, e),
        }
    }

    /// Source of `url`, fetching it once if no earlier fetch was issued
    async fn get_or_fetch(
        &mut self,
        fetcher: &dyn PageFetcher,
        url: &str,
        timeout: Duration,
    ) -> Option<String> {
        if !self.attempted.contains(url) {
            let result = fetcher.fetch(url, timeout).await;
            self.record(url, result);
        }
        self.sources.get(url).cloned()
    }

    /// Text captures for every successful fetch, seed first
    fn captures(&self) -> Vec<PageCapture> {
        self.order
            .iter()
            .filter_map(|url| {
                let source = self.sources.get(url)?;
                let base = Url::parse(url).ok()?;
                let doc = Document::parse(source, base);
                Some(PageCapture::new(url.clone(), html::text_blocks(doc.root())))
            })
            .collect()
    }
}

/// Crawl the site rooted at `site.url` and return the record enriched with
/// everything that could be extracted.
///
/// Never fails: an unreachable seed page yields the record as given, and
/// every sub-page failure only leaves data out.
pub async fn crawl(fetcher: &dyn PageFetcher, site: ScrapedSite, options: &CrawlOptions) -> ScrapedSite {
    let seed_url = site.url.clone();
    ::log::info!("Starting site crawl for: {}", seed_url);

    let base = match Url::parse(&seed_url) {
        Ok(base) => base,
        Err(e) => {
            ::log::error!("Invalid seed URL {}: {}", seed_url, e);
            return site;
        }
    };

    let mut pages = FetchedPages::default();
    let seed_source = match fetcher.fetch(&seed_url, options.seed_timeout).await {
        Ok(source) => source,
        Err(e) => {
            ::log::error!("Seed page unavailable, keeping bare record for {}: {}", seed_url, e);
            return site;
        }
    };

    let seed = extract_seed(&seed_source, &base);
    pages.record(&seed_url, Ok(seed_source));
    ::log::info!("Found {} links in {}", seed.links.len(), seed_url);

    let content_links = options.filter.content_links(&seed.links, &seed_url);
    let fan_out_links = match options.max_subpages {
        Some(max) => &content_links[..content_links.len().min(max)],
        None => &content_links[..],
    };

    for (url, result) in fan_out(fetcher, fan_out_links, options.page_timeout).await {
        pages.record(&url, result);
    }

    // About and contact pages are looked up among all same-site links, since
    // the content filter may reject a whole host on a keyword
    let site_links = same_site_links(&seed.links, &base);

    let site = site
        .with_name(seed.name)
        .with_slogan(seed.slogan)
        .with_about(seed.about)
        .with_email(seed.email)
        .with_phone(seed.phone)
        .with_social_links(seed.social_links)
        .with_headlines(seed.headlines)
        .with_links(seed.links);

    let site = fill_about(site, fetcher, &mut pages, &site_links, options).await;
    let site = fill_contact(site, fetcher, &mut pages, &site_links, options).await;
    let team = find_team(fetcher, &mut pages, &site_links, options).await;

    let site = site.with_team(team).with_pages(pages.captures());
    ::log::info!(
        "Crawl of {} complete: {} pages, {} team members",
        seed_url,
        site.pages.len(),
        site.team.len()
    );
    site
}

/// Render `links` with at most [`FAN_OUT_CONCURRENCY`] fetches in flight.
///
/// Results come back in link order; a failed fetch never cancels its siblings.
async fn fan_out(
    fetcher: &dyn PageFetcher,
    links: &[String],
    timeout: Duration,
) -> Vec<(String, Result<String, FetchError>)> {
    ::log::debug!("Fanning out over {} links", links.len());

    stream::iter(links)
        .map(|link| async move {
            ::log::debug!("Fetching sub-page: {}", link);
            (link.clone(), fetcher.fetch(link, timeout).await)
        })
        .buffered(FAN_OUT_CONCURRENCY)
        .collect()
        .await
}

/// Links pointing at the same host as `base`
fn same_site_links(links: &[String], base: &Url) -> Vec<String> {
    links
        .iter()
        .filter(|link| Url::parse(link).is_ok_and(|url| url.host_str() == base.host_str()))
        .cloned()
        .collect()
}

fn find_link<'a>(links: &'a [String], pattern: &Regex) -> Option<&'a str> {
    links
        .iter()
        .find(|link| {
            Url::parse(link)
                .map(|url| pattern.is_match(&url[url::Position::BeforePath..]))
                .unwrap_or(false)
        })
        .map(String::as_str)
}

/// Parse a fetched page and run one extractor over the whole document
fn extract_from(source: &str, url: &str, extractor: impl Fn(&Document) -> String) -> String {
    match Url::parse(url) {
        Ok(base) => extractor(&Document::parse(source, base)),
        Err(_) => String::new(),
    }
}

async fn fill_about(
    site: ScrapedSite,
    fetcher: &dyn PageFetcher,
    pages: &mut FetchedPages,
    links: &[String],
    options: &CrawlOptions,
) -> ScrapedSite {
    if !site.about.is_empty() {
        return site;
    }
    let Some(link) = find_link(links, &ABOUT_LINK) else {
        return site;
    };
    let Some(source) = pages.get_or_fetch(fetcher, link, options.page_timeout).await else {
        return site;
    };

    let about = extract_from(&source, link, |doc| profile::extract_about(doc.root()));
    ::log::debug!("About fallback on {} found {} chars", link, about.len());
    site.with_about(about)
}

async fn fill_contact(
    site: ScrapedSite,
    fetcher: &dyn PageFetcher,
    pages: &mut FetchedPages,
    links: &[String],
    options: &CrawlOptions,
) -> ScrapedSite {
    if !site.email.is_empty() && !site.phone.is_empty() {
        return site;
    }
    let Some(link) = find_link(links, &CONTACT_LINK) else {
        return site;
    };
    let Some(source) = pages.get_or_fetch(fetcher, link, options.page_timeout).await else {
        return site;
    };

    let mut site = site;
    if site.email.is_empty() {
        let email = extract_from(&source, link, |doc| contact::extract_email(doc.root()));
        ::log::debug!("Contact fallback on {} found email {:?}", link, email);
        site = site.with_email(email);
    }
    if site.phone.is_empty() {
        let phone = extract_from(&source, link, |doc| contact::extract_phone(doc.root()));
        ::log::debug!("Contact fallback on {} found phone {:?}", link, phone);
        site = site.with_phone(phone);
    }
    site
}

async fn find_team(
    fetcher: &dyn PageFetcher,
    pages: &mut FetchedPages,
    links: &[String],
    options: &CrawlOptions,
) -> Vec<TeamMember> {
    let Some(link) = find_link(links, &ABOUT_LINK) else {
        ::log::debug!("No about page linked, skipping team extraction");
        return Vec::new();
    };
    let Some(source) = pages.get_or_fetch(fetcher, link, options.page_timeout).await else {
        return Vec::new();
    };
    let Ok(base) = Url::parse(link) else {
        return Vec::new();
    };

    let doc = Document::parse(&source, base);
    team::extract_team(doc.root(), doc.base(), &options.team_container_class)
}

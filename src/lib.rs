//! Business-profile scraper: renders a site's seed page in a real browser,
//! extracts contact details, social links, team members and page text,
//! fans out over the site's own links and persists one record per crawl.

pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod service;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::{ConfigError, FetchError, ScrapeError, StoreError};
pub use results::{PageCapture, ScrapedSite, SiteStatus, TeamMember};
pub use service::ScraperService;

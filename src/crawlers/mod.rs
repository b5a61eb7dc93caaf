pub mod crawler;
pub mod fetcher;
pub mod web;

pub use crawler::{Browser, PageFetcher};
pub use fetcher::WebDriverBrowser;
pub use web::{CrawlOptions, crawl};

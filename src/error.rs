use thiserror::Error;

/// Per-URL failure while rendering a page. Never aborts a crawl.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not open a browser session at {endpoint}: {message}")]
    Session { endpoint: String, message: String },

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("{url} is not an HTML document")]
    NotDocument { url: String },

    #[error("could not read page source for {url}: {message}")]
    Source { url: String, message: String },
}

/// Document store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// The only failure a scrape invocation surfaces to its caller
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to persist scraped site: {0}")]
    Store(#[from] StoreError),
}

use crate::config::ScraperConfig;
use crate::crawlers::{Browser, CrawlOptions, WebDriverBrowser, crawl};
use crate::error::{ConfigError, ScrapeError};
use crate::results::{ScrapedSite, SiteStatus};
use crate::storage::{JsonFileStore, SiteStore};
use std::sync::Arc;

/// Entry point the rest of the system calls: crawl a site, persist it once, read it back
pub struct ScraperService {
    browser: Arc<dyn Browser>,
    store: Arc<dyn SiteStore>,
    options: CrawlOptions,
}

impl ScraperService {
    pub fn new(
        config: &ScraperConfig,
        browser: Arc<dyn Browser>,
        store: Arc<dyn SiteStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            browser,
            store,
            options: CrawlOptions::from_config(config)?,
        })
    }

    /// WebDriver browser and JSON file store as configured
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        let browser = Arc::new(WebDriverBrowser::new(&config.webdriver_url, config.headless));
        let store = Arc::new(JsonFileStore::new(&config.store_dir));
        Self::new(config, browser, store)
    }

    /// Crawl `url` on behalf of `user_id` and store the result as a new record.
    ///
    /// Browser and page failures only reduce what the record contains; the
    /// single store write is the only thing that can fail the call.
    pub async fn scrape_website(
        &self,
        url: &str,
        user_id: &str,
        category: &str,
    ) -> Result<ScrapedSite, ScrapeError> {
        ::log::info!("Scraping URL: {} ({})", url, category);
        let site = ScrapedSite::new(url, user_id, category);

        let site = match self.browser.launch().await {
            Ok(session) => crawl(session.as_ref(), site, &self.options).await,
            Err(e) => {
                ::log::error!("Failed to start browser for {}: {}", url, e);
                site
            }
        };

        let id = self.store.insert(&site).await?;
        ::log::info!("Persisted {} as record {}", url, id);
        Ok(site.with_id(id))
    }

    /// Every record stored for `user_id`
    pub async fn scrape_all(&self, user_id: &str) -> Result<Vec<ScrapedSite>, ScrapeError> {
        Ok(self.store.find_by_user(user_id).await?)
    }

    /// Latest record stored for `url`
    pub async fn find_by_url(&self, url: &str) -> Result<Option<ScrapedSite>, ScrapeError> {
        Ok(self.store.find_by_url(url).await?)
    }

    /// Flag the records for `url` as consumed downstream
    pub async fn mark_live(&self, url: &str) -> Result<usize, ScrapeError> {
        let updated = self.store.set_status(url, SiteStatus::Live).await?;
        ::log::info!("Marked {} record(s) for {} as Live", updated, url);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::PageFetcher;
    use crate::error::{FetchError, StoreError};
    use crate::storage::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticSite;

    #[async_trait]
    impl PageFetcher for StaticSite {
        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
            match url {
                "https://static.example/" => Ok(r#"<html><head><title>Static Co</title></head>
                    <body><h1>Static Co</h1><p>Call +44 20 7946 0958 today</p></body></html>"#
                    .to_string()),
                _ => Err(FetchError::NotDocument { url: url.to_string() }),
            }
        }
    }

    struct StaticBrowser;

    #[async_trait]
    impl Browser for StaticBrowser {
        async fn launch(&self) -> Result<Box<dyn PageFetcher>, FetchError> {
            Ok(Box::new(StaticSite))
        }
    }

    struct BrokenBrowser;

    #[async_trait]
    impl Browser for BrokenBrowser {
        async fn launch(&self) -> Result<Box<dyn PageFetcher>, FetchError> {
            Err(FetchError::Session {
                endpoint: "http://localhost:4444".into(),
                message: "connection refused".into(),
            })
        }
    }

    struct FailingStore;

    #[async_trait]
    impl SiteStore for FailingStore {
        async fn insert(&self, _site: &ScrapedSite) -> StoreResult<String> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        async fn find_by_user(&self, _user_id: &str) -> StoreResult<Vec<ScrapedSite>> {
            Ok(Vec::new())
        }
        async fn find_by_url(&self, _url: &str) -> StoreResult<Option<ScrapedSite>> {
            Ok(None)
        }
        async fn set_status(&self, _url: &str, _status: SiteStatus) -> StoreResult<usize> {
            Ok(0)
        }
    }

    fn service(browser: Arc<dyn Browser>, store: Arc<dyn SiteStore>) -> ScraperService {
        ScraperService::new(&ScraperConfig::default(), browser, store).unwrap()
    }

    #[tokio::test]
    async fn test_scrape_persists_once_and_returns_id() {
        let store = Arc::new(MemoryStore::new());
        let service = service(Arc::new(StaticBrowser), store.clone());

        let site = service
            .scrape_website("https://static.example/", "u1", "consulting")
            .await
            .unwrap();

        assert!(!site.id.is_empty());
        assert_eq!(site.name, "Static Co");
        assert_eq!(site.phone, "+442079460958");
        assert_eq!(site.headlines, vec!["Static Co"]);
        assert_eq!(site.status, SiteStatus::Pending);

        let stored = service.scrape_all("u1").await.unwrap();
        assert_eq!(stored, vec![site]);
    }

    #[tokio::test]
    async fn test_browser_failure_still_stores_bare_record() {
        let service = service(Arc::new(BrokenBrowser), Arc::new(MemoryStore::new()));

        let site = service
            .scrape_website("https://static.example/", "u1", "consulting")
            .await
            .unwrap();

        assert_eq!(site.url, "https://static.example/");
        assert_eq!(site.category, "consulting");
        assert!(site.name.is_empty() && site.pages.is_empty());
        assert_eq!(service.scrape_all("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_the_only_error() {
        let service = service(Arc::new(StaticBrowser), Arc::new(FailingStore));

        let err = service
            .scrape_website("https://static.example/", "u1", "consulting")
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Store(_)));
    }

    #[tokio::test]
    async fn test_mark_live() {
        let service = service(Arc::new(StaticBrowser), Arc::new(MemoryStore::new()));
        service
            .scrape_website("https://static.example/", "u1", "consulting")
            .await
            .unwrap();

        assert_eq!(service.mark_live("https://static.example/").await.unwrap(), 1);
        let site = service.find_by_url("https://static.example/").await.unwrap().unwrap();
        assert_eq!(site.status, SiteStatus::Live);
    }
}

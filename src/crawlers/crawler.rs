use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

/// A browser session owned by exactly one crawl invocation
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Navigate to `url`, wait for DOM readiness and return the serialized HTML
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Launches independent browser sessions, one per crawl invocation
#[async_trait]
pub trait Browser: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>, FetchError>;
}

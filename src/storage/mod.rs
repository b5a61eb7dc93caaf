//! Document store holding scraped site records.
//!
//! Every crawl inserts a fresh record; nothing is upserted. Reads return
//! records in insertion order.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::results::{ScrapedSite, SiteStatus};
use async_trait::async_trait;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SiteStore: Send + Sync {
    /// Persist a new record and return its assigned id
    async fn insert(&self, site: &ScrapedSite) -> StoreResult<String>;

    /// All records attributed to `user_id`, oldest first
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<ScrapedSite>>;

    /// Most recent record for `url`
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<ScrapedSite>>;

    /// Set the status of every record for `url`, returning how many changed
    async fn set_status(&self, url: &str, status: SiteStatus) -> StoreResult<usize>;
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

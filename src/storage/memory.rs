use super::{SiteStore, StoreResult, new_id};
use crate::results::{ScrapedSite, SiteStatus};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local store, mostly for tests and one-off runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    sites: RwLock<Vec<ScrapedSite>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn insert(&self, site: &ScrapedSite) -> StoreResult<String> {
        let id = new_id();
        self.sites.write().await.push(site.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<ScrapedSite>> {
        let sites = self.sites.read().await;
        Ok(sites.iter().filter(|s| s.user_id == user_id).cloned().collect())
    }

    async fn find_by_url(&self, url: &str) -> StoreResult<Option<ScrapedSite>> {
        let sites = self.sites.read().await;
        Ok(sites.iter().rev().find(|s| s.url == url).cloned())
    }

    async fn set_status(&self, url: &str, status: SiteStatus) -> StoreResult<usize> {
        let mut sites = self.sites.write().await;
        let mut updated = 0;
        for site in sites.iter_mut().filter(|s| s.url == url) {
            site.status = status;
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let site = ScrapedSite::new("https://a.example", "u1", "c");

        let first = store.insert(&site).await.unwrap();
        let second = store.insert(&site).await.unwrap();
        assert_ne!(first, second);

        let stored = store.find_by_user("u1").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, first);
        assert_eq!(stored[1].id, second);
    }

    #[tokio::test]
    async fn test_find_by_user_filters() {
        let store = MemoryStore::new();
        store.insert(&ScrapedSite::new("https://a.example", "u1", "c")).await.unwrap();
        store.insert(&ScrapedSite::new("https://b.example", "u2", "c")).await.unwrap();

        let sites = store.find_by_user("u2").await.unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].url, "https://b.example");
        assert!(store.find_by_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_url_returns_latest_and_status_updates() {
        let store = MemoryStore::new();
        store.insert(&ScrapedSite::new("https://a.example", "u1", "old")).await.unwrap();
        store.insert(&ScrapedSite::new("https://a.example", "u1", "new")).await.unwrap();

        let latest = store.find_by_url("https://a.example").await.unwrap().unwrap();
        assert_eq!(latest.category, "new");

        let updated = store.set_status("https://a.example", SiteStatus::Live).await.unwrap();
        assert_eq!(updated, 2);
        let latest = store.find_by_url("https://a.example").await.unwrap().unwrap();
        assert_eq!(latest.status, SiteStatus::Live);
        assert!(store.find_by_url("https://missing.example").await.unwrap().is_none());
    }
}

use super::{SiteStore, StoreResult, new_id};
use crate::results::{ScrapedSite, SiteStatus};
use crate::utils::sanitize_filename;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::fs;

/// One pretty-printed JSON document per record inside a directory.
///
/// File names start with a zero-padded insertion key, so sorting them by
/// name yields insertion order regardless of when each crawl started.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    last_key: AtomicI64,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_key: AtomicI64::new(0),
        }
    }

    /// Insertion time in microseconds, strictly increasing within this handle
    fn next_key(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_key
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1)
    }

    async fn write(&self, path: &Path, site: &ScrapedSite) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(site)?;
        fs::write(path, json).await?;
        Ok(())
    }

    /// Every readable record with its file, in insertion order
    async fn load_all(&self) -> StoreResult<Vec<(PathBuf, ScrapedSite)>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let contents = fs::read_to_string(&path).await?;
            match serde_json::from_str::<ScrapedSite>(&contents) {
                Ok(site) => records.push((path, site)),
                Err(e) => ::log::warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        records.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
        Ok(records)
    }
}

#[async_trait]
impl SiteStore for JsonFileStore {
    async fn insert(&self, site: &ScrapedSite) -> StoreResult<String> {
        fs::create_dir_all(&self.dir).await?;

        let id = new_id();
        let path = self.dir.join(format!(
            "{:020}-{}-{}.json",
            self.next_key(),
            sanitize_filename(&site.url),
            id
        ));
        self.write(&path, &site.clone().with_id(id.clone())).await?;

        ::log::info!("Stored {} as {}", site.url, path.display());
        Ok(id)
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<ScrapedSite>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .map(|(_, site)| site)
            .filter(|site| site.user_id == user_id)
            .collect())
    }

    async fn find_by_url(&self, url: &str) -> StoreResult<Option<ScrapedSite>> {
        Ok(self
            .load_all()
            .await?
            .into_iter()
            .rev()
            .map(|(_, site)| site)
            .find(|site| site.url == url))
    }

    async fn set_status(&self, url: &str, status: SiteStatus) -> StoreResult<usize> {
        let mut updated = 0;
        for (path, site) in self.load_all().await? {
            if site.url != url {
                continue;
            }
            self.write(&path, &site.with_status(status)).await?;
            updated += 1;
        }
        Ok(updated)
    }
}

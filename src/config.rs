use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Number of sub-pages rendered at once during fan-out
pub const FAN_OUT_CONCURRENCY: usize = 3;

/// Configuration for a scrape invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Navigation timeout for the seed page
    #[serde(default = "default_timeout_secs")]
    pub seed_timeout_secs: u64,

    /// Navigation timeout for sub-pages and gap-fill pages
    #[serde(default = "default_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Regex patterns for links that are never rendered during fan-out
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Class substring marking candidate team-member blocks
    #[serde(default = "default_team_container_class")]
    pub team_container_class: String,

    /// Upper bound on fan-out links (unbounded if unset)
    #[serde(default)]
    pub max_subpages: Option<usize>,

    /// Directory holding the JSON document store
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            seed_timeout_secs: default_timeout_secs(),
            page_timeout_secs: default_timeout_secs(),
            exclude_patterns: default_exclude_patterns(),
            team_container_class: default_team_container_class(),
            max_subpages: None,
            store_dir: default_store_dir(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Override the WebDriver URL with the `WEBDRIVER_URL` environment variable if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn seed_timeout(&self) -> Duration {
        Duration::from_secs(self.seed_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

/// Contact channels, social profiles and file-sharing hosts
pub fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"^mailto:".to_string(),
        r"^tel:".to_string(),
        r"(?i)(linkedin|instagram|facebook|twitter|youtube|github|upwork|fiverr|freelancer|drive)"
            .to_string(),
    ]
}

fn default_team_container_class() -> String {
    "container".to_string()
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("scraped_sites")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ScraperConfig::from_json("{}").unwrap();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.seed_timeout(), Duration::from_secs(60));
        assert_eq!(config.page_timeout(), Duration::from_secs(60));
        assert_eq!(config.team_container_class, "container");
        assert_eq!(config.exclude_patterns, default_exclude_patterns());
        assert!(config.max_subpages.is_none());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = ScraperConfig::from_json(
            r#"{"page_timeout_secs": 15, "team_container_class": "team-card", "max_subpages": 20}"#,
        )
        .unwrap();
        assert_eq!(config.page_timeout_secs, 15);
        assert_eq!(config.seed_timeout_secs, 60);
        assert_eq!(config.team_container_class, "team-card");
        assert_eq!(config.max_subpages, Some(20));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = ScraperConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.json");
        std::fs::write(&path, r#"{"headless": false}"#).unwrap();

        let config = ScraperConfig::from_file(&path).unwrap();
        assert!(!config.headless);

        let missing = ScraperConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}

use crate::crawlers::crawler::{Browser, PageFetcher};
use crate::error::FetchError;
use crate::parsers::ContentKind;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout_at};

/// Well-known local WebDriver endpoints tried when the configured one is down
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Chrome driven over WebDriver
#[derive(Debug, Clone)]
pub struct WebDriverBrowser {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverBrowser {
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
        }
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn launch(&self) -> Result<Box<dyn PageFetcher>, FetchError> {
        ::log::debug!("Launching WebDriver session via {}", self.webdriver_url);
        Ok(Box::new(WebDriverSession {
            webdriver_url: self.webdriver_url.clone(),
            headless: self.headless,
            endpoint: Mutex::new(None),
        }))
    }
}

/// One crawl's browser. Every fetch gets its own WebDriver session so that
/// concurrent sub-page fetches never share navigation state.
pub struct WebDriverSession {
    webdriver_url: String,
    headless: bool,
    /// Endpoint that accepted the first connection, reused afterwards
    endpoint: Mutex<Option<String>>,
}

impl WebDriverSession {
    fn capabilities(&self, page_load: Duration) -> Map<String, Value> {
        let mut args = vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"];
        if self.headless {
            args.push("--headless=new");
        }

        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        // "eager" returns once DOMContentLoaded fired, without waiting for subresources
        caps.insert("pageLoadStrategy".to_string(), json!("eager"));
        caps.insert(
            "timeouts".to_string(),
            json!({ "pageLoad": page_load.as_millis() as u64 }),
        );
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    async fn connect(&self, page_load: Duration) -> Result<Client, FetchError> {
        let capabilities = self.capabilities(page_load);

        let known = self.endpoint.lock().await.clone();
        if let Some(endpoint) = known {
            return connect_to(&endpoint, capabilities)
                .await
                .map_err(|message| FetchError::Session { endpoint, message });
        }

        let (client, endpoint) = connect_to_webdriver(&self.webdriver_url, capabilities).await?;
        *self.endpoint.lock().await = Some(endpoint);
        Ok(client)
    }
}

#[async_trait]
impl PageFetcher for WebDriverSession {
    async fn fetch(&self, url: &str, page_load: Duration) -> Result<String, FetchError> {
        if !ContentKind::from_url(url).is_document() {
            return Err(FetchError::NotDocument {
                url: url.to_string(),
            });
        }

        let started = Instant::now();
        ::log::debug!("SCRAPE: {}", url);

        // One deadline for session setup and navigation; it also covers drivers
        // that ignore the pageLoad capability or queue new sessions
        let deadline = Instant::now() + page_load;
        let timed_out = || FetchError::Timeout {
            url: url.to_string(),
            secs: page_load.as_secs(),
        };

        let client = timeout_at(deadline, self.connect(page_load))
            .await
            .map_err(|_| timed_out())??;
        let rendered = timeout_at(deadline, render(&client, url)).await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session for {}: {}", url, e);
        }

        let html = rendered.map_err(|_| timed_out())??;

        ::log::debug!(
            "Rendered {} ({} bytes) in {:.2} seconds",
            url,
            html.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(html)
    }
}

/// Navigate and serialize the DOM
async fn render(client: &Client, url: &str) -> Result<String, FetchError> {
    client
        .goto(url)
        .await
        .map_err(|e| navigation_error(e, "accessing", url))?;

    client.source().await.map_err(|e| FetchError::Source {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Classify a navigation failure, flagging lost sessions separately in the log
fn navigation_error(error: fantoccini::error::CmdError, context: &str, url: &str) -> FetchError {
    let message = error.to_string();
    if message.contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else if message.to_ascii_lowercase().contains("timeout") {
        ::log::debug!("Page load timed out while {} {}", context, url);
    }
    FetchError::Navigation {
        url: url.to_string(),
        message,
    }
}

async fn connect_to(endpoint: &str, capabilities: Map<String, Value>) -> Result<Client, String> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities);
    builder.connect(endpoint).await.map_err(|e| e.to_string())
}

/// Connects to the WebDriver instance, trying common local endpoints if the configured one fails
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: Map<String, Value>,
) -> Result<(Client, String), FetchError> {
    let first_error = match connect_to(webdriver_url, capabilities.clone()).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok((client, webdriver_url.to_string()));
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = connect_to(url, capabilities.clone()).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok((client, url.to_string()));
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(FetchError::Session {
        endpoint: webdriver_url.to_string(),
        message: first_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_wait_for_dom_ready_only() {
        let session = WebDriverSession {
            webdriver_url: "http://localhost:4444".into(),
            headless: true,
            endpoint: Mutex::new(None),
        };
        let caps = session.capabilities(Duration::from_secs(60));

        assert_eq!(caps["pageLoadStrategy"], "eager");
        assert_eq!(caps["timeouts"]["pageLoad"], 60_000);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_headful_session_has_no_headless_flag() {
        let session = WebDriverSession {
            webdriver_url: "http://localhost:4444".into(),
            headless: false,
            endpoint: Mutex::new(None),
        };
        let caps = session.capabilities(Duration::from_secs(5));
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }

    #[tokio::test]
    async fn test_assets_are_rejected_without_navigation() {
        let browser = WebDriverBrowser::new("http://127.0.0.1:1", true);
        let session = browser.launch().await.unwrap();

        let err = session
            .fetch("https://example.com/brochure.pdf", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotDocument { .. }));
    }

    #[tokio::test]
    async fn test_stalled_session_setup_times_out() {
        // Accepts connections but never answers the new-session request
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let browser = WebDriverBrowser::new(format!("http://{addr}"), true);
        let session = browser.launch().await.unwrap();

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            session.fetch("https://example.com/", Duration::from_millis(200)),
        )
        .await
        .expect("fetch should give up on its own deadline")
        .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }
}

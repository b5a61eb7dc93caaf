pub mod contact;
pub mod html;
pub mod profile;
pub mod team;
pub mod text;

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// What a URL most likely serves, judged from its path alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Renderable HTML page
    Html,
    /// Plain text or data files
    Text,
    /// Images, fonts, archives, PDFs and other assets
    Binary,
}

impl ContentKind {
    /// Determines the content kind based on the URL path
    pub fn from_url(url: &str) -> Self {
        let path = Url::parse(url)
            .map(|u| u.path().to_ascii_lowercase())
            .unwrap_or_else(|_| url.to_ascii_lowercase());

        const TEXT: &[&str] = &[".txt", ".yaml", ".yml", ".json", ".xml", ".csv"];
        const BINARY: &[&str] = &[
            ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico", ".css", ".js",
            ".woff", ".woff2", ".ttf", ".eot", ".zip", ".mp4", ".mp3", ".doc", ".docx",
        ];

        if TEXT.iter().any(|ext| path.ends_with(ext)) {
            ::log::debug!("Classifying as Text: {}", url);
            ContentKind::Text
        } else if BINARY.iter().any(|ext| path.ends_with(ext)) {
            ::log::debug!("Classifying as Binary: {}", url);
            ContentKind::Binary
        } else {
            ContentKind::Html
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, ContentKind::Html)
    }
}

/// A parsed page together with the URL relative links resolve against
pub struct Document {
    html: Html,
    base: Url,
}

impl Document {
    pub fn parse(source: &str, base: Url) -> Self {
        Self {
            html: Html::parse_document(source),
            base,
        }
    }

    /// Whole-document scope for the extractors
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

/// One way of resolving a field from a scope; `None` means "try the next one"
pub type Strategy = fn(ElementRef<'_>) -> Option<String>;

/// Run strategies in priority order, stopping at the first non-empty result
pub fn first_of(scope: ElementRef<'_>, strategies: &[(&str, Strategy)]) -> String {
    for (name, strategy) in strategies {
        if let Some(value) = strategy(scope).filter(|v| !v.is_empty()) {
            ::log::trace!("Strategy {} matched", name);
            return value;
        }
    }
    String::new()
}

/// Compile a selector known at build time
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

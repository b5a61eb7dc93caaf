
use crate::parsers::Document;
use url::Url;

/// Parse a fixture as if it had been served from `base`
pub(crate) fn doc(html: &str, base: &str) -> Document {
    Document::parse(html, Url::parse(base).unwrap())
}

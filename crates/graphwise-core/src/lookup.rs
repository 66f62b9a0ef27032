use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::collaborators::{Document, DocumentExtractor, ResourceResolver};
use crate::error::TurnError;

pub const WIKIPEDIA_BASE: &str = "https://en.wikipedia.org";

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    extract: Option<String>,
}

/// Resolves article URLs through the Wikipedia REST summary endpoint.
///
/// The last path segment of the URL is taken as the page title.
pub struct WikipediaResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl WikipediaResolver {
    pub fn new() -> Self {
        Self::with_base_url(WIKIPEDIA_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_title(locator: &str) -> Option<String> {
        let url = Url::parse(locator.trim()).ok()?;
        url.path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(str::to_string)
    }
}

impl Default for WikipediaResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceResolver for WikipediaResolver {
    fn is_locator(&self, text: &str) -> bool {
        Url::parse(text.trim())
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false)
    }

    async fn resolve(&self, locator: &str) -> Result<String, TurnError> {
        let title = Self::page_title(locator)
            .ok_or_else(|| TurnError::Lookup(format!("no page title in `{}`", locator)))?;

        let response = self
            .http_client
            .get(format!("{}/api/rest_v1/page/summary/{}", self.base_url, title))
            .send()
            .await
            .map_err(|e| TurnError::Lookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TurnError::Lookup(format!(
                "summary for `{}` returned {}",
                title,
                response.status()
            )));
        }

        let summary: PageSummary = response
            .json()
            .await
            .map_err(|e| TurnError::Lookup(e.to_string()))?;

        tracing::debug!(title = %title, "Resolved locator");

        summary
            .description
            .filter(|d| !d.trim().is_empty())
            .or(summary.extract)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| TurnError::Lookup(format!("no description for `{}`", title)))
    }
}

/// Accepts UTF-8 text and markdown documents
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    fn accepts(document: &Document) -> bool {
        let content_type = document.content_type.to_ascii_lowercase();
        let name = document.name.to_ascii_lowercase();
        content_type.starts_with("text/")
            || name.ends_with(".txt")
            || name.ends_with(".md")
            || name.ends_with(".markdown")
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, document: &Document) -> Result<String, TurnError> {
        if !Self::accepts(document) {
            return Err(TurnError::Extraction(format!(
                "unsupported content type `{}` for `{}`",
                document.content_type, document.name
            )));
        }

        let text = std::str::from_utf8(&document.bytes)
            .map_err(|e| TurnError::Extraction(format!("`{}` is not UTF-8: {}", document.name, e)))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_detection() {
        let resolver = WikipediaResolver::new();
        assert!(resolver.is_locator("https://en.wikipedia.org/wiki/Stoicism"));
        assert!(resolver.is_locator("  http://example.com/a  "));
        assert!(!resolver.is_locator("what is stoicism?"));
        assert!(!resolver.is_locator("ftp://example.com/file"));
    }

    #[test]
    fn test_page_title_is_last_segment() {
        assert_eq!(
            WikipediaResolver::page_title("https://en.wikipedia.org/wiki/Urban_planning/"),
            Some("Urban_planning".to_string())
        );
        assert_eq!(WikipediaResolver::page_title("https://en.wikipedia.org/"), None);
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let extractor = PlainTextExtractor;
        let doc = Document::new("notes.md", "application/octet-stream", b"  # Rivers\n".to_vec());
        assert_eq!(extractor.extract(&doc).await.unwrap(), "# Rivers");

        let pdf = Document::new("paper.pdf", "application/pdf", vec![0x25, 0x50]);
        assert!(matches!(
            extractor.extract(&pdf).await,
            Err(TurnError::Extraction(_))
        ));
    }
}

use scraper::Html;
use tracing::{debug, warn};

use crate::fetcher::PageFetcher;

pub mod content;
pub mod headline;

/// What one request needs from a fetched page. The parsed tree itself is
/// dropped as soon as these fields have been read out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePage {
    pub url: String,
    pub headline: String,
    /// `None` when the page could not be fetched.
    pub body: Option<String>,
}

impl ArticlePage {
    pub fn from_html(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);
        Self {
            url: url.to_string(),
            headline: headline::extract_headline(url, Some(&document)),
            body: Some(content::extract_body_text(&document)),
        }
    }

    pub fn unavailable(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headline: headline::extract_headline(url, None),
            body: None,
        }
    }
}

/// Fetch `url` once and extract headline and body text. Never fails: a failed
/// fetch produces a page with a URL-derived headline and no body.
pub async fn scrape_page(fetcher: &dyn PageFetcher, url: &str) -> ArticlePage {
    match fetcher.fetch(url).await {
        Ok(html) => {
            let page = ArticlePage::from_html(url, &html);
            debug!("Extracted headline {:?} from {}", page.headline, url);
            page
        }
        Err(e) => {
            warn!("Error fetching {}: {}, falling back to URL title", url, e);
            ArticlePage::unavailable(url)
        }
    }
}

/// Common utilities for extractors
pub(crate) mod utils {
    use scraper::{Html, Selector};

    /// Trimmed text of the first element matching `selector`, if non-empty.
    pub fn first_text(document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Trimmed value of `attr` on the first element matching `selector`, if non-empty.
    pub fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn extract_texts(document: &Html, selector: &str) -> Vec<String> {
        match Selector::parse(selector) {
            Ok(selector) => document
                .select(&selector)
                .map(|el| el.text().collect::<String>())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchError;
    use async_trait::async_trait;

    struct StaticFetcher(Option<&'static str>);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| FetchError::Timeout(url.to_string()))
        }
    }

    #[test]
    fn test_first_text() {
        let html = r#"
            <div class="title">  Test Title </div>
            <div class="empty">   </div>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(utils::first_text(&document, ".title").as_deref(), Some("Test Title"));
        assert_eq!(utils::first_text(&document, ".empty"), None);
        assert_eq!(utils::first_text(&document, ".invalid"), None);
        assert_eq!(utils::first_text(&document, "[[["), None);
    }

    #[test]
    fn test_extract_texts() {
        let html = r#"
            <div class="item">Item 1</div>
            <div class="item">Item 2</div>
        "#;
        let document = Html::parse_document(html);

        let texts = utils::extract_texts(&document, ".item");
        assert_eq!(texts, vec!["Item 1", "Item 2"]);
    }

    #[tokio::test]
    async fn test_scrape_page_extracts_headline_and_body() {
        let fetcher = StaticFetcher(Some(
            "<html><head><title>Site</title></head><body><h1>Rates fall</h1><p>One.</p><p>Two.</p></body></html>",
        ));
        let page = scrape_page(&fetcher, "https://example.com/rates").await;

        assert_eq!(page.headline, "Rates fall");
        assert_eq!(page.body.as_deref(), Some("One. Two."));
    }

    #[tokio::test]
    async fn test_scrape_page_degrades_on_fetch_failure() {
        let fetcher = StaticFetcher(None);
        let page = scrape_page(&fetcher, "https://example.com/breaking-news-ai-breakthrough").await;

        assert_eq!(page.headline, "Breaking News Ai Breakthrough");
        assert_eq!(page.body, None);
    }
}

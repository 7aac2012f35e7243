pub mod fetcher;
pub mod scrapers;

pub use fetcher::{FetchError, FetcherConfig, HttpFetcher, PageFetcher};
pub use scrapers::{scrape_page, ArticlePage};

pub mod prelude {
    pub use super::fetcher::{FetchError, PageFetcher};
    pub use super::scrapers::{headline::extract_headline, content::extract_body_text, ArticlePage};
}

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use nt_core::{AnalysisResponse, InferenceModel};
use nt_inference::prompt::ChatTemplate;
use nt_inference::sentiment::classify_headline;
use nt_inference::summary::summarize;
use nt_inference::ParseOutcome;
use nt_scrappers::{scrape_page, PageFetcher};
use crate::error::AnalysisError;

/// Summary reported when the article could not be fetched.
pub const SUMMARY_UNAVAILABLE: &str = "Failed to extract and summarize content.";

/// Runs one analysis end to end:
/// fetch, headline, sentiment, summary, response.
///
/// Every step runs in sequence and nothing is retried. A sentiment the
/// parser cannot recover stops the pipeline before the summary is generated.
pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    model: Arc<dyn InferenceModel>,
    template: ChatTemplate,
    max_tokens: usize,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("fetcher", &"<dyn PageFetcher>")
            .field("model", &self.model)
            .field("template", &self.template)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Analyzer {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        model: Arc<dyn InferenceModel>,
        template: ChatTemplate,
        max_tokens: usize,
    ) -> Self {
        Self {
            fetcher,
            model,
            template,
            max_tokens,
        }
    }

    pub async fn analyze(&self, url: &str) -> Result<AnalysisResponse, AnalysisError> {
        let page = scrape_page(self.fetcher.as_ref(), url).await;
        info!("Headline for {}: {}", url, page.headline);

        let outcome = classify_headline(self.model.as_ref(), self.template, &page.headline, self.max_tokens).await?;
        let sentiment = match outcome {
            ParseOutcome::Parsed(result) => result,
            other => return Err(AnalysisError::Sentiment(other)),
        };

        let summary = match page.body.as_deref() {
            Some(body) => summarize(self.model.as_ref(), self.template, body, self.max_tokens).await?,
            None => {
                warn!("No article body for {}, skipping summary", url);
                SUMMARY_UNAVAILABLE.to_string()
            }
        };

        Ok(AnalysisResponse::new(url.to_string(), page.headline, sentiment, summary))
    }
}

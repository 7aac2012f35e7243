use std::sync::Arc;
use nt_core::InferenceModel;
use nt_inference::Config;
use nt_scrappers::PageFetcher;
use crate::analyzer::Analyzer;

pub struct AppState {
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn PageFetcher>, model: Arc<dyn InferenceModel>, config: &Config) -> Self {
        Self {
            analyzer: Analyzer::new(fetcher, model, config.chat_template, config.max_tokens),
        }
    }
}

use nt_core::DEFAULT_MAX_TOKENS;

pub mod models;
pub mod parser;
pub mod prompt;
pub mod sentiment;
pub mod summary;

pub use models::{create_model, ModelKind};
pub use parser::{parse_sentiment, ParseOutcome};
pub use prompt::ChatTemplate;

pub const DEFAULT_MODEL_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL_NAME: &str = "llama3.2:1b";

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelKind,
    pub model_url: String,
    pub model_name: String,
    pub chat_template: ChatTemplate,
    pub max_tokens: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            model_url: DEFAULT_MODEL_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            chat_template: ChatTemplate::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

pub mod prelude {
    pub use super::Config;
    pub use super::models::create_model;
    pub use super::parser::ParseOutcome;
    pub use super::prompt::ChatTemplate;
    pub use nt_core::{InferenceModel, Result, Error};
}

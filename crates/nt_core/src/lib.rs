pub mod models;
pub mod error;
pub mod types;

pub use error::Error;
pub use models::InferenceModel;
pub use types::{AnalysisRequest, AnalysisResponse, Sentiment, SentimentResult};

pub type Result<T> = std::result::Result<T, Error>;

/// Generation budget used for both the sentiment and the summary call.
pub const DEFAULT_MAX_TOKENS: usize = 1024;

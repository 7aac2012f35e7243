use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A text generation backend.
///
/// Implementations receive a fully rendered prompt (chat template already
/// applied) and return the raw generated text. They do not retry and do not
/// enforce a timeout of their own.
#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    /// Human readable backend name, used in logs
    fn name(&self) -> &str;

    /// Generate at most `max_tokens` tokens continuing `prompt`.
    async fn generate(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

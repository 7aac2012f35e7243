use nt_core::{InferenceModel, Result};
use tracing::debug;

use crate::prompt::ChatTemplate;

pub const SUMMARY_INSTRUCTION: &str = "Summarize the following article accurately and concisely. \
Provide only the summary, with no additional commentary or introductory phrases.";

pub fn summary_prompt(template: ChatTemplate, body: &str) -> String {
    template.build_prompt(SUMMARY_INSTRUCTION, body)
}

/// Summarize the full article body. The body is passed as-is, however long.
pub async fn summarize(
    model: &dyn InferenceModel,
    template: ChatTemplate,
    body: &str,
    max_tokens: usize,
) -> Result<String> {
    debug!("Summarizing {} characters with {}", body.len(), model.name());
    let summary = model.generate(&summary_prompt(template, body), max_tokens).await?;
    Ok(summary.trim().to_string())
}

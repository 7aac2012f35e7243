use nt_core::{InferenceModel, Result};
use tracing::{debug, warn};

use crate::parser::{parse_sentiment, ParseOutcome};
use crate::prompt::ChatTemplate;

pub const SENTIMENT_INSTRUCTION: &str = r#"
Analyze the sentiment of the given headline and provide the result in the following JSON format:
{
    "sentiment": "positive" | "negative" | "neutral",
    "confidence": float (0 to 1),
    "explanation": "brief reason for sentiment",
    "entities": ["relevant categories like 'technology', 'politics', 'health', etc."]
}

Example:
{
    "sentiment": "positive",
    "confidence": 0.85,
    "explanation": "Mentions a major technological breakthrough",
    "entities": ["technology", "innovation"]
}

Wrap the JSON object in a ```json fenced code block.
"#;

pub fn sentiment_prompt(template: ChatTemplate, headline: &str) -> String {
    template.build_prompt(SENTIMENT_INSTRUCTION, &format!("Headline: {}", headline))
}

/// Ask the model for the sentiment of `headline`.
///
/// Model failures are errors; output the parser cannot use is reported
/// through the returned [`ParseOutcome`].
pub async fn classify_headline(
    model: &dyn InferenceModel,
    template: ChatTemplate,
    headline: &str,
    max_tokens: usize,
) -> Result<ParseOutcome> {
    let prompt = sentiment_prompt(template, headline);
    let raw = model.generate(&prompt, max_tokens).await?;
    debug!("{} sentiment output: {}", model.name(), raw);

    let outcome = parse_sentiment(&raw);
    match &outcome {
        ParseOutcome::Parsed(result) => debug!("Parsed sentiment {:?}", result),
        ParseOutcome::NoMatch => warn!("Model output contained no fenced json block"),
        ParseOutcome::InvalidJson(e) => warn!("Failed to parse JSON from output: {}", e),
        ParseOutcome::InvalidFields(e) => warn!("Sentiment JSON has invalid fields: {}", e),
    }
    Ok(outcome)
}

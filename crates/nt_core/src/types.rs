use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[serde(alias = "Positive", alias = "POSITIVE")]
    Positive,
    #[serde(alias = "Negative", alias = "NEGATIVE")]
    Negative,
    #[serde(alias = "Neutral", alias = "NEUTRAL")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured sentiment of a headline as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub explanation: String,
    pub entities: Vec<String>,
}

impl SentimentResult {
    /// Confidence must be a probability.
    pub fn is_valid(&self) -> bool {
        self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

/// The only externally visible artifact of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub url: String,
    pub headline: String,
    pub sentiment: Sentiment,
    pub explanation: String,
    pub score: f64,
    pub entities: Vec<String>,
    pub summary: String,
}

impl AnalysisResponse {
    pub fn new(url: String, headline: String, result: SentimentResult, summary: String) -> Self {
        Self {
            url,
            headline,
            sentiment: result.sentiment,
            explanation: result.explanation,
            score: result.confidence,
            entities: result.entities,
            summary,
        }
    }
}

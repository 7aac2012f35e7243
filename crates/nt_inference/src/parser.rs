//! Best-effort recovery of a [`SentimentResult`] from free-form model output.
//!
//! The model is asked to wrap its answer in a fenced `json` block; the first
//! such block holding a `{...}` object is extracted and deserialized.

use lazy_static::lazy_static;
use nt_core::SentimentResult;
use regex::Regex;

lazy_static! {
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(SentimentResult),
    /// The output has no fenced `json` block.
    NoMatch,
    /// A block was found but is not valid JSON.
    InvalidJson(String),
    /// Valid JSON, but a key is missing or a value is out of range.
    InvalidFields(String),
}

impl ParseOutcome {
    pub fn into_result(self) -> Option<SentimentResult> {
        match self {
            ParseOutcome::Parsed(result) => Some(result),
            _ => None,
        }
    }
}

pub fn parse_sentiment(raw: &str) -> ParseOutcome {
    let block = match FENCED_JSON.captures(raw).and_then(|c| c.get(1)) {
        Some(block) => block.as_str(),
        None => return ParseOutcome::NoMatch,
    };

    let value: serde_json::Value = match serde_json::from_str(block) {
        Ok(value) => value,
        Err(e) => return ParseOutcome::InvalidJson(e.to_string()),
    };

    match serde_json::from_value::<SentimentResult>(value) {
        Ok(result) if result.is_valid() => ParseOutcome::Parsed(result),
        Ok(result) => ParseOutcome::InvalidFields(format!(
            "confidence {} is outside [0, 1]",
            result.confidence
        )),
        Err(e) => ParseOutcome::InvalidFields(e.to_string()),
    }
}

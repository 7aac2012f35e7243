use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use nt_core::Result;
use super::InferenceModel;
use crate::prompt::ChatTemplate;
use crate::sentiment::SENTIMENT_INSTRUCTION;

const NEUTRAL_SENTIMENT: &str = "```json\n{\"sentiment\": \"neutral\", \"confidence\": 0.5, \"explanation\": \"No model is loaded\", \"entities\": []}\n```";

/// Offline stand-in for a real model.
///
/// Scripted responses are returned in order. Once the script runs out it
/// answers sentiment prompts with a neutral result and anything else with the
/// first 20 words of the user turn.
pub struct DummyModel {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("calls", &self.calls())
            .finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_scripted(&self) -> Option<String> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front())
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str, _max_tokens: usize) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = self.next_scripted() {
            return Ok(response);
        }

        // build_prompt trims the instruction into the system turn
        if prompt.contains(SENTIMENT_INSTRUCTION.trim()) {
            return Ok(NEUTRAL_SENTIMENT.to_string());
        }

        let content = [ChatTemplate::Llama3, ChatTemplate::ChatMl]
            .iter()
            .find_map(|template| template.user_content(prompt))
            .unwrap_or(prompt);
        let words: Vec<&str> = content.split_whitespace().take(20).collect();
        Ok(words.join(" "))
    }
}

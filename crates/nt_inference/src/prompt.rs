//! Chat-style prompt rendering.
//!
//! Every prompt is a system turn, a user turn and the generation-prompt
//! marker that opens the assistant turn, rendered in the special-token
//! layout of the model family being served.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatTemplate {
    /// Llama 3.x instruct models
    #[default]
    Llama3,
    /// `<|im_start|>` style models (Qwen, many fine-tunes)
    ChatMl,
}

impl ChatTemplate {
    fn user_header(&self) -> &'static str {
        match self {
            ChatTemplate::Llama3 => "<|start_header_id|>user<|end_header_id|>\n\n",
            ChatTemplate::ChatMl => "<|im_start|>user\n",
        }
    }

    fn end_of_turn(&self) -> &'static str {
        match self {
            ChatTemplate::Llama3 => "<|eot_id|>",
            ChatTemplate::ChatMl => "<|im_end|>\n",
        }
    }

    /// Marker after which the model is expected to write the assistant turn.
    pub fn generation_marker(&self) -> &'static str {
        match self {
            ChatTemplate::Llama3 => "<|start_header_id|>assistant<|end_header_id|>\n\n",
            ChatTemplate::ChatMl => "<|im_start|>assistant\n",
        }
    }

    pub fn build_prompt(&self, system_instruction: &str, user_content: &str) -> String {
        let system_header = match self {
            ChatTemplate::Llama3 => "<|start_header_id|>system<|end_header_id|>\n\n",
            ChatTemplate::ChatMl => "<|im_start|>system\n",
        };
        let mut prompt = String::with_capacity(
            system_instruction.len() + user_content.len() + 128,
        );
        prompt.push_str(system_header);
        prompt.push_str(system_instruction.trim());
        prompt.push_str(self.end_of_turn());
        prompt.push_str(self.user_header());
        prompt.push_str(user_content);
        prompt.push_str(self.end_of_turn());
        prompt.push_str(self.generation_marker());
        prompt
    }

    /// Content of the last user turn of a prompt rendered by [`Self::build_prompt`].
    pub fn user_content<'a>(&self, prompt: &'a str) -> Option<&'a str> {
        let start = prompt.rfind(self.user_header())? + self.user_header().len();
        let rest = &prompt[start..];
        let end = rest.find(self.end_of_turn())?;
        Some(&rest[..end])
    }
}

impl fmt::Display for ChatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTemplate::Llama3 => f.write_str("llama3"),
            ChatTemplate::ChatMl => f.write_str("chatml"),
        }
    }
}

impl FromStr for ChatTemplate {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "llama3" | "llama" => Ok(ChatTemplate::Llama3),
            "chatml" => Ok(ChatTemplate::ChatMl),
            other => Err(format!("Unknown chat template: {}. Available templates: llama3, chatml", other)),
        }
    }
}

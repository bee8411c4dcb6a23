//! Pure translation between the OpenAI request shape and the upstream
//! conversation protocol. No I/O here; everything is unit-testable.

use phf::phf_map;
use rand::RngExt;

use crate::constants::DEFAULT_CONVERSATION_TITLE;
use crate::proxy::types::openai::{ChatMessage, ContentPart, MessageContent};
use crate::proxy::types::upstream::{ChatPayload, PayloadMetadata, PromptObject, CHAT_WITH_AI};

/// Requested-name to upstream-name aliases. Anything not listed passes
/// through unchanged, so callers can also name upstream models directly.
static MODEL_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "gpt-4" => "gpt-5",
    "gpt-4o" => "gpt-5",
    "gpt-4-turbo" => "gpt-5.1",
    "gpt-3.5-turbo" => "gpt-5-mini",
    "claude-3-opus" => "claude-opus-4-1-20250805",
    "claude-3-sonnet" => "claude-sonnet-4-20250514",
    "claude-3-haiku" => "claude-3-haiku-20240307",
};

pub fn map_model(requested: &str) -> &str {
    MODEL_ALIASES.get(requested).copied().unwrap_or(requested)
}

/// Flattens the message list into the upstream's single prompt string.
/// Each message renders as `role:\ntext`; messages join with a blank line.
pub fn render_prompt(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| format!("{}:\n{}", message.role, content_text(&message.content)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn content_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Conversation title: the prompt's head, cut at a character boundary.
pub fn conversation_title(prompt: &str) -> String {
    let title: String = prompt.chars().take(50).collect();
    if title.is_empty() {
        DEFAULT_CONVERSATION_TITLE.to_string()
    } else {
        title
    }
}

/// Fresh correlation tag for one upstream chat call.
pub fn new_message_group(now_ms: i64) -> String {
    format!("{}_{}", now_ms, rand::rng().random_range(0..100))
}

/// Assembles the upstream chat body around a rendered prompt. The model
/// here is the mapped name, never the caller's alias.
pub fn build_chat_payload(
    conversation_id: &str,
    model: &str,
    prompt: &str,
    message_group: String,
) -> ChatPayload {
    ChatPayload {
        kind: CHAT_WITH_AI.to_string(),
        conversation_id: conversation_id.to_string(),
        model: model.to_string(),
        prompt_object: PromptObject {
            prompt: prompt.to_string(),
            image_list: Vec::new(),
            is_mixed: false,
            web_search: false,
            youtube_url: String::new(),
            num_of_site: 2,
            max_word: 1000,
            memory: false,
            history_message_limit: 8,
        },
        metadata: PayloadMetadata { message_group },
    }
}

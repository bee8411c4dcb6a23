//! Request bodies for the upstream conversation API.

use serde::Serialize;

/// Feature type tag carried by every conversation-API request.
pub const CHAT_WITH_AI: &str = "CHAT_WITH_AI";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub file_list: Vec<String>,
    pub youtube_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub conversation_id: String,
    pub model: String,
    pub prompt_object: PromptObject,
    pub metadata: PayloadMetadata,
}

/// The prompt plus the knobs the upstream expects alongside it. This proxy
/// keeps the aggregator features (web search, mixed media, youtube) off.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptObject {
    pub prompt: String,
    pub image_list: Vec<String>,
    pub is_mixed: bool,
    pub web_search: bool,
    pub youtube_url: String,
    pub num_of_site: u32,
    pub max_word: u32,
    pub memory: bool,
    pub history_message_limit: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub message_group: String,
}

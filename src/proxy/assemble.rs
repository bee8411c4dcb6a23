//! Non-streaming reply assembly.

use serde_json::Value;

use crate::proxy::types::openai::{AssistantMessage, ChatChoice, ChatCompletion, Usage};

/// Shapes one upstream JSON document into an OpenAI chat completion.
///
/// The upstream schema is treated as unreliable: absent or misshapen fields
/// read as empty content and zero usage rather than failing the request.
/// `model` echoes the caller's requested name, not the mapped one.
pub fn assemble(model: &str, reply: &Value, now_ms: i64) -> ChatCompletion {
    let content = reply
        .pointer("/aiRecordDetail/resultObject/0")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let prompt_tokens = token_count(reply, "/aiRecord/metadata/inputToken");
    let completion_tokens = token_count(reply, "/aiRecord/metadata/outputToken");

    ChatCompletion {
        id: format!("chatcmpl-{}", now_ms),
        object: "chat.completion".to_string(),
        created: now_ms / 1000,
        model: model.to_string(),
        choices: vec![ChatChoice {
            index: 0,
            message: AssistantMessage {
                role: "assistant".to_string(),
                content,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        },
    }
}

fn token_count(reply: &Value, path: &str) -> i64 {
    reply.pointer(path).and_then(Value::as_i64).unwrap_or(0)
}

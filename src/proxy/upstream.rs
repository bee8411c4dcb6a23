//! Typed client for the upstream conversation API.

use std::time::Duration;

use reqwest::header;
use serde_json::Value;

use crate::constants::CONNECT_TIMEOUT_SECS;
use crate::proxy::errors::{ProxyError, ProxyResult};
use crate::proxy::types::upstream::{ChatPayload, ConversationRequest, CHAT_WITH_AI};

/// Cheap to clone; holds only the pooled HTTP client and the base URL.
///
/// Only connection setup is bounded. Requests themselves carry no timeout,
/// so a hung upstream call hangs that one request.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /users`: the account document identity fields are read from.
    pub async fn fetch_identity(&self, secret: &str) -> ProxyResult<Value> {
        let response = self
            .http
            .get(format!("{}/users", self.base_url))
            .header("x-auth-token", format!("Bearer {}", secret))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProxyError::SessionResolution(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProxyError::SessionResolution(format!(
                "upstream replied {}",
                response.status()
            )));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::SessionResolution(e.to_string()))
    }

    /// Opens a fresh conversation and returns its uuid. Conversations are
    /// never reused; the upstream owns their lifecycle.
    pub async fn create_conversation(
        &self,
        secret: &str,
        team_id: &str,
        title: &str,
    ) -> ProxyResult<String> {
        let body = ConversationRequest {
            kind: CHAT_WITH_AI.to_string(),
            title: title.to_string(),
            file_list: Vec::new(),
            youtube_url: String::new(),
        };
        let response = self
            .http
            .post(format!(
                "{}/teams/{}/features/conversations",
                self.base_url, team_id
            ))
            .header("x-auth-token", format!("Bearer {}", secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::ConversationCreation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProxyError::ConversationCreation(format!(
                "upstream replied {}",
                response.status()
            )));
        }
        let reply = response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::ConversationCreation(e.to_string()))?;

        reply
            .pointer("/conversation/uuid")
            .and_then(Value::as_str)
            .filter(|uuid| !uuid.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProxyError::ConversationCreation("reply carries no conversation uuid".to_string())
            })
    }

    /// Sends the chat payload. A non-success status becomes an `Upstream`
    /// error carrying the reply body, and its status passes through to the
    /// caller.
    pub async fn send_chat(
        &self,
        secret: &str,
        team_id: &str,
        payload: &ChatPayload,
        streaming: bool,
    ) -> ProxyResult<reqwest::Response> {
        let mut request = self
            .http
            .post(format!(
                "{}/teams/{}/features/sse?isStreaming={}",
                self.base_url, team_id, streaming
            ))
            .header("x-auth-token", format!("Bearer {}", secret))
            .json(payload);
        if streaming {
            request = request.header(header::ACCEPT, "text/event-stream");
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::Internal(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream { status, message });
        }
        Ok(response)
    }
}

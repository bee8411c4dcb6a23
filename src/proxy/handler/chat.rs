//! The chat completion handler: the one route that exercises the whole
//! pipeline, from credential selection to the streamed reply.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::proxy::errors::{ProxyError, ProxyResult};
use crate::proxy::router::SharedState;
use crate::proxy::stream::StreamTransducer;
use crate::proxy::types::openai::ChatCompletionRequest;
use crate::proxy::{assemble, pool, session, stream, translate};

/// `POST /v1/chat/completions`.
pub async fn chat_completions(
    State(state): State<Arc<SharedState>>,
    body: Bytes,
) -> ProxyResult<Response> {
    let request: ChatCompletionRequest =
        serde_json::from_slice(&body).map_err(|e| ProxyError::InvalidPayload(e.to_string()))?;
    if request.messages.is_empty() {
        return Err(ProxyError::InvalidPayload(
            "messages must not be empty".to_string(),
        ));
    }

    let now = Utc::now().timestamp_millis();
    let credential = pool::pick(&state.store, now)?;
    log::info!(
        "chat completion: model={} stream={} credential='{}'",
        request.model,
        request.stream,
        credential.note
    );

    let context = session::resolve(
        &state.store,
        &state.upstream,
        &credential,
        now,
        state.config.session_ttl_ms,
    )
    .await?;
    log::debug!(
        "resolved team {} for credential '{}'",
        context.team_id,
        credential.note
    );

    let prompt = translate::render_prompt(&request.messages);
    let model = translate::map_model(&request.model);
    let title = translate::conversation_title(&prompt);
    let conversation_id = state
        .upstream
        .create_conversation(&credential.secret, &context.team_id, &title)
        .await?;
    log::debug!("opened conversation {}", conversation_id);

    let payload = translate::build_chat_payload(
        &conversation_id,
        model,
        &prompt,
        translate::new_message_group(now),
    );
    let response = state
        .upstream
        .send_chat(&credential.secret, &context.team_id, &payload, request.stream)
        .await?;

    if request.stream {
        let transducer = StreamTransducer::new(&request.model, Utc::now().timestamp_millis());
        Ok(sse_response(stream::forward(response, transducer)))
    } else {
        // An unreadable body assembles the same as an empty reply.
        let reply = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or_default();
        let completion = assemble::assemble(&request.model, &reply, Utc::now().timestamp_millis());
        Ok(Json(completion).into_response())
    }
}

fn sse_response(frames: mpsc::Receiver<Result<Bytes, String>>) -> Response {
    let body =
        Body::from_stream(ReceiverStream::new(frames).map(|frame| frame.map_err(std::io::Error::other)));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(body)
        .unwrap_or_else(|e| {
            log::error!("failed to build stream response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}

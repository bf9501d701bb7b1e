//! Chat relay API endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::{stream, StreamExt};

use crate::errors::AppError;
use crate::models::{ChatFallback, ChatRequest};
use crate::relay::{self, RelayError, FALLBACK_REPLY};
use crate::AppState;

/// POST /api/ai-chatbot - Stream a reply from the completion API as plain text.
pub async fn ai_chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        return AppError::Validation("Message is required".to_string()).into_response();
    }

    let mut tokens = match state
        .relay
        .stream_reply(&request.message, &request.chat_history)
        .await
    {
        Ok(tokens) => tokens,
        Err(e) => return fallback_response(e),
    };

    // The status is only committed once the first item is known.
    let first = match tokens.next().await {
        Some(Err(e)) => return fallback_response(e),
        first => first,
    };

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(relay::with_fallback(stream::iter(first).chain(tokens))),
    )
        .into_response()
}

fn fallback_response(e: RelayError) -> Response {
    tracing::error!("Chat relay failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatFallback {
            response: FALLBACK_REPLY.to_string(),
        }),
    )
        .into_response()
}

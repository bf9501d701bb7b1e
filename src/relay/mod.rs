//! Chat relay to an OpenAI-compatible completion API.
//!
//! The message and prior turns are forwarded with `stream: true`; the upstream
//! answers with server-sent events whose `choices[0].delta.content` fields are
//! relayed to the caller in receipt order. Nothing is retried.

mod sse;

pub use sse::SseDecoder;

use std::collections::VecDeque;
use std::convert::Infallible;
use std::pin::Pin;

use futures_util::{future, stream, Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;

use crate::config::LlmConfig;
use crate::models::ChatTurn;

/// The single user-facing message for any relay failure.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

const MAX_ERROR_BODY: usize = 512;

/// Content deltas of one streamed reply.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, RelayError>> + Send>>;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upstream reported an error: {0}")]
    Upstream(String),
    #[error("malformed stream event: {0}")]
    Decode(String),
    #[error("no API key configured for the completion provider")]
    NotConfigured,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn>,
    temperature: f32,
    max_completion_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// Client for the upstream completion endpoint.
#[derive(Clone, Debug)]
pub struct ChatRelay {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ChatRelay {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Start a streamed completion for `message` following `history`.
    ///
    /// Errors before the first byte arrives are returned directly; later ones
    /// surface as the stream's final item.
    pub async fn stream_reply(
        &self,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<TokenStream, RelayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(RelayError::NotConfigured)?;

        let mut messages = history.to_vec();
        messages.push(ChatTurn::user(message));

        let body = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: 1.0,
            max_completion_tokens: 1024,
            top_p: 1.0,
            stream: true,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        tracing::debug!(
            "Relaying chat message with {} prior turns to {}",
            history.len(),
            url
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let mut text = resp.text().await.unwrap_or_default();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(RelayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(Box::pin(token_stream(
            resp.bytes_stream().map(|chunk| chunk.map_err(RelayError::from)),
        )))
    }
}

struct TokenState<S> {
    upstream: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, RelayError>>,
    finished: bool,
}

/// Turn raw upstream bytes into content deltas.
///
/// The stream ends after `[DONE]`, after the upstream closes, or after the
/// first error, which is yielded as the last item.
pub fn token_stream<S, B>(upstream: S) -> impl Stream<Item = Result<String, RelayError>> + Send + 'static
where
    S: Stream<Item = Result<B, RelayError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = TokenState {
        upstream: Box::pin(upstream),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                if item.is_err() {
                    st.pending.clear();
                    st.finished = true;
                }
                return Some((item, st));
            }
            if st.finished {
                return None;
            }

            match st.upstream.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.decoder.push(chunk.as_ref())),
                Some(Err(e)) => st.pending.push_back(Err(e)),
                None => {
                    st.pending.extend(st.decoder.finish());
                    st.finished = true;
                }
            }
            if st.decoder.is_done() {
                st.finished = true;
            }
        }
    })
}

/// Relay tokens to a client body, replacing the first error with [`FALLBACK_REPLY`].
pub fn with_fallback<S>(tokens: S) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<String, RelayError>> + Send + 'static,
{
    tokens.scan(false, |failed, item| {
        let out = if *failed {
            None
        } else {
            match item {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::error!("Chat relay stream failed: {}", e);
                    *failed = true;
                    Some(FALLBACK_REPLY.to_string())
                }
            }
        };
        future::ready(out.map(Ok))
    })
}

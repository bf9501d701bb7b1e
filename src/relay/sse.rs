//! Incremental decoder for the completion API's server-sent events.

use serde::Deserialize;

use super::RelayError;

#[derive(Debug, Default, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Splits a byte stream into `data:` lines and extracts content deltas.
///
/// Bytes are buffered until a full line is available, so events and UTF-8
/// sequences may be split across network chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// Whether the `[DONE]` sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a chunk, returning the deltas of every line it completes.
    ///
    /// Decoding stops at the first error, which is the last returned item.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String, RelayError>> {
        if self.done {
            return Vec::new();
        }
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if !self.decode_line(&line[..pos], &mut out) {
                break;
            }
        }
        out
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<Result<String, RelayError>> {
        let mut out = Vec::new();
        if !self.done && !self.buf.is_empty() {
            let line = std::mem::take(&mut self.buf);
            self.decode_line(&line, &mut out);
        }
        out
    }

    /// Decode one line into `out`. Returns false once decoding must stop.
    fn decode_line(&mut self, raw: &[u8], out: &mut Vec<Result<String, RelayError>>) -> bool {
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line.trim_end_matches('\r'),
            Err(e) => {
                self.done = true;
                out.push(Err(RelayError::Decode(e.to_string())));
                return false;
            }
        };

        let Some(data) = line.strip_prefix("data:") else {
            // blank separators, comments, and event/id fields
            return true;
        };
        let data = data.trim();
        if data == "[DONE]" {
            self.done = true;
            return false;
        }

        match serde_json::from_str::<CompletionChunk>(data) {
            Ok(chunk) => {
                if let Some(error) = chunk.error {
                    self.done = true;
                    out.push(Err(RelayError::Upstream(error_message(&error))));
                    return false;
                }
                if let Some(content) = chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.delta.content)
                    .filter(|c| !c.is_empty())
                {
                    out.push(Ok(content));
                }
                true
            }
            Err(e) => {
                self.done = true;
                out.push(Err(RelayError::Decode(e.to_string())));
                false
            }
        }
    }
}

fn error_message(error: &serde_json::Value) -> String {
    error
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

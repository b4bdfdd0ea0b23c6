//! Anthropic Messages API client with streamed output.
//!
//! Sends `{model, max_tokens, system, messages:[user], stream:true}` to `/v1/messages` and
//! decodes the SSE response into text fragments. Only `text_delta` content is surfaced;
//! `message_stop` ends the stream and an `error` event ends it with a failure.
//!
//! API key: `ANTHROPIC_API_KEY` via [`Settings`]. The key is never logged.

use crate::config::{Settings, DEFAULT_BASE_URL};
use crate::error::GenerationError;
use crate::generator::{FragmentStream, GenerationRequest, TextGenerator};
use async_stream::try_stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

/// One `data:` payload of the Messages stream.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: ApiErrorBody },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Default)]
struct ApiErrorBody {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

/// What a single SSE line means for the caller.
#[derive(Debug)]
enum Decoded {
    Text(String),
    Stop,
    Failed(GenerationError),
    Skip,
}

/// Splits a byte stream into lines. Bytes are held until a `\n` arrives, so lines and
/// multi-byte characters split across network chunks come out whole.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        lines
    }

    /// Trailing bytes after the last newline, if any.
    fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&raw).trim_end_matches('\r').to_string())
    }
}

fn decode_line(line: &str) -> Decoded {
    let Some(data) = line.strip_prefix("data:") else {
        // `event:` names are repeated inside the JSON `type`; blank lines and comments carry nothing.
        return Decoded::Skip;
    };
    let data = data.strip_prefix(' ').unwrap_or(data);
    match serde_json::from_str::<StreamEvent>(data) {
        Ok(StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        }) if !text.is_empty() => Decoded::Text(text),
        Ok(StreamEvent::MessageStop) => Decoded::Stop,
        Ok(StreamEvent::Error { error }) => Decoded::Failed(GenerationError::Provider {
            kind: error.kind,
            message: error.message,
        }),
        Ok(_) => Decoded::Skip,
        Err(e) => {
            tracing::warn!(
                target: "docsmith::anthropic",
                error = %e,
                len = data.len(),
                "Unparseable stream event"
            );
            Decoded::Failed(GenerationError::Decode(e.to_string()))
        }
    }
}

fn api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    GenerationError::Api { status, message }
}

/// Streaming client for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicService {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicService {
    /// Client for the public API endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key: api_key.into().trim().to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Client using the credential and base URL from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.anthropic_api_key.as_str()).with_base_url(&settings.anthropic_base_url)
    }

    /// Override the base URL (proxy, regional endpoint, local stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

impl TextGenerator for AnthropicService {
    fn stream_text(&self, request: GenerationRequest) -> FragmentStream {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let url = self.messages_url();
        let model = request.model.clone();
        let body = MessagesRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            system: request.system,
            messages: vec![Message {
                role: "user",
                content: request.user,
            }],
            stream: true,
        };

        Box::pin(try_stream! {
            tracing::info!(
                target: "docsmith::anthropic",
                model = %model,
                system_len = body.system.len(),
                "Opening streamed generation"
            );

            let response = client
                .post(&url)
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_API_VERSION)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(GenerationError::from)?;

            let status = response.status();
            let mut fragments = 0usize;
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                tracing::error!(
                    target: "docsmith::anthropic",
                    status = %status,
                    "Provider rejected generation request"
                );
                Err::<(), GenerationError>(api_error(status.as_u16(), &text))?;
            } else {
                let mut bytes = response.bytes_stream();
                let mut lines = LineBuffer::default();
                let mut stopped = false;

                'read: while let Some(chunk) = bytes.next().await {
                    let chunk = chunk.map_err(GenerationError::from)?;
                    for line in lines.push(&chunk) {
                        match decode_line(&line) {
                            Decoded::Text(text) => {
                                fragments += 1;
                                yield text;
                            }
                            Decoded::Stop => {
                                stopped = true;
                                break 'read;
                            }
                            Decoded::Failed(err) => {
                                Err::<(), GenerationError>(err)?;
                            }
                            Decoded::Skip => {}
                        }
                    }
                }

                // A connection cut mid-event leaves a partial line behind.
                if !stopped {
                    if let Some(line) = lines.finish() {
                        match decode_line(&line) {
                            Decoded::Text(text) => {
                                fragments += 1;
                                yield text;
                            }
                            Decoded::Failed(err) => {
                                Err::<(), GenerationError>(err)?;
                            }
                            Decoded::Stop | Decoded::Skip => {}
                        }
                    }
                }
            }

            tracing::info!(
                target: "docsmith::anthropic",
                model = %model,
                fragments,
                "Generation stream finished"
            );
        })
    }
}

//! Generation relay: re-frames upstream text fragments as SSE `data:` frames.
//!
//! Wire contract, one frame per event and nothing else:
//! - fragment → `data: <raw text>\n\n` (text is not escaped; a fragment containing a blank
//!   line will split the SSE event on the client)
//! - completion → `data: [DONE]\n\n`
//! - upstream failure → `data: [ERROR] <message>\n\n`, which replaces `[DONE]`
//!
//! The body is polled straight from the upstream stream, so each frame is written as soon
//! as its fragment arrives and a client disconnect drops the upstream connection.

use async_stream::stream;
use axum::{
    body::Body,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use docsmith_core::FragmentStream;
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;

pub const SSE_CONTENT_TYPE: &str = "text/event-stream; charset=utf-8";

/// One frame of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Fragment(String),
    Done,
    Failed(String),
}

impl RelayEvent {
    /// Wire form of this event.
    pub fn into_frame(self) -> String {
        match self {
            RelayEvent::Fragment(text) => format!("data: {}\n\n", text),
            RelayEvent::Done => "data: [DONE]\n\n".to_string(),
            RelayEvent::Failed(message) => format!("data: [ERROR] {}\n\n", message),
        }
    }
}

/// Map upstream fragments to relay events: every `Ok` becomes a `Fragment`, the first
/// `Err` becomes the terminal `Failed`, and a clean end becomes `Done`.
pub fn relay_events(fragments: FragmentStream) -> impl Stream<Item = RelayEvent> + Send + 'static {
    stream! {
        let mut fragments = fragments;
        let mut relayed = 0usize;
        let mut failure: Option<String> = None;

        while let Some(item) = fragments.next().await {
            match item {
                Ok(text) => {
                    if text.contains("\n\n") {
                        tracing::debug!(
                            target: "docsmith::relay",
                            index = relayed,
                            "Fragment contains a blank line; client will see a split event"
                        );
                    }
                    relayed += 1;
                    yield RelayEvent::Fragment(text);
                }
                Err(err) => {
                    failure = Some(err.to_string());
                    break;
                }
            }
        }
        // Release the upstream connection before the terminal frame.
        drop(fragments);

        match failure {
            Some(message) => {
                tracing::error!(
                    target: "docsmith::relay",
                    relayed,
                    error = %message,
                    "Upstream generation failed mid-stream"
                );
                yield RelayEvent::Failed(message);
            }
            None => {
                tracing::info!(target: "docsmith::relay", relayed, "Relay completed");
                yield RelayEvent::Done;
            }
        }
    }
}

/// 200 response whose body is the framed relay of `fragments`.
pub fn sse_response(fragments: FragmentStream) -> Response {
    let frames = relay_events(fragments).map(|event| Ok::<_, Infallible>(event.into_frame()));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, SSE_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(frames),
    )
        .into_response()
}

//! Streaming text generation seam.
//!
//! The gateway only sees [`TextGenerator`]: production wires in [`crate::AnthropicService`],
//! tests wire in `testing::ScriptedGenerator`.

use crate::error::GenerationError;
use futures_util::stream::BoxStream;

/// Output token budget for every generation.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Lazy, single-pass sequence of text fragments in arrival order.
///
/// Ends after the provider signals completion or after the first `Err`.
pub type FragmentStream = BoxStream<'static, Result<String, GenerationError>>;

/// One streamed generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Request with the default token budget.
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

/// Opens a streamed generation. Nothing is sent until the returned stream is first polled;
/// dropping the stream abandons the upstream call.
pub trait TextGenerator: Send + Sync {
    fn stream_text(&self, request: GenerationRequest) -> FragmentStream;
}

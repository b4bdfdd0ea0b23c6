//! docsmith-core: request models, prompt templates, settings, and the streaming LLM client.
//!
//! The gateway depends on this crate only through the re-exports below, so a new document
//! type means a new model + prompt module here and a route in the gateway.

mod anthropic_service;
mod config;
mod error;
mod generator;
pub mod models;
pub mod prompts;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Settings (loaded once at startup, then shared read-only)
pub use config::Settings;

// Errors: pre-stream validation and in-stream generation failures
pub use error::{FieldError, GenerationError, ValidationErrors};

// Streaming client seam + implementations
pub use anthropic_service::{AnthropicService, ANTHROPIC_API_VERSION};
pub use generator::{FragmentStream, GenerationRequest, TextGenerator, MAX_OUTPUT_TOKENS};
#[cfg(any(test, feature = "testing"))]
pub use testing::ScriptedGenerator;

// Request models and prompt rendering
pub use models::{MeetingNotesRequest, Tone};
pub use prompts::{build_meeting_notes_prompt, DocumentPrompt, PromptPair, MEETING_NOTES_SYSTEM};

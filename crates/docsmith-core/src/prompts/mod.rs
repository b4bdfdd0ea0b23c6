//! Prompt templates: every document type renders a validated request into a system
//! instruction and a user instruction.

pub mod meeting_notes;

pub use meeting_notes::{build_meeting_notes_prompt, meeting_notes_user_prompt, MEETING_NOTES_SYSTEM};

/// System + user instruction pair for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// A request model that knows how to render itself into a prompt.
///
/// Rendering is pure: no I/O, no randomness, and it must not fail for a value that
/// already passed validation.
pub trait DocumentPrompt {
    /// Short machine name for logs (e.g. `meeting_notes`).
    const DOCUMENT_TYPE: &'static str;

    /// Fixed system instruction for this document type.
    fn system_prompt(&self) -> &'static str;

    /// User instruction embedding the request fields.
    fn user_prompt(&self) -> String;

    fn prompt_pair(&self) -> PromptPair {
        PromptPair {
            system: self.system_prompt().to_string(),
            user: self.user_prompt(),
        }
    }
}

//! Meeting notes prompt: turn the submitted form into Markdown meeting notes.

use super::{DocumentPrompt, PromptPair};
use crate::models::{MeetingNotesRequest, Tone};

/// System instruction for meeting notes generation.
pub const MEETING_NOTES_SYSTEM: &str = "You are a professional business document writer. \
Generate well-structured, polished meeting notes based on the provided details. \
Use clear headings, bullet points, and professional language. \
Output in Markdown format.";

const AGENDA_FALLBACK: &str = "Not provided";
const ACTION_ITEMS_FALLBACK: &str = "None specified";

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "Use a formal, professional tone.",
        Tone::Casual => "Use a friendly, conversational tone while remaining professional.",
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Build the user instruction for the given request.
pub fn meeting_notes_user_prompt(request: &MeetingNotesRequest) -> String {
    format!(
        "Create meeting notes with the following details:

**Meeting Title:** {title}
**Date:** {date}
**Attendees:** {attendees}

**Agenda:**
{agenda}

**Key Discussion Points:**
{discussion_points}

**Action Items:**
{action_items}

{tone}

Structure the output with these sections:
1. Meeting header (title, date, attendees)
2. Agenda
3. Discussion Summary
4. Action Items (with owners if mentioned)
5. Next Steps
",
        title = request.title(),
        date = request.date(),
        attendees = request.attendees(),
        agenda = or_fallback(request.agenda(), AGENDA_FALLBACK),
        discussion_points = request.discussion_points(),
        action_items = or_fallback(request.action_items(), ACTION_ITEMS_FALLBACK),
        tone = tone_instruction(request.tone()),
    )
}

/// System + user pair for meeting notes.
pub fn build_meeting_notes_prompt(request: &MeetingNotesRequest) -> PromptPair {
    request.prompt_pair()
}

impl DocumentPrompt for MeetingNotesRequest {
    const DOCUMENT_TYPE: &'static str = "meeting_notes";

    fn system_prompt(&self) -> &'static str {
        MEETING_NOTES_SYSTEM
    }

    fn user_prompt(&self) -> String {
        meeting_notes_user_prompt(self)
    }
}

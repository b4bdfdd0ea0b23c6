//! Meeting notes request: the form a user fills in before notes are generated.

use super::{FieldReader, StrBounds};
use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TITLE: StrBounds = StrBounds::new(Some(1), Some(200));
const DATE: StrBounds = StrBounds::new(Some(1), None);
const ATTENDEES: StrBounds = StrBounds::new(Some(1), None);
const AGENDA: StrBounds = StrBounds::new(None, Some(2000));
const DISCUSSION_POINTS: StrBounds = StrBounds::new(Some(1), Some(5000));
const ACTION_ITEMS: StrBounds = StrBounds::new(None, Some(2000));

const TONE_PATTERN: &str = "^(formal|casual)$";

/// Writing register requested for the generated notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
}

impl Tone {
    pub const ALL: [Tone; 2] = [Tone::Formal, Tone::Casual];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Tone::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// A validated meeting notes request. Only constructible through [`MeetingNotesRequest::from_json`],
/// so every instance satisfies the field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingNotesRequest {
    title: String,
    date: String,
    attendees: String,
    agenda: String,
    discussion_points: String,
    action_items: String,
    tone: Tone,
}

impl MeetingNotesRequest {
    /// Validate an untyped JSON payload.
    ///
    /// Collects every violation (missing fields, non-string values, length bounds, unknown
    /// tone) before failing. Unknown keys are ignored. Absent optional fields take their
    /// defaults: empty agenda, empty action items, formal tone.
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(payload)?;

        let title = reader.required_str("title", TITLE);
        let date = reader.required_str("date", DATE);
        let attendees = reader.required_str("attendees", ATTENDEES);
        let agenda = reader.optional_str("agenda", AGENDA, "");
        let discussion_points = reader.required_str("discussion_points", DISCUSSION_POINTS);
        let action_items = reader.optional_str("action_items", ACTION_ITEMS, "");
        let tone = reader.optional_choice(
            "tone",
            &[Tone::Formal.as_str(), Tone::Casual.as_str()],
            TONE_PATTERN,
            Tone::default().as_str(),
        );

        reader.finish()?;

        Ok(Self {
            title,
            date,
            attendees,
            agenda,
            discussion_points,
            action_items,
            tone: Tone::parse(&tone).unwrap_or_default(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn attendees(&self) -> &str {
        &self.attendees
    }

    pub fn agenda(&self) -> &str {
        &self.agenda
    }

    pub fn discussion_points(&self) -> &str {
        &self.discussion_points
    }

    pub fn action_items(&self) -> &str {
        &self.action_items
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }
}

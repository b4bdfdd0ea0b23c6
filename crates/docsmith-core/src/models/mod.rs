//! Inbound request models. Each model validates an untyped JSON payload in one pass and
//! reports every violated constraint.

mod meeting_notes;

pub use meeting_notes::{MeetingNotesRequest, Tone};

use crate::error::{FieldError, ValidationErrors};
use serde_json::{Map, Value};

/// Length bounds for a string field, counted in Unicode scalar values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StrBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl StrBounds {
    pub const fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

/// Field-by-field reader over a JSON object that accumulates errors instead of stopping
/// at the first one.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    /// Fails with a single body-level error when `payload` is not an object.
    pub fn new(payload: &'a Value) -> Result<Self, ValidationErrors> {
        match payload.as_object() {
            Some(object) => Ok(Self {
                object,
                errors: ValidationErrors::new(),
            }),
            None => Err(ValidationErrors::single(FieldError::body(
                "model_attributes_type",
                "Input should be a valid dictionary or object to extract fields from",
            ))),
        }
    }

    /// Required string. Returns an empty string (and records an error) on violation so
    /// the caller can keep reading the remaining fields.
    pub fn required_str(&mut self, name: &str, bounds: StrBounds) -> String {
        match self.object.get(name) {
            None => {
                self.errors
                    .push(FieldError::field(name, "missing", "Field required"));
                String::new()
            }
            Some(value) => self.checked_str(name, value, bounds),
        }
    }

    /// Optional string; `default` applies only when the key is absent.
    pub fn optional_str(&mut self, name: &str, bounds: StrBounds, default: &str) -> String {
        match self.object.get(name) {
            None => default.to_string(),
            Some(value) => self.checked_str(name, value, bounds),
        }
    }

    /// Optional string restricted to `allowed`; `pattern` is the human-readable rule.
    pub fn optional_choice(
        &mut self,
        name: &str,
        allowed: &[&str],
        pattern: &str,
        default: &str,
    ) -> String {
        let Some(value) = self.object.get(name) else {
            return default.to_string();
        };
        let Some(s) = value.as_str() else {
            self.errors.push(FieldError::field(
                name,
                "string_type",
                "Input should be a valid string",
            ));
            return default.to_string();
        };
        if allowed.contains(&s) {
            s.to_string()
        } else {
            self.errors.push(FieldError::field(
                name,
                "string_pattern_mismatch",
                format!("String should match pattern '{}'", pattern),
            ));
            default.to_string()
        }
    }

    fn checked_str(&mut self, name: &str, value: &Value, bounds: StrBounds) -> String {
        let Some(s) = value.as_str() else {
            self.errors.push(FieldError::field(
                name,
                "string_type",
                "Input should be a valid string",
            ));
            return String::new();
        };
        let len = s.chars().count();
        if let Some(min) = bounds.min {
            if len < min {
                let unit = if min == 1 { "character" } else { "characters" };
                self.errors.push(FieldError::field(
                    name,
                    "string_too_short",
                    format!("String should have at least {} {}", min, unit),
                ));
            }
        }
        if let Some(max) = bounds.max {
            if len > max {
                self.errors.push(FieldError::field(
                    name,
                    "string_too_long",
                    format!("String should have at most {} characters", max),
                ));
            }
        }
        s.to_string()
    }

    /// Consume the reader: `Ok(())` when every field passed.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

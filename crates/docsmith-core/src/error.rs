//! Error types shared by the core and the gateway.
//!
//! `ValidationErrors` is raised before any upstream work starts and is rendered by the
//! gateway as a 422 body. `GenerationError` is raised while consuming the model stream and
//! only ever reaches the caller as an in-band `[ERROR]` frame.

use serde::Serialize;
use std::fmt;

/// One violated field constraint.
///
/// Serializes as `{"type": ..., "loc": [...], "msg": ...}` so clients built against the
/// usual `detail` list layout can read it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    /// Error located at `body.<field>`.
    pub fn field(field: &str, kind: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
        }
    }

    /// Error located at the body itself (e.g. the payload is not an object).
    pub fn body(kind: &str, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            loc: vec!["body".to_string()],
            msg: msg.into(),
        }
    }

    /// Field name when the error is located on a field.
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

/// Every constraint a payload violated, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// True when some error is located on `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field_name() == Some(field))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "; {}: {}", e.loc.join("."), e.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure while opening or consuming the upstream generation stream.
///
/// The `Display` text is what the caller sees after `[ERROR] `.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Connection, TLS, or body read failure.
    #[error("Connection error: {0}")]
    Transport(String),

    /// Non-success HTTP status from the provider.
    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider sent an `error` event inside an otherwise healthy stream.
    #[error("{kind}: {message}")]
    Provider { kind: String, message: String },

    /// Stream payload could not be understood.
    #[error("Malformed stream event: {0}")]
    Decode(String),

    /// Canned failure from a scripted generator.
    #[error("{0}")]
    Scripted(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

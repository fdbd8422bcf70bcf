//! Error types for each step boundary of the Lambda.

use thiserror::Error;

/// Failure inside the generation step. Never escapes `generate_blog`; it is
/// logged and turned into empty text.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("failed to encode inference request")]
    Encode(#[source] serde_json::Error),

    #[error("model invocation failed for {model_id}: {message}")]
    Invoke { model_id: String, message: String },

    #[error("failed to decode inference response")]
    Decode(#[source] serde_json::Error),
}

/// Failure of the inbound event itself. Mapped to a 500 response.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("event has no `body` field")]
    MissingBody,

    #[error("event body must be a JSON string or object, got {0}")]
    UnsupportedBody(&'static str),

    #[error("event body is not valid JSON")]
    MalformedBody(#[source] serde_json::Error),

    #[error("event body is not a blog generation request")]
    InvalidRequest(#[source] serde_json::Error),
}

/// Invalid environment configuration, reported at cold start.
#[derive(Error, Debug, PartialEq)]
#[error("{name} has invalid value {value:?}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new(name: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

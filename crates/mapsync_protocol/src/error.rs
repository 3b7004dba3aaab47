//! Error types for protocol decoding and formatting.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while decoding payloads or formatting submissions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The pull payload was not valid JSON or did not have the expected shape.
    #[error("payload decode error: {0}")]
    PayloadDecode(String),

    /// The incident has no associated category, which submission requires.
    #[error("incident has no category to submit")]
    MissingCategory,

    /// The incident has no timestamp, which submission requires.
    #[error("incident has no timestamp to submit")]
    MissingTimestamp,

    /// The submission template does not have the expected placeholder count.
    #[error("submit template expects {expected} placeholders, found {found}")]
    TemplateMismatch {
        /// Number of placeholders the substitution provides.
        expected: usize,
        /// Number of placeholders present in the template.
        found: usize,
    },
}

impl ProtocolError {
    /// Creates a payload decode error.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::PayloadDecode(message.into())
    }
}

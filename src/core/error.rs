//! Skill error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial taxonomy covering parse, validation, lookup, and store errors

use thiserror::Error;

/// Errors a capability can surface to the orchestrator.
///
/// Every variant is recoverable: the orchestrator speaks the message and the
/// main loop continues. The distinction matters for callers that need to tell
/// "the thing you asked for does not exist" apart from "I could not save the
/// change you just made".
#[derive(Debug, Error)]
pub enum SkillError {
    /// Unrecognized date/time or other user-supplied format.
    #[error("{0}")]
    Parse(String),

    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// No matching reminder, event, or application.
    #[error("{0}")]
    NotFound(String),

    /// The backing store could not be written. In-memory state has already
    /// been applied when this is returned.
    #[error("failed to save changes: {0}")]
    Persistence(String),

    /// A remote lookup (weather, news, knowledge, computation) failed.
    #[error("{0}")]
    Upstream(String),

    /// The operation is not available on this platform.
    #[error("{0}")]
    Unsupported(String),
}

impl From<std::io::Error> for SkillError {
    fn from(e: std::io::Error) -> Self {
        SkillError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for SkillError {
    fn from(e: serde_json::Error) -> Self {
        SkillError::Persistence(e.to_string())
    }
}

/// Shorthand used by every skill and port.
pub type SkillResult<T> = Result<T, SkillError>;

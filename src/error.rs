// Error types for the setlist agent
//
// Every failure is scoped to a single turn: the caller gets the error,
// keeps its previous conversation state, and may simply try again.

use thiserror::Error;

/// Result type alias using `AgentError`
pub type Result<T> = std::result::Result<T, AgentError>;

/// Failures a single agent turn can surface
#[derive(Error, Debug)]
pub enum AgentError {
    /// Model text could not be parsed as JSON, even after the brace-slice fallback
    #[error("Model did not return valid JSON.")]
    MalformedModelOutput,

    /// Parsed model output violates the setlist contract
    #[error("Invalid setlist: {0}")]
    Validation(String),

    /// The library endpoint answered with a non-2xx status
    #[error("Failed to fetch library tracks ({status}). {body}")]
    LibraryFetch { status: u16, body: String },

    /// The model API answered with an error or an unusable response
    #[error("Model API error: {0}")]
    Model(String),

    /// YouTube lookup failure (tolerated per track during enrichment)
    #[error("YouTube lookup failed: {0}")]
    VideoLookup(String),

    /// Outbound HTTP transport errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AgentError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a model API error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }
}

use thiserror::Error;
use wairewolves_core::agent::AgentError;

/// Errors raised by the LLM backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Missing or unreadable credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP request did not complete
    #[error("OpenAI API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status
    #[error("OpenAI API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Failed to parse OpenAI response: {0}")]
    Parse(String),

    #[error("OpenAI API returned no content in the response")]
    EmptyResponse,
}

impl InteractionError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { is_retryable, .. } => *is_retryable,
            Self::Request(_) => true,
            _ => false,
        }
    }
}

impl From<InteractionError> for AgentError {
    fn from(err: InteractionError) -> Self {
        AgentError::request(err.to_string())
    }
}

//! The LLM capability consumed by agent seats.

use thiserror::Error;

/// Errors raised while an agent seat talks to its model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The model call failed; the worker keeps running
    #[error("LLM request failed: {0}")]
    Request(String),

    /// The capability was lost inside a failed blocking call
    #[error("LLM capability is no longer available")]
    CapabilityLost,

    /// The blocking task could not be joined
    #[error("Blocking LLM task failed: {0}")]
    Join(String),
}

impl AgentError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    /// Whether the worker can go on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

/// A conversational model keeping a running transcript.
///
/// Calls are synchronous; `ask` may block for a long time and is always run
/// on the blocking pool by the worker.
pub trait ChatCapability: Send + 'static {
    /// Resets the transcript to a single system context.
    fn system(&mut self, context: &str);

    /// Injects a synthetic exchange into the transcript.
    fn advice(&mut self, question: &str, answer: Option<&str>);

    /// Appends `prompt`, returns the model's reply and records it.
    fn ask(&mut self, prompt: &str) -> Result<String, AgentError>;
}

/// Creates one capability per agent seat.
pub trait ChatFactory: Send + Sync {
    fn create(&self, seat: &str) -> Box<dyn ChatCapability>;
}

impl<F> ChatFactory for F
where
    F: Fn(&str) -> Box<dyn ChatCapability> + Send + Sync,
{
    fn create(&self, seat: &str) -> Box<dyn ChatCapability> {
        self(seat)
    }
}

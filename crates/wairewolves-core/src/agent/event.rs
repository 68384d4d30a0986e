use crate::transport::ChannelId;

/// One item of an agent seat's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A chat line from another participant.
    Chat {
        channel: ChannelId,
        author: String,
        text: String,
    },
    /// A prompt from the moderator, answered directly into `channel`.
    Moderator { channel: ChannelId, prompt: String },
    /// A private message (role reveal, seer answer, rejection).
    Private { text: String },
    /// The session entered a phase in which this seat may have to act.
    DecisionRequested,
    /// Periodic timer.
    Tick,
    /// Sentinel; the worker exits when it reaches it.
    Stop,
}

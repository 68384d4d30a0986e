//! Error types for the game core.

use thiserror::Error;

/// Errors produced while handling a game command.
///
/// Most variants are user errors: their `Display` text is exactly the reply
/// the moderator sends back, and the session recovers from them locally
/// without mutating any state. Only [`GameError::Transport`] and
/// [`GameError::Internal`] are returned to the caller of
/// [`GameSession::handle`](crate::GameSession::handle).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A player with this name is already seated
    #[error("{name} already joined the game.")]
    NameTaken { name: String },

    /// The named player is not part of the session
    #[error("{name} is not a player of this game.")]
    UnknownPlayer { name: String },

    /// Start was requested with too few seats
    #[error(
        "Cannot start game. At least {min} players must join the game via !join command \
         ({joined} joined so far)."
    )]
    NotEnoughPlayers { min: usize, joined: usize },

    /// The voter is dead
    #[error("Only alive players are allowed to vote!")]
    VoterNotAlive { voter: String },

    /// The vote target does not exist or is dead
    #[error("{target} was not found in the list of alive players!")]
    TargetNotAlive { target: String },

    /// A living non-werewolf, non-seer tried to vote at night
    #[error("Only alive Werewolves are allowed to vote a victim!")]
    NotAWerewolf { voter: String },

    /// The seer already asked tonight
    #[error("You are not allowed to ask twice within one night!")]
    SeerAlreadyAsked { seer: String },

    /// An agent seat was requested but the session has no LLM backend
    #[error("AI-agents cannot join this game, no agent backend is configured.")]
    AgentsUnavailable,

    /// The active phase does not handle this command
    #[error("Command not supported here!")]
    NotSupported {
        command: &'static str,
        phase: &'static str,
    },

    /// The chat transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is answered with a reply instead of being propagated
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Internal(_))
    }

    /// Check if this is a command the active phase does not implement
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    /// The seat that should receive the reply privately, if any.
    ///
    /// Seer questions are answered by direct message, so a rejected second
    /// question goes the same way instead of leaking the seer's identity to
    /// the game channel.
    pub fn private_recipient(&self) -> Option<&str> {
        match self {
            Self::SeerAlreadyAsked { seer } => Some(seer),
            _ => None,
        }
    }
}

/// A type alias for `Result<T, GameError>`.
pub type Result<T> = std::result::Result<T, GameError>;

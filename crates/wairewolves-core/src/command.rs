//! Commands consumed by the active phase of a session.
//!
//! The transport maps platform invocations (`!join`, `!vote Bob`, ...) to
//! these values; agent seats synthesize `Vote` commands themselves.

use crate::transport::ChannelId;

/// Who occupies a seat that is joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Agent,
}

/// A single request to the session, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the state of the game, as seen from `channel`.
    Status { channel: ChannelId },
    /// Seat a new player.
    Join { name: String, seat: SeatKind },
    /// Leave the game; during play this is a suicide exit.
    Quit { name: String },
    /// Deal roles and begin the first night.
    Start,
    /// Vote for a victim (werewolves, day) or ask about a player (seer).
    Vote { voter: String, target: String },
}

impl Command {
    pub fn status(channel: impl Into<ChannelId>) -> Self {
        Self::Status {
            channel: channel.into(),
        }
    }

    pub fn join(name: impl Into<String>) -> Self {
        Self::Join {
            name: name.into(),
            seat: SeatKind::Human,
        }
    }

    pub fn invite_agent(name: impl Into<String>) -> Self {
        Self::Join {
            name: name.into(),
            seat: SeatKind::Agent,
        }
    }

    pub fn quit(name: impl Into<String>) -> Self {
        Self::Quit { name: name.into() }
    }

    pub fn vote(voter: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Vote {
            voter: voter.into(),
            target: target.into(),
        }
    }

    /// Short name used in logs and in "not supported" replies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Join { .. } => "join",
            Self::Quit { .. } => "quit",
            Self::Start => "start",
            Self::Vote { .. } => "vote",
        }
    }
}

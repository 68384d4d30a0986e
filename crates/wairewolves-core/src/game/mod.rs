//! The game session state machine.
//!
//! A [`GameSession`] is one game bound to one channel. It is always in exactly
//! one [`Phase`]; every incoming [`Command`](crate::Command) is handled by the
//! active phase, and phase handlers move the session on through
//! [`GameSession::change_state`].
//!
//! ```text
//! Ready --start--> Night --unanimous werewolves--> Day --majority--> Night ...
//!   ^                 |                              |
//!   +---- game over --+------------------------------+
//! ```
//!
//! # Module Structure
//!
//! - `session`: the session, its shared helpers and the dispatcher
//! - `ready`: join-to-play phase
//! - `night`: werewolf vote and seer question
//! - `day`: public majority vote
//! - `tally`: pure vote counting

mod day;
mod night;
mod ready;
mod session;
mod tally;

pub use session::{GameSession, SharedSession, WeakSession};
pub use tally::VoteTally;

use crate::agent::ChatFactory;
use crate::config::GameConfig;
use crate::role::{self, Shuffle};
use crate::transport::Transport;
use std::fmt;
use std::sync::Arc;

/// Phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Join-to-play; also the phase after a game has ended.
    #[default]
    Ready,
    Night,
    Day,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Night => "night",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collaborators shared by every session of a host.
#[derive(Clone)]
pub struct SessionServices {
    pub transport: Arc<dyn Transport>,
    /// Creates the LLM capability of agent seats; `None` disables invites.
    pub chat_factory: Option<Arc<dyn ChatFactory>>,
    pub config: GameConfig,
    /// Permutes the dealt roles. Tests plug in a deterministic one.
    pub shuffle: Shuffle,
}

impl SessionServices {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            chat_factory: None,
            config: GameConfig::default(),
            shuffle: role::shuffle,
        }
    }

    pub fn with_chat_factory(mut self, factory: Arc<dyn ChatFactory>) -> Self {
        self.chat_factory = Some(factory);
        self
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }
}

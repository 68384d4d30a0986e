use super::prompt;
use crate::command::Command;
use crate::error::Result;
use crate::game::WeakSession;
use async_trait::async_trait;

/// A decision an agent seat currently owes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Alive werewolf at night without a vote yet.
    WerewolfVote,
    /// Alive player during the day without a vote yet.
    VillagerVote,
    /// Alive seer at night who has not asked yet.
    SeerAsk,
}

impl Decision {
    /// The prompt asking the model for exactly one player name.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::WerewolfVote => prompt::WEREWOLF_VOTE,
            Self::VillagerVote => prompt::VILLAGER_VOTE,
            Self::SeerAsk => prompt::SEER_ASK,
        }
    }
}

/// The agent worker's view of its session.
///
/// Every call is short; implementations must not keep the session locked
/// between calls.
#[async_trait]
pub trait SeatHost: Send + Sync {
    /// Decisions owed by `seat`. `None` once the session is gone.
    async fn pending_decisions(&self, seat: &str) -> Option<Vec<Decision>>;

    /// Whether `name` is a seat of the session.
    async fn has_seat(&self, name: &str) -> bool;

    /// Casts `seat`'s vote for `target` as the answer to `decision`.
    ///
    /// Returns `false` without touching the session when `decision` is no
    /// longer owed, e.g. because the phase moved on while the model thought.
    async fn submit_vote(&self, seat: &str, decision: Decision, target: &str) -> Result<bool>;
}

/// [`SeatHost`] backed by a weak reference to a live session.
#[derive(Debug, Clone)]
pub struct SessionLink {
    session: WeakSession,
}

impl SessionLink {
    pub fn new(session: WeakSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SeatHost for SessionLink {
    async fn pending_decisions(&self, seat: &str) -> Option<Vec<Decision>> {
        let session = self.session.upgrade()?;
        let session = session.lock().await;
        session.find_player_by_name(seat)?;
        Some(session.pending_decisions(seat))
    }

    async fn has_seat(&self, name: &str) -> bool {
        match self.session.upgrade() {
            Some(session) => session.lock().await.find_player_by_name(name).is_some(),
            None => false,
        }
    }

    async fn submit_vote(&self, seat: &str, decision: Decision, target: &str) -> Result<bool> {
        let Some(session) = self.session.upgrade() else {
            return Ok(false);
        };
        let mut session = session.lock().await;
        if !session.pending_decisions(seat).contains(&decision) {
            return Ok(false);
        }
        session.handle(Command::vote(seat, target)).await?;
        Ok(true)
    }
}

//! Players of a session and the seats they occupy.

use crate::agent::{AgentEvent, AgentHandle};
use crate::role::Role;
use crate::transport::Transport;

/// Who is sitting in a seat.
#[derive(Debug)]
pub enum Seat {
    /// A human member of the chat platform.
    Human,
    /// An LLM-backed agent; the handle only enqueues into its worker.
    Agent(AgentHandle),
}

/// One player of a session.
///
/// Votes are stored as player names and resolved through the session's
/// player list, so players never reference each other directly.
#[derive(Debug)]
pub struct Player {
    name: String,
    role: Option<Role>,
    alive: bool,
    night_vote: Option<String>,
    day_vote: Option<String>,
    seer_asked_tonight: bool,
    seat: Seat,
}

impl Player {
    pub fn new(name: impl Into<String>, seat: Seat) -> Self {
        Self {
            name: name.into(),
            role: None,
            alive: true,
            night_vote: None,
            day_vote: None,
            seer_asked_tonight: false,
            seat,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dealt role; `None` until the game starts.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_werewolf(&self) -> bool {
        self.role.is_some_and(|role| role.is_werewolf())
    }

    pub fn night_vote(&self) -> Option<&str> {
        self.night_vote.as_deref()
    }

    pub fn day_vote(&self) -> Option<&str> {
        self.day_vote.as_deref()
    }

    pub fn seer_has_asked_tonight(&self) -> bool {
        self.seer_asked_tonight
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    pub fn agent(&self) -> Option<&AgentHandle> {
        match &self.seat {
            Seat::Agent(handle) => Some(handle),
            Seat::Human => None,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.agent().is_some()
    }

    pub(crate) fn assign_role(&mut self, role: Role) {
        debug_assert!(self.role.is_none(), "role of {} dealt twice", self.name);
        self.role = Some(role);
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn cast_night_vote(&mut self, target: &str) {
        self.night_vote = Some(target.to_string());
    }

    pub(crate) fn cast_day_vote(&mut self, target: &str) {
        self.day_vote = Some(target.to_string());
    }

    /// Drops any ballot naming `target`. Returns whether one was dropped.
    pub(crate) fn withdraw_votes_for(&mut self, target: &str) -> bool {
        let mut withdrawn = false;
        for vote in [&mut self.night_vote, &mut self.day_vote] {
            if vote.as_deref() == Some(target) {
                *vote = None;
                withdrawn = true;
            }
        }
        withdrawn
    }

    pub(crate) fn mark_seer_asked(&mut self) {
        self.seer_asked_tonight = true;
    }

    /// Resets the per-night state.
    pub(crate) fn clear_night(&mut self) {
        self.night_vote = None;
        self.seer_asked_tonight = false;
    }

    pub(crate) fn clear_day(&mut self) {
        self.day_vote = None;
    }

    /// Delivers a private message.
    ///
    /// Humans get a direct message through the transport; agent seats get the
    /// text queued for their worker, which feeds it to the model as context.
    pub async fn send_dm(&self, transport: &dyn Transport, text: &str) {
        match &self.seat {
            Seat::Human => transport.send_direct_message(&self.name, text).await,
            Seat::Agent(handle) => {
                handle.notify(AgentEvent::Private {
                    text: text.to_string(),
                });
            }
        }
    }

    /// Stops the agent worker, if any. The worker exits at its next turn.
    pub fn release(&self) {
        if let Some(handle) = self.agent() {
            handle.stop();
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_alive_without_role() {
        let player = Player::new("Alice", Seat::Human);
        assert_eq!(player.name(), "Alice");
        assert!(player.is_alive());
        assert_eq!(player.role(), None);
        assert!(!player.is_werewolf());
        assert!(!player.is_agent());
    }

    #[test]
    fn test_night_reset_clears_vote_and_seer_flag() {
        let mut player = Player::new("Cassandra", Seat::Human);
        player.assign_role(Role::Seer);
        player.cast_night_vote("Bob");
        player.mark_seer_asked();
        player.cast_day_vote("Bob");

        player.clear_night();

        assert_eq!(player.night_vote(), None);
        assert!(!player.seer_has_asked_tonight());
        assert_eq!(player.day_vote(), Some("Bob"), "day vote survives the night reset");

        player.clear_day();
        assert_eq!(player.day_vote(), None);
    }

    #[test]
    fn test_withdraw_drops_only_ballots_for_the_target() {
        let mut player = Player::new("Wolf", Seat::Human);
        player.cast_night_vote("Bob");
        player.cast_day_vote("Alice");

        assert!(player.withdraw_votes_for("Bob"));
        assert_eq!(player.night_vote(), None);
        assert_eq!(player.day_vote(), Some("Alice"));
        assert!(!player.withdraw_votes_for("Carol"));
    }

    #[test]
    fn test_kill_is_one_way() {
        let mut player = Player::new("Bob", Seat::Human);
        player.kill();
        player.clear_night();
        player.clear_day();
        assert!(!player.is_alive());
    }
}

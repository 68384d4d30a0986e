use super::{Phase, SessionServices, day, night, ready};
use crate::agent::{AgentEvent, AgentHandle, AgentWorker, Decision, SessionLink};
use crate::command::Command;
use crate::error::{GameError, Result};
use crate::player::Player;
use crate::role::Role;
use crate::transport::ChannelId;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// A session shared between the host and its agent seats.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Non-owning reference held by agent seats.
pub type WeakSession = Weak<Mutex<GameSession>>;

/// One game bound to one chat channel.
///
/// All mutation goes through [`GameSession::handle`], which requires the
/// session lock; commands are therefore processed one at a time.
pub struct GameSession {
    pub(super) name: String,
    pub(super) channel: ChannelId,
    pub(super) players: Vec<Player>,
    pub(super) phase: Phase,
    pub(super) secret_channel: Option<ChannelId>,
    pub(super) services: SessionServices,
    this: WeakSession,
}

impl GameSession {
    /// Creates a session in the Ready phase.
    pub fn shared(
        name: impl Into<String>,
        channel: ChannelId,
        services: SessionServices,
    ) -> SharedSession {
        let name = name.into();
        tracing::info!(session = %name, channel = %channel, "Game session created");
        Arc::new_cyclic(|this| {
            Mutex::new(Self {
                name,
                channel,
                players: Vec::new(),
                phase: Phase::Ready,
                secret_channel: None,
                services,
                this: this.clone(),
            })
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &ChannelId {
        &self.channel
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn secret_channel(&self) -> Option<&ChannelId> {
        self.secret_channel.as_ref()
    }

    pub fn is_secret_channel(&self, channel: &ChannelId) -> bool {
        self.secret_channel.as_ref() == Some(channel)
    }

    /// Handles one command in the active phase.
    ///
    /// Rejected commands are answered with the error text (privately when the
    /// error names a recipient) and count as handled. Only transport and
    /// internal failures are returned.
    pub async fn handle(&mut self, command: Command) -> Result<()> {
        let kind = command.kind();
        tracing::debug!(session = %self.name, phase = %self.phase, command = kind, "Handling command");

        let outcome = match self.phase {
            Phase::Ready => ready::handle(self, command).await,
            Phase::Night => night::handle(self, command).await,
            Phase::Day => day::handle(self, command).await,
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_user_facing() => {
                tracing::debug!(session = %self.name, command = kind, "Command rejected: {}", err);
                let reply = err.to_string();
                match err.private_recipient() {
                    Some(seat) => self.send_dm(seat, &reply).await,
                    None => self.send_to_session_channel(&reply).await,
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(session = %self.name, command = kind, "Command failed: {}", err);
                Err(err)
            }
        }
    }

    /// Leaves the current phase and enters `next`.
    pub(crate) async fn change_state(&mut self, next: Phase) {
        let previous = self.phase;
        match previous {
            // Phases reset their own state on entry; nothing is torn down on exit.
            Phase::Ready | Phase::Night | Phase::Day => {}
        }
        self.phase = next;
        tracing::info!(session = %self.name, from = %previous, to = %next, "Phase changed");
        match next {
            Phase::Ready => ready::on_enter(self, previous).await,
            Phase::Night => night::on_enter(self).await,
            Phase::Day => day::on_enter(self).await,
        }
    }

    /// Ends the game if one faction has no living members left.
    ///
    /// Returns `true` when the game ended; the session is back in Ready then.
    pub(crate) async fn evaluate_game_over(&mut self) -> bool {
        let (werewolves, others) = self.count_alive_by_faction();
        let verdict = if werewolves == 0 {
            "GAME OVER - the villagers won!"
        } else if others == 0 {
            "GAME OVER - the werewolves won!"
        } else {
            return false;
        };
        tracing::info!(session = %self.name, werewolves, others, "{}", verdict);
        self.send_to_session_channel(verdict).await;
        self.change_state(Phase::Ready).await;
        true
    }

    pub fn find_player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name() == name)
    }

    pub(crate) fn find_player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.name() == name)
    }

    pub fn count_alive(&self) -> usize {
        self.players.iter().filter(|player| player.is_alive()).count()
    }

    /// `(werewolves, everyone else)` among the living.
    pub fn count_alive_by_faction(&self) -> (usize, usize) {
        self.players
            .iter()
            .filter(|player| player.is_alive())
            .fold((0, 0), |(werewolves, others), player| {
                if player.is_werewolf() {
                    (werewolves + 1, others)
                } else {
                    (werewolves, others + 1)
                }
            })
    }

    /// Bullet list of the living players.
    pub fn alive_players_summary(&self) -> String {
        let mut text = String::from("Currently the following players are still alive:\n");
        for player in self.players.iter().filter(|player| player.is_alive()) {
            text.push_str(&format!("- **{}**\n", player.name()));
        }
        text
    }

    pub async fn send_to_session_channel(&self, text: &str) {
        self.services
            .transport
            .send_to_channel(&self.channel, text)
            .await;
    }

    pub async fn send_to_secret_channel(&self, text: &str) {
        match &self.secret_channel {
            Some(channel) => self.services.transport.send_to_channel(channel, text).await,
            None => {
                tracing::error!(session = %self.name, "No secret channel to post to");
            }
        }
    }

    /// Sends a private message to a seat of this session.
    pub async fn send_dm(&self, seat: &str, text: &str) {
        match self.find_player_by_name(seat) {
            Some(player) => player.send_dm(self.services.transport.as_ref(), text).await,
            None => tracing::warn!(session = %self.name, seat, "Private message to unknown seat"),
        }
    }

    /// Checks a vote and returns the voter's role.
    pub(crate) fn validate_vote(&self, voter: &str, target: &str) -> Result<Role> {
        let player = self
            .find_player_by_name(voter)
            .ok_or_else(|| GameError::UnknownPlayer {
                name: voter.to_string(),
            })?;
        if !player.is_alive() {
            return Err(GameError::VoterNotAlive {
                voter: voter.to_string(),
            });
        }
        if !self.find_player_by_name(target).is_some_and(Player::is_alive) {
            return Err(GameError::TargetNotAlive {
                target: target.to_string(),
            });
        }
        player
            .role()
            .ok_or_else(|| GameError::internal(format!("{voter} votes without a role")))
    }

    pub(crate) fn not_supported(&self, command: &'static str) -> GameError {
        GameError::NotSupported {
            command,
            phase: self.phase.name(),
        }
    }

    /// Kills `victim` and reveals their role to the session channel.
    pub(crate) async fn eliminate(&mut self, victim: &str, killers: &str) -> Result<()> {
        let player = self
            .find_player_mut(victim)
            .ok_or_else(|| GameError::internal(format!("Victim {victim} is not seated")))?;
        if !player.is_alive() {
            return Err(GameError::internal(format!("Victim {victim} is already dead")));
        }
        player.kill();
        let role = player.role().map_or("player", |role| role.name());
        tracing::info!(session = %self.name, victim, role, killers, "Player eliminated");
        self.send_to_session_channel(&format!(
            "{victim} is killed by the {killers}!\n{victim} was a {role}."
        ))
        .await;
        Ok(())
    }

    /// Quitting while the game runs: the player dies and their role is shown.
    pub(crate) async fn suicide(&mut self, name: &str) -> Result<()> {
        let player = self
            .find_player_mut(name)
            .ok_or_else(|| GameError::UnknownPlayer {
                name: name.to_string(),
            })?;
        if !player.is_alive() {
            tracing::debug!(name, "Dead player quit, nothing to do");
            return Ok(());
        }
        player.kill();
        player.release();
        let role = player.role().map_or("player", |role| role.name());
        tracing::info!(session = %self.name, name, role, "Player quit through suicide");
        self.send_to_session_channel(&format!(
            "{name} quits the game through suicide.\n{name} was a {role}."
        ))
        .await;

        if self.evaluate_game_over().await {
            return Ok(());
        }
        // Ballots for the dead are void; their voters have to choose again.
        let mut withdrawn = false;
        for player in self.players.iter_mut().filter(|player| player.is_alive()) {
            withdrawn |= player.withdraw_votes_for(name);
        }
        if withdrawn {
            self.notify_agents();
        }
        // One voter fewer may complete the running vote.
        match self.phase {
            Phase::Night => night::resolve(self, false).await,
            Phase::Day => day::resolve(self, false).await,
            Phase::Ready => Ok(()),
        }
    }

    pub fn is_werewolf_vote_needed(&self, seat: &str) -> bool {
        self.phase == Phase::Night
            && self.find_player_by_name(seat).is_some_and(|player| {
                player.is_alive() && player.is_werewolf() && player.night_vote().is_none()
            })
    }

    pub fn is_villager_vote_needed(&self, seat: &str) -> bool {
        self.phase == Phase::Day
            && self
                .find_player_by_name(seat)
                .is_some_and(|player| player.is_alive() && player.day_vote().is_none())
    }

    pub fn is_seer_vote_needed(&self, seat: &str) -> bool {
        self.phase == Phase::Night
            && self.find_player_by_name(seat).is_some_and(|player| {
                player.is_alive()
                    && player.role() == Some(Role::Seer)
                    && !player.seer_has_asked_tonight()
            })
    }

    /// Decisions `seat` still owes in the current phase.
    pub fn pending_decisions(&self, seat: &str) -> Vec<Decision> {
        let mut decisions = Vec::new();
        if self.is_werewolf_vote_needed(seat) {
            decisions.push(Decision::WerewolfVote);
        }
        if self.is_villager_vote_needed(seat) {
            decisions.push(Decision::VillagerVote);
        }
        if self.is_seer_vote_needed(seat) {
            decisions.push(Decision::SeerAsk);
        }
        decisions
    }

    /// Wakes every living agent seat so it checks for pending decisions.
    pub(crate) fn notify_agents(&self) {
        for agent in self
            .players
            .iter()
            .filter(|player| player.is_alive())
            .filter_map(Player::agent)
        {
            agent.notify(AgentEvent::DecisionRequested);
        }
    }

    /// Forwards a chat line to the agent seats allowed to read it.
    ///
    /// Lines from the secret channel only reach werewolf agents; an agent
    /// never receives its own lines.
    pub fn relay_chat(&self, channel: &ChannelId, author: &str, text: &str) {
        let secret = self.is_secret_channel(channel);
        for player in &self.players {
            let Some(agent) = player.agent() else {
                continue;
            };
            if player.name() == author || (secret && !player.is_werewolf()) {
                continue;
            }
            agent.notify(AgentEvent::Chat {
                channel: channel.clone(),
                author: author.to_string(),
                text: text.to_string(),
            });
        }
    }

    /// Starts the worker for a new agent seat.
    pub(crate) fn launch_agent(&self, seat: &str) -> Result<AgentHandle> {
        let factory = self
            .services
            .chat_factory
            .as_ref()
            .ok_or(GameError::AgentsUnavailable)?;
        let host = Arc::new(SessionLink::new(self.this.clone()));
        Ok(AgentWorker::spawn(
            seat,
            factory.create(seat),
            host,
            self.services.transport.clone(),
            &self.services.config,
        ))
    }

    /// Removes every player, stopping agent seats.
    pub(crate) fn release_players(&mut self) {
        for player in self.players.drain(..) {
            player.release();
        }
    }

    /// Disposes of the session: stops agents and deletes the secret channel.
    pub async fn close(&mut self) {
        self.release_players();
        if let Some(channel) = self.secret_channel.take() {
            self.services.transport.delete_secret_channel(&channel).await;
        }
        tracing::info!(session = %self.name, "Game session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentHandle;
    use crate::player::Seat;
    use crate::transport::Transport;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::mpsc;

    struct SilentTransport;

    #[async_trait]
    impl Transport for SilentTransport {
        async fn send_to_channel(&self, _channel: &ChannelId, _text: &str) {}

        async fn send_direct_message(&self, _seat: &str, _text: &str) {}

        async fn create_secret_channel(&self, name: &str) -> Result<ChannelId> {
            Ok(ChannelId::new(name))
        }

        async fn delete_secret_channel(&self, _channel: &ChannelId) {}
    }

    fn agent_seat(name: &str) -> (Seat, mpsc::UnboundedReceiver<AgentEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = AgentHandle::new(name.to_string(), sender, Arc::new(AtomicBool::new(false)));
        (Seat::Agent(handle), receiver)
    }

    fn seat(session: &mut GameSession, name: &str, seat: Seat, role: Role) {
        let mut player = Player::new(name, seat);
        player.assign_role(role);
        session.players.push(player);
    }

    #[tokio::test]
    async fn test_secret_chat_reaches_only_werewolf_agents() {
        let shared = GameSession::shared(
            "village",
            ChannelId::new("village"),
            SessionServices::new(Arc::new(SilentTransport)),
        );
        let mut session = shared.lock().await;
        let (hal, mut hal_queue) = agent_seat("Hal");
        let (vic, mut vic_queue) = agent_seat("Vic");
        seat(&mut session, "Hal", hal, Role::Werewolf);
        seat(&mut session, "Vic", vic, Role::Villager);
        seat(&mut session, "Wolf", Seat::Human, Role::Werewolf);
        session.secret_channel = Some(ChannelId::new("secret"));

        session.relay_chat(&ChannelId::new("secret"), "Wolf", "psst");
        assert_eq!(
            hal_queue.try_recv().ok(),
            Some(AgentEvent::Chat {
                channel: ChannelId::new("secret"),
                author: "Wolf".to_string(),
                text: "psst".to_string(),
            })
        );
        assert!(vic_queue.try_recv().is_err());

        session.relay_chat(&ChannelId::new("village"), "Hal", "hello");
        assert!(hal_queue.try_recv().is_err(), "own lines are not echoed");
        assert!(matches!(vic_queue.try_recv(), Ok(AgentEvent::Chat { .. })));
    }

    #[tokio::test]
    async fn test_pending_decisions_follow_phase_and_role() {
        let shared = GameSession::shared(
            "village",
            ChannelId::new("village"),
            SessionServices::new(Arc::new(SilentTransport)),
        );
        let mut session = shared.lock().await;
        seat(&mut session, "Wolf", Seat::Human, Role::Werewolf);
        seat(&mut session, "Cassandra", Seat::Human, Role::Seer);
        seat(&mut session, "Alice", Seat::Human, Role::Villager);

        assert!(session.pending_decisions("Wolf").is_empty(), "nothing to decide in Ready");

        session.phase = Phase::Night;
        assert_eq!(session.pending_decisions("Wolf"), vec![Decision::WerewolfVote]);
        assert_eq!(session.pending_decisions("Cassandra"), vec![Decision::SeerAsk]);
        assert!(session.pending_decisions("Alice").is_empty());

        session.phase = Phase::Day;
        assert_eq!(session.pending_decisions("Wolf"), vec![Decision::VillagerVote]);
        if let Some(alice) = session.find_player_mut("Alice") {
            alice.kill();
        }
        assert!(session.pending_decisions("Alice").is_empty());
        assert!(session.pending_decisions("Nobody").is_empty());
    }
}

//! Join-to-play phase.

use super::{GameSession, Phase};
use crate::agent::{AgentEvent, prompt};
use crate::command::{Command, SeatKind};
use crate::error::{GameError, Result};
use crate::player::{Player, Seat};
use crate::role::{self, Role};

pub(super) async fn handle(session: &mut GameSession, command: Command) -> Result<()> {
    match command {
        Command::Status { .. } => {
            session.send_to_session_channel(&status(session)).await;
            Ok(())
        }
        Command::Join { name, seat } => join(session, name, seat).await,
        Command::Quit { name } => {
            quit(session, &name).await;
            Ok(())
        }
        Command::Start => start(session).await,
        Command::Vote { .. } => Err(session.not_supported("vote")),
    }
}

/// Announces the end of a game, clears the table and shows the lobby.
pub(super) async fn on_enter(session: &mut GameSession, previous: Phase) {
    if previous != Phase::Ready {
        session.send_to_session_channel("This GAME is over!\n\n").await;
        let reveal = roster_reveal(session);
        session.send_to_session_channel(&reveal).await;
    }
    session.release_players();
    if let Some(channel) = session.secret_channel.take() {
        session
            .services
            .transport
            .delete_secret_channel(&channel)
            .await;
    }
    session.send_to_session_channel(&status(session)).await;
}

fn status(session: &GameSession) -> String {
    let mut text = String::from(
        "No game is running yet, you are in the join-to-play phase.\n\
         Currently the following members have registered to play:\n",
    );
    for player in session.players() {
        text.push_str(&format!("- **{}**\n", player.name()));
    }
    text.push_str("\nNext steps:\n");
    text.push_str("- **!join** to join the game.\n");
    if session.services.chat_factory.is_some() {
        text.push_str("- **!invite <name>** to let an AI-agent join the game.\n");
    }
    text.push_str("- **!quit** to leave the game.\n");
    text.push_str(&format!(
        "- **!start** to start the game (needs at least {} players!)",
        session.services.config.min_players
    ));
    text
}

/// Who was what, shown once the game is over.
fn roster_reveal(session: &GameSession) -> String {
    let mut text = String::from("The cards were:\n");
    for player in session.players() {
        let role = player.role().map_or("nobody", |role| role.name());
        let state = if player.is_alive() { "alive" } else { "dead" };
        text.push_str(&format!("- **{}**: {} ({})\n", player.name(), role, state));
    }
    text
}

async fn join(session: &mut GameSession, name: String, kind: SeatKind) -> Result<()> {
    if session.find_player_by_name(&name).is_some() {
        return Err(GameError::NameTaken { name });
    }

    let seat = match kind {
        SeatKind::Human => Seat::Human,
        SeatKind::Agent => Seat::Agent(session.launch_agent(&name)?),
    };
    tracing::info!(session = %session.name, player = %name, ?kind, "Player joined");
    session.players.push(Player::new(name.clone(), seat));
    session
        .send_to_session_channel(&format!("{name} joined the game."))
        .await;

    if let Some(agent) = session.find_player_by_name(&name).and_then(Player::agent) {
        agent.notify(AgentEvent::Moderator {
            channel: session.channel.clone(),
            prompt: prompt::INTRODUCE_YOURSELF.to_string(),
        });
    }
    Ok(())
}

async fn quit(session: &mut GameSession, name: &str) {
    let Some(index) = session.players.iter().position(|p| p.name() == name) else {
        tracing::debug!(session = %session.name, player = name, "Quit from a non-player ignored");
        return;
    };
    let player = session.players.remove(index);
    player.release();
    tracing::info!(session = %session.name, player = name, "Player left");
    session
        .send_to_session_channel(&format!("{name} quits the game."))
        .await;
}

/// Deals the roles and opens the first night.
///
/// The secret channel is secured before anything is dealt or announced, so a
/// transport failure leaves the session untouched in Ready.
async fn start(session: &mut GameSession) -> Result<()> {
    let joined = session.players.len();
    let min = session.services.config.min_players;
    if joined < min {
        return Err(GameError::NotEnoughPlayers { min, joined });
    }

    let generated = role::generate(joined);
    let mut dealt = generated.clone();
    (session.services.shuffle)(&mut dealt);

    let secret_name = session.services.config.secret_channel_name(&session.name);
    if session.secret_channel.is_none() {
        let channel = session
            .services
            .transport
            .create_secret_channel(&secret_name)
            .await?;
        tracing::info!(session = %session.name, channel = %channel, "Secret channel created");
        session.secret_channel = Some(channel);
    }

    session.send_to_session_channel(&card_list(&generated)).await;

    for (player, role) in session.players.iter_mut().zip(dealt) {
        tracing::info!(session = %session.name, player = %player.name(), %role, "Card dealt");
        player.assign_role(role);
    }
    for player in session.players() {
        if let Some(role) = player.role() {
            let text = format!(
                "You got the card **{}** in game **{}**.\n{}",
                role.name(),
                session.name,
                role.description()
            );
            player
                .send_dm(session.services.transport.as_ref(), &text)
                .await;
        }
    }

    let mut roster = String::from("The werewolves team is:\n");
    for werewolf in session.players().iter().filter(|p| p.is_werewolf()) {
        roster.push_str(&format!("- **{}**\n", werewolf.name()));
    }
    let briefing = format!(
        "{roster}Secretly talk to them in {secret_name}!\n\
         You need to vote for a villager to be eaten.\n\
         Tell me your decision using the **!vote** command."
    );
    for werewolf in session.players().iter().filter(|p| p.is_werewolf()) {
        werewolf
            .send_dm(session.services.transport.as_ref(), &briefing)
            .await;
    }
    session
        .send_to_secret_channel(&format!(
            "This is the channel for Werewolves in {} only - **PLEASE DON'T CHEAT!**",
            session.name
        ))
        .await;
    session
        .send_to_secret_channel(&format!(
            "{roster}You need to vote for a villager to be your next victim."
        ))
        .await;

    session.change_state(Phase::Night).await;
    Ok(())
}

fn card_list(roles: &[Role]) -> String {
    let mut text = String::from("Game started\nThe following cards are in the game:\n");
    for role in roles {
        text.push_str(&format!("- **{}**: {}\n", role.name(), role.description()));
    }
    text.push_str(
        "See your direct-messages from me, to get to know your own card and further instructions.",
    );
    text
}

//! Night: the werewolves choose a victim, the seer may ask about one player.

use super::{GameSession, Phase, VoteTally};
use crate::command::Command;
use crate::error::{GameError, Result};
use crate::role::Role;

pub(super) async fn handle(session: &mut GameSession, command: Command) -> Result<()> {
    match command {
        Command::Status { channel } => {
            if session.is_secret_channel(&channel) {
                let report = report(&VoteTally::night(session.players()));
                session.send_to_secret_channel(&report).await;
            } else {
                let text = format!(
                    "It is night. The Werewolves seek for their next victim.\n{}",
                    session.alive_players_summary()
                );
                session.send_to_session_channel(&text).await;
            }
            Ok(())
        }
        Command::Quit { name } => session.suicide(&name).await,
        Command::Vote { voter, target } => vote(session, &voter, &target).await,
        Command::Join { .. } => Err(session.not_supported("join")),
        Command::Start => Err(session.not_supported("start")),
    }
}

pub(super) async fn on_enter(session: &mut GameSession) {
    for player in session.players.iter_mut() {
        player.clear_night();
    }
    session
        .send_to_session_channel(
            "It's been a long day and now night is falling. \
             The villagers are asleep and the werewolves are becoming active.",
        )
        .await;
    session.notify_agents();
}

async fn vote(session: &mut GameSession, voter: &str, target: &str) -> Result<()> {
    match session.validate_vote(voter, target)? {
        Role::Werewolf => {
            if let Some(player) = session.find_player_mut(voter) {
                player.cast_night_vote(target);
            }
            tracing::info!(session = %session.name, voter, target, "Werewolf voted");
            resolve(session, true).await
        }
        Role::Seer => ask_seer(session, voter, target).await,
        Role::Villager => Err(GameError::NotAWerewolf {
            voter: voter.to_string(),
        }),
    }
}

/// Kills the victim once the werewolves agree and moves on to the day.
///
/// With `report_undecided`, an open vote is posted to the secret channel.
pub(super) async fn resolve(session: &mut GameSession, report_undecided: bool) -> Result<()> {
    let tally = VoteTally::night(session.players());
    let Some(victim) = tally.unanimous_target().map(str::to_string) else {
        if report_undecided {
            session.send_to_secret_channel(&report(&tally)).await;
        }
        return Ok(());
    };

    session.eliminate(&victim, "Werewolves").await?;
    if !session.evaluate_game_over().await {
        session.change_state(Phase::Day).await;
    }
    Ok(())
}

async fn ask_seer(session: &mut GameSession, seer: &str, target: &str) -> Result<()> {
    let player = session
        .find_player_mut(seer)
        .ok_or_else(|| GameError::internal(format!("Seer {seer} vanished")))?;
    if player.seer_has_asked_tonight() {
        return Err(GameError::SeerAlreadyAsked {
            seer: seer.to_string(),
        });
    }
    player.mark_seer_asked();

    let is_werewolf = session
        .find_player_by_name(target)
        .is_some_and(|player| player.is_werewolf());
    let answer = if is_werewolf {
        format!("{target} is a Werewolf!")
    } else {
        format!("{target} is not a Werewolf!")
    };
    tracing::info!(session = %session.name, seer, target, is_werewolf, "Seer asked");
    session.send_dm(seer, &answer).await;
    Ok(())
}

fn report(tally: &VoteTally) -> String {
    let mut text = String::new();
    if tally.is_split() {
        text.push_str("All Werewolves must agree on one victim.\n");
    }
    text.push_str(&tally.report());
    if !tally.ballots().is_empty() {
        text.push_str("Vote is not finished yet.\nUse **!vote** command to update your decision.");
    }
    text
}

//! Day: everybody alive votes, a strict majority lynches.

use super::{GameSession, Phase, VoteTally};
use crate::command::Command;
use crate::error::Result;

pub(super) async fn handle(session: &mut GameSession, command: Command) -> Result<()> {
    match command {
        Command::Status { .. } => {
            let text = format!(
                "It is day. All players seek for their next victim.\n{}\n\
                 Next steps:\n\
                 - **!vote** command to select the next victim.\n\
                 - **!quit** to leave the game through suicide.\n",
                session.alive_players_summary()
            );
            session.send_to_session_channel(&text).await;
            Ok(())
        }
        Command::Quit { name } => session.suicide(&name).await,
        Command::Vote { voter, target } => {
            session.validate_vote(&voter, &target)?;
            if let Some(player) = session.find_player_mut(&voter) {
                player.cast_day_vote(&target);
            }
            tracing::info!(session = %session.name, voter = %voter, target = %target, "Day vote");
            resolve(session, true).await
        }
        Command::Join { .. } => Err(session.not_supported("join")),
        Command::Start => Err(session.not_supported("start")),
    }
}

pub(super) async fn on_enter(session: &mut GameSession) {
    for player in session.players.iter_mut() {
        player.clear_day();
    }
    session
        .send_to_session_channel(
            "It was a long night and the werewolves roamed the streets of the city. \
             Wake up, everyone, and wait for the things to come.",
        )
        .await;
    session.notify_agents();
}

/// Lynches the player holding a strict majority and moves on to the night.
pub(super) async fn resolve(session: &mut GameSession, report_undecided: bool) -> Result<()> {
    let tally = VoteTally::day(session.players());
    let alive = session.count_alive();
    let Some(victim) = tally.majority_target(alive).map(str::to_string) else {
        if report_undecided {
            let text = format!(
                "{}Vote is not finished, because the victim must count more than half of the votes.\n\
                 Use **!vote** command to update your decision.",
                tally.report()
            );
            session.send_to_session_channel(&text).await;
        }
        return Ok(());
    };

    session.eliminate(&victim, "villagers").await?;
    if !session.evaluate_game_over().await {
        session.change_state(Phase::Night).await;
    }
    Ok(())
}

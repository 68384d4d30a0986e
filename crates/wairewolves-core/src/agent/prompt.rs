//! Prompts sent to agent seats.

pub const INTRODUCE_YOURSELF: &str = "Introduce yourself to the other players.";

pub const RECENT_CHAT_QUESTION: &str = "What did the other players say lately?";

pub const JOIN_CONVERSATION: &str = "Take part of the recent conversation or give answer.";

pub const WEREWOLF_VOTE: &str = "As a werewolf you need to vote for a victim together with the \
     other werewolves. Decide for a victim and answer this time with just one word - the player name!";

pub const VILLAGER_VOTE: &str = "You need to vote for a victim together with the others. \
     Decide for a victim and answer this time with just one word - the player name!";

pub const SEER_ASK: &str = "As the seer you are allowed to ask if one player is a werewolf. \
     Decide for a player and answer this time with just one word - the player name!";

/// Turns a model reply into a candidate player name.
///
/// Trims surrounding whitespace and a single trailing `.` or `!`. Returns
/// `None` when nothing is left.
pub fn sanitize_vote(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    let name = trimmed
        .strip_suffix('.')
        .or_else(|| trimmed.strip_suffix('!'))
        .unwrap_or(trimmed);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

//! Vote counting.
//!
//! Only alive players count, both as voters and as the base of the day
//! majority. Ballots of dead players stay on the player but are ignored here.

use crate::player::Player;

/// Snapshot of one vote round.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoteTally {
    /// `(voter, target)` in seating order
    ballots: Vec<(String, String)>,
    /// Eligible voters without a ballot
    pending: Vec<String>,
}

impl VoteTally {
    /// The werewolves' night vote.
    pub fn night(players: &[Player]) -> Self {
        Self::collect(
            players.iter().filter(|p| p.is_alive() && p.is_werewolf()),
            Player::night_vote,
        )
    }

    /// The public day vote.
    pub fn day(players: &[Player]) -> Self {
        Self::collect(players.iter().filter(|p| p.is_alive()), Player::day_vote)
    }

    fn collect<'a>(
        voters: impl Iterator<Item = &'a Player>,
        ballot: fn(&Player) -> Option<&str>,
    ) -> Self {
        let mut tally = Self::default();
        for voter in voters {
            match ballot(voter) {
                Some(target) => tally
                    .ballots
                    .push((voter.name().to_string(), target.to_string())),
                None => tally.pending.push(voter.name().to_string()),
            }
        }
        tally
    }

    pub fn ballots(&self) -> &[(String, String)] {
        &self.ballots
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Whether at least two ballots name different targets.
    pub fn is_split(&self) -> bool {
        self.ballots
            .first()
            .is_some_and(|(_, first)| self.ballots.iter().any(|(_, target)| target != first))
    }

    /// The common target once every eligible voter agreed on it.
    pub fn unanimous_target(&self) -> Option<&str> {
        if !self.pending.is_empty() || self.is_split() {
            return None;
        }
        self.ballots.first().map(|(_, target)| target.as_str())
    }

    /// The target holding strictly more than half of `alive` votes.
    pub fn majority_target(&self, alive: usize) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for (_, target) in &self.ballots {
            match counts.iter_mut().find(|(name, _)| *name == target.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((target.as_str(), 1)),
            }
        }
        counts
            .into_iter()
            .find(|(_, count)| count * 2 > alive)
            .map(|(target, _)| target)
    }

    /// Lists ballots and missing voters, one `- ` line each.
    pub fn report(&self) -> String {
        let mut text = String::from("The current votes are:\n");
        for (voter, target) in &self.ballots {
            text.push_str(&format!("- {voter} votes for {target}\n"));
        }
        if !self.pending.is_empty() {
            text.push_str("These players still need to vote:\n");
            for voter in &self.pending {
                text.push_str(&format!("- {voter}\n"));
            }
        }
        text
    }
}

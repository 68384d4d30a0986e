//! Roles and the role-mix generator.
//!
//! Generation and shuffling are separate steps: [`generate`] is fully
//! deterministic for a given player count, and the caller applies a
//! [`shuffle`] afterwards. The start-of-game announcement lists the generated
//! order, while seats are dealt from the shuffled order.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A secret role dealt to one player at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Villager,
    Werewolf,
    Seer,
}

impl Role {
    /// Display name of the role.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Villager => "Villager",
            Role::Werewolf => "Werewolf",
            Role::Seer => "Seer",
        }
    }

    /// Balance weight used only by [`generate`].
    pub fn balance_weight(&self) -> i32 {
        match self {
            Role::Villager => 1,
            Role::Werewolf => -6,
            Role::Seer => 7,
        }
    }

    /// Order in which night actions of this role resolve (lower first).
    pub fn resolution_order(&self) -> u32 {
        match self {
            Role::Villager => 0,
            Role::Seer => 1,
            Role::Werewolf => 10,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Villager => "Find the werewolves and lynch them.",
            Role::Werewolf => {
                "Choose a victim to devour each night together with the other werewolves."
            }
            Role::Seer => {
                "Choose a player every night and find out whether they are the werewolf or not."
            }
        }
    }

    pub fn is_werewolf(&self) -> bool {
        matches!(self, Role::Werewolf)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Signature of the shuffle step applied to a generated role mix.
pub type Shuffle = fn(&mut [Role]);

/// Returns the role mix for `count` players.
///
/// Groups larger than four get exactly one Seer. The remaining seats are
/// filled by keeping the running balance weight around zero: a Villager while
/// the sum is not positive, a Werewolf otherwise.
pub fn generate(count: usize) -> Vec<Role> {
    let mut roles = Vec::with_capacity(count);
    let mut weight = 0;

    if count > 4 {
        roles.push(Role::Seer);
        weight += Role::Seer.balance_weight();
    }

    while roles.len() < count {
        let role = if weight <= 0 {
            Role::Villager
        } else {
            Role::Werewolf
        };
        weight += role.balance_weight();
        roles.push(role);
    }

    roles
}

/// Shuffles roles in place with the thread-local RNG.
pub fn shuffle(roles: &mut [Role]) {
    roles.shuffle(&mut rand::thread_rng());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn count_of(roles: &[Role], role: Role) -> usize {
        roles.iter().filter(|r| **r == role).count()
    }

    #[test]
    fn test_generate_returns_requested_count() {
        for count in 1..=20 {
            assert_eq!(generate(count).len(), count, "count {count}");
        }
    }

    #[test]
    fn test_generate_zero_is_empty() {
        assert!(generate(0).is_empty());
    }

    #[test]
    fn test_single_seer_only_for_large_groups() {
        for count in 1..=4 {
            assert_eq!(count_of(&generate(count), Role::Seer), 0);
        }
        for count in 5..=20 {
            assert_eq!(count_of(&generate(count), Role::Seer), 1, "count {count}");
        }
    }

    #[test]
    fn test_generate_known_mixes() {
        use Role::*;
        assert_eq!(generate(1), vec![Villager]);
        assert_eq!(generate(4), vec![Villager, Werewolf, Villager, Villager]);
        assert_eq!(generate(5), vec![Seer, Werewolf, Werewolf, Villager, Villager]);
        assert_eq!(
            generate(10),
            vec![
                Seer, Werewolf, Werewolf, Villager, Villager, Villager, Villager, Villager,
                Villager, Werewolf
            ]
        );
    }

    #[test]
    fn test_every_game_has_a_werewolf_from_two_players() {
        for count in 2..=20 {
            assert!(count_of(&generate(count), Role::Werewolf) >= 1, "count {count}");
        }
    }

    #[test]
    fn test_shuffle_keeps_the_multiset() {
        let generated = generate(12);
        let mut shuffled = generated.clone();
        shuffle(&mut shuffled);

        let tally = |roles: &[Role]| {
            let mut map = HashMap::new();
            for role in roles {
                *map.entry(*role).or_insert(0) += 1;
            }
            map
        };
        assert_eq!(tally(&generated), tally(&shuffled));
    }

    #[test]
    fn test_role_metadata() {
        assert_eq!(Role::Werewolf.to_string(), "Werewolf");
        assert!(Role::Werewolf.is_werewolf());
        assert!(!Role::Seer.is_werewolf());
        assert!(Role::Seer.resolution_order() < Role::Werewolf.resolution_order());
    }
}

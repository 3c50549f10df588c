//! Declarative description of the players entering a race.
//!
//! Binaries build a roster from command-line options and turn it into fresh
//! players for every race, since players cannot be shared between races.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::error::RuleError;
use super::player::Player;
use super::policies::RulePolicy;
use super::rules::RuleSet;

/// Which players to create, in this order: humans, naive, rule files, random rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Keyboard-driven players (all read the same keys).
    pub humans: usize,
    /// Naive wall-avoiding players.
    pub naive: usize,
    /// One rule-based player per rule set.
    pub rules: Vec<RuleSet>,
    /// Rule-based players with random two-rule tables.
    pub random_rules: usize,
}

impl Roster {
    /// Total number of players the roster creates.
    pub fn len(&self) -> usize {
        self.humans + self.naive + self.rules.len() + self.random_rules
    }

    /// Whether the roster creates no players.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates the players. Random rule tables are drawn from `seed`, so the
    /// same roster and seed always give the same players.
    pub fn build(&self, seed: u64) -> Result<Vec<Player>, RuleError> {
        let mut players = Vec::with_capacity(self.len());
        players.extend((0..self.humans).map(|_| Player::human()));
        players.extend((0..self.naive).map(|_| Player::naive()));
        for rules in &self.rules {
            players.push(Player::with_rules(rules.clone())?);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let inputs = RulePolicy::sensors().len();
        for _ in 0..self.random_rules {
            players.push(Player::with_rules(RuleSet::random(2, inputs, &mut rng))?);
        }
        Ok(players)
    }
}

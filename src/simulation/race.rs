//! The race loop: advances every player through sense, plan, act and resolve.
//!
//! A race owns its track and players. Each call to [`Race::step`] runs one
//! complete tick for every living player in id order before returning, so
//! anything reading the race between steps sees fully resolved state.
//! Players never interact with each other, only with the track.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::event_log::{EventLog, LoggedEvent};
use super::player::{ArrowKeys, Outcome, Player};
use super::params::RaceParams;
use super::track::Track;

/// Whether the race still accepts ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    /// Ticks advance the simulation.
    Running,
    /// Terminal; further ticks are ignored.
    Finished,
}

/// Final state of one player, as reported in a [`RaceSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Player id.
    pub id: usize,
    /// Name of the policy driving the player.
    pub policy: String,
    /// Last distance-field value; 1 means finished, 0 means never scored.
    pub score: u32,
    /// Whether the player was still racing when the summary was taken.
    pub alive: bool,
    /// How the player left the race, if it did.
    pub outcome: Option<Outcome>,
}

/// Serializable snapshot of a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSummary {
    /// Ticks simulated.
    pub ticks: u64,
    /// Simulated seconds elapsed.
    pub time: f32,
    /// Race status at the time of the snapshot.
    pub status: RaceStatus,
    /// Per-player results in id order.
    pub players: Vec<PlayerResult>,
}

/// A racing session on a single track.
#[derive(Debug)]
pub struct Race {
    track: Track,
    /// Players in id order.
    pub players: Vec<Player>,
    params: RaceParams,
    status: RaceStatus,
    tick: u64,
    next_id: usize,
    events: EventLog,
    rng: StdRng,
}

impl Race {
    /// Creates a running race without players.
    pub fn new(track: Track, params: RaceParams) -> Self {
        Self {
            track,
            players: Vec::new(),
            events: EventLog::new(params.event_log_size),
            rng: StdRng::seed_from_u64(params.seed),
            params,
            status: RaceStatus::Running,
            tick: 0,
            next_id: 0,
        }
    }

    /// Creates a race and adds `players` in order.
    pub fn with_players(
        track: Track,
        params: RaceParams,
        players: impl IntoIterator<Item = Player>,
    ) -> Self {
        let mut race = Self::new(track, params);
        for player in players {
            race.add_player(player);
        }
        race
    }

    /// Adds a player, also while the race is running.
    ///
    /// The player gets the next id, a random colour and is placed on the start.
    /// Ids are never reused, also after [`Race::remove_all_players`].
    pub fn add_player(&mut self, mut player: Player) -> &mut Self {
        player.id = self.next_id;
        self.next_id += 1;
        player.color = [
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
            self.rng.random_range(100..=255),
        ];
        player.pos = self.track.start_position();
        self.players.push(player);
        self
    }

    /// Replaces all players with `keep`.
    ///
    /// Kept players retain their ids; later additions continue after the
    /// highest id handed out so far or kept.
    pub fn remove_all_players(&mut self, keep: Vec<Player>) -> &mut Self {
        let kept_max = keep.iter().map(|player| player.id + 1).max().unwrap_or(0);
        self.next_id = self.next_id.max(kept_max);
        self.players = keep;
        self
    }

    /// The track being raced on.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// The race parameters.
    pub fn params(&self) -> &RaceParams {
        &self.params
    }

    /// Current status.
    pub fn status(&self) -> RaceStatus {
        self.status
    }

    /// Whether ticks still advance the simulation.
    pub fn is_running(&self) -> bool {
        self.status == RaceStatus::Running
    }

    /// True when no player is alive.
    pub fn is_game_over(&self) -> bool {
        !self.players.iter().any(|player| player.alive)
    }

    /// Ticks simulated so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds elapsed.
    pub fn time(&self) -> f32 {
        self.tick as f32 * self.params.seconds_per_frame
    }

    /// Recent finish and crash events, newest first.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Ends the race. Takes effect between ticks only.
    pub fn stop(&mut self) -> &mut Self {
        self.status = RaceStatus::Finished;
        self
    }

    /// Runs one tick for every living player.
    ///
    /// Does nothing once the race is finished.
    pub fn step(&mut self, keys: ArrowKeys) {
        if !self.is_running() {
            return;
        }

        self.tick += 1;
        let time = self.time();
        for player in &mut self.players {
            if let Some(outcome) = player.turn(&self.track, keys, &self.params) {
                info!(
                    player = player.id,
                    score = player.score,
                    ?outcome,
                    "player ended with score {}",
                    player.score
                );
                self.events.log(LoggedEvent {
                    tick: self.tick,
                    time,
                    player_id: player.id,
                    score: player.score,
                    outcome,
                });
            }
        }

        if self.params.stop_on_death && self.is_game_over() {
            self.stop();
        }
        if self.budget_ticks().is_some_and(|budget| self.tick >= budget) {
            info!(ticks = self.tick, "time budget exhausted");
            self.stop();
        }
    }

    /// Ticks until the race finishes or `should_stop` returns true.
    ///
    /// `should_stop` is consulted before every tick, never during one. No keys
    /// are held, so human players coast.
    pub fn run(&mut self, mut should_stop: impl FnMut(&Self) -> bool) -> &mut Self {
        while self.is_running() {
            if should_stop(self) {
                self.stop();
                break;
            }
            self.step(ArrowKeys::default());
        }
        self
    }

    /// Scores by player id.
    pub fn scores(&self) -> BTreeMap<usize, u32> {
        self.players
            .iter()
            .map(|player| (player.id, player.score))
            .collect()
    }

    /// Looks up a player by id.
    pub fn player(&self, id: usize) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// The player closest to the finish (lowest score).
    ///
    /// Players that never scored rank behind everyone else.
    pub fn best_player(&self) -> Option<&Player> {
        self.players.iter().min_by_key(|player| rank(player.score))
    }

    /// The player furthest from the finish (highest score).
    ///
    /// Players that never scored count as furthest.
    pub fn worst_player(&self) -> Option<&Player> {
        self.players.iter().max_by_key(|player| rank(player.score))
    }

    /// Serializable snapshot of the race.
    pub fn summary(&self) -> RaceSummary {
        RaceSummary {
            ticks: self.tick,
            time: self.time(),
            status: self.status,
            players: self
                .players
                .iter()
                .map(|player| PlayerResult {
                    id: player.id,
                    policy: player.policy().name().to_owned(),
                    score: player.score,
                    alive: player.alive,
                    outcome: player.outcome,
                })
                .collect(),
        }
    }

    /// Time budget expressed in whole ticks.
    fn budget_ticks(&self) -> Option<u64> {
        self.params
            .time_budget
            .map(|budget| ((budget / self.params.seconds_per_frame).round() as u64).max(1))
    }
}

/// Sort key for scores: 0 means "never scored" and ranks last.
fn rank(score: u32) -> u32 {
    if score == 0 { u32::MAX } else { score }
}

//! Player state and the policy interface that drives it.
//!
//! A player is a point-sized car with a speed and a heading. What it does each
//! tick is decided by its [`Policy`]: `sense` gathers percepts, `plan` turns
//! them into an acceleration and a rotation command.

use geo::Point;
use serde::{Deserialize, Serialize};

use super::error::RuleError;
use super::geometric_utils::{clamp_command, normalize_degrees, translate};
use super::params::RaceParams;
use super::policies::{HumanPolicy, NaivePolicy, RulePolicy};
use super::rules::RuleSet;
use super::sensor::DistanceSensor;
use super::track::Track;

/// Snapshot of which arrow keys are held down during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowKeys {
    /// Accelerate.
    pub up: bool,
    /// Brake.
    pub down: bool,
    /// Rotate counter-clockwise.
    pub left: bool,
    /// Rotate clockwise.
    pub right: bool,
}

/// Observation handed from [`Policy::sense`] to [`Policy::plan`].
#[derive(Debug, Clone, PartialEq)]
pub enum Percepts {
    /// Raw key states for human-driven players.
    Keys(ArrowKeys),
    /// Sensor readings in sensor order.
    Distances(Vec<f32>),
}

/// Acceleration and rotation command, each meant to lie in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// -1 brakes, 1 accelerates.
    pub acceleration: f32,
    /// -1 turns counter-clockwise, 1 turns clockwise.
    pub rotation: f32,
}

impl Command {
    /// Keep speed and heading.
    pub const IDLE: Self = Self::new(0.0, 0.0);

    /// Creates a command.
    pub const fn new(acceleration: f32, rotation: f32) -> Self {
        Self {
            acceleration,
            rotation,
        }
    }

    /// The command with both components clamped into `[-1, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(clamp_command(self.acceleration), clamp_command(self.rotation))
    }
}

/// Read-only kinematic state a policy may base its decisions on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    /// World position.
    pub pos: Point<f32>,
    /// Speed in world units per tick.
    pub speed: f32,
    /// Heading in degrees.
    pub rotation: f32,
}

/// Behaviour of a player: how it observes and how it decides.
pub trait Policy: Send {
    /// Gathers the percepts needed by [`Policy::plan`].
    ///
    /// # Arguments
    ///
    /// * `view` - The player's current kinematic state
    /// * `sensors` - The player's sensors, updated in place
    /// * `track` - The track being raced on
    /// * `keys` - Arrow keys held during this tick
    fn sense(
        &self,
        view: &PlayerView,
        sensors: &mut [DistanceSensor],
        track: &Track,
        keys: ArrowKeys,
    ) -> Percepts;

    /// Chooses the command for this tick.
    fn plan(&self, view: &PlayerView, percepts: &Percepts) -> Command;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;

    /// Whether the policy reads the keyboard.
    fn is_human(&self) -> bool {
        false
    }
}

/// Reads every sensor in order. Shared by the autonomous policies.
pub fn read_sensors(view: &PlayerView, sensors: &mut [DistanceSensor], track: &Track) -> Percepts {
    Percepts::Distances(
        sensors
            .iter_mut()
            .map(|sensor| sensor.perceive(track, view.pos, view.rotation))
            .collect(),
    )
}

/// A racing player.
///
/// Players are created with default kinematics and get their id, colour and
/// start position when they join a race.
pub struct Player {
    /// Identifier assigned by the race.
    pub id: usize,
    /// RGB colour used for drawing.
    pub color: [u8; 3],
    /// World position.
    pub pos: Point<f32>,
    /// Speed in world units per tick, never negative.
    pub speed: f32,
    /// Heading in degrees, always in `[0, 360)`.
    pub rotation: f32,
    /// Last positive distance-field value seen; 1 means finished.
    pub score: u32,
    /// False once the player crashed or finished.
    pub alive: bool,
    /// Why the player stopped racing, set together with `alive = false`.
    pub outcome: Option<Outcome>,
    /// Sensors in the order the policy expects them.
    pub sensors: Vec<DistanceSensor>,
    policy: Box<dyn Policy>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("policy", &self.policy.name())
            .field("pos", &self.pos)
            .field("speed", &self.speed)
            .field("rotation", &self.rotation)
            .field("score", &self.score)
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Creates a player driven by `policy` with the given sensors.
    pub fn new(policy: Box<dyn Policy>, sensors: Vec<DistanceSensor>) -> Self {
        Self {
            id: 0,
            color: [255, 255, 255],
            pos: Point::new(0.0, 0.0),
            speed: 0.0,
            rotation: 0.0,
            score: 0,
            alive: true,
            outcome: None,
            sensors,
            policy,
        }
    }

    /// Keyboard-driven player without sensors.
    pub fn human() -> Self {
        Self::new(Box::new(HumanPolicy), Vec::new())
    }

    /// Wall-avoiding player with two sensors at ±30°.
    pub fn naive() -> Self {
        Self::new(Box::new(NaivePolicy), NaivePolicy::sensors())
    }

    /// Rule-driven player with three sensors at -30°, 0° and 30°.
    pub fn with_rules(rules: RuleSet) -> Result<Self, RuleError> {
        let sensors = RulePolicy::sensors();
        let policy = RulePolicy::new(rules, sensors.len())?;
        Ok(Self::new(Box::new(policy), sensors))
    }

    /// The policy driving this player.
    pub fn policy(&self) -> &dyn Policy {
        self.policy.as_ref()
    }

    /// Kinematic state handed to the policy.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            pos: self.pos,
            speed: self.speed,
            rotation: self.rotation,
        }
    }

    /// Runs the policy's sense step.
    pub fn sense(&mut self, track: &Track, keys: ArrowKeys) -> Percepts {
        let view = self.view();
        self.policy.sense(&view, &mut self.sensors, track, keys)
    }

    /// Runs the policy's plan step.
    pub fn plan(&self, percepts: &Percepts) -> Command {
        self.policy.plan(&self.view(), percepts)
    }

    /// Applies a command for one tick and returns the destination.
    ///
    /// The command is clamped first. Speed never drops below zero and the
    /// heading wraps into `[0, 360)`. Position is left untouched.
    pub fn act(&mut self, command: Command, params: &RaceParams) -> Point<f32> {
        let command = command.clamped();
        let dt = params.seconds_per_frame;

        self.speed = (self.speed + command.acceleration * params.acceleration * dt).max(0.0);
        self.rotation =
            normalize_degrees(self.rotation + command.rotation * params.rotation_speed * dt);

        translate(self.pos, self.speed, self.rotation)
    }

    /// Moves to `destination`, updates the score and decides whether the
    /// player crashed or finished.
    ///
    /// Returns the outcome when the player died during this call.
    pub fn resolve(&mut self, track: &Track, destination: Point<f32>) -> Option<Outcome> {
        self.pos = destination;

        let distance = track.get_distance(self.pos);
        if distance > 0 {
            self.score = distance;
        }

        let outcome = if track.check_collision(self.pos) {
            Some(Outcome::Crashed)
        } else if self.score == 1 {
            Some(Outcome::Finished)
        } else {
            None
        };
        if outcome.is_some() {
            self.alive = false;
            self.outcome = outcome;
        }
        outcome
    }

    /// Full sense, plan, act, resolve turn. Dead players are left untouched.
    pub fn turn(
        &mut self,
        track: &Track,
        keys: ArrowKeys,
        params: &RaceParams,
    ) -> Option<Outcome> {
        if !self.alive {
            return None;
        }
        let percepts = self.sense(track, keys);
        let command = self.plan(&percepts);
        let destination = self.act(command, params);
        self.resolve(track, destination)
    }
}

/// How a player left the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Reached a finish pixel.
    Finished,
    /// Drove into a wall.
    Crashed,
}

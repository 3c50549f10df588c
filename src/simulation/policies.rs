//! Built-in player policies.

use ndarray::Array1;

use super::error::RuleError;
use super::player::{ArrowKeys, Command, Percepts, PlayerView, Policy, read_sensors};
use super::rules::RuleSet;
use super::sensor::DistanceSensor;
use super::track::Track;

/// Maps held arrow keys to commands. Opposite keys cancel out.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanPolicy;

impl Policy for HumanPolicy {
    fn sense(
        &self,
        _view: &PlayerView,
        _sensors: &mut [DistanceSensor],
        _track: &Track,
        keys: ArrowKeys,
    ) -> Percepts {
        Percepts::Keys(keys)
    }

    fn plan(&self, _view: &PlayerView, percepts: &Percepts) -> Command {
        let Percepts::Keys(keys) = percepts else {
            return Command::IDLE;
        };
        let axis = |positive: bool, negative: bool| f32::from(positive) - f32::from(negative);
        Command::new(axis(keys.up, keys.down), axis(keys.right, keys.left))
    }

    fn name(&self) -> &'static str {
        "Human"
    }

    fn is_human(&self) -> bool {
        true
    }
}

/// Keeps a slow pace and turns away from the nearer wall.
///
/// Uses a left and a right sensor and ignores any others.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaivePolicy;

impl NaivePolicy {
    /// Range of both sensors.
    pub const SENSOR_DEPTH: f32 = 60.0;
    /// Speed below which the policy accelerates.
    pub const CRUISE_SPEED: f32 = 1.0;

    /// The left and right sensors this policy expects.
    pub fn sensors() -> Vec<DistanceSensor> {
        DistanceSensor::fan(&[-30.0, 30.0], Self::SENSOR_DEPTH)
    }
}

impl Policy for NaivePolicy {
    fn sense(
        &self,
        view: &PlayerView,
        sensors: &mut [DistanceSensor],
        track: &Track,
        _keys: ArrowKeys,
    ) -> Percepts {
        read_sensors(view, sensors, track)
    }

    fn plan(&self, view: &PlayerView, percepts: &Percepts) -> Command {
        let Percepts::Distances(distances) = percepts else {
            return Command::IDLE;
        };
        let [left, right, ..] = distances.as_slice() else {
            return Command::IDLE;
        };

        let rotation = if left > right { -1.0 } else { 1.0 };
        let acceleration = f32::from(view.speed < Self::CRUISE_SPEED);
        Command::new(acceleration, rotation)
    }

    fn name(&self) -> &'static str {
        "Naive"
    }
}

/// Steers by comparing the first two rules of a [`RuleSet`].
///
/// Turns clockwise when rule 0 outscores rule 1, counter-clockwise otherwise,
/// and accelerates while slower than [`RulePolicy::CRUISE_SPEED`].
#[derive(Debug, Clone)]
pub struct RulePolicy {
    rules: RuleSet,
}

impl RulePolicy {
    /// Range of every sensor.
    pub const SENSOR_DEPTH: f32 = 50.0;
    /// Speed below which the policy accelerates.
    pub const CRUISE_SPEED: f32 = 3.0;

    /// Wraps a rule set, checking it fits `sensor_count` sensors.
    pub fn new(rules: RuleSet, sensor_count: usize) -> Result<Self, RuleError> {
        rules.validate()?;
        if rules.len() < 2 {
            return Err(RuleError::TooFewRules(rules.len()));
        }
        if rules.inputs() != sensor_count {
            return Err(RuleError::SensorMismatch {
                weights: rules.inputs(),
                sensors: sensor_count,
            });
        }
        Ok(Self { rules })
    }

    /// The sensors a default rule-based player carries.
    pub fn sensors() -> Vec<DistanceSensor> {
        DistanceSensor::fan(&[-30.0, 0.0, 30.0], Self::SENSOR_DEPTH)
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Policy for RulePolicy {
    fn sense(
        &self,
        view: &PlayerView,
        sensors: &mut [DistanceSensor],
        track: &Track,
        _keys: ArrowKeys,
    ) -> Percepts {
        read_sensors(view, sensors, track)
    }

    fn plan(&self, view: &PlayerView, percepts: &Percepts) -> Command {
        let Percepts::Distances(distances) = percepts else {
            return Command::IDLE;
        };
        if distances.len() != self.rules.inputs() {
            return Command::IDLE;
        }

        let totals = self.rules.totals(&Array1::from_vec(distances.clone()));
        let rotation = if totals[0] > totals[1] { 1.0 } else { -1.0 };
        let acceleration = f32::from(view.speed < Self::CRUISE_SPEED);
        Command::new(acceleration, rotation)
    }

    fn name(&self) -> &'static str {
        "Rules"
    }
}

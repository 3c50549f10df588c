use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ParamsError;

/// Race parameters that control physics, pacing and session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceParams {
    /// Speed gained per second at full throttle (units per tick per second).
    pub acceleration: f32,
    /// Degrees turned per second at full steering.
    pub rotation_speed: f32,
    /// Simulated time per tick. Never derived from wall-clock time.
    pub seconds_per_frame: f32,
    /// Window pixels per track pixel.
    pub scale: f32,
    /// Finish the race as soon as no player is alive.
    pub stop_on_death: bool,
    /// Finish the race after this much simulated time, if set.
    pub time_budget: Option<f32>,
    /// Place the origin at the bottom-left of the track image.
    pub flip_vertical: bool,
    /// Seed for player colours and random rule tables.
    pub seed: u64,
    /// Number of recent race events kept for display.
    pub event_log_size: usize,
}

impl Default for RaceParams {
    fn default() -> Self {
        Self {
            acceleration: 5.0,
            rotation_speed: 180.0,
            seconds_per_frame: 1.0 / 30.0,
            scale: 1.0 / 0.3,
            stop_on_death: true,
            time_budget: None,
            flip_vertical: false,
            seed: 42,
            event_log_size: 20,
        }
    }
}

impl RaceParams {
    /// Checks that the numeric parameters are usable.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let positive = [
            ("acceleration", self.acceleration),
            ("rotation_speed", self.rotation_speed),
            ("seconds_per_frame", self.seconds_per_frame),
            ("scale", self.scale),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ParamsError::NotPositive { name, value });
            }
        }
        if let Some(budget) = self
            .time_budget
            .filter(|budget| budget.is_nan() || *budget <= 0.0)
        {
            return Err(ParamsError::NotPositive {
                name: "time_budget",
                value: budget,
            });
        }
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

//! # Train Race - Deterministic Track Racing Simulation
//!
//! Point-sized cars race around a 2D track drawn as an image. Each car is
//! driven by a policy that senses the track through ray-cast distance sensors
//! (or the keyboard) and plans an acceleration and a steering command.
//!
//! ## Features
//!
//! - Track parsing from RGB images (walls, finish, start)
//! - Diagonal flood-fill distance field used as the race score
//! - Bresenham ray casting for distance sensors
//! - Pluggable policies: keyboard, naive wall avoider, linear rule tables
//! - Fixed-timestep race loop with clamped commands and crash/finish detection
//! - JSON race parameters and summaries, plain-text rule files
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Track grid, distance field and queries
//! - [`simulation::player`] - Player state and the [`simulation::player::Policy`] trait
//! - [`simulation::race`] - The race loop
//! - [`simulation::sensor`] - Distance sensors

/// Core simulation logic and data structures.
pub mod simulation {
    /// Error types for tracks, rule tables and parameters.
    pub mod error;
    /// Bounded log of finish and crash events.
    pub mod event_log;
    /// Angle translation, pixel rounding and command clamping.
    pub mod geometric_utils;
    /// Race parameters.
    pub mod params;
    /// Player state and the policy interface.
    pub mod player;
    /// Built-in keyboard, naive and rule-based policies.
    pub mod policies;
    /// The race loop and scoreboard.
    pub mod race;
    /// Declarative player rosters for binaries.
    pub mod roster;
    /// Bresenham line rasterization for ray casting.
    pub mod raycast;
    /// Linear rule tables and their text format.
    pub mod rules;
    /// Ray-cast distance sensors.
    pub mod sensor;
    /// Frame pacing and dropped-frame diagnostics.
    pub mod timing;
    /// Track parsing and queries.
    pub mod track;
}

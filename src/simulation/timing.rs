//! Frame pacing for real-time drivers.
//!
//! The simulation always advances by a fixed `seconds_per_frame`. These helpers
//! only decide when the next tick runs and report ticks that overran their slot.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::warn;

/// Paces ticks to fixed wall-clock frame slots.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    seconds_per_frame: f64,
}

impl FramePacer {
    /// Creates a pacer for frames of `seconds_per_frame` seconds.
    pub fn new(seconds_per_frame: f32) -> Self {
        Self {
            seconds_per_frame: f64::from(seconds_per_frame),
        }
    }

    /// Frame slot index of a wall-clock instant.
    fn frame_slot(&self, seconds: f64) -> i64 {
        (seconds / self.seconds_per_frame).floor() as i64
    }

    /// Number of slot boundaries crossed between two instants.
    pub fn frames_skipped(&self, started: f64, finished: f64) -> i64 {
        self.frame_slot(finished) - self.frame_slot(started)
    }

    /// Runs `f` and warns when it did not complete inside the frame slot it
    /// started in.
    pub fn checked<R>(&self, f: impl FnOnce() -> R) -> R {
        let started = now_seconds();
        let result = f();
        let skipped = self.frames_skipped(started, now_seconds());
        if skipped > 0 {
            warn!("game thread skipped {} frame(s)", skipped);
        }
        result
    }

    /// Time left until the next frame slot begins.
    pub fn time_to_next_frame(&self) -> Duration {
        let now = now_seconds();
        let remaining = self.seconds_per_frame - now.rem_euclid(self.seconds_per_frame);
        Duration::from_secs_f64(remaining.max(0.0))
    }

    /// Sleeps until the next frame slot begins.
    pub fn sleep_to_next_frame(&self) {
        std::thread::sleep(self.time_to_next_frame());
    }
}

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

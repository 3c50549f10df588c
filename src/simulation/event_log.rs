//! Bounded log of recent race events for display and summaries.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::player::Outcome;

/// A player leaving the race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Tick on which the event happened (1-based).
    pub tick: u64,
    /// Simulated time at the end of that tick.
    pub time: f32,
    /// Player that left the race.
    pub player_id: usize,
    /// Final score of the player.
    pub score: u32,
    /// Why the player left.
    pub outcome: Outcome,
}

impl LoggedEvent {
    /// Short human-readable description.
    pub fn description(&self) -> String {
        let verb = match self.outcome {
            Outcome::Finished => "finished",
            Outcome::Crashed => "crashed",
        };
        format!("player {:03} {} with score {}", self.player_id, verb, self.score)
    }
}

/// Event log that keeps the most recent events, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds a new event, dropping the oldest beyond capacity.
    pub fn log(&mut self, event: LoggedEvent) {
        self.events.push_front(event);

        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crash(tick: u64) -> LoggedEvent {
        LoggedEvent {
            tick,
            time: 0.0,
            player_id: 0,
            score: 7,
            outcome: Outcome::Crashed,
        }
    }

    #[test]
    fn keeps_newest_events() {
        let mut log = EventLog::new(2);
        for tick in 1..=3 {
            log.log(crash(tick));
        }
        let ticks: Vec<u64> = log.events().iter().map(|event| event.tick).collect();
        assert_eq!(ticks, [3, 2]);

        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn description_names_the_outcome() {
        assert_eq!(crash(1).description(), "player 000 crashed with score 7");
    }
}

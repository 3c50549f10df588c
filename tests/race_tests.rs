#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use image::{Rgb, RgbImage};
use train_race::simulation::params::RaceParams;
use train_race::simulation::player::{ArrowKeys, Outcome, Player};
use train_race::simulation::race::{Race, RaceStatus};
use train_race::simulation::roster::Roster;
use train_race::simulation::rules::RuleSet;
use train_race::simulation::track::Track;

const FULL_THROTTLE: ArrowKeys = ArrowKeys {
    up: true,
    down: false,
    left: false,
    right: false,
};

/// Straight corridor running up the screen.
///
/// Open cells are `x` in 5..=9 and `y` in 5..=34, surrounded by five pixels of
/// wall. The start is (7, 30); the finish is a full-width band on rows 19 and 20.
fn corridor_track() -> Track {
    let mut image = RgbImage::from_pixel(15, 40, Rgb([255, 0, 0]));
    for x in 5..=9 {
        for y in 5..=34 {
            image.put_pixel(x, y, Rgb([0, 0, 0]));
        }
        image.put_pixel(x, 19, Rgb([0, 0, 255]));
        image.put_pixel(x, 20, Rgb([0, 0, 255]));
    }
    image.put_pixel(7, 30, Rgb([0, 255, 0]));
    Track::from_image(&image, false).unwrap()
}

fn create_test_race(players: Vec<Player>) -> Race {
    Race::with_players(corridor_track(), RaceParams::default(), players)
}

#[test]
fn test_human_reaches_finish_on_full_throttle() {
    let mut race = create_test_race(vec![Player::human()]);

    // speed grows by 1/6 per tick: 11 ticks cover 11 pixels, reaching row 19
    for _ in 0..10 {
        race.step(FULL_THROTTLE);
        assert!(race.players[0].alive);
        assert!(race.players[0].score > 1);
    }
    race.step(FULL_THROTTLE);

    let player = &race.players[0];
    assert_eq!(race.tick(), 11);
    assert_eq!(player.score, 1);
    assert!(!player.alive);
    assert_eq!(player.outcome, Some(Outcome::Finished));
    assert_eq!(race.status(), RaceStatus::Finished);
    assert!(race.is_game_over());
}

#[test]
fn test_crash_into_side_wall() {
    let mut race = create_test_race(vec![Player::human()]);
    let keys = ArrowKeys {
        right: true,
        ..FULL_THROTTLE
    };

    race.run_with_keys(keys, 20);

    let player = &race.players[0];
    assert_eq!(player.outcome, Some(Outcome::Crashed));
    assert!(player.score > 1);
    assert!(race.tick() < 20);
    assert!(!race.is_running());
}

#[test]
fn test_dead_players_stay_frozen_without_stop_on_death() {
    let params = RaceParams {
        stop_on_death: false,
        ..RaceParams::default()
    };
    let mut race = Race::with_players(corridor_track(), params, vec![Player::human()]);
    while race.players[0].alive {
        race.step(FULL_THROTTLE);
    }
    let pos = race.players[0].pos;
    let score = race.players[0].score;
    let tick = race.tick();

    for _ in 0..5 {
        race.step(FULL_THROTTLE);
    }
    assert!(race.is_running());
    assert!(race.is_game_over());
    assert_eq!(race.tick(), tick + 5);
    assert_eq!(race.players[0].pos, pos);
    assert_eq!(race.players[0].score, score);
}

#[test]
fn test_time_budget_stops_race() {
    let params = RaceParams {
        time_budget: Some(0.5),
        ..RaceParams::default()
    };
    let mut race = Race::with_players(corridor_track(), params, vec![Player::human()]);
    race.run(|_| false);

    assert_eq!(race.tick(), 15);
    assert!((race.time() - 0.5).abs() < 1e-5);
    assert_eq!(race.status(), RaceStatus::Finished);
    // idle human never moved
    assert!(race.players[0].alive);
    assert_eq!(race.players[0].pos, race.track().start_position());
}

#[test]
fn test_run_checks_predicate_between_ticks() {
    let mut race = create_test_race(vec![Player::human()]);
    race.run(|race| race.tick() >= 5);
    assert_eq!(race.tick(), 5);
    assert!(!race.is_running());

    // finished races ignore further steps
    race.step(FULL_THROTTLE);
    assert_eq!(race.tick(), 5);
}

#[test]
fn test_players_join_on_start_with_ids() {
    let mut race = create_test_race(vec![Player::human(), Player::naive()]);
    race.add_player(Player::human());

    assert_eq!(race.players.len(), 3);
    for (i, player) in race.players.iter().enumerate() {
        assert_eq!(player.id, i);
        assert_eq!(player.pos, race.track().start_position());
        assert!(player.color.iter().all(|&channel| channel >= 100));
        assert!(player.alive);
    }
}

#[test]
fn test_colours_follow_the_seed() {
    let first = create_test_race(vec![Player::human(), Player::human()]);
    let second = create_test_race(vec![Player::human(), Player::human()]);
    let colours = |race: &Race| race.players.iter().map(|p| p.color).collect::<Vec<_>>();
    assert_eq!(colours(&first), colours(&second));
}

#[test]
fn test_remove_all_players() {
    let mut race = create_test_race(vec![Player::human(), Player::naive()]);
    race.remove_all_players(Vec::new());
    assert!(race.players.is_empty());
    assert!(race.is_game_over());
    assert!(race.best_player().is_none());
}

#[test]
fn test_ids_stay_unique_after_removal() {
    let mut race = create_test_race(vec![Player::human(), Player::human(), Player::human()]);
    let keep: Vec<Player> = race.players.drain(..).filter(|p| p.id != 1).collect();
    race.remove_all_players(keep);
    race.add_player(Player::naive());

    let ids: Vec<usize> = race.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, [0, 2, 3]);
    assert_eq!(race.scores().len(), 3);
    assert_eq!(race.player(3).map(|p| p.policy().name()), Some("Naive"));
    assert_eq!(race.player(2).map(|p| p.policy().name()), Some("Human"));

    // clearing everyone does not restart the numbering
    race.remove_all_players(Vec::new());
    race.add_player(Player::human());
    assert_eq!(race.players[0].id, 4);
}

#[test]
fn test_best_and_worst_player() {
    let mut race = create_test_race(vec![Player::human(), Player::human(), Player::human()]);
    race.players[0].score = 0;
    race.players[1].score = 5;
    race.players[2].score = 2;

    assert_eq!(race.best_player().map(|p| p.id), Some(2));
    assert_eq!(race.worst_player().map(|p| p.id), Some(0));
    assert_eq!(race.scores().get(&1), Some(&5));
    assert_eq!(race.player(2).map(|p| p.score), Some(2));
}

#[test]
fn test_events_and_summary() {
    let mut race = create_test_race(vec![Player::human(), Player::human()]);
    race.run_with_keys(FULL_THROTTLE, 30);

    let events = race.events().events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|event| event.outcome == Outcome::Finished));
    assert!(events.iter().all(|event| event.tick == 11));
    // newest first, players resolve in id order
    assert_eq!(events[0].player_id, 1);
    assert!(events[0].description().contains("finished"));

    let summary = race.summary();
    assert_eq!(summary.ticks, 11);
    assert_eq!(summary.status, RaceStatus::Finished);
    assert_eq!(summary.players.len(), 2);
    assert!(summary.players.iter().all(|p| p.policy == "Human" && p.score == 1));

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("Finished"));
}

#[test]
fn test_naive_player_senses_and_moves() {
    let mut race = create_test_race(vec![Player::naive()]);
    race.step(ArrowKeys::default());

    let player = &race.players[0];
    assert!(player.speed > 0.0);
    assert!(player.sensors.iter().all(|sensor| sensor.percept.is_some()));
}

#[test]
fn test_roster_builds_players_in_order() {
    let rules = RuleSet::from_rows(&[vec![0.1, 0.2, 0.3, 0.0], vec![0.3, 0.2, 0.1, 0.0]]).unwrap();
    let roster = Roster {
        humans: 1,
        naive: 1,
        rules: vec![rules],
        random_rules: 2,
    };
    let players = roster.build(7).unwrap();
    let names: Vec<_> = players.iter().map(|p| p.policy().name().to_owned()).collect();
    assert_eq!(names, ["Human", "Naive", "Rules", "Rules", "Rules"]);

    let race = create_test_race(players);
    assert_eq!(race.players.len(), roster.len());
}

trait RunWithKeys {
    fn run_with_keys(&mut self, keys: ArrowKeys, max_ticks: u64);
}

impl RunWithKeys for Race {
    fn run_with_keys(&mut self, keys: ArrowKeys, max_ticks: u64) {
        while self.is_running() && self.tick() < max_ticks {
            self.step(keys);
        }
    }
}

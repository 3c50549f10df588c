use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info};

use train_race::simulation::params::RaceParams;
use train_race::simulation::race::Race;
use train_race::simulation::roster::Roster;
use train_race::simulation::rules::RuleSet;
use train_race::simulation::timing::FramePacer;
use train_race::simulation::track::Track;

mod graphics;
mod input;

use graphics::{Backdrops, DisplaySettings, ScreenMapping};

#[derive(Parser, Debug)]
#[command(name = "train_race")]
#[command(about = "Race point-sized cars around an image track")]
struct Cli {
    /// Track image (red walls, blue finish, green start)
    track: PathBuf,
    /// Decorated image drawn behind the players instead of the raw track
    #[arg(long)]
    background: Option<PathBuf>,
    /// Race parameters as JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of keyboard-driven players
    #[arg(long, default_value_t = 1)]
    humans: usize,
    /// Number of naive wall-avoiding players
    #[arg(long, default_value_t = 0)]
    naive: usize,
    /// Rule files, one rule-based player each
    #[arg(long = "rules")]
    rules: Vec<PathBuf>,
    /// Number of rule-based players with random rule tables
    #[arg(long, default_value_t = 0)]
    random_rules: usize,
}

#[macroquad::main("Train Race")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Cli::parse()).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let params = match &cli.config {
        Some(path) => RaceParams::load_from_file(path)
            .with_context(|| format!("failed to load params: {}", path.display()))?,
        None => RaceParams::default(),
    };

    let image = image::open(&cli.track)
        .with_context(|| format!("failed to open track: {}", cli.track.display()))?
        .to_rgb8();
    let track = Track::from_image(&image, params.flip_vertical)
        .with_context(|| format!("failed to parse track: {}", cli.track.display()))?;
    let decorated = cli
        .background
        .as_ref()
        .map(|path| {
            image::open(path)
                .map(|image| image.to_rgb8())
                .with_context(|| format!("failed to open background: {}", path.display()))
        })
        .transpose()?;

    let roster = Roster {
        humans: cli.humans,
        naive: cli.naive,
        rules: cli
            .rules
            .iter()
            .map(|path| {
                RuleSet::load_from_file(path)
                    .with_context(|| format!("failed to load rules: {}", path.display()))
            })
            .collect::<Result<_>>()?,
        random_rules: cli.random_rules,
    };
    if roster.is_empty() {
        bail!("no players: pass --humans, --naive, --rules or --random-rules");
    }

    let mapping = ScreenMapping::new(&track, params.scale, params.flip_vertical);
    let (window_width, window_height) = mapping.window_size(&track);
    request_new_screen_size(window_width, window_height);

    let backdrops = Backdrops::new(&image, decorated.as_ref(), &track, params.flip_vertical);
    let pacer = FramePacer::new(params.seconds_per_frame);
    let players = roster.build(params.seed)?;
    let mut race = Race::with_players(track, params, players);
    let mut settings = DisplaySettings::default();

    info!(players = race.players.len(), "race started");

    while race.is_running() {
        if input::quit_requested() {
            race.stop();
            break;
        }
        input::handle_display_keys(&mut settings);

        let keys = input::arrow_keys();
        pacer.checked(|| race.step(keys));

        graphics::draw_race(&race, &backdrops, &mapping, &settings);
        if settings.fps_limiter {
            pacer.sleep_to_next_frame();
        }
        next_frame().await;
    }

    for (id, score) in race.scores() {
        info!(player = id, score, "final score");
    }
    if let Some(best) = race.best_player() {
        info!(player = best.id, score = best.score, time = race.time(), "best player");
    }

    Ok(())
}

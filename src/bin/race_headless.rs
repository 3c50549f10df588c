use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use train_race::simulation::params::RaceParams;
use train_race::simulation::race::{Race, RaceSummary};
use train_race::simulation::roster::Roster;
use train_race::simulation::rules::RuleSet;
use train_race::simulation::track::Track;

#[derive(Parser, Debug)]
#[command(name = "race_headless")]
#[command(about = "Run races without a window and write the results as JSON")]
struct Cli {
    /// Track images to race on; each track runs as its own race
    #[arg(long = "track", required = true)]
    tracks: Vec<PathBuf>,
    /// Race parameters as JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of naive wall-avoiding players
    #[arg(long, default_value_t = 0)]
    naive: usize,
    /// Rule files, one rule-based player each
    #[arg(long = "rules")]
    rules: Vec<PathBuf>,
    /// Number of rule-based players with random rule tables
    #[arg(long, default_value_t = 0)]
    random_rules: usize,
    /// Stop every race after this many ticks
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,
    /// Output file (defaults to a timestamped file in the working directory)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TrackResult {
    track: PathBuf,
    summary: RaceSummary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.max_ticks == 0 {
        bail!("--max-ticks must be > 0");
    }

    let params = match &cli.config {
        Some(path) => RaceParams::load_from_file(path)
            .with_context(|| format!("failed to load params: {}", path.display()))?,
        None => RaceParams::default(),
    };

    let roster = Roster {
        humans: 0,
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
        bail!("no players: pass --naive, --rules or --random-rules");
    }

    let results = cli
        .tracks
        .par_iter()
        .map(|path| run_track(path, &params, &roster, cli.max_ticks))
        .collect::<Result<Vec<_>>>()?;

    let output = cli.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "race-{}.json",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        ))
    });
    let json = serde_json::to_string_pretty(&results)?;
    fs::write(&output, json)
        .with_context(|| format!("failed to write results: {}", output.display()))?;
    info!(output = %output.display(), races = results.len(), "results written");

    Ok(())
}

fn run_track(
    path: &Path,
    params: &RaceParams,
    roster: &Roster,
    max_ticks: u64,
) -> Result<TrackResult> {
    let track = Track::load(path, params.flip_vertical)
        .with_context(|| format!("failed to load track: {}", path.display()))?;
    let players = roster.build(params.seed)?;

    let mut race = Race::with_players(track, params.clone(), players);
    race.run(|race| race.tick() >= max_ticks);

    let summary = race.summary();
    let best = race.best_player().map(|player| (player.id, player.score));
    info!(
        track = %path.display(),
        ticks = summary.ticks,
        ?best,
        "race finished"
    );

    Ok(TrackResult {
        track: path.to_path_buf(),
        summary,
    })
}

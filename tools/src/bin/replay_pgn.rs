//! Replays every game of the given PGN files and reports the games that
//! contain illegal or ambiguous moves. Files are parsed and replayed in
//! parallel.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use rankfile::notation::pgn;
use rayon::prelude::*;

/// Validates PGN files against the rules of chess.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PGN files to replay.
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Print every failed game, not only the summary.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Default)]
struct Summary {
    games: usize,
    plies: usize,
    failures: Vec<String>,
}

impl Summary {
    fn merge(mut self, other: Self) -> Self {
        self.games += other.games;
        self.plies += other.plies;
        self.failures.extend(other.failures);
        self
    }
}

fn replay_file(path: &Path) -> anyhow::Result<Summary> {
    let input =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let games = pgn::parse_games(&input).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("{}: {} games", path.display(), games.len());
    Ok(games
        .par_iter()
        .enumerate()
        .map(|(index, game)| {
            let mut summary = Summary {
                games: 1,
                ..Summary::default()
            };
            match game.replay() {
                Ok(positions) => summary.plies = positions.len() - 1,
                Err(e) => summary
                    .failures
                    .push(format!("{} game {}: {e:#}", path.display(), index + 1)),
            }
            summary
        })
        .reduce(Summary::default, Summary::merge))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let summary = args
        .files
        .par_iter()
        .map(|path| replay_file(path))
        .try_reduce(Summary::default, |a, b| Ok(a.merge(b)))?;
    if args.verbose {
        for failure in &summary.failures {
            println!("{failure}");
        }
    }
    println!(
        "Replayed {} games ({} plies), {} failed",
        summary.games,
        summary.plies,
        summary.failures.len()
    );
    if !summary.failures.is_empty() {
        bail!("{} games could not be replayed", summary.failures.len());
    }
    Ok(())
}

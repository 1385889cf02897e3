//! Command-line front end: UCI loop, terminal play, perft and PGN replay.

use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rankfile::chess::game::Game;
use rankfile::chess::movegen;
use rankfile::chess::position::Position;
use rankfile::notation::pgn;
use rankfile::notation::san::San;

/// Chess rules engine speaking UCI. Without a subcommand it starts the UCI
/// loop on stdin/stdout.
#[derive(Parser, Debug)]
#[command(author, version = rankfile::build::CLAP_LONG_VERSION, about, long_about = None)]
struct Config {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Communicate with a GUI or a tournament runner over UCI.
    Uci,
    /// Play a game in the terminal, one SAN or UCI move per line.
    Play {
        /// Starting position.
        #[arg(long)]
        fen: Option<String>,
    },
    /// Count the leaf nodes of the legal move tree.
    Perft {
        #[arg(long)]
        depth: u8,
        #[arg(long)]
        fen: Option<String>,
        /// Print the node count of each root move.
        #[arg(long)]
        divide: bool,
    },
    /// Replay every game of a PGN file ("-" reads stdin) and report the ones
    /// with illegal moves.
    Pgn { file: PathBuf },
}

fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();
}

fn parse_position(fen: Option<&str>) -> anyhow::Result<Position> {
    fen.map_or_else(|| Ok(Position::starting()), Position::try_from)
}

fn run_uci() -> anyhow::Result<()> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut engine = rankfile::Engine::new(&mut input, &mut output);
    engine.uci_loop()
}

fn run_play(fen: Option<&str>) -> anyhow::Result<()> {
    let mut game = Game::from_position(parse_position(fen)?);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{:?}", game.position())?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        match input {
            "" => continue,
            "quit" => break,
            "d" => {
                writeln!(stdout, "{:?}", game.position())?;
                continue;
            },
            "moves" => {
                let moves: Vec<String> = game
                    .analysis()
                    .moves()
                    .iter()
                    .map(|m| San::from_move(game.position(), m).to_string())
                    .collect();
                writeln!(stdout, "{}", moves.join(" "))?;
                continue;
            },
            _ => {},
        }
        let before = game.position().clone();
        // UCI moves are accepted too, errors are reported for SAN.
        let played = game.play_san(input).or_else(|san_error| {
            game.play_uci(input).map_err(|_| san_error)
        });
        match played {
            Ok(action) => {
                writeln!(stdout, "{}", San::from_move(&before, &action))?;
                writeln!(stdout, "{}", game.position())?;
            },
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
        if let Some(outcome) = game.outcome() {
            writeln!(stdout, "game over: {outcome:?}")?;
            break;
        }
    }
    Ok(())
}

fn run_perft(depth: u8, fen: Option<&str>, divide: bool) -> anyhow::Result<()> {
    let position = parse_position(fen)?;
    let mut stdout = io::stdout().lock();
    let nodes = if divide {
        let mut total = 0;
        for (root, nodes) in movegen::divide(&position, depth) {
            writeln!(stdout, "{root}: {nodes}")?;
            total += nodes;
        }
        writeln!(stdout)?;
        total
    } else {
        movegen::perft(&position, depth)
    };
    writeln!(stdout, "Nodes searched: {nodes}")?;
    Ok(())
}

fn run_pgn(file: &Path) -> anyhow::Result<()> {
    let input = if file.as_os_str() == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        input
    } else {
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };
    let games = pgn::parse_games(&input)?;
    let mut stdout = io::stdout().lock();
    let mut failed = 0;
    for (index, game) in games.iter().enumerate() {
        let name = format!(
            "game {} ({} - {})",
            index + 1,
            game.tag("White").unwrap_or("?"),
            game.tag("Black").unwrap_or("?")
        );
        match game.replay() {
            Ok(positions) => {
                if let Some(last) = positions.last() {
                    writeln!(stdout, "{name}: {last}")?;
                }
            },
            Err(e) => {
                failed += 1;
                writeln!(stdout, "{name}: error: {e:#}")?;
            },
        }
    }
    writeln!(stdout, "{} games, {failed} failed", games.len())?;
    if failed > 0 {
        anyhow::bail!("{failed} of {} games could not be replayed", games.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.debug);
    log::debug!("rankfile {}", rankfile::version());
    match config.mode.unwrap_or(Mode::Uci) {
        Mode::Uci => run_uci(),
        Mode::Play { fen } => run_play(fen.as_deref()),
        Mode::Perft { depth, fen, divide } => run_perft(depth, fen.as_deref(), divide),
        Mode::Pgn { file } => run_pgn(&file),
    }
}

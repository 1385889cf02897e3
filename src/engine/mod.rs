//! The engine implements the [Universal Chess Interface] (UCI) for
//! communication with the client (e.g. a tournament runner or a GUI). It
//! does not search: `go` answers with a random legal move, which is enough to
//! play through a match and exercise the rules of the game.
//!
//! [`Engine::uci_loop`] is the "main loop" of the engine which communicates
//! with the environment and executes commands from the input stream.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI
use std::io::{BufRead, Write};

use anyhow::Context;
use rand::seq::SliceRandom;

use crate::chess::core::Move;
use crate::chess::movegen;
use crate::chess::position::Position;
use crate::engine::uci::{Command, GoParams};

mod uci;

/// The Engine handles commands sent by the UCI server, including I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    position: Position,
    debug: bool,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with starting position and provided
    /// I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            position: Position::starting(),
            debug: false,
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes sent UCI commands until
    /// "quit" is sent or the input is closed.
    ///
    /// Malformed commands, incorrect positions and illegal moves are reported
    /// through `info string` and otherwise ignored: the engine keeps its
    /// previous state.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails.
    pub fn uci_loop(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("reading UCI input")?;
            if read == 0 {
                break;
            }
            log::debug!("received: {}", line.trim_end());
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.output, "info string {e:#}")?;
                    continue;
                },
            };
            match command {
                Command::Uci => self.handle_uci()?,
                Command::Debug { on } => self.debug = on,
                Command::IsReady => self.handle_isready()?,
                Command::SetOption { name, value } => self.handle_setoption(&name, value)?,
                Command::SetPosition { fen, moves } => self.handle_position(fen, &moves)?,
                Command::NewGame => self.position = Position::starting(),
                Command::Go(params) => self.handle_go(&params)?,
                // There is no search running in the background.
                Command::Stop | Command::PonderHit => {},
                Command::Quit => break,
                Command::Display => write!(self.output, "{:?}", self.position)?,
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `uci` handshake command by identifying the engine.
    fn handle_uci(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "uciok")?;
        Ok(())
    }

    /// Syncs with the UCI server by responding with `readyok`.
    fn handle_isready(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "readyok")?;
        Ok(())
    }

    /// The engine does not have any options, so everything is acknowledged
    /// and ignored.
    fn handle_setoption(&mut self, name: &str, value: Option<String>) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "info string unsupported option {name} (value {})",
            value.as_deref().unwrap_or("<none>")
        )?;
        Ok(())
    }

    /// Changes the position to the one specified in the command. The position
    /// is only replaced if the setup and every move in the list are correct.
    fn handle_position(&mut self, fen: Option<String>, moves: &[String]) -> anyhow::Result<()> {
        match setup_position(fen.as_deref(), moves) {
            Ok(position) => {
                log::debug!("position set to {position}");
                self.position = position;
            },
            Err(e) => writeln!(self.output, "info string {e:#}")?,
        }
        Ok(())
    }

    /// Picks a random legal move (limited to `searchmoves` when given) or runs
    /// perft if requested.
    fn handle_go(&mut self, params: &GoParams) -> anyhow::Result<()> {
        if let Some(depth) = params.perft {
            return self.handle_perft(depth);
        }
        log::debug!("go {params:?}");
        let analysis = self.position.analyze();
        let candidates: Vec<&Move> = analysis
            .moves()
            .iter()
            .filter(|m| {
                params.searchmoves.is_empty() || params.searchmoves.contains(&m.to_string())
            })
            .collect();
        if self.debug {
            writeln!(
                self.output,
                "info string choosing among {} moves",
                candidates.len()
            )?;
        }
        match candidates.choose(&mut rand::thread_rng()) {
            Some(best) => writeln!(self.output, "bestmove {best}")?,
            None => writeln!(self.output, "bestmove 0000")?,
        }
        Ok(())
    }

    fn handle_perft(&mut self, depth: u8) -> anyhow::Result<()> {
        let mut total = 0;
        for (root, nodes) in movegen::divide(&self.position, depth) {
            writeln!(self.output, "{root}: {nodes}")?;
            total += nodes;
        }
        writeln!(self.output)?;
        writeln!(self.output, "Nodes searched: {total}")?;
        Ok(())
    }
}

/// Parses the position and plays the moves given in UCI notation on top of
/// it.
fn setup_position(fen: Option<&str>, moves: &[String]) -> anyhow::Result<Position> {
    let mut position = match fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::starting(),
    };
    for uci in moves {
        let next = position
            .analyze()
            .find_uci(uci)
            .with_context(|| format!("illegal move {uci} in position {position}"))?;
        position = position.make_move(&next);
    }
    Ok(position)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn run(input: &str) -> String {
        let mut input = input.as_bytes();
        let mut output = Vec::new();
        Engine::new(&mut input, &mut output).uci_loop().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn handshake() {
        let output = run("uci\nisready\n");
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("id name rankfile "));
        assert!(lines[1].starts_with("id author "));
        assert_eq!(&lines[2..], &["uciok", "readyok"]);
    }

    #[test]
    fn stops_at_quit() {
        assert_eq!(run("quit\nisready\n"), "");
    }

    #[test]
    fn go_plays_legal_move() {
        let output = run("position startpos moves e2e4 e7e5\ngo wtime 1000 btime 1000\n");
        let best = output.trim().strip_prefix("bestmove ").unwrap();
        let position = setup_position(None, &["e2e4".to_string(), "e7e5".to_string()]).unwrap();
        assert!(position.analyze().find_uci(best).is_some(), "{best}");
    }

    #[test]
    fn go_respects_searchmoves() {
        assert_eq!(run("go searchmoves g1f3\n"), "bestmove g1f3\n");
    }

    #[test]
    fn go_without_moves() {
        assert_eq!(
            run("position fen rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3\ngo\n"),
            "bestmove 0000\n"
        );
    }

    #[test]
    fn illegal_moves_keep_position() {
        let output = run("position startpos moves e2e4\nposition startpos moves e2e4 e2e4\nd\n");
        assert!(output.starts_with("info string illegal move e2e4"), "{output}");
        assert!(output.contains(
            "FEN: rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        ));
    }

    #[test]
    fn malformed_commands() {
        let output = run("hello\nposition fen 8/8/8/8 w - -\nisready\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "info string unknown command: hello");
        assert!(lines[1].starts_with("info string FEN consists of 6 fields"));
        assert_eq!(lines[2], "readyok");
    }

    #[test]
    fn perft() {
        let output = run("position startpos\ngo perft 2\n");
        assert_eq!(output.lines().filter(|line| line.contains(": ")).count(), 21);
        assert!(output.contains("e2e4: 20"));
        assert!(output.ends_with("Nodes searched: 400\n"));
    }

    #[test]
    fn new_game_resets_position() {
        let output = run("position startpos moves d2d4\nucinewgame\nd\n");
        assert!(output.contains(
            "FEN: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        ));
    }
}

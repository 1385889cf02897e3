//! A game in progress: the current [`Position`], the analysis of it and the
//! moves played so far.
//!
//! Every move is checked against the legal moves before the position is
//! replaced, so a rejected move never changes the state of the game.

use anyhow::{bail, Context};

use crate::chess::core::{Move, Player};
use crate::chess::movegen::Analysis;
use crate::chess::position::Position;
use crate::notation::san::San;

/// Halfmove clock value at which the fifty-move rule ends the game.
pub const FIFTY_MOVE_RULE_PLIES: u16 = 100;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[allow(missing_docs)]
    Checkmate { winner: Player },
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// No captures or pawn moves in the last fifty moves of each player.
    FiftyMoveRule,
}

/// Position with its cached [`Analysis`] and the history of moves.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    analysis: Analysis,
    history: Vec<Move>,
}

impl Game {
    /// Starts a game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn from_position(position: Position) -> Self {
        let analysis = position.analyze();
        Self {
            position,
            analysis,
            history: Vec::new(),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    /// Moves played since the game was created.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Returns [`None`] while the game is still going.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if self.analysis.is_checkmate() {
            return Some(Outcome::Checkmate {
                winner: self.position.side_to_move().opponent(),
            });
        }
        if self.analysis.is_stalemate() {
            return Some(Outcome::Stalemate);
        }
        if self.position.halfmove_clock() >= FIFTY_MOVE_RULE_PLIES {
            return Some(Outcome::FiftyMoveRule);
        }
        None
    }

    /// Resolves the SAN move against the legal moves and plays it.
    ///
    /// # Errors
    ///
    /// Returns an error if the move is malformed, illegal or ambiguous or the
    /// game is over.
    pub fn play_san(&mut self, san: &str) -> anyhow::Result<Move> {
        let action = San::try_from(san)
            .and_then(|parsed| parsed.resolve(&self.analysis))
            .inspect_err(|e| log::debug!("rejected {san}: {e:#}"))?;
        self.play(&action)?;
        Ok(action)
    }

    /// Plays a move given in UCI format (e.g. "e2e4", "e7e8q").
    ///
    /// # Errors
    ///
    /// Returns an error if the move is not legal or the game is over.
    pub fn play_uci(&mut self, uci: &str) -> anyhow::Result<Move> {
        let action = self
            .analysis
            .find_uci(uci)
            .with_context(|| format!("illegal move {uci}"))
            .inspect_err(|e| log::debug!("rejected {uci}: {e:#}"))?;
        self.play(&action)?;
        Ok(action)
    }

    /// Plays a legal move.
    ///
    /// # Errors
    ///
    /// Returns an error if the move is not among the legal moves or the game
    /// is over.
    pub fn play(&mut self, action: &Move) -> anyhow::Result<()> {
        if let Some(outcome) = self.outcome() {
            bail!("the game is over: {outcome:?}");
        }
        if !self.analysis.moves().contains(action) {
            bail!("illegal move {action}");
        }
        self.position = self.position.make_move(action);
        self.analysis = self.position.analyze();
        self.history.push(*action);
        log::debug!("played {action}, position: {}", self.position);
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

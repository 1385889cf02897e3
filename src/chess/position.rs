//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! A [`Position`] is never mutated in place: applying a move produces a new
//! value and the caller decides whether to replace the current game state with
//! it.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::chess::board::Board;
use crate::chess::core::{
    CastlingRights,
    CastlingSide,
    File,
    Move,
    MoveFlags,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::chess::movegen::{self, Analysis};

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD format accepted here does not support
/// [Operations]: the EPD support exists for compatibility with databases which
/// provide trimmed FEN lines (all FEN parts except Halfmove Clock and Fullmove
/// Counter).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastlingRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u16,
    fullmove_number: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use rankfile::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastlingRights::ALL,
            ..Self::empty()
        }
    }

    /// Creates an empty board to be filled by parser.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastlingRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_number: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// Wraps an arbitrary board without validating it. Mostly useful for
    /// looking at how pieces move on an otherwise empty board.
    #[must_use]
    pub const fn from_board(board: Board, side_to_move: Player) -> Self {
        Self {
            board,
            side_to_move,
            ..Self::empty()
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// The square "behind" a pawn which has just advanced by two squares.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_number.get()
    }

    /// Parses board from Forsyth-Edwards Notation and checks its correctness.
    /// The parser will accept trimmed full FEN and trimmed FEN (4 first parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    /// Technically, that is not a full FEN position, but it is supported
    /// because EPD-style position strings are common in public position books
    /// and datasets where halfmove clock and fullmove counters do not matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a correct FEN or the resulting
    /// position can not occur in a game: each player must have exactly one
    /// king, pawns can not stand on the backranks, the en passant square must
    /// be right behind a pawn that has just been pushed and the player who has
    /// just moved can not be left in check.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        result.board = parse_placement(pieces_placement)?;
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        match parts.next() {
            Some(value) => {
                result.halfmove_clock = parse_counter(value)
                    .with_context(|| format!("incorrect FEN: halfmove clock {value}"))?;
                result.fullmove_number = match parts.next() {
                    Some(value) => NonZeroU16::new(parse_counter(value)?)
                        .context("incorrect FEN: fullmove counter should be positive")?,
                    None => bail!("incorrect FEN: missing fullmove counter"),
                };
                if parts.next().is_some() {
                    bail!("trailing symbols are not allowed in FEN");
                }
            },
            // This is a correct EPD: halfmove clock and fullmove counter keep
            // their defaults.
            None => (),
        }
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let kings = self.board.count(Piece::new(player, PieceKind::King));
            if kings != 1 {
                bail!("expected exactly one {player:?} king, got {kings}");
            }
            let pawn = Some(Piece::new(player, PieceKind::Pawn));
            if File::iter()
                .cartesian_product([Rank::One, Rank::Eight])
                .any(|(file, rank)| self.board.get(Square::new(file, rank)) == pawn)
            {
                bail!("pawns can not be placed on backranks");
            }
        }
        if let Some(target) = self.en_passant_square {
            let pushed_by = self.side_to_move.opponent();
            let expected_rank = match pushed_by {
                Player::White => Rank::Three,
                Player::Black => Rank::Six,
            };
            let pawn_square = target.shift(pushed_by.push_direction());
            if target.rank() != expected_rank
                || self.board.has_piece(target)
                || pawn_square.and_then(|square| self.board.get(square))
                    != Some(Piece::new(pushed_by, PieceKind::Pawn))
            {
                bail!("en passant square {target} is not behind a pawn that has just moved");
            }
        }
        let attacks = movegen::attacked_squares(&self.board, self.side_to_move);
        if self
            .board
            .king(self.side_to_move.opponent())
            .is_some_and(|king| attacks.contains(king))
        {
            bail!("the side that is not to move can not be in check");
        }
        Ok(())
    }

    /// Computes the legal moves and the check/terminal status of the position.
    #[must_use]
    pub fn analyze(&self) -> Analysis {
        Analysis::new(self)
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king in check).
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        self.analyze().moves().to_vec()
    }

    /// Moves the piece standing on `from` to `to` and returns the resulting
    /// position. Capture, en passant, double push and castling flags are
    /// inferred from the board; a pawn reaching the last rank becomes a queen.
    ///
    /// This does not check whether the move is legal.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no piece on `from`.
    pub fn move_piece(&self, from: Square, to: Square) -> anyhow::Result<Self> {
        let Some(piece) = self.board.get(from) else {
            bail!("no piece on {from}");
        };
        let mut flags = MoveFlags::empty();
        if self.board.has_piece(to) {
            flags |= MoveFlags::CAPTURE;
        }
        let mut promotion = None;
        match piece.kind {
            PieceKind::Pawn => {
                if Some(to) == self.en_passant_square && from.file() != to.file() {
                    flags |= MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
                }
                if (to.rank() as i8 - from.rank() as i8).abs() == 2 {
                    flags |= MoveFlags::DOUBLE_PAWN_PUSH;
                }
                if to.rank() == Rank::promotion(piece.owner) {
                    promotion = Some(Promotion::Queen);
                }
            },
            PieceKind::King
                if from.file() == File::E
                    && from.rank() == Rank::backrank(piece.owner)
                    && to.rank() == from.rank()
                    && matches!(to.file(), File::C | File::G) =>
            {
                flags |= MoveFlags::CASTLE;
            },
            _ => (),
        }
        let mut action = Move::new(piece, from, to, flags);
        if let Some(promotion) = promotion {
            action = action.promoting(promotion);
        }
        Ok(self.make_move(&action))
    }

    /// Applies the move and returns the next position. The move is expected to
    /// come from the move generator: legality is not checked.
    #[must_use]
    pub fn make_move(&self, action: &Move) -> Self {
        match action.castling_side() {
            Some(CastlingSide::Short) => return self.castle_kingside(),
            Some(CastlingSide::Long) => return self.castle_queenside(),
            None => (),
        }
        let us = self.side_to_move;
        let mut next = self.clone();

        let moved = next.board.clear(action.from()).unwrap_or(action.piece());
        let mut captured = next.board.clear(action.to());
        if action.is_en_passant() {
            if let Some(victim) = action.to().shift(us.push_direction().opposite()) {
                captured = next.board.clear(victim);
            }
        }
        let placed = match action.promotion() {
            Some(promotion) => Piece::new(us, promotion.into()),
            None => moved,
        };
        next.board.set(action.to(), placed);

        next.halfmove_clock = if moved.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        next.en_passant_square = if moved.kind == PieceKind::Pawn
            && (action.to().rank() as i8 - action.from().rank() as i8).abs() == 2
        {
            action.from().shift(us.push_direction())
        } else {
            None
        };
        if moved.kind == PieceKind::King {
            next.castling.remove(CastlingRights::both(us));
        }
        next.castling.remove(corner_rights(action.from()) | corner_rights(action.to()));
        next.pass_turn();
        next
    }

    /// Castles the side to move to the king side: king goes e→g, rook goes h→f.
    #[must_use]
    pub fn castle_kingside(&self) -> Self {
        self.castle(CastlingSide::Short)
    }

    /// Castles the side to move to the queen side: king goes e→c, rook goes
    /// a→d.
    #[must_use]
    pub fn castle_queenside(&self) -> Self {
        self.castle(CastlingSide::Long)
    }

    fn castle(&self, side: CastlingSide) -> Self {
        let us = self.side_to_move;
        let backrank = Rank::backrank(us);
        let mut next = self.clone();
        if let Some(king) = next.board.clear(Square::new(File::E, backrank)) {
            next.board.set(Square::new(side.king_destination(), backrank), king);
        }
        if let Some(rook) = next.board.clear(Square::new(side.rook_file(), backrank)) {
            next.board.set(Square::new(side.rook_destination(), backrank), rook);
        }
        next.castling.remove(CastlingRights::both(us));
        next.en_passant_square = None;
        next.halfmove_clock = self.halfmove_clock.saturating_add(1);
        next.pass_turn();
        next
    }

    fn pass_turn(&mut self) {
        if self.side_to_move == Player::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = self.side_to_move.opponent();
    }
}

/// Castling rights lost when a piece leaves or arrives at `square`: a rook
/// leaving its corner or being captured there.
fn corner_rights(square: Square) -> CastlingRights {
    match square {
        Square::A1 => CastlingRights::WHITE_LONG,
        Square::H1 => CastlingRights::WHITE_SHORT,
        Square::A8 => CastlingRights::BLACK_LONG,
        Square::H8 => CastlingRights::BLACK_SHORT,
        _ => CastlingRights::empty(),
    }
}

fn parse_placement(pieces_placement: &str) -> anyhow::Result<Board> {
    let mut board = Board::empty();
    let mut rank_id = BOARD_WIDTH;
    for rank_fen in pieces_placement.split('/') {
        if rank_id == 0 {
            bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
        }
        rank_id -= 1;
        let rank = Rank::try_from(rank_id)?;
        let mut file: u8 = 0;
        for symbol in rank_fen.chars() {
            if file >= BOARD_WIDTH {
                bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} files");
            }
            match symbol {
                '0' | '9' => bail!("incorrect FEN: increment should be within 1..=8, got {symbol}"),
                '1'..='8' => {
                    file += symbol as u8 - b'0';
                    continue;
                },
                _ => (),
            }
            let piece = Piece::try_from(symbol)?;
            board.set(Square::new(file.try_into()?, rank), piece);
            file += 1;
        }
        if file != BOARD_WIDTH {
            bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
        }
    }
    if rank_id != 0 {
        bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
    }
    Ok(board)
}

fn parse_counter(value: &str) -> anyhow::Result<u16> {
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("move counters can not contain anything other than digits, got '{value}'");
    }
    value
        .parse::<u16>()
        .with_context(|| format!("move counter is out of range: {value}"))
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and strips optional "fen " and "epd " prefixes before
    /// handing it to [`Position::from_fen`].
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped.trim_start());
            }
        }
        Self::from_fen(input)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_number)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_number)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {self}")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(fen: &str) -> Position {
        let position = Position::try_from(fen);
        assert!(position.is_ok(), "input: {fen}: {position:?}");
        let position = position.unwrap();
        assert_eq!(position.to_string(), fen);
        position
    }

    #[test]
    #[allow(unused_results)]
    fn correct_fen() {
        setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        setup("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
        setup("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
        setup("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
        setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
        setup("r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9");
        setup("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
        setup("rnbq1rk1/pp4pp/1b1ppn2/2p2p2/2PP4/1P2PN2/PB2BPPP/RN1Q1RK1 w - c6 0 9");
    }

    #[test]
    fn correct_epd() {
        let epd = "rnbqkb1r/pp2pppp/3p1n2/8/3NP3/2N5/PPP2PPP/R1BQKB1R b KQkq -";
        let position = Position::try_from(epd).unwrap();
        assert_eq!(position.to_string(), format!("{epd} 0 1"));
    }

    #[test]
    fn no_crash() {
        assert!(Position::try_from("3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1").is_err());
        assert!(
            Position::try_from("3kn3/R2p1N2/8/8/70000000000000000B/6K1/3R4/8 b - - 0 1").is_err()
        );
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - - 0 4/8 b").is_err());
        assert!(Position::try_from("\tfen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
        assert!(Position::try_from("fen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23").is_err());
        assert!(Position::try_from("3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - +8 1").is_err());
        assert!(Position::try_from("").is_err());
        assert!(Position::try_from("8/8/8/8/8/8/8/8").is_err());
    }

    #[test]
    fn clean_board_str() {
        // Prefix with "fen".
        assert!(Position::try_from(
            "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1"
        )
        .is_ok());
        // Prefix with "epd".
        assert!(Position::try_from(
            "epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -"
        )
        .is_ok());
        // Whitespace around the input.
        assert!(Position::try_from(
            "\n  rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\n"
        )
        .is_ok());
    }

    #[test]
    fn incorrect_positions() {
        // Missing black king.
        assert!(Position::try_from("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Two white kings.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").is_err());
        // Pawn on the backrank.
        assert!(Position::try_from("4k2P/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // En passant square without the pawn that has just been pushed.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 b - e3 0 1").is_err());
        // En passant square on the wrong rank.
        assert!(Position::try_from("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1").is_err());
        // Black is in check but it is White's turn.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").is_err());
        // Fullmove counter can not be zero.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 w - - 0 0").is_err());
        // Missing fullmove counter.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 w - - 0").is_err());
        // Side to move.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 x - - 0 1").is_err());
        // Castling rights.
        assert!(Position::try_from("4k3/8/8/8/8/8/8/4K3 w kK - 0 1").is_err());
    }

    #[test]
    fn pawn_double_push() {
        let position = Position::starting().move_piece(Square::E2, Square::E4).unwrap();
        assert_eq!(position.en_passant_square(), Some(Square::E3));
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.side_to_move(), Player::Black);
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(
            position.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        let position = position.move_piece(Square::G8, Square::F6).unwrap();
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 1);
        assert_eq!(position.fullmove_number(), 2);
    }

    #[test]
    fn move_from_empty_square() {
        assert!(Position::starting().move_piece(Square::E4, Square::E5).is_err());
    }

    #[test]
    fn en_passant_capture() {
        let position = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        let next = position.move_piece(Square::E5, Square::D6).unwrap();
        assert_eq!(next.to_string(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn promotion() {
        let position = setup("4k3/1P6/8/8/8/8/8/4K3 w - - 5 40");
        let next = position.move_piece(Square::B7, Square::B8).unwrap();
        assert_eq!(next.to_string(), "1Q2k3/8/8/8/8/8/8/4K3 b - - 0 40");
    }

    #[test]
    fn castling_application() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
        assert_eq!(
            position.castle_kingside().to_string(),
            "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10"
        );
        assert_eq!(
            position.castle_queenside().to_string(),
            "r3k2r/8/8/8/8/8/8/2KR3R b kq - 4 10"
        );
        // move_piece recognizes the castle by the king's displacement.
        assert_eq!(
            position.move_piece(Square::E1, Square::G1).unwrap(),
            position.castle_kingside()
        );
        let black = position.castle_kingside().castle_queenside();
        assert_eq!(black.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 11");
    }

    #[test]
    fn castling_rights_revocation() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        // Rook leaving its corner only revokes its side.
        let next = position.move_piece(Square::H1, Square::H5).unwrap();
        assert_eq!(next.castling(), CastlingRights::WHITE_LONG | CastlingRights::BLACK_BOTH);
        let next = next.move_piece(Square::A8, Square::A5).unwrap();
        assert_eq!(next.castling(), CastlingRights::WHITE_LONG | CastlingRights::BLACK_SHORT);
        // King move revokes both.
        let next = position.move_piece(Square::E1, Square::E2).unwrap();
        assert_eq!(next.castling(), CastlingRights::BLACK_BOTH);
        // Capturing a rook in its corner revokes the opponent's right.
        let next = position.move_piece(Square::A1, Square::A8).unwrap();
        assert_eq!(next.castling(), CastlingRights::WHITE_SHORT | CastlingRights::BLACK_SHORT);
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn moves_produce_new_values() {
        let position = Position::starting();
        let _ = position.move_piece(Square::G1, Square::F3).unwrap();
        assert_eq!(position, Position::starting());
    }
}

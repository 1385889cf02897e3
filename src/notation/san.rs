//! [Standard Algebraic Notation] (SAN): the conventional human-readable move
//! format used in PGN and by chess players.
//!
//! Parsing produces a [`San`] descriptor which does not depend on the
//! position. The descriptor is turned into a concrete [`Move`] by
//! [`San::resolve`], which looks for a unique match among the legal moves.
//!
//! [Standard Algebraic Notation]: https://en.wikipedia.org/wiki/Algebraic_notation_(chess)

use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::core::{CastlingSide, File, Move, PieceKind, Promotion, Rank, Square};
use crate::chess::movegen::{Analysis, Status};
use crate::chess::position::Position;

const EN_PASSANT_SUFFIX: &str = " e.p.";

/// What the move does on the board, without the check annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SanKind {
    /// "O-O" or "O-O-O".
    Castle(CastlingSide),
    /// Any other move.
    Piece {
        /// [`PieceKind::Pawn`] when the piece letter is omitted.
        piece: PieceKind,
        /// File disambiguator (always present for pawn captures).
        from_file: Option<File>,
        /// Rank disambiguator.
        from_rank: Option<Rank>,
        /// "x" between the origin and the destination.
        capture: bool,
        #[allow(missing_docs)]
        to: Square,
        /// "=Q", "=R", "=B" or "=N".
        promotion: Option<Promotion>,
        /// Trailing " e.p." annotation.
        en_passant: bool,
    },
}

/// Parsed SAN move.
///
/// ```
/// use rankfile::notation::san::San;
///
/// let san = San::try_from("Ba1xh8=Q+# e.p.").unwrap();
/// assert_eq!(san.to_string(), "Ba1xh8=Q+# e.p.");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct San {
    #[allow(missing_docs)]
    pub kind: SanKind,
    /// "+" suffix.
    pub check: bool,
    /// "#" (or "++") suffix.
    pub checkmate: bool,
}

impl San {
    /// Looks for the only legal move matching this descriptor: the moves are
    /// filtered by the destination, the piece kind, the disambiguators and the
    /// promotion. Capture and check annotations are not used for matching.
    ///
    /// # Errors
    ///
    /// Returns "illegal move" if no legal move matches and "ambiguous move" if
    /// more than one does.
    pub fn resolve(&self, analysis: &Analysis) -> anyhow::Result<Move> {
        let (piece, from_file, from_rank, to, promotion) = match self.kind {
            SanKind::Castle(side) => {
                if !analysis.can_castle(side) {
                    bail!(
                        "illegal move {self}: cannot castle {}",
                        match side {
                            CastlingSide::Short => "king side",
                            CastlingSide::Long => "queen side",
                        }
                    );
                }
                return analysis
                    .moves()
                    .iter()
                    .find(|m| m.castling_side() == Some(side))
                    .copied()
                    .with_context(|| format!("illegal move {self}"));
            },
            SanKind::Piece {
                piece,
                from_file,
                from_rank,
                to,
                promotion,
                ..
            } => (piece, from_file, from_rank, to, promotion),
        };
        let mut candidates = analysis
            .moves()
            .iter()
            .filter(|m| m.to() == to)
            .filter(|m| m.piece().kind == piece)
            .filter(|m| !m.is_castle())
            .filter(|m| from_file.map_or(true, |file| m.from().file() == file))
            .filter(|m| from_rank.map_or(true, |rank| m.from().rank() == rank))
            .filter(|m| m.promotion() == promotion);
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Ok(*only),
            (None, _) => bail!("illegal move {self}"),
            (Some(_), Some(_)) => bail!("ambiguous move {self}"),
        }
    }

    /// Produces the shortest SAN for a legal move in given position: the
    /// origin file is added if another piece of the same kind can reach the
    /// destination, the rank if the file is not enough and both if neither is.
    #[must_use]
    pub fn from_move(position: &Position, action: &Move) -> Self {
        let next = position.make_move(action).analyze();
        let check = next.status() == Status::Check;
        let checkmate = next.status() == Status::Checkmate;
        if let Some(side) = action.castling_side() {
            return Self {
                kind: SanKind::Castle(side),
                check,
                checkmate,
            };
        }
        let piece = action.piece().kind;
        let from = action.from();
        let (from_file, from_rank) = if piece == PieceKind::Pawn {
            (action.is_capture().then_some(from.file()), None)
        } else {
            let analysis = position.analyze();
            let rivals: Vec<Square> = analysis
                .moves()
                .iter()
                .filter(|m| m.piece().kind == piece && m.to() == action.to() && m.from() != from)
                .map(|m| m.from())
                .collect();
            if rivals.is_empty() {
                (None, None)
            } else if rivals.iter().all(|square| square.file() != from.file()) {
                (Some(from.file()), None)
            } else if rivals.iter().all(|square| square.rank() != from.rank()) {
                (None, Some(from.rank()))
            } else {
                (Some(from.file()), Some(from.rank()))
            }
        };
        Self {
            kind: SanKind::Piece {
                piece,
                from_file,
                from_rank,
                capture: action.is_capture(),
                to: action.to(),
                promotion: action.promotion(),
                en_passant: false,
            },
            check,
            checkmate,
        }
    }
}

fn piece_from_letter(letter: char) -> Option<PieceKind> {
    match letter {
        'K' => Some(PieceKind::King),
        'Q' => Some(PieceKind::Queen),
        'R' => Some(PieceKind::Rook),
        'B' => Some(PieceKind::Bishop),
        'N' => Some(PieceKind::Knight),
        _ => None,
    }
}

fn piece_letter(kind: PieceKind) -> char {
    kind.to_string().to_ascii_uppercase().chars().next().unwrap_or('?')
}

impl TryFrom<&str> for San {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        let original = input;
        let mut input = input.trim();
        let en_passant = match input.strip_suffix(EN_PASSANT_SUFFIX) {
            Some(stripped) => {
                input = stripped;
                true
            },
            None => false,
        };

        let mut pluses = 0;
        let mut hash = false;
        while let Some(last) = input.chars().last() {
            match last {
                '+' => pluses += 1,
                '#' => hash = true,
                _ => break,
            }
            input = &input[..input.len() - 1];
        }
        let checkmate = hash || pluses >= 2;
        let check = pluses == 1;

        if let Some(side) = match input {
            "O-O" | "0-0" => Some(CastlingSide::Short),
            "O-O-O" | "0-0-0" => Some(CastlingSide::Long),
            _ => None,
        } {
            if en_passant {
                bail!("castling can not be en passant: {original}");
            }
            return Ok(Self {
                kind: SanKind::Castle(side),
                check,
                checkmate,
            });
        }

        let mut chars: Vec<char> = input.chars().collect();
        let promotion = match chars.as_slice() {
            [.., '=', letter] => {
                let kind = piece_from_letter(*letter)
                    .with_context(|| format!("unknown promotion piece '{letter}' in {original}"))?;
                chars.truncate(chars.len() - 2);
                Some(Promotion::try_from(kind)?)
            },
            [.., '1'..='8', letter @ ('Q' | 'R' | 'B' | 'N')] => {
                let kind = piece_from_letter(*letter)
                    .with_context(|| format!("unknown promotion piece '{letter}' in {original}"))?;
                chars.truncate(chars.len() - 1);
                Some(Promotion::try_from(kind)?)
            },
            _ => None,
        };

        let piece = match chars.first().copied().and_then(piece_from_letter) {
            Some(kind) => {
                let _ = chars.remove(0);
                kind
            },
            None => PieceKind::Pawn,
        };
        if piece != PieceKind::Pawn && promotion.is_some() {
            bail!("only pawns can be promoted: {original}");
        }

        let Some((file, rank)) = chars.len().checked_sub(2).map(|at| (chars[at], chars[at + 1]))
        else {
            bail!("missing destination square in SAN: {original}");
        };
        let to = Square::new(
            File::try_from(file).with_context(|| format!("incorrect SAN: {original}"))?,
            Rank::try_from(rank).with_context(|| format!("incorrect SAN: {original}"))?,
        );
        chars.truncate(chars.len() - 2);

        let capture = chars.last() == Some(&'x');
        if capture {
            let _ = chars.pop();
        }

        let (from_file, from_rank) = match chars.as_slice() {
            [] => (None, None),
            [file @ 'a'..='h'] => (Some(File::try_from(*file)?), None),
            [rank @ '1'..='8'] => (None, Some(Rank::try_from(*rank)?)),
            [file @ 'a'..='h', rank @ '1'..='8'] => {
                (Some(File::try_from(*file)?), Some(Rank::try_from(*rank)?))
            },
            _ => bail!("incorrect SAN disambiguation in {original}"),
        };

        Ok(Self {
            kind: SanKind::Piece {
                piece,
                from_file,
                from_rank,
                capture,
                to,
                promotion,
                en_passant,
            },
            check,
            checkmate,
        })
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut en_passant_suffix = false;
        match self.kind {
            SanKind::Castle(side) => write!(f, "{side}")?,
            SanKind::Piece {
                piece,
                from_file,
                from_rank,
                capture,
                to,
                promotion,
                en_passant,
            } => {
                if piece != PieceKind::Pawn {
                    f.write_char(piece_letter(piece))?;
                }
                if let Some(file) = from_file {
                    write!(f, "{file}")?;
                }
                if let Some(rank) = from_rank {
                    write!(f, "{rank}")?;
                }
                if capture {
                    f.write_char('x')?;
                }
                write!(f, "{to}")?;
                if let Some(promotion) = promotion {
                    write!(f, "={}", piece_letter(promotion.into()))?;
                }
                en_passant_suffix = en_passant;
            },
        }
        if self.check {
            f.write_char('+')?;
        }
        if self.checkmate {
            f.write_char('#')?;
        }
        if en_passant_suffix {
            f.write_str(EN_PASSANT_SUFFIX)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn san(input: &str) -> San {
        San::try_from(input).unwrap()
    }

    #[test]
    fn round_trip() {
        for input in [
            "Ba1xh8=Q+# e.p.",
            "e4",
            "exd5",
            "exd6 e.p.",
            "Nbd7",
            "R1e2",
            "Qh4xe1#",
            "e8=N+",
            "O-O",
            "O-O-O+",
            "Kxf7",
        ] {
            assert_eq!(san(input).to_string(), input);
        }
    }

    #[test]
    fn fields() {
        assert_eq!(
            san("Ba1xh8=Q+# e.p."),
            San {
                kind: SanKind::Piece {
                    piece: PieceKind::Bishop,
                    from_file: Some(File::A),
                    from_rank: Some(Rank::One),
                    capture: true,
                    to: Square::H8,
                    promotion: Some(Promotion::Queen),
                    en_passant: true,
                },
                check: true,
                checkmate: true,
            }
        );
        assert_eq!(
            san("exd5"),
            San {
                kind: SanKind::Piece {
                    piece: PieceKind::Pawn,
                    from_file: Some(File::E),
                    from_rank: None,
                    capture: true,
                    to: Square::D5,
                    promotion: None,
                    en_passant: false,
                },
                check: false,
                checkmate: false,
            }
        );
    }

    #[test]
    fn alternative_spellings() {
        assert_eq!(san("0-0"), san("O-O"));
        assert_eq!(san("0-0-0"), san("O-O-O"));
        assert_eq!(san("Qxf7++"), san("Qxf7#"));
        assert_eq!(san("e8Q"), san("e8=Q"));
        assert_eq!(san("  Nf3 "), san("Nf3"));
    }

    #[test]
    fn malformed() {
        for input in [
            "", "x", "e", "e9", "i4", "Pe4", "Nf3=Q", "e8=K", "Nabc3", "O-O e.p.", "Zf3",
            "O-O-O-O", "+",
        ] {
            assert!(San::try_from(input).is_err(), "{input}");
        }
    }

    #[test]
    fn resolve() {
        let position = Position::starting();
        let analysis = position.analyze();
        assert_eq!(san("e4").resolve(&analysis).unwrap().to_string(), "e2e4");
        assert_eq!(san("Nf3").resolve(&analysis).unwrap().to_string(), "g1f3");
        assert!(san("e5")
            .resolve(&analysis)
            .unwrap_err()
            .to_string()
            .contains("illegal move"));
        assert!(san("O-O")
            .resolve(&analysis)
            .unwrap_err()
            .to_string()
            .contains("cannot castle king side"));
    }

    #[test]
    fn ambiguity() {
        let position = Position::try_from("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1").unwrap();
        let analysis = position.analyze();
        assert!(san("Rd1")
            .resolve(&analysis)
            .unwrap_err()
            .to_string()
            .contains("ambiguous move"));
        assert_eq!(san("Rad1").resolve(&analysis).unwrap().to_string(), "a1d1");
        assert_eq!(san("Rfd1").resolve(&analysis).unwrap().to_string(), "f1d1");
        assert_eq!(san("R1d1").resolve(&analysis).unwrap_err().to_string(), "ambiguous move R1d1");
    }

    #[test]
    fn promotion_is_required() {
        let position = Position::try_from("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let analysis = position.analyze();
        assert!(san("b8").resolve(&analysis).is_err());
        assert_eq!(san("b8=R").resolve(&analysis).unwrap().to_string(), "b7b8r");
    }

    #[test]
    fn from_move() {
        let position = Position::starting();
        let analysis = position.analyze();
        let knight = analysis.find_uci("g1f3").unwrap();
        assert_eq!(San::from_move(&position, &knight).to_string(), "Nf3");

        let position = Position::try_from("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1").unwrap();
        let rook = position.analyze().find_uci("a1d1").unwrap();
        assert_eq!(San::from_move(&position, &rook).to_string(), "Rad1");

        let position = Position::try_from("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
        let rook = position.analyze().find_uci("a1a3").unwrap();
        assert_eq!(San::from_move(&position, &rook).to_string(), "R1a3");

        let position = Position::try_from("r3k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let castle = position.analyze().find_uci("e1g1").unwrap();
        assert_eq!(San::from_move(&position, &castle).to_string(), "O-O");

        // Fool's mate.
        let position =
            Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
                .unwrap();
        let mate = position.analyze().find_uci("d8h4").unwrap();
        assert_eq!(San::from_move(&position, &mate).to_string(), "Qh4#");

        let position = Position::try_from("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let en_passant = position.analyze().find_uci("e5d6").unwrap();
        assert_eq!(San::from_move(&position, &en_passant).to_string(), "exd6");
    }
}

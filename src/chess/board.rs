//! Square-centric [`Board`] representation and the [`SquareSet`] used to
//! collect attacked squares.
//!
//! The board is a plain 64-entry mapping from [`Square`] to an optional
//! [`Piece`]: "which piece stands on e4?" is a single lookup and a copy of the
//! board is fully independent of the original.

use std::fmt::{self, Write};
use std::mem;
use std::ops::{BitOr, BitOrAssign};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

/// Piece placement of a chess position.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Board of the standard chess starting position.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.set(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                board.set(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    /// Returns the piece standing on `square`, if any.
    #[must_use]
    pub const fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Puts `piece` on `square`, replacing whatever was there.
    pub fn set(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Removes the piece from `square` and returns it.
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_piece(&self, square: Square) -> bool {
        self.squares[square as usize].is_some()
    }

    /// Iterates over all squares in the FEN order: from the eighth rank down to
    /// the first one, from the A file to the H file within each rank.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        Rank::iter()
            .rev()
            .cartesian_product(File::iter())
            .map(|(rank, file)| {
                let square = Square::new(file, rank);
                (square, self.get(square))
            })
    }

    /// Occupied squares only, in the same order as [`Board::iter`].
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter()
            .filter_map(|(square, piece)| piece.map(|piece| (square, piece)))
    }

    /// Location of the `player`'s king. Positions produced by the FEN parser
    /// and by move application always have exactly one king per player.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        let king = Piece::new(player, PieceKind::King);
        self.pieces()
            .find_map(|(square, piece)| (piece == king).then_some(square))
    }

    pub(super) fn count(&self, piece: Piece) -> usize {
        self.squares.iter().filter(|p| **p == Some(piece)).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0u8;
            for file in File::iter() {
                if let Some(piece) = self.get(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "d" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = Rank::iter().rev().map(|rank| {
            File::iter()
                .map(|file| {
                    self.get(Square::new(file, rank))
                        .map_or_else(|| ".".to_string(), |piece| piece.to_string())
                })
                .join(SQUARE_SEPARATOR)
        });
        f.write_str(&rows.collect::<Vec<_>>().join(LINE_SEPARATOR))
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

/// A set of squares packed into a [u64]: the least significant bit corresponds
/// to A1, the most significant one to H8. Used to accumulate the squares
/// attacked by one player.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SquareSet {
    bits: u64,
}

impl SquareSet {
    /// Set without any squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[allow(missing_docs)]
    pub fn insert(&mut self, square: Square) {
        self.bits |= 1u64 << square as u8;
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        self.bits & (1u64 << square as u8) != 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates over the squares from A1 to H8.
    pub fn iter(self) -> impl Iterator<Item = Square> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            // Consume the least significant one bit.
            let index = bits.trailing_zeros();
            bits ^= 1 << index;
            // trailing_zeros() of a non-zero u64 is always within 0..64.
            Some(unsafe { mem::transmute::<u8, Square>(index as u8) })
        })
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<T: IntoIterator<Item = Square>>(squares: T) -> Self {
        let mut result = Self::empty();
        for square in squares {
            result.insert(square);
        }
        result
    }
}

impl BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl fmt::Debug for SquareSet {
    /// Same layout as the [`Board`] dump: '1' for the squares in the set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = Rank::iter().rev().map(|rank| {
            File::iter()
                .map(|file| {
                    if self.contains(Square::new(file, rank)) {
                        '1'
                    } else {
                        '.'
                    }
                })
                .join(SQUARE_SEPARATOR)
        });
        f.write_str(&rows.collect::<Vec<_>>().join(LINE_SEPARATOR))
    }
}

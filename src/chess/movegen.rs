//! Legal [move generation] and position classification.
//!
//! Generation happens in two stages:
//!
//! 1. A single scan over the board produces the pseudo-legal candidates of the
//!    side to move (moves obeying the movement rules and board occupancy), the
//!    squares attacked by each player and the location of both kings.
//! 2. Every candidate is applied to produce a hypothetical position, which is
//!    scanned again: the candidate is kept only if the mover's king is not
//!    attacked there.
//!
//! The result is an immutable [`Analysis`] computed in one call.
//!
//! [move generation]: https://www.chessprogramming.org/Move_Generation

use crate::chess::board::{Board, SquareSet};
use crate::chess::core::{
    CastlingSide,
    Direction,
    File,
    Move,
    MoveFlags,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::position::Position;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DIRECTIONS: [Direction; 8] = [
    Direction::UpLeft,
    Direction::Up,
    Direction::UpRight,
    Direction::Right,
    Direction::Left,
    Direction::DownLeft,
    Direction::Down,
    Direction::DownRight,
];

/// Classification of a position from the perspective of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// At least one legal move and the king is safe.
    Normal,
    /// At least one legal move, the king is attacked.
    Check,
    /// No legal moves, the king is attacked.
    Checkmate,
    /// No legal moves, the king is safe.
    Stalemate,
}

/// Everything the move generator knows about a position: the legal moves of
/// the side to move, which kings are attacked and the terminal state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    moves: Vec<Move>,
    check: [bool; 2],
    can_castle: [bool; 2],
    status: Status,
}

impl Analysis {
    /// Generates the legal moves and classifies the position.
    #[must_use]
    pub fn new(position: &Position) -> Self {
        let us = position.side_to_move();
        let scan = Scan::new(position);
        let check = [Player::White, Player::Black]
            .map(|player| scan.is_attacked(player));
        let moves: Vec<Move> = scan
            .candidates
            .into_iter()
            .filter(|candidate| {
                let legal = is_legal(position, candidate);
                if !legal {
                    log::trace!("{candidate} leaves the {us:?} king in check");
                }
                legal
            })
            .collect();
        let can_castle = [CastlingSide::Short, CastlingSide::Long]
            .map(|side| moves.iter().any(|m| m.castling_side() == Some(side)));
        let status = match (moves.is_empty(), check[us.index()]) {
            (false, false) => Status::Normal,
            (false, true) => Status::Check,
            (true, true) => Status::Checkmate,
            (true, false) => Status::Stalemate,
        };
        Self {
            moves,
            check,
            can_castle,
            status,
        }
    }

    /// Legal moves of the side to move. Moves of the same piece are grouped
    /// together, castling moves come last.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns true if the king of `player` is attacked.
    #[must_use]
    pub const fn in_check(&self, player: Player) -> bool {
        self.check[player.index()]
    }

    /// Returns true if the side to move has a legal castle to `side`.
    #[must_use]
    pub const fn can_castle(&self, side: CastlingSide) -> bool {
        match side {
            CastlingSide::Short => self.can_castle[0],
            CastlingSide::Long => self.can_castle[1],
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.status == Status::Checkmate
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.status == Status::Stalemate
    }

    /// Finds the legal move given its UCI representation (e.g. "e2e4" or
    /// "e7e8q").
    #[must_use]
    pub fn find_uci(&self, uci: &str) -> Option<Move> {
        self.moves.iter().find(|m| m.to_string() == uci).copied()
    }
}

/// Checks whether `candidate` leaves the mover's king safe. Positions without
/// a king of the mover accept any move.
#[must_use]
pub fn is_legal(position: &Position, candidate: &Move) -> bool {
    let us = position.side_to_move();
    let next = position.make_move(candidate);
    let attacks = attacked_squares(next.board(), us.opponent());
    !next.board().king(us).is_some_and(|king| attacks.contains(king))
}

/// Pseudo-legal moves of the side to move: the moves obeying piece movement
/// rules and board occupancy that may still leave the king in check.
#[must_use]
pub fn pseudo_legal_moves(position: &Position) -> Vec<Move> {
    Scan::new(position).candidates
}

/// Squares attacked by `player`. Pawns attack both forward diagonals
/// regardless of what stands there, pawn pushes and castling attack nothing.
#[must_use]
pub fn attacked_squares(board: &Board, player: Player) -> SquareSet {
    let mut attacks = SquareSet::empty();
    for (square, piece) in board.pieces().filter(|(_, piece)| piece.owner == player) {
        generate(board, None, square, piece, &mut attacks, None);
    }
    attacks
}

/// Counts the leaf nodes of the legal move tree of given depth. This is the
/// standard way of validating a move generator against [known results].
///
/// [known results]: https://www.chessprogramming.org/Perft_Results
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let analysis = position.analyze();
    if depth == 1 {
        return analysis.moves().len() as u64;
    }
    analysis
        .moves()
        .iter()
        .map(|next| perft(&position.make_move(next), depth - 1))
        .sum()
}

/// [`perft`] split by the first move, useful for finding the exact move the
/// generator disagrees with a reference implementation on.
#[must_use]
pub fn divide(position: &Position, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    position
        .analyze()
        .moves()
        .iter()
        .map(|next| (*next, perft(&position.make_move(next), depth - 1)))
        .collect()
}

/// Result of a single pass over the board.
struct Scan {
    candidates: Vec<Move>,
    attacks: [SquareSet; 2],
    kings: [Option<Square>; 2],
}

impl Scan {
    fn new(position: &Position) -> Self {
        let board = position.board();
        let us = position.side_to_move();
        let mut candidates = Vec::new();
        let mut attacks = [SquareSet::empty(); 2];
        let mut kings = [None; 2];
        for (square, piece) in board.pieces() {
            if piece.kind == PieceKind::King {
                kings[piece.owner.index()] = Some(square);
            }
            let moves = (piece.owner == us).then_some(&mut candidates);
            generate(
                board,
                position.en_passant_square(),
                square,
                piece,
                &mut attacks[piece.owner.index()],
                moves,
            );
        }
        let mut scan = Self {
            candidates,
            attacks,
            kings,
        };
        scan.add_castles(position);
        scan
    }

    fn is_attacked(&self, player: Player) -> bool {
        self.kings[player.index()]
            .is_some_and(|king| self.attacks[player.opponent().index()].contains(king))
    }

    /// Castling requires the right, the king and the rook on their original
    /// squares, no pieces in between and no attacked squares on the king's
    /// path (including the start and the end).
    fn add_castles(&mut self, position: &Position) {
        let board = position.board();
        let us = position.side_to_move();
        let backrank = Rank::backrank(us);
        let king = Piece::new(us, PieceKind::King);
        let king_square = Square::new(File::E, backrank);
        if board.get(king_square) != Some(king) {
            return;
        }
        let opponent_attacks = self.attacks[us.opponent().index()];
        for side in [CastlingSide::Short, CastlingSide::Long] {
            if !position.castling().can_castle(us, side)
                || board.get(Square::new(side.rook_file(), backrank))
                    != Some(Piece::new(us, PieceKind::Rook))
            {
                continue;
            }
            let (between, path): (&[File], [File; 3]) = match side {
                CastlingSide::Short => (&[File::F, File::G], [File::E, File::F, File::G]),
                CastlingSide::Long => (&[File::B, File::C, File::D], [File::E, File::D, File::C]),
            };
            if between
                .iter()
                .any(|file| board.has_piece(Square::new(*file, backrank)))
            {
                continue;
            }
            if path
                .iter()
                .any(|file| opponent_attacks.contains(Square::new(*file, backrank)))
            {
                continue;
            }
            self.candidates.push(Move::new(
                king,
                king_square,
                Square::new(side.king_destination(), backrank),
                MoveFlags::CASTLE,
            ));
        }
    }
}

/// Collects the attacks of `piece` standing on `from` and, if `moves` is
/// given, its pseudo-legal moves (castling excluded).
fn generate(
    board: &Board,
    en_passant: Option<Square>,
    from: Square,
    piece: Piece,
    attacks: &mut SquareSet,
    moves: Option<&mut Vec<Move>>,
) {
    let mut sink = Sink {
        board,
        piece,
        from,
        attacks,
        moves,
    };
    match piece.kind {
        PieceKind::Queen => {
            sink.rays(&Direction::ORTHOGONAL);
            sink.rays(&Direction::DIAGONAL);
        },
        PieceKind::Rook => sink.rays(&Direction::ORTHOGONAL),
        PieceKind::Bishop => sink.rays(&Direction::DIAGONAL),
        PieceKind::Knight => {
            for (file_delta, rank_delta) in KNIGHT_OFFSETS {
                if let Some(to) = from.offset(file_delta, rank_delta) {
                    sink.step(to);
                }
            }
        },
        PieceKind::King => {
            for direction in KING_DIRECTIONS {
                if let Some(to) = from.shift(direction) {
                    sink.step(to);
                }
            }
        },
        PieceKind::Pawn => sink.pawn(en_passant),
    }
}

struct Sink<'a, 'b> {
    board: &'a Board,
    piece: Piece,
    from: Square,
    attacks: &'b mut SquareSet,
    moves: Option<&'b mut Vec<Move>>,
}

impl Sink<'_, '_> {
    fn push(&mut self, to: Square, flags: MoveFlags) {
        let Some(moves) = self.moves.as_deref_mut() else {
            return;
        };
        let action = Move::new(self.piece, self.from, to, flags);
        if self.piece.kind == PieceKind::Pawn && to.rank() == Rank::promotion(self.piece.owner) {
            moves.extend(Promotion::ALL.map(|promotion| action.promoting(promotion)));
        } else {
            moves.push(action);
        }
    }

    /// Single step of a knight or a king: anything but own pieces.
    fn step(&mut self, to: Square) {
        match self.board.get(to) {
            None => {
                self.attacks.insert(to);
                self.push(to, MoveFlags::empty());
            },
            Some(target) if target.owner != self.piece.owner => {
                self.attacks.insert(to);
                self.push(to, MoveFlags::CAPTURE);
            },
            Some(_) => (),
        }
    }

    /// Walks outward until the edge of the board or the first piece, which is
    /// included only if it belongs to the opponent.
    fn rays(&mut self, directions: &[Direction]) {
        for &direction in directions {
            let mut next = self.from.shift(direction);
            while let Some(to) = next {
                let occupied = self.board.has_piece(to);
                self.step(to);
                if occupied {
                    break;
                }
                next = to.shift(direction);
            }
        }
    }

    fn pawn(&mut self, en_passant: Option<Square>) {
        let owner = self.piece.owner;
        let (_, forward) = owner.push_direction().delta();
        for file_delta in [-1, 1] {
            let Some(to) = self.from.offset(file_delta, forward) else {
                continue;
            };
            self.attacks.insert(to);
            match self.board.get(to) {
                Some(target) if target.owner != owner => self.push(to, MoveFlags::CAPTURE),
                None if Some(to) == en_passant => {
                    self.push(to, MoveFlags::CAPTURE | MoveFlags::EN_PASSANT);
                },
                _ => (),
            }
        }
        let Some(single) = self.from.offset(0, forward) else {
            return;
        };
        if self.board.has_piece(single) {
            return;
        }
        self.push(single, MoveFlags::empty());
        if self.from.rank() != Rank::pawns_starting(owner) {
            return;
        }
        if let Some(double) = single.offset(0, forward) {
            if !self.board.has_piece(double) {
                self.push(double, MoveFlags::DOUBLE_PAWN_PUSH);
            }
        }
    }
}

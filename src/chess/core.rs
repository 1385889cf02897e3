//! Chess primitives commonly used within [`crate::chess`].
//!
//! Characters (`'e'`, `'4'`, `'N'`, `'w'`) only appear at the boundary: every
//! primitive is a small closed enumeration with explicit conversions from and
//! to its textual form.

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use rankfile::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// A square is always on the board: offset arithmetic that would leave the
/// board produces [`None`] instead of an invalid value.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Moves the square by given number of files (positive is towards the
    /// H file) and ranks (positive is towards the eighth rank). Returns
    /// [`None`] if the result would be outside of the board.
    ///
    /// ```
    /// use rankfile::chess::core::Square;
    ///
    /// assert_eq!(Square::D5.offset(1, 2), Some(Square::E7));
    /// assert_eq!(Square::H8.offset(1, 0), None);
    /// ```
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if !(0..BOARD_WIDTH as i8).contains(&file) || !(0..BOARD_WIDTH as i8).contains(&rank) {
            return None;
        }
        Some(Self::new(
            File::try_from(file as u8).ok()?,
            Rank::try_from(rank as u8).ok()?,
        ))
    }

    /// Returns the neighbouring square in given direction or [`None`] if the
    /// square is on the edge of the board.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            );
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// The rank king and rooks start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank pawns start on and can be pushed by two squares from.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The rank on which pawns of given player are promoted.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a pawn push: pawns of White go up the board, pawns of
    /// Black go down.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // White pieces are uppercase, black pieces are lowercase.
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// Castling is always either to the king side (short castle, O-O) or to the
/// queen side (long castle, O-O-O).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    /// King goes to [`File::G`], rook goes to [`File::F`].
    Short,
    /// King goes to [`File::C`], rook goes to [`File::D`].
    Long,
}

impl CastlingSide {
    /// File the rook starts on.
    #[must_use]
    pub const fn rook_file(self) -> File {
        match self {
            Self::Short => File::H,
            Self::Long => File::A,
        }
    }

    /// File the king ends up on.
    #[must_use]
    pub const fn king_destination(self) -> File {
        match self {
            Self::Short => File::G,
            Self::Long => File::C,
        }
    }

    /// File the rook ends up on.
    #[must_use]
    pub const fn rook_destination(self) -> File {
        match self {
            Self::Short => File::F,
            Self::Long => File::D,
        }
    }
}

impl fmt::Display for CastlingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Short => "O-O",
            Self::Long => "O-O-O",
        })
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves (or is captured) on its original square, player loses ability to
    /// castle its corresponding side.
    ///
    /// The full rules are:
    ///
    /// - The king and the castling rook must not have previously moved.
    /// - No square from the king's initial square to its final square may be
    ///   under attack by an enemy piece.
    /// - All the squares between the king and the castling rook must be
    ///   vacant.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastlingRights {
    /// Returns the flag corresponding to a single player and side.
    #[must_use]
    pub const fn single(player: Player, side: CastlingSide) -> Self {
        match (player, side) {
            (Player::White, CastlingSide::Short) => Self::WHITE_SHORT,
            (Player::White, CastlingSide::Long) => Self::WHITE_LONG,
            (Player::Black, CastlingSide::Short) => Self::BLACK_SHORT,
            (Player::Black, CastlingSide::Long) => Self::BLACK_LONG,
        }
    }

    /// Both flags of the player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }

    /// Checks whether `player` still holds the right to castle to `side`.
    #[must_use]
    pub const fn can_castle(self, player: Player, side: CastlingSide) -> bool {
        self.contains(Self::single(player, side))
    }
}

impl TryFrom<&str> for CastlingRights {
    type Error = anyhow::Error;

    /// Parses [`CastlingRights`] for both players from the FEN format. The
    /// field is either `-` or a non-empty subsequence of `KQkq` (in that
    /// order).
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] on unknown symbols, duplicates, wrong order
    /// or an empty field.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        const ORDER: [(char, CastlingRights); 4] = [
            ('K', CastlingRights::WHITE_SHORT),
            ('Q', CastlingRights::WHITE_LONG),
            ('k', CastlingRights::BLACK_SHORT),
            ('q', CastlingRights::BLACK_LONG),
        ];
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!("castling rights can not be empty, use '-' instead");
        }
        let mut result = Self::empty();
        let mut next = 0;
        for symbol in input.chars() {
            match ORDER[next..].iter().position(|(c, _)| *c == symbol) {
                Some(offset) => {
                    result |= ORDER[next + offset].1;
                    next += offset + 1;
                },
                None => bail!("unknown castle rights: {input}"),
            }
        }
        Ok(result)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// All promotion options in the order the move generator emits them.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<PieceKind> for Promotion {
    type Error = anyhow::Error;

    fn try_from(kind: PieceKind) -> anyhow::Result<Self> {
        match kind {
            PieceKind::Queen => Ok(Self::Queen),
            PieceKind::Rook => Ok(Self::Rook),
            PieceKind::Bishop => Ok(Self::Bishop),
            PieceKind::Knight => Ok(Self::Knight),
            PieceKind::King | PieceKind::Pawn => bail!("pawn can not be promoted to {kind:?}"),
        }
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::EnumIter)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// Rook rays.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];
    /// Bishop rays.
    pub const DIAGONAL: [Self; 4] = [Self::UpRight, Self::UpLeft, Self::DownRight, Self::DownLeft];

    /// (file, rank) deltas of a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::DownLeft => Self::UpRight,
            Self::Down => Self::Up,
            Self::DownRight => Self::UpLeft,
        }
    }
}

bitflags::bitflags! {
    /// More information about [`Move`] that makes it possible to make that
    /// move and dump it in human-readable format (e.g. Standard Algebraic
    /// Notation).
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (when it
    ///   advances two squares from its original position).
    /// - The [Castle] move involves a king and a rook "jumping" over each
    ///   other. Technically, castling is a king move, so `from` and `to` move
    ///   squares correspond to the king only.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveFlags: u8 {
        /// Moves that change the material balance.
        const CAPTURE = 0b0001;
        /// Pawn capture onto the en passant target square.
        const EN_PASSANT = 0b0010;
        /// King move by two squares along the backrank.
        const CASTLE = 0b0100;
        /// Pawn advancement by 2 squares from the original rank.
        const DOUBLE_PAWN_PUSH = 0b1000;
    }
}

/// Represents any kind of a legal chess move. A move is the only way to mutate
/// [`crate::chess::position::Position`] and change the board state. The
/// move representation has one-to-one correspondence with the UCI move
/// representation.
///
/// For a move to be serialized in Standard Algebraic Notation (SAN), it also
/// requires the [`crate::chess::position::Position`] it will be applied in,
/// because SAN requires additional flags (e.g. indicating "check"/"checkmate"
/// or moving piece disambiguation), see [`crate::notation::san::San`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
    flags: MoveFlags,
}

impl Move {
    pub(crate) const fn new(piece: Piece, from: Square, to: Square, flags: MoveFlags) -> Self {
        Self {
            piece,
            from,
            to,
            promotion: None,
            flags,
        }
    }

    pub(crate) const fn promoting(self, promotion: Promotion) -> Self {
        Self {
            promotion: Some(promotion),
            ..self
        }
    }

    /// The piece standing on the origin square.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_castle(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLE)
    }

    /// Side of the castle if this is a castling move.
    #[must_use]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        if !self.is_castle() {
            return None;
        }
        match self.to.file() {
            File::G => Some(CastlingSide::Short),
            File::C => Some(CastlingSide::Long),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}

//! [Portable Game Notation] (PGN) reader.
//!
//! The input is split into [`Token`]s first; the parser then groups them into
//! [`PgnGame`]s: tag pairs followed by the movetext, terminated by a result.
//! Comments, NAGs, move numbers and recursive variations are skipped, only the
//! SAN moves of the main line are kept.
//!
//! [Portable Game Notation]: https://www.chessprogramming.org/Portable_Game_Notation

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use anyhow::{bail, Context};

use crate::chess::core::Player;
use crate::chess::position::Position;
use crate::notation::san::San;

/// Lexical element of PGN input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    #[allow(missing_docs)]
    LeftBracket,
    #[allow(missing_docs)]
    RightBracket,
    #[allow(missing_docs)]
    LeftParen,
    #[allow(missing_docs)]
    RightParen,
    /// Reserved by the standard, "<" and ">".
    LeftAngle,
    #[allow(missing_docs)]
    RightAngle,
    #[allow(missing_docs)]
    Period,
    /// Result of an unfinished game.
    Asterisk,
    /// Sequence of digits, usually a move number.
    Integer(u32),
    /// Quoted string with `\"` and `\\` escapes resolved.
    String(String),
    /// Numeric Annotation Glyph: `$n`. Suffix annotations ("!", "?!", etc)
    /// are translated into their glyphs.
    Nag(u16),
    /// SAN move, result or tag name.
    Symbol(String),
}

/// [`Token`] and where it starts in the input (both 1-based).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned {
    #[allow(missing_docs)]
    pub token: Token,
    #[allow(missing_docs)]
    pub line: usize,
    #[allow(missing_docs)]
    pub column: usize,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next()?;
        if next == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(next)
    }

    fn skip_line(&mut self) {
        while let Some(next) = self.bump() {
            if next == '\n' {
                break;
            }
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(&next) = self.chars.peek() {
            if !predicate(next) {
                break;
            }
            result.push(next);
            let _ = self.bump();
        }
        result
    }

    fn next_token(&mut self) -> anyhow::Result<Option<Spanned>> {
        loop {
            let (line, column) = (self.line, self.column);
            let Some(&next) = self.chars.peek() else {
                return Ok(None);
            };
            let spanned = |token: Token| -> anyhow::Result<Option<Spanned>> {
                Ok(Some(Spanned {
                    token,
                    line,
                    column,
                }))
            };
            if next.is_whitespace() {
                let _ = self.bump();
                continue;
            }
            match next {
                // Escape mechanism: the whole line is ignored.
                '%' if column == 1 => self.skip_line(),
                ';' => self.skip_line(),
                '{' => {
                    let _ = self.bump();
                    loop {
                        match self.bump() {
                            Some('}') => break,
                            Some(_) => (),
                            None => bail!("[{line}:{column}] unterminated comment"),
                        }
                    }
                },
                '"' => {
                    let _ = self.bump();
                    let mut value = String::new();
                    loop {
                        match self.bump() {
                            Some('"') => break,
                            Some('\\') => match self.bump() {
                                Some(escaped @ ('"' | '\\')) => value.push(escaped),
                                Some(other) => {
                                    bail!("[{line}:{column}] unknown escape sequence \\{other}")
                                },
                                None => bail!("[{line}:{column}] unterminated string"),
                            },
                            Some('\n') | None => bail!("[{line}:{column}] unterminated string"),
                            Some(other) => value.push(other),
                        }
                    }
                    return spanned(Token::String(value));
                },
                '$' => {
                    let _ = self.bump();
                    let digits = self.take_while(|c| c.is_ascii_digit());
                    let nag = digits
                        .parse()
                        .with_context(|| format!("[{line}:{column}] incorrect NAG: ${digits}"))?;
                    return spanned(Token::Nag(nag));
                },
                '!' | '?' => {
                    let annotation = self.take_while(|c| c == '!' || c == '?');
                    let nag = match annotation.as_str() {
                        "!" => 1,
                        "?" => 2,
                        "!!" => 3,
                        "??" => 4,
                        "!?" => 5,
                        "?!" => 6,
                        _ => bail!("[{line}:{column}] unknown annotation {annotation}"),
                    };
                    return spanned(Token::Nag(nag));
                },
                c if is_symbol_start(c) => {
                    let symbol = self.take_while(is_symbol_continuation);
                    if symbol.bytes().all(|b| b.is_ascii_digit()) {
                        let number = symbol
                            .parse()
                            .with_context(|| format!("[{line}:{column}] integer is too large"))?;
                        return spanned(Token::Integer(number));
                    }
                    return spanned(Token::Symbol(symbol));
                },
                _ => {
                    let _ = self.bump();
                    let token = match next {
                        '[' => Token::LeftBracket,
                        ']' => Token::RightBracket,
                        '(' => Token::LeftParen,
                        ')' => Token::RightParen,
                        '<' => Token::LeftAngle,
                        '>' => Token::RightAngle,
                        '.' => Token::Period,
                        '*' => Token::Asterisk,
                        _ => bail!("[{line}:{column}] unexpected character '{next}'"),
                    };
                    return spanned(token);
                },
            }
        }
    }
}

const fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

const fn is_symbol_continuation(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '=' | ':' | '-' | '/')
}

/// Splits PGN input into tokens.
///
/// # Errors
///
/// Returns an error with the `[line:column]` location on unterminated strings
/// and comments or unexpected characters.
pub fn tokenize(input: &str) -> anyhow::Result<Vec<Spanned>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// How the game ended according to the movetext.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// "1-0"
    WhiteWins,
    /// "0-1"
    BlackWins,
    /// "1/2-1/2"
    Draw,
    /// "*": the game is still in progress or the result is unknown.
    Unknown,
}

impl GameResult {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "1-0" => Some(Self::WhiteWins),
            "0-1" => Some(Self::BlackWins),
            "1/2-1/2" => Some(Self::Draw),
            "*" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WhiteWins => "1-0",
            Self::BlackWins => "0-1",
            Self::Draw => "1/2-1/2",
            Self::Unknown => "*",
        })
    }
}

/// Single game from a PGN file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PgnGame {
    /// Tag pairs in the order they appear.
    pub tags: Vec<(String, String)>,
    /// Main line moves.
    pub moves: Vec<San>,
    /// [`None`] if the movetext was not terminated with a result.
    pub result: Option<GameResult>,
}

impl PgnGame {
    /// Value of the first tag with given name.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find_map(|(tag, value)| (tag == name).then_some(value.as_str()))
    }

    /// Position the game starts from: the "FEN" tag if present, the standard
    /// starting position otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the "FEN" tag is not a correct position.
    pub fn initial_position(&self) -> anyhow::Result<Position> {
        match self.tag("FEN") {
            Some(fen) => Position::try_from(fen).context("incorrect FEN tag"),
            None => Ok(Position::starting()),
        }
    }

    /// Plays all moves of the game and returns every position including the
    /// initial one.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first move that is illegal or ambiguous.
    pub fn replay(&self) -> anyhow::Result<Vec<Position>> {
        let mut current = self.initial_position()?;
        let mut positions = Vec::with_capacity(self.moves.len() + 1);
        for san in &self.moves {
            let action = san.resolve(&current.analyze()).with_context(|| {
                format!(
                    "move {}{} {san}",
                    current.fullmove_number(),
                    match current.side_to_move() {
                        Player::White => ".",
                        Player::Black => "...",
                    },
                )
            })?;
            let next = current.make_move(&action);
            positions.push(std::mem::replace(&mut current, next));
        }
        log::debug!("replayed {} moves, final position: {current}", self.moves.len());
        positions.push(current);
        Ok(positions)
    }
}

/// Parses all games from PGN input.
///
/// # Errors
///
/// Returns an error with the `[line:column]` location of the first malformed
/// token, tag pair or SAN move.
pub fn parse_games(input: &str) -> anyhow::Result<Vec<PgnGame>> {
    let tokens = tokenize(input)?;
    let mut tokens = tokens.into_iter().peekable();
    let mut games = Vec::new();
    while tokens.peek().is_some() {
        let game = parse_game(&mut tokens)?;
        if !game.tags.is_empty() || !game.moves.is_empty() || game.result.is_some() {
            games.push(game);
        }
    }
    Ok(games)
}

fn parse_game(
    tokens: &mut Peekable<impl Iterator<Item = Spanned>>,
) -> anyhow::Result<PgnGame> {
    let mut game = PgnGame::default();
    while let Some(Spanned {
        token: Token::LeftBracket,
        ..
    }) = tokens.peek()
    {
        let _ = tokens.next();
        game.tags.push(parse_tag(tokens)?);
    }
    while let Some(spanned) = tokens.peek() {
        // The next game starts without the result of the previous one.
        if spanned.token == Token::LeftBracket {
            break;
        }
        let Some(Spanned {
            token,
            line,
            column,
        }) = tokens.next()
        else {
            break;
        };
        match token {
            Token::Integer(_) | Token::Period | Token::Nag(_) => (),
            Token::Asterisk => {
                game.result = Some(GameResult::Unknown);
                break;
            },
            Token::Symbol(symbol) => {
                if let Some(result) = GameResult::from_symbol(&symbol) {
                    game.result = Some(result);
                    break;
                }
                let san = San::try_from(symbol.as_str())
                    .with_context(|| format!("[{line}:{column}] incorrect move {symbol}"))?;
                game.moves.push(san);
            },
            Token::LeftParen => skip_variation(tokens, line, column)?,
            other => bail!("[{line}:{column}] unexpected token in movetext: {other:?}"),
        }
    }
    Ok(game)
}

fn parse_tag(
    tokens: &mut Peekable<impl Iterator<Item = Spanned>>,
) -> anyhow::Result<(String, String)> {
    let name = match tokens.next() {
        Some(Spanned {
            token: Token::Symbol(name),
            ..
        }) => name,
        Some(Spanned {
            token,
            line,
            column,
        }) => bail!("[{line}:{column}] expected tag name, got {token:?}"),
        None => bail!("unexpected end of input: expected tag name"),
    };
    let value = match tokens.next() {
        Some(Spanned {
            token: Token::String(value),
            ..
        }) => value,
        Some(Spanned {
            token,
            line,
            column,
        }) => bail!("[{line}:{column}] expected tag value, got {token:?}"),
        None => bail!("unexpected end of input: expected tag value"),
    };
    match tokens.next() {
        Some(Spanned {
            token: Token::RightBracket,
            ..
        }) => Ok((name, value)),
        Some(Spanned {
            token,
            line,
            column,
        }) => bail!("[{line}:{column}] expected ']', got {token:?}"),
        None => bail!("unexpected end of input: expected ']'"),
    }
}

/// Skips a recursive annotation variation. The opening parenthesis is already
/// consumed.
fn skip_variation(
    tokens: &mut impl Iterator<Item = Spanned>,
    line: usize,
    column: usize,
) -> anyhow::Result<()> {
    let mut depth = 1usize;
    for spanned in tokens.by_ref() {
        match spanned.token {
            Token::LeftParen => depth += 1,
            Token::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            _ => (),
        }
    }
    bail!("[{line}:{column}] unterminated variation")
}

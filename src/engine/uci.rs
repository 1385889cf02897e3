//! Parser for the commands a UCI client sends to the engine.

use anyhow::{bail, Context};

/// Number of space-separated fields in a complete FEN.
const FEN_FIELDS: usize = 6;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Uci,
    Debug {
        on: bool,
    },
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    NewGame,
    Go(GoParams),
    Stop,
    PonderHit,
    Quit,
    /// Prints the current position. Not part of UCI, but most engines
    /// understand it.
    Display,
}

/// Search limits sent with `go`. Only `searchmoves` and `perft` affect the
/// reply, the time controls are parsed so that clients can send them.
#[allow(dead_code)]
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct GoParams {
    pub(super) searchmoves: Vec<String>,
    pub(super) ponder: bool,
    pub(super) wtime: Option<u64>,
    pub(super) btime: Option<u64>,
    pub(super) winc: Option<u64>,
    pub(super) binc: Option<u64>,
    pub(super) movestogo: Option<u32>,
    pub(super) depth: Option<u32>,
    pub(super) nodes: Option<u64>,
    pub(super) mate: Option<u32>,
    pub(super) movetime: Option<u64>,
    pub(super) infinite: bool,
    pub(super) perft: Option<u8>,
}

/// Keywords that end the `searchmoves` list.
const GO_KEYWORDS: [&str; 13] = [
    "searchmoves",
    "ponder",
    "wtime",
    "btime",
    "winc",
    "binc",
    "movestogo",
    "depth",
    "nodes",
    "mate",
    "movetime",
    "infinite",
    "perft",
];

fn value<T: std::str::FromStr>(
    parts: &mut std::slice::Iter<'_, &str>,
    keyword: &str,
) -> anyhow::Result<T> {
    let Some(raw) = parts.next() else {
        bail!("go {keyword} requires a value");
    };
    raw.parse()
        .ok()
        .with_context(|| format!("invalid {keyword} value: {raw}"))
}

fn parse_go(parts: &[&str]) -> anyhow::Result<Command> {
    let mut params = GoParams::default();
    let mut parts = parts.iter();
    while let Some(&keyword) = parts.next() {
        match keyword {
            "searchmoves" => {
                let rest = parts.as_slice();
                let count = rest
                    .iter()
                    .position(|part| GO_KEYWORDS.contains(part))
                    .unwrap_or(rest.len());
                params
                    .searchmoves
                    .extend(rest[..count].iter().map(ToString::to_string));
                parts = rest[count..].iter();
            },
            "ponder" => params.ponder = true,
            "infinite" => params.infinite = true,
            "wtime" => params.wtime = Some(value(&mut parts, keyword)?),
            "btime" => params.btime = Some(value(&mut parts, keyword)?),
            "winc" => params.winc = Some(value(&mut parts, keyword)?),
            "binc" => params.binc = Some(value(&mut parts, keyword)?),
            "movestogo" => params.movestogo = Some(value(&mut parts, keyword)?),
            "depth" => params.depth = Some(value(&mut parts, keyword)?),
            "nodes" => params.nodes = Some(value(&mut parts, keyword)?),
            "mate" => params.mate = Some(value(&mut parts, keyword)?),
            "movetime" => params.movetime = Some(value(&mut parts, keyword)?),
            "perft" => params.perft = Some(value(&mut parts, keyword)?),
            unknown => bail!("unknown go parameter: {unknown}"),
        }
    }
    Ok(Command::Go(params))
}

fn parse_setoption(parts: &[&str]) -> anyhow::Result<Command> {
    let Some((&"name", rest)) = parts.split_first() else {
        bail!("expected `setoption name <id> [value <x>]`");
    };
    let name_end = rest
        .iter()
        .position(|&part| part == "value")
        .unwrap_or(rest.len());
    if name_end == 0 {
        bail!("setoption requires an option name");
    }
    let name = rest[..name_end].join(" ");
    let value = (name_end < rest.len()).then(|| rest[name_end + 1..].join(" "));
    Ok(Command::SetOption { name, value })
}

fn parse_setposition(parts: &[&str]) -> anyhow::Result<Command> {
    let moves_index = parts.iter().position(|&part| part == "moves");
    let (setup, moves) = match moves_index {
        Some(index) => (&parts[..index], &parts[index + 1..]),
        None => (parts, &[][..]),
    };
    let fen = match setup.split_first() {
        Some((&"startpos", [])) => None,
        Some((&"fen", fields)) => {
            if fields.len() != FEN_FIELDS {
                bail!(
                    "FEN consists of {FEN_FIELDS} fields, got {}: {}",
                    fields.len(),
                    fields.join(" ")
                );
            }
            Some(fields.join(" "))
        },
        _ => bail!(
            "expected `position [fen <fenstring> | startpos] moves <move1> ... <move_i>`, got: \
             position {}",
            parts.join(" ")
        ),
    };
    Ok(Command::SetPosition {
        fen,
        moves: moves.iter().map(ToString::to_string).collect(),
    })
}

impl Command {
    pub(super) fn parse(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&command, arguments)) = parts.split_first() else {
            bail!("empty command");
        };
        match command {
            "uci" => Ok(Self::Uci),
            "debug" => match arguments {
                [] | ["on"] => Ok(Self::Debug { on: true }),
                ["off"] => Ok(Self::Debug { on: false }),
                _ => bail!("expected `debug [on | off]`, got: {}", input.trim()),
            },
            "isready" => Ok(Self::IsReady),
            "setoption" => parse_setoption(arguments),
            "position" => parse_setposition(arguments),
            "ucinewgame" => Ok(Self::NewGame),
            "go" => parse_go(arguments),
            "stop" => Ok(Self::Stop),
            "ponderhit" => Ok(Self::PonderHit),
            "quit" => Ok(Self::Quit),
            "d" => Ok(Self::Display),
            _ => bail!("unknown command: {}", input.trim()),
        }
    }
}

//! UCI command parsing.

use std::time::Duration;

use kestrel_core::Position;

use crate::error::UciError;

/// Largest accepted `Hash` value in megabytes.
pub const MAX_HASH_MB: usize = 65_536;

/// Parameters of the `go` command. A bare `go` leaves everything unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<Duration>,
    pub btime: Option<Duration>,
    pub winc: Option<Duration>,
    pub binc: Option<Duration>,
    /// Moves until the next time control.
    pub movestogo: Option<u32>,
    /// Search to this depth only.
    pub depth: Option<u32>,
    /// Search for exactly this long.
    pub movetime: Option<Duration>,
    /// Accepted for compatibility; the search has no node limit.
    pub nodes: Option<u64>,
    /// Search until `stop`.
    pub infinite: bool,
}

/// Options settable with `setoption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciOption {
    /// Transposition table size in megabytes.
    Hash(usize),
    /// Button: forget the transposition table and the ordering heuristics.
    ClearHash,
    /// Any option the engine does not have.
    Unsupported(String),
}

/// A parsed UCI command.
#[derive(Debug)]
pub enum Command {
    /// `uci`: identify the engine.
    Uci,
    /// `isready`: synchronization ping.
    IsReady,
    /// `ucinewgame`: reset engine state.
    UciNewGame,
    /// `position`: the position with any listed moves already played.
    Position(Box<Position>),
    /// `go`: start searching.
    Go(GoParams),
    /// `setoption name <id> [value <x>]`.
    SetOption(UciOption),
    /// `stop`: halt the current search.
    Stop,
    /// `quit`: exit the engine.
    Quit,
    /// Anything else; ignored.
    Unknown(String),
}

/// Parse a single line of UCI input.
pub fn parse_command(line: &str) -> Result<Command, UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&first, rest)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match first {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        "position" => parse_position(rest),
        "go" => parse_go(rest),
        "setoption" => parse_setoption(rest),
        other => Ok(Command::Unknown(other.to_string())),
    }
}

/// `position startpos [moves ...]` or `position fen <6 fields> [moves ...]`.
fn parse_position(tokens: &[&str]) -> Result<Command, UciError> {
    let (mut pos, rest) = match tokens.first() {
        Some(&"startpos") => (Position::starting_position(), &tokens[1..]),
        Some(&"fen") => {
            let fields: Vec<&str> = tokens[1..]
                .iter()
                .copied()
                .take_while(|&t| t != "moves")
                .collect();
            let fen = fields.join(" ");
            if fields.len() != 6 {
                return Err(UciError::InvalidFen {
                    fen,
                    reason: format!("expected 6 fields, found {}", fields.len()),
                });
            }
            (Position::from_fen(&fen)?, &tokens[1 + fields.len()..])
        }
        _ => return Err(UciError::MalformedPosition),
    };

    if let Some((&"moves", moves)) = rest.split_first() {
        for uci in moves {
            pos.play_uci(uci)?;
        }
    }

    Ok(Command::Position(Box::new(pos)))
}

/// `go` arguments. Unknown tokens are skipped.
fn parse_go(tokens: &[&str]) -> Result<Command, UciError> {
    let mut params = GoParams::default();
    let mut iter = tokens.iter().copied();

    while let Some(token) = iter.next() {
        match token {
            "wtime" => params.wtime = Some(parse_millis(iter.next(), token)?),
            "btime" => params.btime = Some(parse_millis(iter.next(), token)?),
            "winc" => params.winc = Some(parse_millis(iter.next(), token)?),
            "binc" => params.binc = Some(parse_millis(iter.next(), token)?),
            "movetime" => params.movetime = Some(parse_millis(iter.next(), token)?),
            "movestogo" => params.movestogo = Some(parse_value(iter.next(), token)?),
            "depth" => params.depth = Some(parse_value(iter.next(), token)?),
            "nodes" => params.nodes = Some(parse_value(iter.next(), token)?),
            "infinite" => params.infinite = true,
            _ => {}
        }
    }

    Ok(Command::Go(params))
}

fn parse_value<T: std::str::FromStr>(token: Option<&str>, param: &str) -> Result<T, UciError> {
    let value = token.ok_or_else(|| UciError::MissingGoValue {
        param: param.to_string(),
    })?;
    value.parse().map_err(|_| UciError::InvalidGoValue {
        param: param.to_string(),
        value: value.to_string(),
    })
}

/// Clock values may arrive negative when a GUI is late; they count as zero.
fn parse_millis(token: Option<&str>, param: &str) -> Result<Duration, UciError> {
    let ms: i64 = parse_value(token, param)?;
    Ok(Duration::from_millis(ms.max(0) as u64))
}

/// `setoption name <id...> [value <x...>]`; option names are case-insensitive.
fn parse_setoption(tokens: &[&str]) -> Result<Command, UciError> {
    let malformed = || UciError::MalformedOption {
        line: tokens.join(" "),
    };

    let Some((&"name", rest)) = tokens.split_first() else {
        return Err(malformed());
    };
    let value_at = rest.iter().position(|&t| t == "value");
    let (name, value) = match value_at {
        Some(i) => (rest[..i].join(" "), Some(rest[i + 1..].join(" "))),
        None => (rest.join(" "), None),
    };
    if name.is_empty() {
        return Err(malformed());
    }

    let option = match name.to_ascii_lowercase().as_str() {
        "hash" => {
            let mb: usize = value
                .as_deref()
                .and_then(|v| v.parse().ok())
                .ok_or_else(malformed)?;
            UciOption::Hash(mb.clamp(1, MAX_HASH_MB))
        }
        "clear hash" => UciOption::ClearHash,
        _ => UciOption::Unsupported(name),
    };
    Ok(Command::SetOption(option))
}

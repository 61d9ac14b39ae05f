/* =======================================================================
Rustic is a chess playing engine.
Copyright (C) 2019-2024, Marcel Vanthoor
https://rustic-chess.org/

Rustic is written in the Rust programming language. It is an original
work, not derived from any engine that came before it. However, it does
use a lot of concepts which are well-known and are in use by most if not
all classical alpha/beta-based chess engines.

Rustic is free software: you can redistribute it and/or modify it under
the terms of the GNU General Public License version 3 as published by
the Free Software Foundation.

Rustic is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License
for more details.

You should have received a copy of the GNU General Public License along
with this program.  If not, see <http://www.gnu.org/licenses/>.
======================================================================= */

// Parses one line of UCI text into a `UciReport`. This module only
// understands the command set listed in the protocol spec: it does not
// try to be a general UCI library. Anything it cannot parse becomes
// `UciReport::Unknown`, which the engine silently ignores rather than
// crashing on.

use crate::engine::defs::EngineOptionName;

#[derive(PartialEq, Clone, Debug, Default)]
pub struct GoParams {
    pub depth: Option<i8>,
    pub nodes: Option<usize>,
    pub move_time: Option<u128>,
    pub mate: Option<u8>,
    pub infinite: bool,
    pub ponder: bool,
    pub wtime: Option<u128>,
    pub btime: Option<u128>,
    pub winc: Option<u128>,
    pub binc: Option<u128>,
    pub moves_to_go: Option<usize>,
    pub search_moves: Vec<String>,
}

#[derive(PartialEq, Clone, Debug)]
pub enum UciReport {
    Uci,
    UciNewGame,
    IsReady,
    SetOption(EngineOptionName),
    Position(String, Vec<String>),
    Go(GoParams),
    Stop,
    PonderHit,
    Quit,

    // Non-UCI debug commands (spec's "disp" and friends).
    Board,
    History,
    Eval,
    Help,

    Unknown,
}

const FEN_START_POSITION: &str = crate::defs::FEN_START_POSITION;

/// Parses one line of input from the GUI/driver.
pub fn parse(line: &str) -> UciReport {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uci") => UciReport::Uci,
        Some("isready") => UciReport::IsReady,
        Some("ucinewgame") => UciReport::UciNewGame,
        Some("stop") => UciReport::Stop,
        Some("ponderhit") => UciReport::PonderHit,
        Some("quit") => UciReport::Quit,
        Some("disp") | Some("board") => UciReport::Board,
        Some("history") => UciReport::History,
        Some("eval") => UciReport::Eval,
        Some("help") => UciReport::Help,
        Some("setoption") => parse_setoption(tokens.collect::<Vec<_>>()),
        Some("position") => parse_position(tokens.collect::<Vec<_>>()),
        Some("go") => UciReport::Go(parse_go(tokens.collect::<Vec<_>>())),
        _ => UciReport::Unknown,
    }
}

fn parse_setoption(tokens: Vec<&str>) -> UciReport {
    // "setoption name <id> [value <x>]"
    let mut name = None;
    let mut value = String::new();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "name" if i + 1 < tokens.len() => {
                name = Some(tokens[i + 1]);
                i += 2;
            }
            "value" if i + 1 < tokens.len() => {
                value = tokens[i + 1..].join(" ");
                break;
            }
            _ => i += 1,
        }
    }

    let option = match name {
        Some(n) if n.eq_ignore_ascii_case(EngineOptionName::HASH) => EngineOptionName::Hash(value),
        Some(n) if n.eq_ignore_ascii_case(EngineOptionName::THREADS) => EngineOptionName::Threads(value),
        _ => EngineOptionName::Nothing,
    };
    UciReport::SetOption(option)
}

fn parse_position(tokens: Vec<&str>) -> UciReport {
    let mut idx = 0;
    let fen;

    match tokens.first() {
        Some(&"startpos") => {
            fen = FEN_START_POSITION.to_string();
            idx = 1;
        }
        Some(&"fen") => {
            // Six space-separated FEN fields follow.
            let fields = &tokens[1..];
            let take = fields.len().min(6);
            fen = fields[..take].join(" ");
            idx = 1 + take;
        }
        _ => {
            fen = FEN_START_POSITION.to_string();
        }
    }

    let mut moves = Vec::new();
    if tokens.get(idx) == Some(&"moves") {
        idx += 1;
        moves.extend(tokens[idx..].iter().map(|s| s.to_string()));
    }

    UciReport::Position(fen, moves)
}

fn parse_go(tokens: Vec<&str>) -> GoParams {
    let mut gp = GoParams::default();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "ponder" => {
                gp.ponder = true;
                i += 1;
            }
            "infinite" => {
                gp.infinite = true;
                i += 1;
            }
            "depth" => {
                gp.depth = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "nodes" => {
                gp.nodes = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movetime" => {
                gp.move_time = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "mate" => {
                gp.mate = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "wtime" => {
                gp.wtime = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "btime" => {
                gp.btime = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "winc" => {
                gp.winc = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "binc" => {
                gp.binc = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "movestogo" => {
                gp.moves_to_go = tokens.get(i + 1).and_then(|s| s.parse().ok());
                i += 2;
            }
            "searchmoves" => {
                i += 1;
                while i < tokens.len() && !is_go_keyword(tokens[i]) {
                    gp.search_moves.push(tokens[i].to_string());
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    gp
}

fn is_go_keyword(token: &str) -> bool {
    matches!(
        token,
        "ponder"
            | "infinite"
            | "depth"
            | "nodes"
            | "movetime"
            | "mate"
            | "wtime"
            | "btime"
            | "winc"
            | "binc"
            | "movestogo"
            | "searchmoves"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_commands() {
        assert_eq!(parse("uci"), UciReport::Uci);
        assert_eq!(parse("isready"), UciReport::IsReady);
        assert_eq!(parse("ucinewgame"), UciReport::UciNewGame);
        assert_eq!(parse("stop"), UciReport::Stop);
        assert_eq!(parse("ponderhit"), UciReport::PonderHit);
        assert_eq!(parse("quit"), UciReport::Quit);
        assert_eq!(parse("garbage input"), UciReport::Unknown);
    }

    #[test]
    fn parses_position_startpos_with_moves() {
        match parse("position startpos moves e2e4 e7e5") {
            UciReport::Position(fen, moves) => {
                assert_eq!(fen, FEN_START_POSITION);
                assert_eq!(moves, vec!["e2e4", "e7e5"]);
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn parses_position_fen_without_moves() {
        let line = "position fen 8/8/8/8/8/8/8/K6k w - - 0 1";
        match parse(line) {
            UciReport::Position(fen, moves) => {
                assert_eq!(fen, "8/8/8/8/8/8/8/K6k w - - 0 1");
                assert!(moves.is_empty());
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn parses_go_with_clock_fields() {
        match parse("go wtime 60000 btime 60000 winc 1000 binc 1000 movestogo 30") {
            UciReport::Go(gp) => {
                assert_eq!(gp.wtime, Some(60000));
                assert_eq!(gp.btime, Some(60000));
                assert_eq!(gp.winc, Some(1000));
                assert_eq!(gp.binc, Some(1000));
                assert_eq!(gp.moves_to_go, Some(30));
                assert!(!gp.infinite);
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn parses_go_searchmoves_stops_at_next_keyword() {
        match parse("go searchmoves e2e4 d2d4 depth 5") {
            UciReport::Go(gp) => {
                assert_eq!(gp.search_moves, vec!["e2e4", "d2d4"]);
                assert_eq!(gp.depth, Some(5));
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn parses_setoption_hash() {
        match parse("setoption name Hash value 64") {
            UciReport::SetOption(EngineOptionName::Hash(v)) => assert_eq!(v, "64"),
            other => panic!("unexpected report: {other:?}"),
        }
    }
}

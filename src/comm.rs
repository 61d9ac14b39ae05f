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

// The only driver this core ships with: a UCI adapter. It is deliberately
// thin, per the spec's scope: a background thread reads stdin lines,
// parses them with `uci::parse`, and forwards the result to the engine's
// main thread as `Information::Comm`; `Comm::send` is the reverse
// direction, turning engine-issued `CommControl` values into the text the
// protocol expects on stdout. Nothing in here touches the board or the
// search; those stay on the engine's main thread.

pub mod uci;

use crate::defs::Move;
use crate::engine::defs::Information;
use crate::search::defs::{Bound, SearchCurrentMove, SearchStats, SearchSummary};
use crossbeam_channel::Sender;
use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};
use uci::UciReport;

#[derive(PartialEq, Clone, Debug)]
pub enum CommReport {
    Uci(UciReport),
}

pub enum CommControl {
    Identify,
    Ready,
    BestMove(Move, Option<Move>),
    SearchSummary(SearchSummary),
    SearchCurrentMove(SearchCurrentMove),
    SearchStats(SearchStats),
    InfoString(String),
    Quit,
}

/// Owns the stdin-reading thread. There is no output thread: `send` is
/// called directly from the engine's main thread and writes to stdout
/// synchronously, since UCI output ordering matters and printing is
/// cheap relative to a search node.
pub struct Comm {
    input_handle: Option<JoinHandle<()>>,
}

impl Comm {
    pub fn new() -> Self {
        Self { input_handle: None }
    }

    /// Spawns the stdin reader. Every parsed line is forwarded as
    /// `Information::Comm`; a `quit` line is forwarded once and then the
    /// thread exits (it does not wait to be joined - on process exit the
    /// OS reclaims it, matching a UCI engine's usual "quit tears
    /// everything down" semantics).
    pub fn init(&mut self, report_tx: Sender<Information>) {
        let handle = thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let report = uci::parse(line.trim());
                let is_quit = report == UciReport::Quit;
                if report_tx.send(Information::Comm(CommReport::Uci(report))).is_err() {
                    break;
                }
                if is_quit {
                    break;
                }
            }
        });
        self.input_handle = Some(handle);
    }

    pub fn send(&self, control: CommControl) {
        match control {
            CommControl::Identify => {
                println!("id name {}", crate::defs::About::ENGINE);
                println!("id author {}", crate::defs::About::AUTHOR);
                println!(
                    "option name Hash type spin default {} min {} max {}",
                    crate::engine::defs::EngineOptionDefaults::HASH_DEFAULT,
                    crate::engine::defs::EngineOptionDefaults::HASH_MIN,
                    crate::engine::defs::EngineOptionDefaults::HASH_MAX_64_BIT,
                );
                println!(
                    "option name Threads type spin default {} min {} max {}",
                    crate::engine::defs::EngineOptionDefaults::THREADS_DEFAULT,
                    crate::engine::defs::EngineOptionDefaults::THREADS_MIN,
                    crate::engine::defs::EngineOptionDefaults::THREADS_MAX,
                );
                println!("option name Ponder type check default true");
                println!("uciok");
            }
            CommControl::Ready => println!("readyok"),
            CommControl::BestMove(best, ponder) => {
                let mut line = format!("bestmove {}", best.as_string());
                if let Some(p) = ponder {
                    line.push_str(&format!(" ponder {}", p.as_string()));
                }
                println!("{line}");
            }
            CommControl::SearchSummary(s) => println!("{}", format_summary(&s)),
            CommControl::SearchCurrentMove(c) => println!(
                "info currmove {} currmovenumber {}",
                c.curr_move.as_string(),
                c.curr_move_number
            ),
            CommControl::SearchStats(s) => {
                println!("info time {} nodes {} nps {}", s.time, s.nodes, s.nps)
            }
            CommControl::InfoString(msg) => println!("info string {msg}"),
            CommControl::Quit => (),
        }
        let _ = io::stdout().flush();
    }
}

impl Default for Comm {
    fn default() -> Self {
        Self::new()
    }
}

fn format_summary(s: &SearchSummary) -> String {
    let score = if s.mate != 0 {
        format!("mate {}", s.mate)
    } else {
        format!("cp {}", s.cp)
    };
    let bound = match s.bound {
        Some(Bound::Upper) => " upperbound",
        Some(Bound::Lower) => " lowerbound",
        None => "",
    };

    format!(
        "info depth {} seldepth {} multipv 1 score {}{} nodes {} nps {} time {} pv{}",
        s.depth,
        s.seldepth,
        score,
        bound,
        s.nodes,
        s.nps,
        s.time,
        s.pv_as_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::Move;
    use crate::search::defs::SearchSummary;

    #[test]
    fn summary_without_mate_prints_centipawns() {
        let summary = SearchSummary {
            depth: 4,
            seldepth: 6,
            time: 120,
            cp: 35,
            mate: 0,
            nodes: 1000,
            nps: 8000,
            pv: vec![Move::new(12, 28, 0, crate::defs::MoveFlag::NORMAL)],
            bound: None,
        };
        let line = format_summary(&summary);
        assert!(line.contains("score cp 35"));
        assert!(line.contains("depth 4"));
        assert!(line.contains("pv e2e4"));
    }

    #[test]
    fn summary_with_mate_prints_mate_score() {
        let summary = SearchSummary {
            depth: 3,
            seldepth: 3,
            time: 50,
            cp: 0,
            mate: 2,
            nodes: 500,
            nps: 10000,
            pv: Vec::new(),
            bound: None,
        };
        let line = format_summary(&summary);
        assert!(line.contains("score mate 2"));
    }
}

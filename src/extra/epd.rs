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

// A tiny, built-in EPD-style test suite: each entry is a FEN plus one of
// the moves considered correct, in UCI long-algebraic form. Runs every
// position through the real search (the exact Search the engine drives
// over UCI) at a fixed depth and reports how many best moves matched.
// This is a developer sanity check, not a bench-marking harness: there
// is no file format reader here, because the engine takes no EPD-file
// path on the command line.

use crate::board::Board;
use crate::engine::defs::Information;
use crate::movegen::MoveGenerator;
use crate::search::defs::{SearchControl, SearchMode, SearchParams, SearchReport};
use crate::search::Search;
use crossbeam_channel::unbounded;
use std::sync::{Arc, Mutex};

struct Position {
    fen: &'static str,
    best_moves: &'static [&'static str],
    id: &'static str,
}

const SUITE: &[Position] = &[
    Position {
        id: "back rank mate in 1",
        fen: "6k1/5ppp/8/8/8/8/8/3RK3 w - - 0 1",
        best_moves: &["d1d8"],
    },
    Position {
        id: "win a hanging rook",
        fen: "4k3/8/8/8/8/8/r7/R3K3 w - - 0 1",
        best_moves: &["a1a2"],
    },
    Position {
        id: "win a hanging bishop",
        fen: "4k3/8/8/8/b7/8/8/3QK3 w - - 0 1",
        best_moves: &["d1a4"],
    },
];

pub fn run(depth: i8) {
    let mut passed = 0;
    let total = SUITE.len();

    for case in SUITE {
        let best = search_one(case.fen, depth);
        let ok = best
            .as_ref()
            .is_some_and(|m| case.best_moves.contains(&m.as_str()));

        println!(
            "{} [{}]: {} (expected one of {:?})",
            if ok { "PASS" } else { "FAIL" },
            case.id,
            best.as_deref().unwrap_or("<none>"),
            case.best_moves
        );

        if ok {
            passed += 1;
        }
    }

    println!("{passed}/{total} positions passed");
}

fn search_one(fen: &str, depth: i8) -> Option<String> {
    let mut board = Board::new();
    board.fen_read(Some(fen)).ok()?;

    let board = Arc::new(Mutex::new(board));
    let mg = Arc::new(MoveGenerator::new());

    let (info_tx, info_rx) = unbounded::<Information>();
    let mut search = Search::new();
    search.init(info_tx, Arc::clone(&board), Arc::clone(&mg));

    let mut sp = SearchParams::new();
    sp.depth = depth;
    sp.search_mode = SearchMode::Depth;
    sp.quiet = true;
    search.send(SearchControl::Start(sp));

    loop {
        match info_rx.recv().ok()? {
            Information::Search(SearchReport::Finished(best, _)) => {
                search.send(SearchControl::Quit);
                return Some(best.as_string());
            }
            _ => continue,
        }
    }
}

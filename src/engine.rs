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

// The engine ties the board, move generator, search worker and UCI
// adapter together and runs the scheduling loop described in the spec:
// a main thread (this one) that owns the root position and blocks
// waiting for either an incoming UCI command or a search report, and a
// search worker (see `search::Search`) that owns its own timer thread
// for the duration of one search. There is no separate "thinking" flag
// here: `Search::send(SearchControl::Start(..))` is only ever issued
// from this thread, which is also the only place that inspects
// `search.signals()`, so re-entrancy is prevented by construction
// rather than by a guarded flag.

pub mod about;
pub mod comm_reports;
pub mod defs;
pub mod search_reports;
pub mod utils;

use self::defs::{ErrFatal, Information, Settings};
use crate::board::Board;
use crate::comm::{Comm, CommControl};
use crate::defs::{EngineRunResult, Move};
use crate::misc::cmdline::CmdLine;
use crate::movegen::MoveGenerator;
use crate::search::Search;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::{Arc, Mutex};

pub struct Engine {
    quit: bool,
    settings: Settings,
    cmdline: CmdLine,
    comm: Comm,
    search: Search,
    board: Arc<Mutex<Board>>,
    mg: Arc<MoveGenerator>,
    info_rx: Option<Receiver<Information>>,
    /// Set while a `go ponder` search is running; a `Finished` report
    /// arriving while this is true is held back (spec's "stop on
    /// ponderhit" contract: the engine does not announce a result for a
    /// pondered line until the GUI confirms the expected move was
    /// played).
    pondering: bool,
    delayed_bestmove: Option<(Move, Option<Move>)>,
}

impl Engine {
    pub fn new() -> Self {
        let cmdline = CmdLine::new();
        let settings = Settings::new(cmdline.threads(), cmdline.has_quiet());

        Self {
            quit: false,
            settings,
            cmdline,
            comm: Comm::new(),
            search: Search::new(),
            board: Arc::new(Mutex::new(Board::new())),
            mg: Arc::new(MoveGenerator::new()),
            info_rx: None,
            pondering: false,
            delayed_bestmove: None,
        }
    }

    /// Runs the engine to completion: sets up the initial position,
    /// starts the UCI reader and the search worker, prints the startup
    /// banner, and then dispatches `Information` reports until a `quit`
    /// is seen.
    pub fn run(&mut self) -> EngineRunResult {
        self.setup_position()?;

        if !self.settings.quiet {
            self.print_ascii_logo();
            self.print_about(&self.settings);
        }

        let depth = self.cmdline.perft();
        if depth > 0 {
            self.run_perft(depth as u8);
            return Ok(());
        }

        let (info_tx, info_rx) = unbounded::<Information>();
        self.info_rx = Some(info_rx);

        self.comm.init(info_tx.clone());
        self.search.init(info_tx, Arc::clone(&self.board), Arc::clone(&self.mg));

        while !self.quit {
            let information = self
                .info_rx
                .as_ref()
                .expect(ErrFatal::NO_INFO_RX)
                .recv()
                .map_err(|_| ErrFatal::CHANNEL.to_string())?;

            match information {
                Information::Comm(ref report) => self.comm_reports(report),
                Information::Search(ref report) => self.search_reports(report),
            }
        }

        Ok(())
    }

    pub fn quit(&mut self) {
        self.search.send(crate::search::defs::SearchControl::Quit);
        self.comm.send(CommControl::Quit);
        self.quit = true;
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

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

use super::{
    defs::{ErrFatal, ErrNormal},
    Engine,
};
use crate::{
    comm::{uci::UciReport, CommControl},
    engine::defs::EngineOptionName,
    evaluation::evaluate_position,
    search::defs::{GameTime, SearchControl, SearchMode, SearchParams},
};

// Dispatches the `CommReport::Uci(..)` variant of an incoming
// `Information::Comm` report. Comm reports from other protocols would be
// split out into their own `comm_reports_*` function the same way, but
// the spec names only UCI (see spec.md section 6).
impl Engine {
    pub fn comm_reports(&mut self, comm_report: &crate::comm::CommReport) {
        match comm_report {
            crate::comm::CommReport::Uci(u) => self.comm_reports_uci(u),
        }
    }

    fn comm_reports_uci(&mut self, u: &UciReport) {
        match u {
            UciReport::Uci => self.comm.send(CommControl::Identify),

            UciReport::UciNewGame => {
                self.board
                    .lock()
                    .expect(ErrFatal::LOCK)
                    .fen_read(None)
                    .expect(ErrFatal::NEW_GAME);
            }

            UciReport::IsReady => self.comm.send(CommControl::Ready),

            UciReport::SetOption(option) => match option {
                // The engine keeps no transposition table and runs
                // exactly one search worker; both options are accepted
                // (so GUIs that always send them do not get an "unknown
                // option" reply) and silently ignored.
                EngineOptionName::Hash(_) | EngineOptionName::Threads(_) | EngineOptionName::Nothing => (),
            },

            UciReport::Position(fen, moves) => {
                let fen_result = self.board.lock().expect(ErrFatal::LOCK).fen_read(Some(fen));

                if fen_result.is_ok() {
                    for m in moves.iter() {
                        if !self.execute_move(m.clone()) {
                            let msg = format!("{}: {}", m, ErrNormal::NOT_LEGAL);
                            self.comm.send(CommControl::InfoString(msg));
                            break;
                        }
                    }
                } else {
                    self.comm.send(CommControl::InfoString(ErrNormal::FEN_FAILED.to_string()));
                }
            }

            UciReport::Go(gp) => {
                let mut sp = SearchParams::new();
                sp.quiet = self.settings.quiet;
                sp.search_moves = gp
                    .search_moves
                    .iter()
                    .filter_map(|s| {
                        self.pseudo_legal(
                            crate::misc::parse::algebraic_move_to_number(s)?,
                            &self.board,
                            &self.mg,
                        )
                        .ok()
                    })
                    .collect();
                sp.mate = gp.mate.unwrap_or(0);

                sp.game_time = GameTime::new(
                    gp.wtime.unwrap_or(0),
                    gp.btime.unwrap_or(0),
                    gp.winc.unwrap_or(0),
                    gp.binc.unwrap_or(0),
                    gp.moves_to_go,
                );

                sp.search_mode = if gp.infinite {
                    SearchMode::Infinite
                } else if gp.ponder {
                    self.pondering = true;
                    sp.ponder = true;
                    SearchMode::Ponder
                } else if let Some(depth) = gp.depth {
                    sp.depth = depth;
                    SearchMode::Depth
                } else if let Some(nodes) = gp.nodes {
                    sp.nodes = nodes;
                    SearchMode::Nodes
                } else if let Some(mt) = gp.move_time {
                    sp.move_time = mt;
                    SearchMode::MoveTime
                } else {
                    SearchMode::GameTime
                };

                self.search.send(SearchControl::Start(sp));
            }

            UciReport::Stop => self.search.send(SearchControl::Stop),

            UciReport::PonderHit => {
                self.pondering = false;
                self.search.send(SearchControl::PonderHit);
                if let Some((best, ponder)) = self.delayed_bestmove.take() {
                    self.comm.send(CommControl::BestMove(best, ponder));
                }
            }

            UciReport::Quit => self.quit(),

            UciReport::Board => {
                let board = self.board.lock().expect(ErrFatal::LOCK);
                println!("{}", board.fen());
            }

            UciReport::History => {
                let board = self.board.lock().expect(ErrFatal::LOCK);
                println!("{} plies played", board.history.len());
            }

            UciReport::Eval => {
                let board = self.board.lock().expect(ErrFatal::LOCK);
                let e = evaluate_position(&board, &self.mg);
                self.comm.send(CommControl::InfoString(format!("Evaluation: {e} centipawns")));
            }

            UciReport::Help => self.comm.send(CommControl::InfoString(
                "uci isready ucinewgame position go stop ponderhit quit disp history eval".to_string(),
            )),

            UciReport::Unknown => (),
        }
    }
}

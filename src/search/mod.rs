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

// The search runs on exactly one worker thread, plus one independent
// timer thread per active search. The worker blocks on its control
// channel between searches; once a search starts, the timer thread takes
// over that same channel to forward an incoming Stop/PonderHit/Quit into
// the shared atomic Signals, while the worker only ever polls the atomic.
// There is no lazy-SMP, no transposition table shared between threads -
// the worker's local Evaluator (and its pawn cache) lives and dies with
// a single search.

pub mod alpha_beta;
pub mod defs;
pub mod time;

use self::alpha_beta::alpha_beta;
use self::defs::{
    is_mate_score, mate_distance, Bound, RootMove, SearchControl, SearchInfo, SearchMode, SearchParams,
    SearchReport, SearchRefs, SearchSummary, SearchTerminate, Signals, CHECKMATE_THRESHOLD, INF,
};
use self::time::{TimerLimit, POLL_PERIOD_MS};
use crate::board::Board;
use crate::defs::Move;
use crate::engine::defs::{ErrFatal, Information};
use crate::evaluation::Evaluator;
use crate::movegen::defs::{MoveList, MoveType};
use crate::movegen::MoveGenerator;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Owns the search worker thread and the control channel used to drive
/// it. `Engine` holds exactly one of these.
pub struct Search {
    signals: Arc<Signals>,
    control_tx: Option<Sender<SearchControl>>,
    handle: Option<JoinHandle<()>>,
}

impl Search {
    pub fn new() -> Self {
        Self {
            signals: Arc::new(Signals::new()),
            control_tx: None,
            handle: None,
        }
    }

    /// Spawns the worker thread. `board` is shared with the rest of the
    /// engine (the UCI loop mutates it between searches); the worker
    /// takes a private clone of it at the start of every search.
    pub fn init(&mut self, report_tx: Sender<Information>, board: Arc<Mutex<Board>>, mg: Arc<MoveGenerator>) {
        let (control_tx, control_rx) = unbounded::<SearchControl>();
        self.control_tx = Some(control_tx);

        let signals = Arc::clone(&self.signals);
        let handle = thread::spawn(move || {
            Search::worker_main(board, mg, control_rx, report_tx, signals);
        });
        self.handle = Some(handle);
    }

    pub fn send(&self, control: SearchControl) {
        if let Some(tx) = &self.control_tx {
            let _ = tx.send(control);
        }
    }

    pub fn signals(&self) -> Arc<Signals> {
        Arc::clone(&self.signals)
    }

    fn worker_main(
        board: Arc<Mutex<Board>>,
        mg: Arc<MoveGenerator>,
        control_rx: Receiver<SearchControl>,
        report_tx: Sender<Information>,
        signals: Arc<Signals>,
    ) {
        loop {
            match control_rx.recv() {
                Ok(SearchControl::Start(params)) => {
                    signals.reset();
                    let local_board = board.lock().expect(ErrFatal::LOCK).clone();
                    let evaluator = Evaluator::new();

                    let (best_move, ponder_move) = Search::iterative_deepening(
                        local_board,
                        &mg,
                        evaluator,
                        &params,
                        &signals,
                        &control_rx,
                        &report_tx,
                    );

                    let _ = report_tx.send(Information::Search(SearchReport::Finished(best_move, ponder_move)));
                }
                Ok(SearchControl::Quit) => break,
                Ok(SearchControl::Stop) | Ok(SearchControl::PonderHit) | Ok(SearchControl::Nothing) => {}
                Err(_) => break,
            }
        }
    }

    /// Drives the outer depth loop: builds the root move list, then
    /// repeatedly calls `root_search` at increasing depth, widening an
    /// aspiration window around the previous iteration's score once the
    /// search is deep enough for that window to pay off.
    fn iterative_deepening(
        mut board: Board,
        mg: &MoveGenerator,
        mut evaluator: Evaluator,
        params: &SearchParams,
        signals: &Arc<Signals>,
        control_rx: &Receiver<SearchControl>,
        report_tx: &Sender<Information>,
    ) -> (Move, Option<Move>) {
        let mut search_info = SearchInfo::new();
        search_info.timer_start();

        let mut list = MoveList::new();
        mg.generate_moves(&board, &mut list, MoveType::All);
        for index in 0..list.len() {
            let m = list.get_move(index);
            if !params.search_moves.is_empty() && !params.search_moves.contains(&m) {
                continue;
            }
            let mut test_board = board.clone();
            if test_board.make(m, mg) {
                search_info.root_moves.push(RootMove::new(m));
            }
        }

        if search_info.root_moves.is_empty() {
            return (Move::NONE, None);
        }

        let timer_limit = {
            let refs = SearchRefs {
                board: &mut board,
                mg,
                evaluator: &mut evaluator,
                search_params: params,
                search_info: &mut search_info,
                signals,
                control_rx,
                report_tx,
            };
            match params.search_mode {
                SearchMode::GameTime | SearchMode::Ponder => {
                    let (available_time, maximum_time) = refs.game_time_budgets();
                    TimerLimit::GameTime { available_time, maximum_time }
                }
                SearchMode::MoveTime => TimerLimit::Fixed(params.move_time),
                _ => TimerLimit::None,
            }
        };
        // Hard backstop the worker itself enforces every `CHECK_TERMINATION`
        // nodes, independent of the timer thread's own (coarser, 5ms-grained)
        // polling. Set to the maximum (never-exceed) deadline rather than the
        // softer `available_time` target, which only the timer thread applies.
        search_info.allocated_time = match timer_limit {
            TimerLimit::Fixed(ms) => ms,
            TimerLimit::GameTime { maximum_time, .. } => maximum_time,
            TimerLimit::None => 0,
        };

        let timer_handle = spawn_timer(
            Arc::clone(signals),
            control_rx.clone(),
            timer_limit,
            params.search_mode == SearchMode::Ponder,
        );

        let max_depth = if params.search_mode == SearchMode::Depth {
            params.depth
        } else {
            crate::defs::MAX_PLY as i8 - 1
        };

        let mut best_move = search_info.root_moves[0].m;
        let mut best_pv = vec![best_move];

        let mut depth: i8 = 1;
        while depth <= max_depth {
            let prev_score = search_info.root_moves[0].previous_score;
            let use_aspiration = depth >= 5 && prev_score.abs() < CHECKMATE_THRESHOLD;
            let mut delta: i16 = 16;
            let (mut alpha, mut beta) = if use_aspiration {
                ((prev_score - delta).max(-INF), (prev_score + delta).min(INF))
            } else {
                (-INF, INF)
            };

            signals.failed_low_at_root.store(false, Ordering::Relaxed);

            loop {
                let score = {
                    let mut refs = SearchRefs {
                        board: &mut board,
                        mg,
                        evaluator: &mut evaluator,
                        search_params: params,
                        search_info: &mut search_info,
                        signals,
                        control_rx,
                        report_tx,
                    };
                    root_search(&mut refs, depth, alpha, beta)
                };

                if search_info.terminate != SearchTerminate::Nothing {
                    break;
                }

                if score <= alpha && alpha > -INF {
                    signals.failed_low_at_root.store(true, Ordering::Relaxed);
                    beta = ((alpha as i32 + beta as i32) / 2) as i16;
                    alpha = (alpha - delta).max(-INF);
                } else if score >= beta && beta < INF {
                    beta = (beta + delta).min(INF);
                } else {
                    break;
                }
                delta += delta / 2;
            }

            if search_info.terminate != SearchTerminate::Nothing {
                break;
            }

            search_info
                .root_moves
                .sort_by(|a, b| b.score.cmp(&a.score));
            for rm in search_info.root_moves.iter_mut() {
                rm.previous_score = rm.score;
            }

            let new_best = search_info.root_moves[0].m;
            signals
                .first_root_move
                .store(new_best == best_move, Ordering::Relaxed);

            best_move = new_best;
            best_pv = search_info.root_moves[0].pv.clone();
            search_info.depth = depth;

            report_iteration(&search_info, report_tx);

            if params.mate > 0 && is_mate_score(search_info.root_moves[0].score) {
                let dist = mate_distance(search_info.root_moves[0].score);
                if (dist as u8) <= params.mate {
                    break;
                }
            }

            if params.search_mode == SearchMode::Nodes && search_info.nodes >= params.nodes {
                break;
            }

            depth += 1;
        }

        signals.stop.store(true, Ordering::Relaxed);
        let _ = timer_handle.join();

        let ponder_move = best_pv.get(1).copied();
        (best_move, ponder_move)
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

/// PVS across the root move list: the first move gets a full window, the
/// rest a null-window probe with a full re-search on a fail-high. Scores
/// and principal variations are written back into `search_info.root_moves`
/// so the next iteration (and the UCI "info" output) can use them.
fn root_search(refs: &mut SearchRefs, depth: i8, mut alpha: i16, beta: i16) -> i16 {
    let mut best_score = -INF;
    let mut first = true;

    for index in 0..refs.search_info.root_moves.len() {
        let m = refs.search_info.root_moves[index].m;
        if !refs.board.make(m, refs.mg) {
            continue;
        }

        let mut child_pv = Vec::new();
        let score = if first {
            -alpha_beta(refs, depth - 1, 1, -beta, -alpha, &mut child_pv)
        } else {
            let reduced = -alpha_beta(refs, depth - 1, 1, -alpha - 1, -alpha, &mut child_pv);
            if reduced > alpha {
                child_pv.clear();
                -alpha_beta(refs, depth - 1, 1, -beta, -alpha, &mut child_pv)
            } else {
                reduced
            }
        };
        first = false;

        refs.board.unmake();

        if refs.search_info.terminate != SearchTerminate::Nothing {
            return best_score;
        }

        let mut pv = Vec::with_capacity(child_pv.len() + 1);
        pv.push(m);
        pv.extend(child_pv);
        refs.search_info.root_moves[index].score = score;
        refs.search_info.root_moves[index].pv = pv;

        if score > best_score {
            best_score = score;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    best_score
}

fn report_iteration(search_info: &SearchInfo, report_tx: &Sender<Information>) {
    let elapsed = search_info.timer_elapsed();
    let nodes = search_info.nodes;
    let nps = if elapsed > 0 { (nodes as u128 * 1000 / elapsed) as usize } else { 0 };

    let best = &search_info.root_moves[0];
    let (cp, mate) = if is_mate_score(best.score) {
        let distance = mate_distance(best.score);
        (0, if best.score > 0 { distance } else { -distance })
    } else {
        (best.score, 0)
    };

    let summary = SearchSummary {
        depth: search_info.depth,
        seldepth: search_info.seldepth,
        time: elapsed,
        cp,
        mate,
        nodes,
        nps,
        pv: best.pv.clone(),
        bound: None::<Bound>,
    };
    let _ = report_tx.send(Information::Search(SearchReport::SearchSummary(summary)));
}

/// The only thread that watches wall-clock time and external Stop/Quit
/// requests while a search is running; the worker thread itself only
/// polls the atomic `Signals::stop` every few thousand nodes.
fn spawn_timer(
    signals: Arc<Signals>,
    control_rx: Receiver<SearchControl>,
    limit: TimerLimit,
    is_ponder: bool,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let start = Instant::now();
        let mut pondering = is_ponder;
        loop {
            if signals.stop_requested() {
                break;
            }

            match control_rx.try_recv() {
                Ok(SearchControl::Stop) | Ok(SearchControl::Quit) => {
                    signals.stop.store(true, Ordering::Relaxed);
                    break;
                }
                Ok(SearchControl::PonderHit) => {
                    signals.stop_on_ponder_hit.store(false, Ordering::Relaxed);
                    pondering = false;
                }
                Ok(SearchControl::Start(_)) | Ok(SearchControl::Nothing) => {}
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    signals.stop.store(true, Ordering::Relaxed);
                    break;
                }
            }

            let elapsed = start.elapsed().as_millis();
            let out_of_time = match limit {
                TimerLimit::None => false,
                TimerLimit::Fixed(ms) => elapsed >= ms,
                TimerLimit::GameTime { available_time, maximum_time } => {
                    let easy_stop = signals.first_root_move.load(Ordering::Relaxed)
                        && !signals.failed_low_at_root.load(Ordering::Relaxed)
                        && elapsed > (available_time * 75) / 100;
                    let hard_stop = elapsed + 2 * POLL_PERIOD_MS > maximum_time;
                    !pondering && (easy_stop || hard_stop)
                }
            };

            if out_of_time {
                signals.stop.store(true, Ordering::Relaxed);
                break;
            }

            thread::sleep(Duration::from_millis(POLL_PERIOD_MS as u64));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::FEN_START_POSITION;

    #[test]
    fn iterative_deepening_returns_a_legal_move_at_low_depth() {
        let mut board = Board::new();
        board.fen_read(Some(FEN_START_POSITION)).unwrap();
        let mg = MoveGenerator::new();
        let evaluator = Evaluator::new();

        let mut params = SearchParams::new();
        params.search_mode = SearchMode::Depth;
        params.depth = 3;

        let signals = Arc::new(Signals::new());
        let (_ctx, crx) = unbounded::<SearchControl>();
        let (rtx, rrx) = unbounded::<Information>();

        let (best_move, _ponder) =
            Search::iterative_deepening(board.clone(), &mg, evaluator, &params, &signals, &crx, &rtx);

        assert!(!best_move.is_none());

        let mut saw_finished = false;
        while let Ok(info) = rrx.try_recv() {
            if let Information::Search(SearchReport::Finished(_, _)) = info {
                saw_finished = false; // this call never sends Finished itself; loop harmlessly drains summaries
            }
            saw_finished = saw_finished || true;
        }
        let _ = saw_finished;
    }

    #[test]
    fn a_position_with_no_legal_moves_returns_none() {
        let mut board = Board::new();
        // Black is stalemated: no legal moves, not in check.
        board.fen_read(Some("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1")).unwrap();
        let mg = MoveGenerator::new();
        let evaluator = Evaluator::new();

        let mut params = SearchParams::new();
        params.search_mode = SearchMode::Depth;
        params.depth = 2;

        let signals = Arc::new(Signals::new());
        let (_ctx, crx) = unbounded::<SearchControl>();
        let (rtx, _rrx) = unbounded::<Information>();

        let (best_move, ponder) =
            Search::iterative_deepening(board.clone(), &mg, evaluator, &params, &signals, &crx, &rtx);

        assert!(best_move.is_none());
        assert!(ponder.is_none());
    }

    #[test]
    fn depth_limited_search_honours_the_requested_depth() {
        let mut board = Board::new();
        board.fen_read(Some(FEN_START_POSITION)).unwrap();
        let mg = MoveGenerator::new();
        let evaluator = Evaluator::new();

        let mut params = SearchParams::new();
        params.search_mode = SearchMode::Depth;
        params.depth = 2;

        let signals = Arc::new(Signals::new());
        let (_ctx, crx) = unbounded::<SearchControl>();
        let (rtx, _rrx) = unbounded::<Information>();

        let (best_move, _) = Search::iterative_deepening(board.clone(), &mg, evaluator, &params, &signals, &crx, &rtx);
        assert!(!best_move.is_none());
    }
}

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

// The recursive search: principal variation search with quiescence at the
// leaves. There is no transposition table, so move ordering relies
// entirely on local information: MVV/LVA for captures, the history table
// for quiet moves, late move reductions, checking extensions, and
// mate-distance pruning. Null-move pruning is deliberately absent (see
// DESIGN.md).

use super::defs::{mate_in, mated_in, SearchRefs, SearchTerminate, CHECK_TERMINATION, DRAW, INF, STALEMATE};
use super::Search;
use crate::board::defs::{Pieces, PIECE_VALUES_MG};
use crate::board::see;
use crate::defs::{Move, MAX_PLY};
use crate::movegen::defs::{MoveList, MoveType, MAX_LEGAL_MOVES};

const LMR_MIN_DEPTH: i8 = 3;
const LMR_MIN_MOVE_NUMBER: usize = 4;

// A capture this many centipawns below alpha, even after adding the
// value of the piece it wins, is not worth searching any further in
// quiescence: delta pruning.
const QS_DELTA_MARGIN: i16 = 200;

/// Searches `refs.board` to `depth`, writing the principal variation into
/// `pv`. Returns the score from the perspective of the side to move.
pub fn alpha_beta(refs: &mut SearchRefs, depth: i8, ply: i8, mut alpha: i16, beta: i16, pv: &mut Vec<Move>) -> i16 {
    let is_root = ply == 0;
    let is_pv = beta - alpha > 1;
    let in_check = refs.board.game_state.checkers != 0;

    if depth <= 0 {
        return quiescence(refs, ply, alpha, beta);
    }

    refs.search_info.nodes += 1;
    refs.search_info.seldepth = refs.search_info.seldepth.max(ply);
    if refs.search_info.nodes & CHECK_TERMINATION == 0 && (refs.signals.stop_requested() || Search::time_up(refs)) {
        refs.search_info.terminate = SearchTerminate::Stop;
    }
    if refs.search_info.terminate != SearchTerminate::Nothing {
        return 0;
    }

    if !is_root {
        if refs.board.is_draw() {
            return DRAW;
        }

        // Mate distance pruning: a mate further away than the current
        // window cannot improve on what has already been found.
        alpha = alpha.max(mated_in(ply));
        let beta = beta.min(mate_in(ply + 1));
        if alpha >= beta {
            return alpha;
        }
    }

    let mut list = MoveList::new();
    refs.mg.generate_moves(refs.board, &mut list, MoveType::All);
    let hint = if is_root { pv.first().copied() } else { None };
    order_moves(refs, &mut list, hint);

    let static_eval = refs.evaluator.evaluate(refs.board, refs.mg);
    let eval_slot = (ply as usize).min(refs.search_info.static_eval.len() - 1);
    refs.search_info.static_eval[eval_slot] = Some(static_eval);
    let improving = eval_slot >= 2
        && refs.search_info.static_eval[eval_slot - 2]
            .map(|old| static_eval > old)
            .unwrap_or(false);

    let mut best_score = -INF;
    let mut legal_moves = 0usize;

    for index in 0..list.len() {
        let m = list.get_move(index);
        let is_quiet = refs.board.piece_on(m.to()) == Pieces::NONE && !m.is_promotion() && !m.is_en_passant();
        // SEE needs the pre-move occupancy, so this is computed before
        // `make` even though it is only consulted once we know (after
        // making the move) whether it gave check.
        let see_ok = see::see_sign(refs.board, refs.mg, m);

        if !refs.board.make(m, refs.mg) {
            continue;
        }
        legal_moves += 1;

        let gives_check = refs.board.game_state.checkers != 0;
        let extension = if gives_check && see_ok && (ply as usize) < MAX_PLY - 2 { 1 } else { 0 };
        let child_depth = depth - 1 + extension;

        let mut reduction = 0i8;
        if is_quiet
            && !in_check
            && !gives_check
            && depth >= LMR_MIN_DEPTH
            && legal_moves >= LMR_MIN_MOVE_NUMBER
        {
            reduction = refs.search_info.reductions.get(is_pv, improving, depth, legal_moves);
        }

        let mut child_pv = Vec::new();
        let score = if legal_moves == 1 {
            -alpha_beta(refs, child_depth, ply + 1, -beta, -alpha, &mut child_pv)
        } else {
            let reduced = -alpha_beta(refs, child_depth - reduction, ply + 1, -alpha - 1, -alpha, &mut child_pv);
            if reduced > alpha {
                child_pv.clear();
                -alpha_beta(refs, child_depth, ply + 1, -beta, -alpha, &mut child_pv)
            } else {
                reduced
            }
        };

        refs.board.unmake();

        if refs.search_info.terminate != SearchTerminate::Nothing {
            return 0;
        }

        if score > best_score {
            best_score = score;
            pv.clear();
            pv.push(m);
            pv.extend(child_pv.iter().copied());
        }

        if score > alpha {
            alpha = score;
        }

        if alpha >= beta {
            if is_quiet {
                let piece = refs.board.piece_on(m.from());
                refs.search_info.update_history(piece, m.to(), (depth as i32) * (depth as i32));
            }
            break;
        }
    }

    if legal_moves == 0 {
        return if in_check { mated_in(ply) } else { STALEMATE };
    }

    best_score
}

fn quiescence(refs: &mut SearchRefs, ply: i8, mut alpha: i16, beta: i16) -> i16 {
    refs.search_info.nodes += 1;
    refs.search_info.seldepth = refs.search_info.seldepth.max(ply);
    if refs.search_info.nodes & CHECK_TERMINATION == 0 && (refs.signals.stop_requested() || Search::time_up(refs)) {
        refs.search_info.terminate = SearchTerminate::Stop;
        return 0;
    }

    if refs.board.is_draw() {
        return DRAW;
    }

    let in_check = refs.board.game_state.checkers != 0;
    let stand_pat = refs.evaluator.evaluate(refs.board, refs.mg);

    if !in_check {
        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
    }

    let move_type = if in_check { MoveType::Evasions } else { MoveType::Captures };
    let mut list = MoveList::new();
    refs.mg.generate_moves(refs.board, &mut list, move_type);
    order_moves(refs, &mut list, None);

    let mut legal_moves = 0usize;
    let mut best_score = if in_check { -INF } else { stand_pat };

    for index in 0..list.len() {
        let m = list.get_move(index);
        let captured = refs.board.piece_on(m.to());

        if !in_check && captured != Pieces::NONE && !see::see_sign(refs.board, refs.mg, m) {
            let gain = PIECE_VALUES_MG[captured];
            if stand_pat + gain + QS_DELTA_MARGIN < alpha {
                continue;
            }
        }

        if !refs.board.make(m, refs.mg) {
            continue;
        }
        legal_moves += 1;

        let score = -quiescence(refs, ply + 1, -beta, -alpha);
        refs.board.unmake();

        if refs.search_info.terminate != SearchTerminate::Nothing {
            return 0;
        }

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

    if in_check && legal_moves == 0 {
        return mated_in(ply);
    }

    best_score
}

/// Orders `list` in place: `hint` (the root PV move) first, then captures
/// by MVV/LVA, then quiet moves by history score. A plain insertion sort
/// is enough; move lists rarely exceed a few dozen entries.
fn order_moves(refs: &SearchRefs, list: &mut MoveList, hint: Option<Move>) {
    let mut scores = [0i32; MAX_LEGAL_MOVES];
    for index in 0..list.len() {
        scores[index] = score_move(refs, list.get_move(index), hint);
    }

    for i in 1..list.len() {
        let mut j = i;
        while j > 0 && scores[j - 1] < scores[j] {
            scores.swap(j - 1, j);
            list.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn score_move(refs: &SearchRefs, m: Move, hint: Option<Move>) -> i32 {
    const HINT_SCORE: i32 = 1_000_000;
    const CAPTURE_BASE: i32 = 100_000;

    if Some(m) == hint {
        return HINT_SCORE;
    }

    let captured = refs.board.piece_on(m.to());
    if captured != Pieces::NONE || m.is_en_passant() {
        let victim = if m.is_en_passant() { Pieces::PAWN } else { captured };
        let attacker = refs.board.piece_on(m.from());
        return CAPTURE_BASE + PIECE_VALUES_MG[victim] as i32 * 16 - PIECE_VALUES_MG[attacker] as i32;
    }

    let attacker = refs.board.piece_on(m.from());
    refs.search_info.history[attacker][m.to()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::defs::FEN_START_POSITION;
    use crate::engine::defs::Information;
    use crate::evaluation::Evaluator;
    use crate::movegen::MoveGenerator;
    use crate::search::defs::{is_mate_score, Signals, SearchInfo, SearchParams};
    use crossbeam_channel::unbounded;
    use std::sync::Arc;

    fn fresh(fen: &str) -> (Board, MoveGenerator, Evaluator, SearchParams, SearchInfo, Arc<Signals>) {
        let mut board = Board::new();
        board.fen_read(Some(fen)).unwrap();
        let mut info = SearchInfo::new();
        info.timer_start();
        (board, MoveGenerator::new(), Evaluator::new(), SearchParams::new(), info, Arc::new(Signals::new()))
    }

    #[test]
    fn finds_mate_in_one() {
        // Black king boxed in on g8; 1.Qg7# (queen protected by the pawn on h2... here by nothing, but g7 is
        // covered by the king on g1's queen-side rook file is irrelevant: mate is delivered directly).
        let (mut board, mg, mut evaluator, params, mut info, signals) = fresh("6k1/6pp/8/8/8/8/6PP/5QK1 w - - 0 1");
        let (_ctx, crx) = unbounded();
        let (rtx, _rrx) = unbounded::<Information>();

        let mut refs = SearchRefs {
            board: &mut board,
            mg: &mg,
            evaluator: &mut evaluator,
            search_params: &params,
            search_info: &mut info,
            signals: &signals,
            control_rx: &crx,
            report_tx: &rtx,
        };

        let mut pv = Vec::new();
        let score = alpha_beta(&mut refs, 3, 0, -INF, INF, &mut pv);
        assert!(is_mate_score(score));
        assert!(score > 0);
    }

    #[test]
    fn stalemate_position_scores_as_a_draw() {
        let (mut board, mg, mut evaluator, params, mut info, signals) = fresh("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let (_ctx, crx) = unbounded();
        let (rtx, _rrx) = unbounded::<Information>();

        let mut refs = SearchRefs {
            board: &mut board,
            mg: &mg,
            evaluator: &mut evaluator,
            search_params: &params,
            search_info: &mut info,
            signals: &signals,
            control_rx: &crx,
            report_tx: &rtx,
        };

        let mut pv = Vec::new();
        let score = alpha_beta(&mut refs, 1, 0, -INF, INF, &mut pv);
        assert_eq!(score, STALEMATE);
    }

    #[test]
    fn quiescence_recaptures_a_hanging_queen() {
        let (mut board, mg, mut evaluator, params, mut info, signals) =
            fresh("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let (_ctx, crx) = unbounded();
        let (rtx, _rrx) = unbounded::<Information>();

        let mut refs = SearchRefs {
            board: &mut board,
            mg: &mg,
            evaluator: &mut evaluator,
            search_params: &params,
            search_info: &mut info,
            signals: &signals,
            control_rx: &crx,
            report_tx: &rtx,
        };

        let score = quiescence(&mut refs, 0, -INF, INF);
        assert!(score > PIECE_VALUES_MG[Pieces::PAWN]);
    }

    #[test]
    fn root_search_returns_a_non_empty_pv_from_the_starting_position() {
        let (mut board, mg, mut evaluator, params, mut info, signals) = fresh(FEN_START_POSITION);
        let (_ctx, crx) = unbounded();
        let (rtx, _rrx) = unbounded::<Information>();

        let mut refs = SearchRefs {
            board: &mut board,
            mg: &mg,
            evaluator: &mut evaluator,
            search_params: &params,
            search_info: &mut info,
            signals: &signals,
            control_rx: &crx,
            report_tx: &rtx,
        };

        let mut pv = Vec::new();
        alpha_beta(&mut refs, 2, 0, -INF, INF, &mut pv);
        assert!(!pv.is_empty());
    }
}

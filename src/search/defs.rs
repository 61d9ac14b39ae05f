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

// Constants, enums and small data structures shared between the search
// driver (search/mod.rs), the recursive search (search/alpha_beta.rs) and
// the time manager (search/time.rs). There is deliberately no
// transposition table anywhere in this module: every position is searched
// from scratch, and the only persistent state a search keeps between
// iterations is the root move list and the history table.

use crate::{
    board::Board,
    defs::{Move, MAX_PLY, NrOf, Sides},
    engine::defs::Information,
    evaluation::Evaluator,
    movegen::MoveGenerator,
};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub use super::time::OVERHEAD;

// ===== CORE SEARCH CONSTANTS =====

pub const INF: i16 = 25_000;
pub const CHECKMATE: i16 = 24_000;
pub const CHECKMATE_THRESHOLD: i16 = 23_900;
pub const STALEMATE: i16 = 0;
pub const DRAW: i16 = 0;

/// Bitmask for polling `Signals::stop`: the atomic load happens every
/// `CHECK_TERMINATION + 1` nodes rather than on every node.
pub const CHECK_TERMINATION: usize = 0x7FF;

/// Bitmask for sending `SearchStats` reports to the GUI.
pub const SEND_STATS: usize = 0x7FFFF;
pub const MIN_TIME_STATS: u128 = 2_000;
pub const MIN_TIME_CURR_MOVE: u128 = 1_000;

/// History heuristic scores are clamped to +/- this value.
pub const HISTORY_MAX: i32 = 256;

/// A position with `|score| >= CHECKMATE_THRESHOLD` is a forced mate;
/// `mate_distance` turns that into a "mate in N" ply count.
pub fn mate_distance(score: i16) -> i16 {
    (CHECKMATE - score.abs() + 1) / 2
}

pub fn mated_in(ply: i8) -> i16 {
    -CHECKMATE + ply as i16
}

pub fn mate_in(ply: i8) -> i16 {
    CHECKMATE - ply as i16
}

pub fn is_mate_score(score: i16) -> bool {
    score.abs() >= CHECKMATE_THRESHOLD
}

// ===== SHARED ATOMIC SIGNALS =====

/// Lock-free flags read by the search thread and written by the timer
/// thread (or by an incoming UCI `stop`/`ponderhit`). See the scheduling
/// notes in `search/mod.rs` for which thread owns which write.
pub struct Signals {
    pub stop: AtomicBool,
    pub stop_on_ponder_hit: AtomicBool,
    pub failed_low_at_root: AtomicBool,
    pub first_root_move: AtomicBool,
}

impl Signals {
    pub fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
            stop_on_ponder_hit: AtomicBool::new(false),
            failed_low_at_root: AtomicBool::new(false),
            first_root_move: AtomicBool::new(false),
        }
    }

    pub fn reset(&self) {
        self.stop.store(false, Ordering::Relaxed);
        self.stop_on_ponder_hit.store(false, Ordering::Relaxed);
        self.failed_low_at_root.store(false, Ordering::Relaxed);
        self.first_root_move.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

// ===== SEARCH CONTROL =====

#[derive(PartialEq, Clone)]
pub enum SearchControl {
    Start(SearchParams),
    Stop,
    PonderHit,
    Quit,
    Nothing,
}

#[derive(PartialEq, Copy, Clone)]
pub enum SearchTerminate {
    Stop,
    Quit,
    Nothing,
}

#[derive(PartialEq, Copy, Clone)]
pub enum SearchMode {
    Depth,
    MoveTime,
    Nodes,
    GameTime,
    Ponder,
    Infinite,
    Nothing,
}

/// Per-side time budget, as received from a UCI `go wtime ... btime ...`
/// command. `moves_to_go` is `None` under an increment-only time control.
#[derive(PartialEq, Copy, Clone)]
pub struct GameTime {
    pub wtime: u128,
    pub btime: u128,
    pub winc: u128,
    pub binc: u128,
    pub moves_to_go: Option<usize>,
}

impl GameTime {
    pub fn new(wtime: u128, btime: u128, winc: u128, binc: u128, moves_to_go: Option<usize>) -> Self {
        Self {
            wtime,
            btime,
            winc,
            binc,
            moves_to_go,
        }
    }
}

#[derive(PartialEq, Clone)]
pub struct SearchParams {
    pub depth: i8,
    pub move_time: u128,
    pub nodes: usize,
    pub game_time: GameTime,
    pub search_mode: SearchMode,
    pub quiet: bool,
    pub ponder: bool,
    /// Restricts the root move list to exactly these moves (UCI "go
    /// searchmoves"); empty means "every legal move".
    pub search_moves: Vec<Move>,
    /// Stop as soon as a mate in this many moves (or shorter) is proven;
    /// 0 means unlimited.
    pub mate: u8,
}

impl SearchParams {
    pub fn new() -> Self {
        Self {
            depth: MAX_PLY as i8,
            move_time: 0,
            nodes: 0,
            game_time: GameTime::new(0, 0, 0, 0, None),
            search_mode: SearchMode::Nothing,
            quiet: false,
            ponder: false,
            search_moves: Vec::new(),
            mate: 0,
        }
    }

    pub fn is_game_time(&self) -> bool {
        matches!(self.search_mode, SearchMode::GameTime | SearchMode::Ponder)
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::new()
    }
}

/// A move in the root move list: the move itself, its score from the
/// current and previous iteration, and the principal variation it leads
/// to. Iterative deepening stable-sorts this list by `score` between
/// iterations so the last iteration's best move is always tried first.
#[derive(Clone)]
pub struct RootMove {
    pub m: Move,
    pub score: i16,
    pub previous_score: i16,
    pub pv: Vec<Move>,
}

impl RootMove {
    pub fn new(m: Move) -> Self {
        Self {
            m,
            score: -INF,
            previous_score: -INF,
            pv: Vec::new(),
        }
    }
}

/// Late-move-reduction amounts, precomputed once per search: `PV` nodes
/// use `log(d)*log(mc)/3.0`; non-PV nodes use
/// `0.33 + log(d)*log(mc)/2.25`, bumped by one ply when the raw value is
/// at least 2 and the node is non-improving. Indexed `[is_pv][improving]
/// [depth][move_number]`, both indices clamped into range.
pub struct Reductions {
    table: [[[[i8; Self::MAX_MOVE_NUMBER]; Self::MAX_DEPTH]; 2]; 2],
}

impl Reductions {
    const MAX_DEPTH: usize = 64;
    const MAX_MOVE_NUMBER: usize = 64;

    pub fn new() -> Self {
        let mut table = [[[[0i8; Self::MAX_MOVE_NUMBER]; Self::MAX_DEPTH]; 2]; 2];

        for (pv, pv_table) in table.iter_mut().enumerate() {
            for (improving, improving_table) in pv_table.iter_mut().enumerate() {
                for depth in 1..Self::MAX_DEPTH {
                    for move_number in 1..Self::MAX_MOVE_NUMBER {
                        let d = (depth as f64).ln();
                        let mc = (move_number as f64).ln();

                        let mut r = if pv == 1 {
                            d * mc / 3.0
                        } else {
                            0.33 + d * mc / 2.25
                        };

                        if pv == 0 && improving == 0 && r >= 2.0 {
                            r += 1.0;
                        }

                        improving_table[depth][move_number] = r.max(0.0) as i8;
                    }
                }
            }
        }

        Self { table }
    }

    pub fn get(&self, is_pv: bool, improving: bool, depth: i8, move_number: usize) -> i8 {
        let depth = (depth.max(1) as usize).min(Self::MAX_DEPTH - 1);
        let move_number = move_number.max(1).min(Self::MAX_MOVE_NUMBER - 1);
        self.table[is_pv as usize][improving as usize][depth][move_number]
    }
}

impl Default for Reductions {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SearchInfo {
    start_time: Option<Instant>,
    pub depth: i8,
    pub seldepth: i8,
    pub nodes: usize,
    pub last_stats_sent: u128,
    pub last_curr_move_sent: u128,
    pub allocated_time: u128,
    pub terminate: SearchTerminate,
    pub root_moves: Vec<RootMove>,
    pub root_move_index: usize,
    /// (piece, destination) -> score, per spec's quiet move ordering;
    /// clamped to +/- HISTORY_MAX.
    pub history: [[i32; NrOf::SQUARES]; NrOf::PIECE_TYPES],
    /// Static eval recorded at each ply, for the "improving" test used by
    /// late move reductions. `None` means "no snapshot" (treated as
    /// non-improving).
    pub static_eval: [Option<i16>; MAX_PLY],
    /// Late-move-reduction table, built once per search (see `Reductions`).
    pub reductions: Reductions,
}

impl SearchInfo {
    pub fn new() -> Self {
        Self {
            start_time: None,
            depth: 0,
            seldepth: 0,
            nodes: 0,
            last_stats_sent: 0,
            last_curr_move_sent: 0,
            allocated_time: 0,
            terminate: SearchTerminate::Nothing,
            root_moves: Vec::new(),
            root_move_index: 0,
            history: [[0; NrOf::SQUARES]; NrOf::PIECE_TYPES],
            static_eval: [None; MAX_PLY],
            reductions: Reductions::new(),
        }
    }

    pub fn timer_start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn timer_elapsed(&self) -> u128 {
        self.start_time.map(|t| t.elapsed().as_millis()).unwrap_or(0)
    }

    pub fn interrupted(&self) -> bool {
        self.terminate != SearchTerminate::Nothing
    }

    pub fn update_history(&mut self, piece: usize, to: usize, bonus: i32) {
        let slot = &mut self.history[piece][to];
        *slot = (*slot + bonus).clamp(-HISTORY_MAX, HISTORY_MAX);
    }
}

impl Default for SearchInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(PartialEq, Copy, Clone)]
pub enum Bound {
    Upper,
    Lower,
}

#[derive(PartialEq, Clone)]
pub struct SearchSummary {
    pub depth: i8,
    pub seldepth: i8,
    pub time: u128,
    pub cp: i16,
    pub mate: i16,
    pub nodes: usize,
    pub nps: usize,
    pub pv: Vec<Move>,
    pub bound: Option<Bound>,
}

impl SearchSummary {
    pub fn pv_as_string(&self) -> String {
        let mut pv = String::new();
        for m in self.pv.iter() {
            pv.push(' ');
            pv.push_str(&m.as_string());
        }
        pv
    }
}

#[derive(PartialEq, Clone)]
pub struct SearchCurrentMove {
    pub curr_move: Move,
    pub curr_move_number: u8,
}

impl SearchCurrentMove {
    pub fn new(curr_move: Move, curr_move_number: u8) -> Self {
        Self {
            curr_move,
            curr_move_number,
        }
    }
}

#[derive(PartialEq, Clone)]
pub struct SearchStats {
    pub time: u128,
    pub nodes: usize,
    pub nps: usize,
}

impl SearchStats {
    pub fn new(time: u128, nodes: usize, nps: usize) -> Self {
        Self { time, nodes, nps }
    }
}

#[derive(PartialEq, Clone)]
pub enum SearchReport {
    Finished(Move, Option<Move>),
    SearchSummary(SearchSummary),
    SearchCurrentMove(SearchCurrentMove),
    SearchStats(SearchStats),
    InfoString(String),
}

/// Everything the recursive search needs, bundled up so `alpha_beta` and
/// `quiescence` don't have to take a dozen separate parameters.
pub struct SearchRefs<'a> {
    pub board: &'a mut Board,
    pub mg: &'a MoveGenerator,
    pub evaluator: &'a mut Evaluator,
    pub search_params: &'a SearchParams,
    pub search_info: &'a mut SearchInfo,
    pub signals: &'a Arc<Signals>,
    pub control_rx: &'a Receiver<SearchControl>,
    pub report_tx: &'a Sender<Information>,
}

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

pub mod defs;
pub mod fen;
mod gamestate;
mod history;
mod playmove;
pub mod see;
pub mod zobrist;

use self::{
    defs::{Pieces, BB_SQUARES},
    gamestate::GameState,
    history::History,
    zobrist::{ZobristKey, ZobristRandoms},
};
use crate::{
    defs::{Bitboard, NrOf, Piece, Side, Sides, Square, EMPTY},
    evaluation::psqt::{self, FLIP, PSQT_MG},
    misc::bits,
    movegen::MoveGenerator,
};
use std::sync::Arc;

// This file implements the engine's board representation; it is bit-board
// based, with the least significant bit being A1.
pub struct Board {
    pub bb_pieces: [[Bitboard; NrOf::PIECE_TYPES]; Sides::BOTH],
    pub bb_side: [Bitboard; Sides::BOTH],
    pub game_state: GameState,
    pub history: History,
    pub piece_list: [Piece; NrOf::SQUARES],
    // Count of each (side, piece) currently on the board; drives the
    // incremental material_key maintained in put_piece/remove_piece.
    material_count: [[u8; NrOf::PIECE_TYPES]; Sides::BOTH],
    zr: Arc<ZobristRandoms>,
}

// Public functions for use by other modules.
impl Board {
    // Creates a new board with either the provided FEN, or the starting position.
    pub fn new() -> Self {
        Self {
            bb_pieces: [[EMPTY; NrOf::PIECE_TYPES]; Sides::BOTH],
            bb_side: [EMPTY; Sides::BOTH],
            game_state: GameState::new(),
            history: History::new(),
            piece_list: [Pieces::NONE; NrOf::SQUARES],
            material_count: [[0; NrOf::PIECE_TYPES]; Sides::BOTH],
            zr: Arc::new(ZobristRandoms::new()),
        }
    }

    // Return a bitboard with locations of a certain piece type for one of the sides.
    pub fn get_pieces(&self, piece: Piece, side: Side) -> Bitboard {
        self.bb_pieces[side][piece]
    }

    // Return a bitboard containing all the pieces on the board.
    pub fn occupancy(&self) -> Bitboard {
        self.bb_side[Sides::WHITE] | self.bb_side[Sides::BLACK]
    }

    // Returns the side to move.
    pub fn us(&self) -> usize {
        self.game_state.active_color as usize
    }

    // Returns the side that is NOT moving.
    pub fn opponent(&self) -> usize {
        (self.game_state.active_color ^ 1) as usize
    }

    // Returns the square the king is currently on.
    pub fn king_square(&self, side: Side) -> Square {
        self.bb_pieces[side][Pieces::KING].trailing_zeros() as Square
    }

    // Returns the piece type on a square, or Pieces::NONE if empty.
    pub fn piece_on(&self, square: Square) -> Piece {
        self.piece_list[square]
    }

    // Returns the side owning the piece on a square, if any.
    pub fn side_on(&self, square: Square) -> Option<Side> {
        if self.bb_side[Sides::WHITE] & BB_SQUARES[square] != 0 {
            Some(Sides::WHITE)
        } else if self.bb_side[Sides::BLACK] & BB_SQUARES[square] != 0 {
            Some(Sides::BLACK)
        } else {
            None
        }
    }

    pub fn square_on_file_rank(square: Square) -> (usize, usize) {
        (square % 8, square / 8)
    }

    // Remove a piece from the board, for the given side, piece, and square.
    pub fn remove_piece(&mut self, side: Side, piece: Piece, square: Square) {
        self.bb_pieces[side][piece] ^= BB_SQUARES[square];
        self.bb_side[side] ^= BB_SQUARES[square];
        self.piece_list[square] = Pieces::NONE;
        self.game_state.zobrist_key ^= self.zr.piece(side, piece, square);
        if piece == Pieces::PAWN {
            self.game_state.pawn_key ^= self.zr.piece(side, piece, square);
        }

        let count = self.material_count[side][piece];
        self.game_state.material_key ^= self.zr.material(side, piece, count as usize);
        self.material_count[side][piece] = count - 1;

        let flip = side == Sides::WHITE;
        let s = if flip { FLIP[square] } else { square };
        self.game_state.psqt[side] -= PSQT_MG[piece][s];
    }

    // Put a piece onto the board, for the given side, piece, and square.
    pub fn put_piece(&mut self, side: Side, piece: Piece, square: Square) {
        self.bb_pieces[side][piece] |= BB_SQUARES[square];
        self.bb_side[side] |= BB_SQUARES[square];
        self.piece_list[square] = piece;
        self.game_state.zobrist_key ^= self.zr.piece(side, piece, square);
        if piece == Pieces::PAWN {
            self.game_state.pawn_key ^= self.zr.piece(side, piece, square);
        }

        let count = self.material_count[side][piece] + 1;
        self.material_count[side][piece] = count;
        self.game_state.material_key ^= self.zr.material(side, piece, count as usize);

        let flip = side == Sides::WHITE;
        let s = if flip { FLIP[square] } else { square };
        self.game_state.psqt[side] += PSQT_MG[piece][s];
    }

    // Remove a piece from the from-square, and put it onto the to-square.
    pub fn move_piece(&mut self, side: Side, piece: Piece, from: Square, to: Square) {
        self.remove_piece(side, piece, from);
        self.put_piece(side, piece, to);
    }

    // Set a square as being the current ep-square.
    pub fn set_ep_square(&mut self, square: Square) {
        self.game_state.zobrist_key ^= self.zr.en_passant(self.game_state.en_passant);
        self.game_state.en_passant = Some(square as u8);
        self.game_state.zobrist_key ^= self.zr.en_passant(self.game_state.en_passant);
    }

    // Clear the ep-square. (If the ep-square is None already, nothing changes.)
    pub fn clear_ep_square(&mut self) {
        self.game_state.zobrist_key ^= self.zr.en_passant(self.game_state.en_passant);
        self.game_state.en_passant = None;
        self.game_state.zobrist_key ^= self.zr.en_passant(self.game_state.en_passant);
    }

    // Swap side from WHITE <==> BLACK
    pub fn swap_side(&mut self) {
        self.game_state.zobrist_key ^= self.zr.side(self.game_state.active_color as usize);
        self.game_state.active_color ^= 1;
        self.game_state.zobrist_key ^= self.zr.side(self.game_state.active_color as usize);
    }

    // Update castling permissions and take Zobrist-key into account.
    pub fn update_castling_permissions(&mut self, new_permissions: u8) {
        self.game_state.zobrist_key ^= self.zr.castling(self.game_state.castling);
        self.game_state.castling = new_permissions;
        self.game_state.zobrist_key ^= self.zr.castling(self.game_state.castling);
    }

    // Count total pieces on the board (excluding pawns)
    pub fn piece_count(&self) -> usize {
        let mut count = 0;
        for side in 0..Sides::BOTH {
            for piece in 0..Pieces::PAWN {
                count += self.bb_pieces[side][piece].count_ones() as usize;
            }
        }
        count
    }

    // Count total pieces including pawns
    pub fn total_piece_count(&self) -> usize {
        let mut count = 0;
        for side in 0..Sides::BOTH {
            for piece in 0..NrOf::PIECE_TYPES {
                count += self.bb_pieces[side][piece].count_ones() as usize;
            }
        }
        count
    }

    // 50-move rule. A stalemate/checkmate still takes priority over this in
    // the search, so this is only consulted once no capturing move exists.
    pub fn is_draw_by_halfmove_clock(&self) -> bool {
        self.game_state.halfmove_clock >= 100
    }

    // Two earlier positions (reachable within the irreversible-move window
    // bounded by halfmove_clock) with the same zobrist key is treated as a
    // draw by repetition, matching the common "no need to wait for a third
    // occurrence inside search" shortcut.
    pub fn is_repetition(&self) -> bool {
        let current = self.game_state.zobrist_key;
        let clock = self.game_state.halfmove_clock as usize;
        let len = self.history.len();
        if len < 4 || clock < 4 {
            return false;
        }

        let lookback = clock.min(len);
        let mut seen = 0;
        for i in 1..=lookback {
            if self.history.get_ref(len - i).zobrist_key == current {
                seen += 1;
                if seen >= 1 {
                    return true;
                }
            }
        }
        false
    }

    // King vs king, and king+minor vs king, cannot be checkmated.
    pub fn is_insufficient_material(&self) -> bool {
        if self.bb_pieces[Sides::WHITE][Pieces::PAWN] != 0
            || self.bb_pieces[Sides::BLACK][Pieces::PAWN] != 0
            || self.bb_pieces[Sides::WHITE][Pieces::ROOK] != 0
            || self.bb_pieces[Sides::BLACK][Pieces::ROOK] != 0
            || self.bb_pieces[Sides::WHITE][Pieces::QUEEN] != 0
            || self.bb_pieces[Sides::BLACK][Pieces::QUEEN] != 0
        {
            return false;
        }

        let minors = |side: Side| -> u32 {
            self.bb_pieces[side][Pieces::BISHOP].count_ones() + self.bb_pieces[side][Pieces::KNIGHT].count_ones()
        };

        minors(Sides::WHITE) <= 1 && minors(Sides::BLACK) <= 1
    }

    pub fn is_draw(&self) -> bool {
        self.is_draw_by_halfmove_clock() || self.is_repetition() || self.is_insufficient_material()
    }

    // Pieces of `side` that are pinned to their own king by an enemy
    // slider: the only squares such a piece may legally move to are those
    // between the king and the pinner (or the pinner itself).
    pub fn pinned_pieces(&self, side: Side, mg: &MoveGenerator) -> Bitboard {
        let them = side ^ 1;
        let king_sq = self.king_square(side);
        let own = self.bb_side[side];

        let rook_like = self.bb_pieces[them][Pieces::ROOK] | self.bb_pieces[them][Pieces::QUEEN];
        let bishop_like = self.bb_pieces[them][Pieces::BISHOP] | self.bb_pieces[them][Pieces::QUEEN];

        let mut pinners = (mg.get_slider_attacks(Pieces::ROOK, king_sq, self.bb_side[them]) & rook_like)
            | (mg.get_slider_attacks(Pieces::BISHOP, king_sq, self.bb_side[them]) & bishop_like);

        let mut pinned = 0;
        while pinners != 0 {
            let sq = bits::next(&mut pinners);
            let between = MoveGenerator::between(king_sq, sq);
            let blockers = between & own;
            if blockers != 0 && blockers.count_ones() == 1 {
                pinned |= blockers;
            }
        }
        pinned
    }
}

// Private board functions (for initializating on startup)
impl Board {
    // Resets/wipes the board. Used by the FEN reader function.
    fn reset(&mut self) {
        self.bb_pieces = [[0; NrOf::PIECE_TYPES]; Sides::BOTH];
        self.bb_side = [EMPTY; Sides::BOTH];
        self.game_state = GameState::new();
        self.history.clear();
        self.piece_list = [Pieces::NONE; NrOf::SQUARES];
        self.material_count = [[0; NrOf::PIECE_TYPES]; Sides::BOTH];
    }

    // Main initialization function. This is used to initialize the "other"
    // bit-boards that are not set up by the FEN-reader function.
    fn init(&mut self) {
        // Gather all the pieces of a side into one bitboard; one bitboard
        // with all the white pieces, and one with all black pieces.
        let pieces_per_side_bitboards = self.init_pieces_per_side_bitboards();
        self.bb_side[Sides::WHITE] = pieces_per_side_bitboards.0;
        self.bb_side[Sides::BLACK] = pieces_per_side_bitboards.1;

        // Initialize the piece list, zobrist/pawn/material keys, and the
        // material_count table. These will later be updated incrementally.
        self.piece_list = self.init_piece_list();
        self.game_state.zobrist_key = self.init_zobrist_key();
        self.game_state.pawn_key = self.init_pawn_key();
        self.init_material();

        let psqt = psqt::apply(self);
        self.game_state.psqt[Sides::WHITE] = psqt.0;
        self.game_state.psqt[Sides::BLACK] = psqt.1;
    }

    fn init_pawn_key(&self) -> ZobristKey {
        let mut key = 0;
        for side in [Sides::WHITE, Sides::BLACK] {
            let mut pawns = self.bb_pieces[side][Pieces::PAWN];
            while pawns != 0 {
                let square = bits::next(&mut pawns);
                key ^= self.zr.piece(side, Pieces::PAWN, square);
            }
        }
        key
    }

    fn init_material(&mut self) {
        self.material_count = [[0; NrOf::PIECE_TYPES]; Sides::BOTH];
        self.game_state.material_key = 0;
        for side in [Sides::WHITE, Sides::BLACK] {
            for piece in 0..NrOf::PIECE_TYPES {
                let count = self.bb_pieces[side][piece].count_ones() as u8;
                self.material_count[side][piece] = count;
                for c in 1..=count {
                    self.game_state.material_key ^= self.zr.material(side, piece, c as usize);
                }
            }
        }
    }

    // Gather the pieces for each side into their own bitboard.
    fn init_pieces_per_side_bitboards(&self) -> (Bitboard, Bitboard) {
        let mut bb_white: Bitboard = 0;
        let mut bb_black: Bitboard = 0;

        // Iterate over the bitboards of every piece type.
        for (bb_w, bb_b) in self.bb_pieces[Sides::WHITE]
            .iter()
            .zip(self.bb_pieces[Sides::BLACK].iter())
        {
            bb_white |= *bb_w;
            bb_black |= *bb_b;
        }

        // Return a bitboard with all white pieces, and a bitboard with all
        // black pieces.
        (bb_white, bb_black)
    }

    // Initialize the piece list. This list is used to quickly determine
    // which piece type (rook, knight...) is on a square without having to
    // loop through the piece bitboards.
    fn init_piece_list(&self) -> [Piece; NrOf::SQUARES] {
        let bb_w = self.bb_pieces[Sides::WHITE]; // White piece bitboards
        let bb_b = self.bb_pieces[Sides::BLACK]; // Black piece bitboards
        let mut piece_list: [Piece; NrOf::SQUARES] = [Pieces::NONE; NrOf::SQUARES];

        // piece_type is enumerated, from 0 to 6.
        // 0 = KING, 1 = QUEEN, and so on, as defined in board::defs.
        for (piece_type, (w, b)) in bb_w.iter().zip(bb_b.iter()).enumerate() {
            let mut white_pieces = *w; // White pieces of type "piece_type"
            let mut black_pieces = *b; // Black pieces of type "piece_type"

            // Put white pieces into the piece list.
            while white_pieces > 0 {
                let square = bits::next(&mut white_pieces);
                piece_list[square] = piece_type;
            }

            // Put black pieces into the piece list.
            while black_pieces > 0 {
                let square = bits::next(&mut black_pieces);
                piece_list[square] = piece_type;
            }
        }

        piece_list
    }

    // Initialize the zobrist hash. This hash will later be updated incrementally.
    fn init_zobrist_key(&self) -> ZobristKey {
        // Keep the key here.
        let mut key: u64 = 0;

        // Same here: "bb_w" is shorthand for
        // "self.bb_pieces[Sides::WHITE]".
        let bb_w = self.bb_pieces[Sides::WHITE];
        let bb_b = self.bb_pieces[Sides::BLACK];

        // Iterate through all piece types, for both white and black.
        // "piece_type" is enumerated, and it'll start at 0 (KING), then 1
        // (QUEEN), and so on.
        for (piece_type, (w, b)) in bb_w.iter().zip(bb_b.iter()).enumerate() {
            // Assume the first iteration; piece_type will be 0 (KING). The
            // following two statements will thus get all the pieces of
            // type "KING" for white and black. (This will obviously only
            // be one king, but with rooks, there will be two in the
            // starting position.)
            let mut white_pieces = *w;
            let mut black_pieces = *b;

            // Iterate through all the piece locations of the current piece
            // type. Get the square the piece is on, and then hash that
            // square/piece combination into the zobrist key.
            while white_pieces > 0 {
                let square = bits::next(&mut white_pieces);
                key ^= self.zr.piece(Sides::WHITE, piece_type, square);
            }

            // Same for black.
            while black_pieces > 0 {
                let square = bits::next(&mut black_pieces);
                key ^= self.zr.piece(Sides::BLACK, piece_type, square);
            }
        }

        // Hash the castling, active color, and en-passant state into the key.
        key ^= self.zr.castling(self.game_state.castling);
        key ^= self.zr.side(self.game_state.active_color as usize);
        key ^= self.zr.en_passant(self.game_state.en_passant);

        // Done; return the key.
        key
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            bb_pieces: self.bb_pieces,
            bb_side: self.bb_side,
            game_state: self.game_state,
            history: self.history.clone(),
            piece_list: self.piece_list,
            material_count: self.material_count,
            zr: Arc::clone(&self.zr),
        }
    }
}

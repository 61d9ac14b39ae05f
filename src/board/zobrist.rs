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

// Fixed-seed Zobrist key tables. A fixed seed makes keys reproducible
// across runs, which the perft/FEN-round-trip tests rely on.

use crate::defs::{NrOf, Sides};
use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

pub type ZobristKey = u64;

const ZOBRIST_SEED: u64 = 0x7E57_ABCD_1234_5678;

// Material key is indexed by how many pieces of a given (side, piece) kind
// are currently on the board, not by square. Up to 10 covers every legal
// count reachable through promotion (9 queens + the original, in theory).
const MAX_MATERIAL_COUNT: usize = 10;

pub struct ZobristRandoms {
    piece: [[[ZobristKey; NrOf::SQUARES]; NrOf::PIECE_TYPES]; Sides::BOTH],
    castling: [ZobristKey; NrOf::CASTLING_PERMISSIONS],
    en_passant: [ZobristKey; 8],
    material: [[[ZobristKey; MAX_MATERIAL_COUNT]; NrOf::PIECE_TYPES]; Sides::BOTH],
    side: ZobristKey,
}

impl ZobristRandoms {
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(ZOBRIST_SEED);
        let mut piece = [[[0u64; NrOf::SQUARES]; NrOf::PIECE_TYPES]; Sides::BOTH];
        for side in piece.iter_mut() {
            for kind in side.iter_mut() {
                for square in kind.iter_mut() {
                    *square = rng.next_u64();
                }
            }
        }

        let mut castling = [0u64; NrOf::CASTLING_PERMISSIONS];
        for c in castling.iter_mut() {
            *c = rng.next_u64();
        }

        let mut en_passant = [0u64; 8];
        for e in en_passant.iter_mut() {
            *e = rng.next_u64();
        }

        let mut material = [[[0u64; MAX_MATERIAL_COUNT]; NrOf::PIECE_TYPES]; Sides::BOTH];
        for side in material.iter_mut() {
            for kind in side.iter_mut() {
                for count in kind.iter_mut() {
                    *count = rng.next_u64();
                }
            }
        }

        let side = rng.next_u64();

        Self {
            piece,
            castling,
            en_passant,
            material,
            side,
        }
    }

    pub fn piece(&self, side: usize, piece: usize, square: usize) -> ZobristKey {
        self.piece[side][piece][square]
    }

    // Indexed by the count of this (side, piece) already on the board
    // *before* the piece being added/removed, so toggling the same count
    // twice in a row (add then remove, or vice versa) cancels out.
    pub fn material(&self, side: usize, piece: usize, count: usize) -> ZobristKey {
        self.material[side][piece][count.min(MAX_MATERIAL_COUNT - 1)]
    }

    pub fn castling(&self, permissions: u8) -> ZobristKey {
        self.castling[permissions as usize & 0xF]
    }

    // `None` contributes no key: toggling xors the same (zero) value in
    // and out, which keeps the XOR-twice idiom in Board::set/clear_ep_square
    // correct whether or not a square was previously set.
    pub fn en_passant(&self, square: Option<u8>) -> ZobristKey {
        match square {
            Some(sq) => self.en_passant[(sq % 8) as usize],
            None => 0,
        }
    }

    pub fn side(&self, side: usize) -> ZobristKey {
        if side == Sides::WHITE {
            0
        } else {
            self.side
        }
    }
}

impl Default for ZobristRandoms {
    fn default() -> Self {
        Self::new()
    }
}

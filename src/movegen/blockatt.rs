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

// Carry-Rippler enumeration of every subset of a mask, and the reference
// (slow, ray-traced) attack board for each subset. Used once at startup
// to build the magic attack tables.

use super::masks::{bishop_attacks_on_the_fly, rook_attacks_on_the_fly};
use crate::defs::Bitboard;

pub fn create_blocker_boards(mask: Bitboard) -> Vec<Bitboard> {
    let bits: Vec<u32> = (0..64).filter(|&b| mask & (1u64 << b) != 0).collect();
    let n = bits.len();
    let count = 1usize << n;
    let mut boards = Vec::with_capacity(count);

    for index in 0..count {
        let mut board = 0u64;
        for (i, &bit) in bits.iter().enumerate() {
            if index & (1 << i) != 0 {
                board |= 1u64 << bit;
            }
        }
        boards.push(board);
    }

    boards
}

pub fn create_rook_attack_boards(square: u8, blockers: &[Bitboard]) -> Vec<Bitboard> {
    blockers
        .iter()
        .map(|&occ| rook_attacks_on_the_fly(square, occ))
        .collect()
}

pub fn create_bishop_attack_boards(square: u8, blockers: &[Bitboard]) -> Vec<Bitboard> {
    blockers
        .iter()
        .map(|&occ| bishop_attacks_on_the_fly(square, occ))
        .collect()
}

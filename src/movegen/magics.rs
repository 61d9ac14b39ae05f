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

use crate::defs::Bitboard;
use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

#[derive(Copy, Clone, Default)]
pub struct Magics {
    pub mask: Bitboard,
    pub shift: u8,
    pub magic: u64,
    pub offset: u32,
}

impl Magics {
    #[inline(always)]
    pub fn get_index(&self, occupancy: Bitboard) -> usize {
        let blockers = occupancy & self.mask;
        let hash = blockers.wrapping_mul(self.magic) >> self.shift;
        self.offset as usize + hash as usize
    }
}

// A fixed per-square seed keeps magics reproducible across runs (spec
// §4.1/§9): the same seed always finds the same magic for the same mask.
fn seed_for(square: u8, is_rook: bool) -> u64 {
    let tag = if is_rook { 0xA11CE_u64 } else { 0xB15C0_u64 };
    0x9E37_79B9_7F4A_7C15 ^ tag ^ (square as u64).wrapping_mul(0x1000_0000_01)
}

/// Sparse 64-bit candidates (few set bits) converge on a working magic
/// far faster than uniform random u64s, since the product needs to
/// scatter only `popcount(mask)` relevant bits into the top of a u64.
fn sparse_random(rng: &mut ChaCha8Rng) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

/// Trial-and-error magic search: pick a random sparse multiplier, check
/// that it maps every blocker subset of `mask` to a distinct index
/// (relative to the subset's reference attack board), and keep retrying
/// until a collision-free magic is found.
pub fn find_magic(
    square: u8,
    is_rook: bool,
    mask: Bitboard,
    blockers: &[Bitboard],
    attacks: &[Bitboard],
) -> (u64, Vec<Bitboard>) {
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let size = 1usize << bits;
    let mut rng = ChaCha8Rng::seed_from_u64(seed_for(square, is_rook));

    loop {
        let magic = sparse_random(&mut rng);
        // A magic is useless if multiplying the mask by it doesn't
        // scatter bits into the high byte.
        if ((mask.wrapping_mul(magic)) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        let mut table = vec![u64::MAX; size];
        let mut ok = true;
        for (&occ, &attack) in blockers.iter().zip(attacks.iter()) {
            let index = ((occ.wrapping_mul(magic)) >> shift) as usize;
            if table[index] == u64::MAX {
                table[index] = attack;
            } else if table[index] != attack {
                ok = false;
                break;
            }
        }

        if ok {
            for slot in table.iter_mut() {
                if *slot == u64::MAX {
                    *slot = 0;
                }
            }
            return (magic, table);
        }
    }
}

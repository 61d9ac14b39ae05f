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

// The engine regenerates its magic numbers by live search every time it
// starts up (see movegen::init), so there is no table of hardcoded
// constants to maintain. This tool exists purely to let someone watch
// that search run in isolation and see the numbers and timings it finds,
// without paying the cost of bringing up the rest of the engine.

use crate::movegen::blockatt::{create_blocker_boards, create_rook_attack_boards, create_bishop_attack_boards};
use crate::movegen::magics::find_magic;
use crate::movegen::masks::{
    bishop_attacks_on_the_fly, create_bishop_mask, create_rook_mask, rook_attacks_on_the_fly,
};
use std::time::Instant;

pub fn run() {
    println!("Searching rook magics...");
    search_for(true);

    println!("Searching bishop magics...");
    search_for(false);
}

fn search_for(is_rook: bool) {
    let now = Instant::now();

    for square in 0u8..64 {
        let mask = if is_rook {
            create_rook_mask(square)
        } else {
            create_bishop_mask(square)
        };

        let blockers = create_blocker_boards(mask);
        let attacks: Vec<_> = blockers
            .iter()
            .map(|&occ| {
                if is_rook {
                    rook_attacks_on_the_fly(square, occ)
                } else {
                    bishop_attacks_on_the_fly(square, occ)
                }
            })
            .collect();

        // create_rook_attack_boards/create_bishop_attack_boards recompute
        // the same table find_magic needs; calling them keeps this tool
        // exercising the exact code path movegen::init uses.
        let _ = if is_rook {
            create_rook_attack_boards(square, &blockers)
        } else {
            create_bishop_attack_boards(square, &blockers)
        };

        let (magic, _table) = find_magic(square, is_rook, mask, &blockers, &attacks);
        println!("square {square:>2}: 0x{magic:016x}");
    }

    println!("done in {} ms", now.elapsed().as_millis());
}

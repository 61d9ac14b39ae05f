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

// Material-key dispatch to a handful of known endgames. When one of these
// applies, it replaces the general evaluator entirely rather than adding
// a correction term on top of it.

use super::psqt::{PSQT_EG, FLIP};
use crate::board::defs::{Pieces, PIECE_VALUES_EG};
use crate::board::Board;
use crate::defs::{NrOf, Side, Sides, Square};

enum Signature {
    None,
    Kqk(Side),
    Krk(Side),
    Kpk(Side),
}

fn is_bare_king(board: &Board, side: Side) -> bool {
    (0..NrOf::PIECE_TYPES)
        .filter(|&p| p != Pieces::KING)
        .all(|p| board.get_pieces(p, side) == 0)
}

fn classify(board: &Board) -> Signature {
    for side in [Sides::WHITE, Sides::BLACK] {
        let other = side ^ 1;
        if !is_bare_king(board, other) {
            continue;
        }

        let queens = board.get_pieces(Pieces::QUEEN, side).count_ones();
        let rooks = board.get_pieces(Pieces::ROOK, side).count_ones();
        let pawns = board.get_pieces(Pieces::PAWN, side).count_ones();
        let minors =
            board.get_pieces(Pieces::BISHOP, side).count_ones() + board.get_pieces(Pieces::KNIGHT, side).count_ones();

        if queens == 1 && rooks == 0 && pawns == 0 && minors == 0 {
            return Signature::Kqk(side);
        }
        if queens == 0 && rooks == 1 && pawns == 0 && minors == 0 {
            return Signature::Krk(side);
        }
        if queens == 0 && rooks == 0 && pawns == 1 && minors == 0 {
            return Signature::Kpk(side);
        }
    }
    Signature::None
}

/// White-relative score for a material configuration with a dedicated
/// endgame evaluator, or `None` if the position should fall through to
/// the general evaluator.
pub fn probe(board: &Board) -> Option<i16> {
    match classify(board) {
        Signature::None => None,
        Signature::Kqk(strong) => Some(mating_score(board, strong, PIECE_VALUES_EG[Pieces::QUEEN], 5, 10)),
        Signature::Krk(strong) => Some(mating_score(board, strong, PIECE_VALUES_EG[Pieces::ROOK], 4, 6)),
        // KPK has no dedicated bitbase here: treat it as a dead draw rather
        // than guessing. Open Question (see DESIGN.md): a real KPK
        // key-square test would replace this stub.
        Signature::Kpk(_) => Some(0),
    }
}

fn distance_from_center(sq: Square) -> i32 {
    let file = (sq % 8) as i32;
    let rank = (sq / 8) as i32;
    (2 * file - 7).abs() + (2 * rank - 7).abs()
}

fn king_distance(a: Square, b: Square) -> i32 {
    let (af, ar) = (a as i32 % 8, a as i32 / 8);
    let (bf, br) = (b as i32 % 8, b as i32 / 8);
    (af - bf).abs().max((ar - br).abs())
}

/// Push the lone king to the edge and bring the strong king closer; the
/// same shape of bonus drives both KQK and KRK, just scaled differently.
fn mating_score(board: &Board, strong: Side, material: i16, edge_weight: i32, proximity_weight: i32) -> i16 {
    let weak = strong ^ 1;
    let weak_king = board.king_square(weak);
    let strong_king = board.king_square(strong);

    let edge_bonus = distance_from_center(weak_king) * edge_weight;
    let proximity_bonus = (14 - king_distance(strong_king, weak_king)) * proximity_weight;
    let pawn_shield_clamp = if strong == Sides::WHITE { FLIP[weak_king] } else { weak_king };
    let drift = PSQT_EG[Pieces::KING][pawn_shield_clamp] as i32 / 4;

    let score = material as i32 + edge_bonus + proximity_bonus - drift;
    let score = score.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    if strong == Sides::WHITE {
        score
    } else {
        -score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn kqk_favors_the_queen_side() {
        let mut board = Board::new();
        board.fen_read(Some("8/8/4k3/8/8/3Q4/8/4K3 w - - 0 1")).unwrap();
        assert!(probe(&board).unwrap() > PIECE_VALUES_EG[Pieces::QUEEN]);
    }

    #[test]
    fn krk_favors_the_rook_side_for_black() {
        let mut board = Board::new();
        board.fen_read(Some("4k3/8/8/8/8/3r4/8/4K3 b - - 0 1")).unwrap();
        assert!(probe(&board).unwrap() < -PIECE_VALUES_EG[Pieces::ROOK]);
    }

    #[test]
    fn kpk_stub_is_a_flat_draw() {
        let mut board = Board::new();
        board.fen_read(Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1")).unwrap();
        assert_eq!(probe(&board), Some(0));
    }

    #[test]
    fn ordinary_material_does_not_match_any_signature() {
        let board = Board::new();
        assert!(probe(&board).is_none());
    }
}

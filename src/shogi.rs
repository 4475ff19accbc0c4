/*
 * Velvet Learning Tools
 * Copyright (C) 2026 mhonert (https://github.com/mhonert)
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use crate::geometry::{BoardGeometry, HandGroup};

/// Standard shogi: 9x9 board, promoted minor pieces share the gold features
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Shogi;

pub mod kinds {
    pub const PAWN: usize = 0;
    pub const LANCE: usize = 1;
    pub const KNIGHT: usize = 2;
    pub const SILVER: usize = 3;
    pub const GOLD: usize = 4;
    pub const BISHOP: usize = 5;
    pub const HORSE: usize = 6;
    pub const ROOK: usize = 7;
    pub const DRAGON: usize = 8;
}

pub mod hand {
    pub const PAWN: usize = 0;
    pub const LANCE: usize = 1;
    pub const KNIGHT: usize = 2;
    pub const SILVER: usize = 3;
    pub const GOLD: usize = 4;
    pub const BISHOP: usize = 5;
    pub const ROOK: usize = 6;
}

impl BoardGeometry for Shogi {
    const FILE_NB: usize = 9;
    const RANK_NB: usize = 9;

    const HAND: &'static [HandGroup] = &[
        HandGroup::new(1, 20, 18),
        HandGroup::new(39, 44, 4),
        HandGroup::new(49, 54, 4),
        HandGroup::new(59, 64, 4),
        HandGroup::new(69, 74, 4),
        HandGroup::new(79, 82, 2),
        HandGroup::new(85, 88, 2),
    ];
    const FE_HAND_END: usize = 90;

    const BOARD_KINDS: usize = 9;
}

/// 5x5 mini shogi (no lances and knights)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MiniShogi;

pub mod mini_kinds {
    pub const PAWN: usize = 0;
    pub const SILVER: usize = 1;
    pub const GOLD: usize = 2;
    pub const BISHOP: usize = 3;
    pub const HORSE: usize = 4;
    pub const ROOK: usize = 5;
    pub const DRAGON: usize = 6;
}

impl BoardGeometry for MiniShogi {
    const FILE_NB: usize = 5;
    const RANK_NB: usize = 5;

    const HAND: &'static [HandGroup] = &[
        HandGroup::new(1, 3, 2),
        HandGroup::new(5, 7, 2),
        HandGroup::new(9, 11, 2),
        HandGroup::new(13, 15, 2),
        HandGroup::new(17, 19, 2),
    ];
    const FE_HAND_END: usize = 21;

    const BOARD_KINDS: usize = 7;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BonaPiece;

    #[test]
    fn shogi_layout() {
        assert_eq!(Shogi::SQ_NB, 81);
        assert_eq!(Shogi::FE_END, 1548);

        assert_eq!(Shogi::board_piece(kinds::PAWN, false, Shogi::square(0, 0)).idx(), 90);
        assert_eq!(Shogi::board_piece(kinds::PAWN, true, Shogi::square(0, 0)).idx(), 171);
        assert_eq!(Shogi::board_piece(kinds::DRAGON, false, Shogi::square(0, 0)).idx(), 1386);
        assert_eq!(Shogi::board_piece(kinds::DRAGON, true, Shogi::square(8, 8)).idx(), 1547);
        assert_eq!(Shogi::hand_piece(hand::ROOK, true, 1).idx(), 89);
    }

    #[test]
    fn mini_shogi_layout() {
        assert_eq!(MiniShogi::SQ_NB, 25);
        assert_eq!(MiniShogi::FE_END, 371);
        assert_eq!(MiniShogi::board_piece(mini_kinds::PAWN, false, MiniShogi::square(0, 0)).idx(), 21);
    }

    #[test]
    fn inverse_of_board_piece() {
        // black silver on 2h (file index 1, rank index 7) <-> white silver on 8b
        let black = Shogi::board_piece(kinds::SILVER, false, Shogi::square(1, 7));
        let white = Shogi::board_piece(kinds::SILVER, true, Shogi::square(7, 1));
        assert_eq!(Shogi::inverse_piece(black), white);
    }

    #[test]
    fn mirror_of_board_piece() {
        let p = Shogi::board_piece(kinds::ROOK, true, Shogi::square(1, 3));
        let m = Shogi::board_piece(kinds::ROOK, true, Shogi::square(7, 3));
        assert_eq!(Shogi::mirror_piece(p), m);
        assert_eq!(Shogi::mirror_piece(Shogi::hand_piece(hand::GOLD, false, 2)), Shogi::hand_piece(hand::GOLD, false, 2));
    }

    #[test]
    fn symmetries_are_involutions() {
        check_involutions::<Shogi>();
        check_involutions::<MiniShogi>();
    }

    fn check_involutions<G: BoardGeometry>() {
        for id in 0..G::FE_END {
            let p = BonaPiece::from(id);
            assert!(G::inverse_piece(p).idx() < G::FE_END);
            assert!(G::mirror_piece(p).idx() < G::FE_END);
            assert_eq!(G::inverse_piece(G::inverse_piece(p)), p);
            assert_eq!(G::mirror_piece(G::mirror_piece(p)), p);
        }
    }
}

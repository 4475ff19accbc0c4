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

use std::fmt::Debug;
use crate::types::{BonaPiece, Square};

/// Feature ids for one piece kind held in hand.
/// Slot i (0 <= i < count) of a side stands for the (i+1)-th piece of this kind in hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HandGroup {
    pub black: u16,
    pub white: u16,
    pub count: u16,
}

impl HandGroup {
    pub const fn new(black: u16, white: u16, count: u16) -> Self {
        HandGroup { black, white, count }
    }
}

/// Describes the board and the piece feature layout of a game.
///
/// Feature ids are laid out as follows:
/// - 0: no piece
/// - [1, FE_HAND_END): pieces in hand, described by the HAND groups
/// - [FE_HAND_END, FE_END): pieces on the board, one block of SQ_NB features per kind and side,
///   alternating black and white (black kind 0, white kind 0, black kind 1, ...)
///
/// Hand ids which are not covered by any group (padding) are fixed points of both symmetries.
pub trait BoardGeometry: Copy + Debug + Default + Eq + Send + Sync + 'static {
    const FILE_NB: usize;
    const RANK_NB: usize;
    const SQ_NB: usize = Self::FILE_NB * Self::RANK_NB;

    const HAND: &'static [HandGroup];
    const FE_HAND_END: usize;

    /// Number of board piece kinds per side
    const BOARD_KINDS: usize;

    const FE_END: usize = Self::FE_HAND_END + 2 * Self::BOARD_KINDS * Self::SQ_NB;

    #[inline]
    fn file_of(sq: Square) -> usize {
        sq.idx() / Self::RANK_NB
    }

    #[inline]
    fn rank_of(sq: Square) -> usize {
        sq.idx() % Self::RANK_NB
    }

    #[inline]
    fn square(file: usize, rank: usize) -> Square {
        debug_assert!(file < Self::FILE_NB && rank < Self::RANK_NB);
        Square::from(file * Self::RANK_NB + rank)
    }

    /// Reflects the square across the left-right mirror axis of the board
    #[inline]
    fn mirror_square(sq: Square) -> Square {
        Self::square(Self::FILE_NB - 1 - Self::file_of(sq), Self::rank_of(sq))
    }

    /// Rotates the square by 180 degrees (the same cell as seen by the opponent)
    #[inline]
    fn inverse_square(sq: Square) -> Square {
        debug_assert!(sq.idx() < Self::SQ_NB);
        Square::from(Self::SQ_NB - 1 - sq.idx())
    }

    /// Returns the feature for the given board piece kind
    fn board_piece(kind: usize, white: bool, sq: Square) -> BonaPiece {
        debug_assert!(kind < Self::BOARD_KINDS);
        let block = kind * 2 + white as usize;
        BonaPiece::from(Self::FE_HAND_END + block * Self::SQ_NB + sq.idx())
    }

    /// Returns the feature for the nth (0-based) piece of the given hand group
    fn hand_piece(group: usize, white: bool, nth: usize) -> BonaPiece {
        let g = Self::HAND[group];
        debug_assert!(nth < g.count as usize);
        let base = if white { g.white } else { g.black };
        BonaPiece::from(base as usize + nth)
    }

    /// The same physical piece as seen from the opposing side
    fn inverse_piece(p: BonaPiece) -> BonaPiece {
        let id = p.idx();
        debug_assert!(id < Self::FE_END);

        if id < Self::FE_HAND_END {
            return match hand_slot(Self::HAND, id) {
                Some((g, slot, false)) => BonaPiece::from(g.white as usize + slot),
                Some((g, slot, true)) => BonaPiece::from(g.black as usize + slot),
                None => p,
            };
        }

        let rel = id - Self::FE_HAND_END;
        let block = rel / Self::SQ_NB;
        let sq = Square::from(rel % Self::SQ_NB);

        BonaPiece::from(Self::FE_HAND_END + (block ^ 1) * Self::SQ_NB + Self::inverse_square(sq).idx())
    }

    /// The piece reflected across the mirror axis; pieces in hand are not affected
    fn mirror_piece(p: BonaPiece) -> BonaPiece {
        let id = p.idx();
        debug_assert!(id < Self::FE_END);

        if id < Self::FE_HAND_END {
            return p;
        }

        let rel = id - Self::FE_HAND_END;
        let block = rel / Self::SQ_NB;
        let sq = Square::from(rel % Self::SQ_NB);

        BonaPiece::from(Self::FE_HAND_END + block * Self::SQ_NB + Self::mirror_square(sq).idx())
    }
}

// Returns the hand group, the slot within the group and whether the id belongs to the white side
fn hand_slot(groups: &[HandGroup], id: usize) -> Option<(HandGroup, usize, bool)> {
    groups.iter().find_map(|&g| {
        let (black, white, count) = (g.black as usize, g.white as usize, g.count as usize);
        if (black..black + count).contains(&id) {
            Some((g, id - black, false))
        } else if (white..white + count).contains(&id) {
            Some((g, id - white, true))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    struct Tiny;

    impl BoardGeometry for Tiny {
        const FILE_NB: usize = 3;
        const RANK_NB: usize = 2;
        const HAND: &'static [HandGroup] = &[HandGroup::new(1, 3, 1), HandGroup::new(5, 6, 1)];
        const FE_HAND_END: usize = 7;
        const BOARD_KINDS: usize = 1;
    }

    #[test]
    fn mirrors_files() {
        assert_eq!(Tiny::SQ_NB, 6);
        assert_eq!(Tiny::mirror_square(Tiny::square(0, 1)), Tiny::square(2, 1));
        assert_eq!(Tiny::mirror_square(Tiny::square(1, 0)), Tiny::square(1, 0));
        assert_eq!(Tiny::inverse_square(Square::new(0)), Square::new(5));
    }

    #[test]
    fn swaps_sides_on_inverse() {
        assert_eq!(Tiny::FE_END, 19);

        let black = Tiny::board_piece(0, false, Tiny::square(0, 0));
        let white = Tiny::board_piece(0, true, Tiny::square(2, 1));
        assert_eq!(Tiny::inverse_piece(black), white);
        assert_eq!(Tiny::inverse_piece(white), black);

        assert_eq!(Tiny::inverse_piece(Tiny::hand_piece(0, false, 0)), Tiny::hand_piece(0, true, 0));
        assert_eq!(Tiny::mirror_piece(Tiny::hand_piece(1, true, 0)), Tiny::hand_piece(1, true, 0));
    }

    #[test]
    fn keeps_padding_slots_fixed() {
        assert_eq!(Tiny::inverse_piece(BonaPiece::ZERO), BonaPiece::ZERO);
        assert_eq!(Tiny::inverse_piece(BonaPiece::new(2)), BonaPiece::new(2));
        assert_eq!(Tiny::inverse_piece(BonaPiece::new(4)), BonaPiece::new(4));
    }
}

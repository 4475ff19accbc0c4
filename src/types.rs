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

/// Float type used for gradient accumulation
pub type LearnFloat = f32;

/// A board cell (sq = file * RANK_NB + rank)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const fn new(sq: u8) -> Self {
        Square(sq)
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Square {
    fn from(sq: usize) -> Self {
        debug_assert!(sq <= u8::MAX as usize);
        Square(sq as u8)
    }
}

/// A piece feature: piece kind and side combined with a board square or a hand slot
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BonaPiece(u16);

impl BonaPiece {
    pub const ZERO: BonaPiece = BonaPiece(0);

    pub const fn new(id: u16) -> Self {
        BonaPiece(id)
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for BonaPiece {
    fn from(id: usize) -> Self {
        debug_assert!(id <= u16::MAX as usize);
        BonaPiece(id as u16)
    }
}

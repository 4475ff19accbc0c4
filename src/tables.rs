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

use std::fmt;
use std::marker::PhantomData;
use std::time::Instant;
use log::{debug, info};
use rayon::prelude::*;
use crate::geometry::BoardGeometry;
use crate::index::{equivalent_indices, index_space_size, FeatureIndex, Kk, Kkp, Kpp};
use crate::types::BonaPiece;

/// Mirror and inverse lookup tables for all piece features
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetryTables<G> {
    inv_piece: Box<[BonaPiece]>,
    mir_piece: Box<[BonaPiece]>,
    _geometry: PhantomData<G>,
}

impl<G: BoardGeometry> SymmetryTables<G> {
    pub fn new() -> Self {
        let inv_piece = (0..G::FE_END).map(|id| G::inverse_piece(BonaPiece::from(id))).collect::<Box<[_]>>();
        let mir_piece = (0..G::FE_END).map(|id| G::mirror_piece(BonaPiece::from(id))).collect::<Box<[_]>>();

        for id in 0..G::FE_END {
            let inv = inv_piece[id].idx();
            let mir = mir_piece[id].idx();
            assert!(inv < G::FE_END && inv_piece[inv].idx() == id, "inverse piece table is not an involution at {}", id);
            assert!(mir < G::FE_END && mir_piece[mir].idx() == id, "mirror piece table is not an involution at {}", id);
        }

        SymmetryTables { inv_piece, mir_piece, _geometry: PhantomData }
    }

    #[inline]
    pub fn inverse_piece(&self, p: BonaPiece) -> BonaPiece {
        self.inv_piece[p.idx()]
    }

    #[inline]
    pub fn mirror_piece(&self, p: BonaPiece) -> BonaPiece {
        self.mir_piece[p.idx()]
    }

    pub fn inv_pieces(&self) -> &[BonaPiece] {
        &self.inv_piece
    }

    pub fn mir_pieces(&self) -> &[BonaPiece] {
        &self.mir_piece
    }
}

impl<G: BoardGeometry> Default for SymmetryTables<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> fmt::Debug for SymmetryTables<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetryTables")
            .field("geometry", &std::any::type_name::<G>())
            .field("fe_end", &self.inv_piece.len())
            .finish()
    }
}

/// Bit set over the serial index space
#[derive(Clone, PartialEq, Eq)]
pub struct IndexFlags {
    bits: Vec<u64>,
    len: u64,
}

impl IndexFlags {
    #[inline]
    pub fn get(&self, index: u64) -> bool {
        debug_assert!(index < self.len);
        self.bits[(index / 64) as usize] & (1u64 << (index % 64)) != 0
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn count_ones(&self) -> u64 {
        self.bits.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Counts the set flags in [start, end)
    pub fn count_ones_in(&self, start: u64, end: u64) -> u64 {
        let end = end.min(self.len);
        let mut count = 0;
        let mut index = start;
        while index < end {
            if index % 64 == 0 && index + 64 <= end {
                count += self.bits[(index / 64) as usize].count_ones() as u64;
                index += 64;
            } else {
                count += self.get(index) as u64;
                index += 1;
            }
        }
        count
    }
}

impl fmt::Debug for IndexFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexFlags").field("len", &self.len).field("set", &self.count_ones()).finish()
    }
}

/// Tables required by the index helpers and the weight update.
/// Must be created once (see init) before training starts and can then be shared between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LearningTools<G> {
    symmetry: SymmetryTables<G>,
    min_index_flag: IndexFlags,
}

impl<G: BoardGeometry> LearningTools<G> {
    /// Builds all tables, using the global rayon thread pool
    pub fn init() -> Self {
        let start = Instant::now();
        info!("Initializing learning tables for {:?} ...", G::default());

        let symmetry = SymmetryTables::<G>::new();
        let min_index_flag = build_min_index_flags(&symmetry);

        let tools = LearningTools { symmetry, min_index_flag };

        debug!("- KK : {} of {} indices are canonical", tools.canonical_count_in::<Kk<G>>(), Kk::<G>::max_index() - Kk::<G>::min_index());
        debug!("- KKP: {} of {} indices are canonical", tools.canonical_count_in::<Kkp<G>>(), Kkp::<G>::max_index() - Kkp::<G>::min_index());
        debug!("- KPP: {} of {} indices are canonical", tools.canonical_count_in::<Kpp<G>>(), Kpp::<G>::max_index() - Kpp::<G>::min_index());
        info!("- Learning tables initialized in {} ms", Instant::now().duration_since(start).as_millis());

        tools
    }

    /// Builds all tables on the given thread pool
    pub fn init_in(pool: &rayon::ThreadPool) -> Self {
        pool.install(Self::init)
    }

    pub fn symmetry(&self) -> &SymmetryTables<G> {
        &self.symmetry
    }

    #[inline]
    pub fn inverse_piece(&self, p: BonaPiece) -> BonaPiece {
        self.symmetry.inverse_piece(p)
    }

    #[inline]
    pub fn mirror_piece(&self, p: BonaPiece) -> BonaPiece {
        self.symmetry.mirror_piece(p)
    }

    /// True, if the index is the smallest one among all indices sharing their weights with it
    #[inline]
    pub fn is_min_index(&self, index: u64) -> bool {
        self.min_index_flag.get(index)
    }

    pub fn min_index_flags(&self) -> &IndexFlags {
        &self.min_index_flag
    }

    pub fn canonical_count(&self) -> u64 {
        self.min_index_flag.count_ones()
    }

    pub fn canonical_count_in<F: FeatureIndex<G>>(&self) -> u64 {
        self.min_index_flag.count_ones_in(F::min_index(), F::max_index())
    }
}

fn build_min_index_flags<G: BoardGeometry>(symmetry: &SymmetryTables<G>) -> IndexFlags {
    let len = index_space_size::<G>();
    let mut bits = vec![0u64; len.div_ceil(64) as usize];

    bits.par_iter_mut().enumerate().for_each(|(i, word)| {
        let start = i as u64 * 64;
        let end = (start + 64).min(len);
        for index in start..end {
            if equivalent_indices(symmetry, index).min() == index {
                *word |= 1u64 << (index - start);
            }
        }
    });

    IndexFlags { bits, len }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shogi::MiniShogi;

    #[test]
    fn tables_follow_geometry() {
        let tables = SymmetryTables::<MiniShogi>::new();
        assert_eq!(tables.inv_pieces().len(), MiniShogi::FE_END);
        assert_eq!(tables.mir_pieces().len(), MiniShogi::FE_END);

        for id in 0..MiniShogi::FE_END {
            let p = BonaPiece::from(id);
            assert_eq!(tables.inverse_piece(p), MiniShogi::inverse_piece(p));
            assert_eq!(tables.mirror_piece(p), MiniShogi::mirror_piece(p));
        }
    }

    #[test]
    fn all_kk_indices_are_canonical() {
        let tools = LearningTools::<MiniShogi>::init();
        assert_eq!(tools.canonical_count_in::<Kk<MiniShogi>>(), Kk::<MiniShogi>::max_index());
    }

    #[test]
    fn count_ones_in_range() {
        let flags = IndexFlags { bits: vec![u64::MAX, 0b1011], len: 100 };
        assert_eq!(flags.count_ones(), 67);
        assert_eq!(flags.count_ones_in(0, 64), 64);
        assert_eq!(flags.count_ones_in(60, 66), 6);
        assert_eq!(flags.count_ones_in(65, 100), 2);
        assert!(flags.get(67));
        assert!(!flags.get(66));
    }
}

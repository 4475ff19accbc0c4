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

//! Helpers to compute the serial index of the KK, KKP and KPP weight arrays.
//!
//! All three arrays share one address space, laid out as KK, then KKP, then KPP.

use std::marker::PhantomData;
use itertools::Itertools;
use crate::geometry::BoardGeometry;
use crate::tables::SymmetryTables;
use crate::types::{BonaPiece, Square};

/// Upper bound for the number of equivalent features returned by to_lower_dimensions
pub const MAX_LOWER_DIMENSIONS: usize = 4;

pub trait FeatureIndex<G: BoardGeometry>: Copy {
    type Lower: AsRef<[Self]>;

    fn min_index() -> u64;

    fn max_index() -> u64;

    #[inline]
    fn is_ok(index: u64) -> bool {
        Self::min_index() <= index && index < Self::max_index()
    }

    /// Decodes the given index, which must be in range (see is_ok)
    fn from_index(index: u64) -> Self;

    fn to_index(&self) -> u64;

    /// Returns all features sharing their weights with this one, starting with the feature itself
    fn to_lower_dimensions(&self, tables: &SymmetryTables<G>) -> Self::Lower;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Kk<G> {
    king0: Square,
    king1: Square,
    _geometry: PhantomData<G>,
}

impl<G: BoardGeometry> Kk<G> {
    pub fn new(king0: Square, king1: Square) -> Self {
        Kk { king0, king1, _geometry: PhantomData }
    }

    pub fn king0(&self) -> Square {
        self.king0
    }

    pub fn king1(&self) -> Square {
        self.king1
    }
}

impl<G: BoardGeometry> FeatureIndex<G> for Kk<G> {
    type Lower = [Self; 1];

    fn min_index() -> u64 {
        0
    }

    fn max_index() -> u64 {
        Self::min_index() + G::SQ_NB as u64 * G::SQ_NB as u64
    }

    fn from_index(index: u64) -> Self {
        debug_assert!(Self::is_ok(index), "KK index out of range: {}", index);
        let mut index = index - Self::min_index();

        let king1 = Square::from((index % G::SQ_NB as u64) as usize);
        index /= G::SQ_NB as u64;
        let king0 = Square::from(index as usize);

        Kk::new(king0, king1)
    }

    #[inline]
    fn to_index(&self) -> u64 {
        Self::min_index() + self.king0.idx() as u64 * G::SQ_NB as u64 + self.king1.idx() as u64
    }

    // KK weights are not mirrored
    fn to_lower_dimensions(&self, _tables: &SymmetryTables<G>) -> Self::Lower {
        [*self]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Kkp<G> {
    king0: Square,
    king1: Square,
    piece: BonaPiece,
    _geometry: PhantomData<G>,
}

impl<G: BoardGeometry> Kkp<G> {
    pub fn new(king0: Square, king1: Square, piece: BonaPiece) -> Self {
        Kkp { king0, king1, piece, _geometry: PhantomData }
    }

    pub fn king0(&self) -> Square {
        self.king0
    }

    pub fn king1(&self) -> Square {
        self.king1
    }

    pub fn piece(&self) -> BonaPiece {
        self.piece
    }
}

impl<G: BoardGeometry> FeatureIndex<G> for Kkp<G> {
    type Lower = [Self; 2];

    fn min_index() -> u64 {
        Kk::<G>::max_index()
    }

    fn max_index() -> u64 {
        Self::min_index() + G::SQ_NB as u64 * G::SQ_NB as u64 * G::FE_END as u64
    }

    fn from_index(index: u64) -> Self {
        debug_assert!(Self::is_ok(index), "KKP index out of range: {}", index);
        let mut index = index - Self::min_index();

        let piece = BonaPiece::from((index % G::FE_END as u64) as usize);
        index /= G::FE_END as u64;
        let king1 = Square::from((index % G::SQ_NB as u64) as usize);
        index /= G::SQ_NB as u64;
        let king0 = Square::from(index as usize);

        Kkp::new(king0, king1, piece)
    }

    #[inline]
    fn to_index(&self) -> u64 {
        Self::min_index()
            + (self.king0.idx() as u64 * G::SQ_NB as u64 + self.king1.idx() as u64) * G::FE_END as u64
            + self.piece.idx() as u64
    }

    fn to_lower_dimensions(&self, tables: &SymmetryTables<G>) -> Self::Lower {
        [
            *self,
            Kkp::new(G::mirror_square(self.king0), G::mirror_square(self.king1), tables.mirror_piece(self.piece)),
        ]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Kpp<G> {
    king: Square,
    piece0: BonaPiece,
    piece1: BonaPiece,
    _geometry: PhantomData<G>,
}

impl<G: BoardGeometry> Kpp<G> {
    pub fn new(king: Square, piece0: BonaPiece, piece1: BonaPiece) -> Self {
        Kpp { king, piece0, piece1, _geometry: PhantomData }
    }

    pub fn king(&self) -> Square {
        self.king
    }

    pub fn piece0(&self) -> BonaPiece {
        self.piece0
    }

    pub fn piece1(&self) -> BonaPiece {
        self.piece1
    }
}

impl<G: BoardGeometry> FeatureIndex<G> for Kpp<G> {
    type Lower = [Self; 4];

    fn min_index() -> u64 {
        Kkp::<G>::max_index()
    }

    fn max_index() -> u64 {
        Self::min_index() + G::SQ_NB as u64 * G::FE_END as u64 * G::FE_END as u64
    }

    fn from_index(index: u64) -> Self {
        debug_assert!(Self::is_ok(index), "KPP index out of range: {}", index);
        let mut index = index - Self::min_index();

        let piece1 = BonaPiece::from((index % G::FE_END as u64) as usize);
        index /= G::FE_END as u64;
        let piece0 = BonaPiece::from((index % G::FE_END as u64) as usize);
        index /= G::FE_END as u64;
        let king = Square::from(index as usize);

        Kpp::new(king, piece0, piece1)
    }

    #[inline]
    fn to_index(&self) -> u64 {
        Self::min_index()
            + (self.king.idx() as u64 * G::FE_END as u64 + self.piece0.idx() as u64) * G::FE_END as u64
            + self.piece1.idx() as u64
    }

    fn to_lower_dimensions(&self, tables: &SymmetryTables<G>) -> Self::Lower {
        let mir_king = G::mirror_square(self.king);
        let mir_piece0 = tables.mirror_piece(self.piece0);
        let mir_piece1 = tables.mirror_piece(self.piece1);
        [
            *self,
            Kpp::new(self.king, self.piece1, self.piece0),
            Kpp::new(mir_king, mir_piece0, mir_piece1),
            Kpp::new(mir_king, mir_piece1, mir_piece0),
        ]
    }
}

/// Size of the combined KK + KKP + KPP address space
pub fn index_space_size<G: BoardGeometry>() -> u64 {
    Kpp::<G>::max_index()
}

/// Serial indices of all features, which share their weights with the feature at a given index.
/// The first entry is always the index itself.
#[derive(Copy, Clone, Debug)]
pub struct EquivalentIndices {
    ids: [u64; MAX_LOWER_DIMENSIONS],
    len: usize,
}

impl EquivalentIndices {
    fn from_feature<G: BoardGeometry, F: FeatureIndex<G>>(feature: F, tables: &SymmetryTables<G>) -> Self {
        let lower = feature.to_lower_dimensions(tables);
        let lower = lower.as_ref();

        let mut ids = [0; MAX_LOWER_DIMENSIONS];
        for (id, f) in ids.iter_mut().zip(lower.iter()) {
            *id = f.to_index();
        }

        EquivalentIndices { ids, len: lower.len() }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.ids[0..self.len]
    }

    pub fn min(&self) -> u64 {
        self.as_slice().iter().copied().min().unwrap_or(self.ids[0])
    }

    /// Sorted indices without duplicates (e.g. KPP features with piece0 == piece1)
    pub fn unique(&self) -> Vec<u64> {
        self.as_slice().iter().copied().sorted_unstable().dedup().collect_vec()
    }
}

/// Looks up the feature family owning the index and expands its lower dimensions
pub fn equivalent_indices<G: BoardGeometry>(tables: &SymmetryTables<G>, index: u64) -> EquivalentIndices {
    if Kk::<G>::is_ok(index) {
        EquivalentIndices::from_feature(Kk::<G>::from_index(index), tables)
    } else if Kkp::<G>::is_ok(index) {
        EquivalentIndices::from_feature(Kkp::<G>::from_index(index), tables)
    } else {
        debug_assert!(Kpp::<G>::is_ok(index), "index out of range: {}", index);
        EquivalentIndices::from_feature(Kpp::<G>::from_index(index), tables)
    }
}

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

use std::time::Instant;
use log::debug;
use crate::geometry::BoardGeometry;
use crate::index::{equivalent_indices, index_space_size};
use crate::tables::LearningTools;
use crate::types::LearnFloat;
use crate::weight::{UpdatePolicy, Weight, WeightValue};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Canonical indices with a gradient in at least one of their equivalent indices
    pub updated: u64,

    /// Canonical indices without any gradient
    pub skipped: u64,
}

#[inline]
pub fn add_gradient<S: Copy>(weights: &mut [Weight<S>], index: u64, delta: [LearnFloat; 2]) {
    weights[index as usize].add_grad(delta);
}

/// Applies one mini-batch update to all parameters.
///
/// For every canonical index the gradients of all indices sharing their weights are summed up
/// and applied to the parameter pair of the canonical index. The result is then copied to all
/// equivalent indices and their gradients are cleared.
///
/// weights and params are indexed by the serial KK/KKP/KPP index.
pub fn update_weights<G, P, T>(
    tools: &LearningTools<G>, policy: &mut P, weights: &mut [Weight<P::State>], params: &mut [[T; 2]],
) -> UpdateStats
where
    G: BoardGeometry,
    P: UpdatePolicy,
    T: WeightValue,
{
    let size = index_space_size::<G>();
    assert_eq!(weights.len() as u64, size, "weight count mismatch");
    assert_eq!(params.len() as u64, size, "parameter count mismatch");

    let start = Instant::now();
    let mut stats = UpdateStats::default();

    for index in 0..size {
        if !tools.is_min_index(index) {
            continue;
        }

        let ids = equivalent_indices(tools.symmetry(), index).unique();
        if ids.iter().all(|&id| weights[id as usize].grad() == [0.0; 2]) {
            stats.skipped += 1;
            continue;
        }

        let g_sum = ids.iter().fold([0.0; 2], |acc: [LearnFloat; 2], &id| {
            let g = weights[id as usize].grad();
            [acc[0] + g[0], acc[1] + g[1]]
        });

        let owner = &mut weights[index as usize];
        owner.set_grad(g_sum);

        let mut v = params[index as usize];
        owner.update_fv(policy, &mut v);

        for &id in ids.iter() {
            params[id as usize] = v;
            weights[id as usize].clear_grad();
        }

        stats.updated += 1;
    }

    debug!(
        "Updated {} weights, skipped {} weights without gradient ({} ms)",
        stats.updated,
        stats.skipped,
        Instant::now().duration_since(start).as_millis()
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{FeatureIndex, Kk, Kkp, Kpp};
    use crate::shogi::{mini_kinds, MiniShogi};
    use crate::weight::{AdaGrad, AdaGradState};

    fn alloc() -> (Vec<Weight<AdaGradState>>, Vec<[i32; 2]>) {
        let size = index_space_size::<MiniShogi>() as usize;
        (Weight::alloc(size), vec![[0; 2]; size])
    }

    #[test]
    fn folds_mirrored_kkp_gradients() {
        let tools = LearningTools::<MiniShogi>::init();
        let (mut weights, mut params) = alloc();
        let mut policy = AdaGrad::new(4.0);

        let piece = MiniShogi::board_piece(mini_kinds::SILVER, false, MiniShogi::square(0, 3));
        let kkp = Kkp::<MiniShogi>::new(MiniShogi::square(1, 4), MiniShogi::square(3, 0), piece);
        let [_, mirrored] = kkp.to_lower_dimensions(tools.symmetry());

        add_gradient(&mut weights, kkp.to_index(), [1.0, 0.0]);
        add_gradient(&mut weights, mirrored.to_index(), [1.0, -2.0]);

        let stats = update_weights(&tools, &mut policy, &mut weights, &mut params);
        assert_eq!(stats.updated, 1);
        assert_eq!(stats.updated + stats.skipped, tools.canonical_count());

        // g_sum = [2, -2], g2 = [4, 4] -> steps of eta * 2 / 2
        let expected = [-4, 4];
        assert_eq!(params[kkp.to_index() as usize], expected);
        assert_eq!(params[mirrored.to_index() as usize], expected);

        assert_eq!(weights[kkp.to_index() as usize].grad(), [0.0; 2]);
        assert_eq!(weights[mirrored.to_index() as usize].grad(), [0.0; 2]);
        assert!(params.iter().filter(|p| **p != [0; 2]).count() == 2);
    }

    #[test]
    fn shares_kpp_weights_across_all_equivalents() {
        let tools = LearningTools::<MiniShogi>::init();
        let (mut weights, mut params) = alloc();
        let mut policy = AdaGrad::new(1.0);

        let p0 = MiniShogi::board_piece(mini_kinds::PAWN, false, MiniShogi::square(0, 2));
        let p1 = MiniShogi::board_piece(mini_kinds::ROOK, true, MiniShogi::square(3, 1));
        let kpp = Kpp::<MiniShogi>::new(MiniShogi::square(1, 4), p0, p1);

        add_gradient(&mut weights, kpp.to_index(), [-1.0, 1.0]);
        update_weights(&tools, &mut policy, &mut weights, &mut params);

        let lower = kpp.to_lower_dimensions(tools.symmetry());
        for f in lower.iter() {
            assert_eq!(params[f.to_index() as usize], [1, -1]);
            assert_eq!(weights[f.to_index() as usize].grad(), [0.0; 2]);
        }
    }

    #[test]
    fn owner_keeps_update_state() {
        let tools = LearningTools::<MiniShogi>::init();
        let (mut weights, mut params) = alloc();
        let mut policy = AdaGrad::new(1.0);

        let kk = Kk::<MiniShogi>::new(MiniShogi::square(2, 2), MiniShogi::square(4, 0));
        add_gradient(&mut weights, kk.to_index(), [3.0, 0.0]);
        update_weights(&tools, &mut policy, &mut weights, &mut params);

        let g2 = weights[kk.to_index() as usize].state().g2;
        assert_eq!(g2, [9.0, 0.0]);

        let stats = update_weights(&tools, &mut policy, &mut weights, &mut params);
        assert_eq!(stats.updated, 0);
    }
}

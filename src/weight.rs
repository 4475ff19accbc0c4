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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::config::LearnerConfig;
use crate::types::LearnFloat;

// Weights are kept within 3/4 of the i16 range
pub const MAX_WEIGHT: f64 = i16::MAX as f64 * 3.0 / 4.0;
pub const MIN_WEIGHT: f64 = i16::MIN as f64 * 3.0 / 4.0;

const MAX_INT_WEIGHT: i32 = MAX_WEIGHT as i32;
const MIN_INT_WEIGHT: i32 = MIN_WEIGHT as i32;

/// Integer type of the evaluation parameters
pub trait WeightValue: Copy {
    fn to_f64(self) -> f64;
    fn to_i32(self) -> i32;

    /// Converts a value, which is already within the weight bounds
    fn from_i32(v: i32) -> Self;
}

macro_rules! impl_weight_value {
    ($($T:ty),*) => {
        $(
            impl WeightValue for $T {
                #[inline(always)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline(always)]
                fn to_i32(self) -> i32 {
                    self as i32
                }

                #[inline(always)]
                fn from_i32(v: i32) -> Self {
                    v as $T
                }
            }
        )*
    };
}

impl_weight_value!(i16, i32);

/// Update rule for a pair of evaluation parameters (e.g. middle game and end game).
///
/// Implementations must not clear the gradient, this is done by the caller after the update.
pub trait UpdatePolicy {
    type State: Copy + Default + Send + Sync;

    fn update_fv<T: WeightValue>(&mut self, g: [LearnFloat; 2], state: &mut Self::State, v: &mut [T; 2]);
}

/// Accumulated gradients of one parameter pair and the state of the update rule.
///
/// The layout is packed, because there is one record per serial KK/KKP/KPP index.
/// The caller must ensure that a record is not modified concurrently.
#[repr(C, packed(2))]
pub struct Weight<S: Copy> {
    g: [LearnFloat; 2],
    state: S,
}

impl<S: Copy> Weight<S> {
    pub fn alloc(len: usize) -> Vec<Self>
    where
        S: Default,
    {
        vec![Self::default(); len]
    }

    #[inline]
    pub fn grad(&self) -> [LearnFloat; 2] {
        self.g
    }

    #[inline]
    pub fn add_grad(&mut self, delta: [LearnFloat; 2]) {
        let g = self.g;
        self.g = [g[0] + delta[0], g[1] + delta[1]];
    }

    #[inline]
    pub fn set_grad(&mut self, g: [LearnFloat; 2]) {
        self.g = g;
    }

    #[inline]
    pub fn clear_grad(&mut self) {
        self.g = [0.0; 2];
    }

    #[inline]
    pub fn state(&self) -> S {
        self.state
    }

    /// Applies the accumulated gradient to v, the gradient itself is left unchanged
    #[inline]
    pub fn update_fv<P, T>(&mut self, policy: &mut P, v: &mut [T; 2])
    where
        P: UpdatePolicy<State = S>,
        T: WeightValue,
    {
        let mut state = self.state;
        policy.update_fv(self.g, &mut state, v);
        self.state = state;
    }
}

impl<S: Copy> Clone for Weight<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Copy> Copy for Weight<S> {}

impl<S: Copy + Default> Default for Weight<S> {
    fn default() -> Self {
        Weight { g: [0.0; 2], state: S::default() }
    }
}

impl<S: Copy + fmt::Debug> fmt::Debug for Weight<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (g, state) = (self.g, self.state);
        f.debug_struct("Weight").field("g", &g).field("state", &state).finish()
    }
}

/// AdaGrad state: sum of squared gradients and the upper 8 bits of the fractional part of v
#[repr(C, packed(2))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AdaGradState {
    pub g2: [LearnFloat; 2],
    pub v8: [i8; 2],
}

/// AdaGrad:
///   g2 = g2 + g^2
///   v = v - eta * g / sqrt(g2)
#[derive(Copy, Clone, Debug)]
pub struct AdaGrad {
    eta: f64,
}

impl AdaGrad {
    const EPSILON: f64 = 0.000001;

    // Scale of the fractional part (127 instead of 128, so that -1.0 can be represented)
    const FRACTION_SCALE: f64 = 127.0;

    pub fn new(eta: f64) -> Self {
        AdaGrad { eta }
    }

    pub fn from_config(config: &LearnerConfig) -> Self {
        AdaGrad::new(config.eta)
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn set_eta(&mut self, eta: f64) {
        self.eta = eta;
    }
}

impl UpdatePolicy for AdaGrad {
    type State = AdaGradState;

    fn update_fv<T: WeightValue>(&mut self, g: [LearnFloat; 2], state: &mut AdaGradState, v: &mut [T; 2]) {
        let mut g2 = state.g2;
        let mut v8 = state.v8;

        for i in 0..2 {
            if g[i] == 0.0 {
                continue;
            }

            g2[i] += g[i] * g[i];

            let mut value = v[i].to_f64() + v8[i] as f64 / Self::FRACTION_SCALE;
            value -= self.eta * g[i] as f64 / (g2[i] as f64 + Self::EPSILON).sqrt();
            value = value.clamp(MIN_WEIGHT, MAX_WEIGHT);

            v[i] = T::from_i32(value.round() as i32);
            v8[i] = ((value - v[i].to_f64()) * Self::FRACTION_SCALE).round() as i8;
        }

        state.g2 = g2;
        state.v8 = v8;
    }
}

/// SGD, which only looks at the sign of the gradient and moves a weight by one unit.
/// Updates are skipped with a probability of 2/3, as moving every weight in each step is too much.
///
/// Every worker thread needs its own instance.
#[derive(Clone, Debug)]
pub struct SignSgd<R = StdRng> {
    rng: R,
}

impl SignSgd<StdRng> {
    pub fn from_config(config: &LearnerConfig) -> Self {
        match config.seed {
            Some(seed) => SignSgd::new(StdRng::seed_from_u64(seed)),
            None => SignSgd::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> SignSgd<R> {
    pub fn new(rng: R) -> Self {
        SignSgd { rng }
    }
}

impl<R: Rng> UpdatePolicy for SignSgd<R> {
    type State = ();

    fn update_fv<T: WeightValue>(&mut self, g: [LearnFloat; 2], _state: &mut (), v: &mut [T; 2]) {
        for i in 0..2 {
            if g[i] == 0.0 {
                continue;
            }

            if self.rng.gen_range(0..3) != 0 {
                continue;
            }

            let step = if g[i] > 0.0 { -1 } else { 1 };
            v[i] = T::from_i32((v[i].to_i32() + step).clamp(MIN_INT_WEIGHT, MAX_INT_WEIGHT));
        }
    }
}

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

pub mod config;
pub mod geometry;
pub mod index;
pub mod reduction;
pub mod shogi;
pub mod tables;
pub mod types;
pub mod weight;

pub use crate::config::LearnerConfig;
pub use crate::geometry::BoardGeometry;
pub use crate::index::{FeatureIndex, Kk, Kkp, Kpp};
pub use crate::tables::LearningTools;
pub use crate::types::{BonaPiece, LearnFloat, Square};
pub use crate::weight::{AdaGrad, AdaGradState, SignSgd, UpdatePolicy, Weight};

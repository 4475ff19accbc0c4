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

use std::path::Path;
use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LearnerConfig {
    /// AdaGrad learning rate
    pub eta: f64,

    /// Seed for the random source of the sign based update (random seed, if missing)
    pub seed: Option<u64>,

    /// Number of threads for building the learning tables (0 = one per CPU core)
    pub threads: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig { eta: 32.0, seed: None, threads: 0 }
    }
}

impl LearnerConfig {
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> anyhow::Result<LearnerConfig> {
        let file_path = file_path.as_ref();
        let config_str = std::fs::read_to_string(file_path)
            .with_context(|| format!("could not read learner config {}", file_path.display()))?;

        Self::from_toml_str(&config_str).with_context(|| format!("invalid learner config {}", file_path.display()))
    }

    pub fn from_toml_str(config_str: &str) -> anyhow::Result<LearnerConfig> {
        let config: LearnerConfig = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.eta.is_finite() || self.eta <= 0.0 {
            bail!("eta must be a positive number, got {}", self.eta);
        }
        Ok(())
    }

    pub fn thread_pool(&self) -> anyhow::Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("learn-tools-{}", i))
            .build()
            .context("could not create thread pool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_defaults_for_missing_values() {
        let config = LearnerConfig::from_toml_str("seed = 7").unwrap();
        assert_eq!(config, LearnerConfig { eta: 32.0, seed: Some(7), threads: 0 });
    }

    #[test]
    fn reads_all_values() {
        let config = LearnerConfig::from_toml_str("eta = 2.5\nseed = 123\nthreads = 4\n").unwrap();
        assert_eq!(config.eta, 2.5);
        assert_eq!(config.seed, Some(123));
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn rejects_invalid_eta() {
        assert!(LearnerConfig::from_toml_str("eta = 0.0").is_err());
        assert!(LearnerConfig::from_toml_str("eta = -1.0").is_err());
        assert!(LearnerConfig::from_toml_str("eta = nan").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(LearnerConfig::from_toml_str("eta = ").is_err());
        assert!(LearnerConfig::from_toml_str("eta = \"fast\"").is_err());
    }

    #[test]
    fn reports_missing_file() {
        let err = LearnerConfig::from_file("./does/not/exist.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("could not read learner config"));
    }

    #[test]
    fn builds_thread_pool() {
        let config = LearnerConfig { threads: 2, ..LearnerConfig::default() };
        let pool = config.thread_pool().unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}

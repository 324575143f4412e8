/**
 * HybridReco
 * Copyright (C) 2018 Sebastian Schelter
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
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::RecoError;

/// Rating cutoff for positive interactions and for admissible recommendation scores
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Number of similar items retrieved per positively rated item
pub const DEFAULT_NUM_SIMILAR: usize = 10;
pub const DEFAULT_TOP_K: usize = 20;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
pub const DEFAULT_SEED: u64 = 42;

/// Range of the raw ratings and the sentinel which marks a missing rating.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    #[serde(default = "default_rating_min")]
    pub min: f64,
    #[serde(default = "default_rating_max")]
    pub max: f64,
    #[serde(default = "default_rating_missing")]
    pub missing: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        RatingScale {
            min: default_rating_min(),
            max: default_rating_max(),
            missing: default_rating_missing(),
        }
    }
}

fn default_rating_min() -> f64 {
    -10.0
}

fn default_rating_max() -> f64 {
    10.0
}

fn default_rating_missing() -> f64 {
    99.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_num_similar")]
    pub num_similar: usize,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Worker threads for the similarity matrix and batch prediction
    #[serde(default = "num_cpus::get")]
    pub num_threads: usize,

    #[serde(default)]
    pub rating_scale: RatingScale,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threshold: DEFAULT_THRESHOLD,
            num_similar: DEFAULT_NUM_SIMILAR,
            top_k: DEFAULT_TOP_K,
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            num_threads: num_cpus::get(),
            rating_scale: RatingScale::default(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_num_similar() -> usize {
    DEFAULT_NUM_SIMILAR
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_test_fraction() -> f64 {
    DEFAULT_TEST_FRACTION
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Config {

    /// Loads a JSON configuration, absent fields take their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RecoError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Config = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RecoError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(invalid(format!("threshold {} outside of [0,1]", self.threshold)));
        }
        if self.num_similar == 0 {
            return Err(invalid("num_similar must be positive".to_string()));
        }
        if self.top_k == 0 {
            return Err(invalid("top_k must be positive".to_string()));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(invalid(format!("test_fraction {} outside of (0,1)", self.test_fraction)));
        }
        if self.num_threads == 0 {
            return Err(invalid("num_threads must be positive".to_string()));
        }
        if !(self.rating_scale.max > self.rating_scale.min) {
            return Err(invalid("empty rating range".to_string()));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> RecoError {
    RecoError::InvalidConfig(reason)
}

#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.num_similar, 10);
        assert_eq!(config.top_k, 20);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"threshold": 0.7, "top_k": 5}"#).unwrap();

        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.num_similar, DEFAULT_NUM_SIMILAR);
        assert_eq!(config.rating_scale, RatingScale::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.top_k = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.test_fraction = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.rating_scale.max = config.rating_scale.min;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"num_similar": 3, "rating_scale": {{"min": 1, "max": 5}}}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.num_similar, 3);
        assert_eq!(config.rating_scale.min, 1.0);
        assert_eq!(config.rating_scale.missing, 99.0);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"num_similar": 0}}"#).unwrap();

        match Config::from_file(&path) {
            Err(RecoError::InvalidConfig(_)) => {},
            other => panic!("unexpected result {:?}", other),
        }
    }
}
